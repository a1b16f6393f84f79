use std::path::PathBuf;

use tracing::debug;

use crate::env::env_to_values;
use crate::error::PathfigError;
use crate::file;
use crate::flags::flags_to_values;
use crate::loader::{LoadPlan, Loader};
use crate::types::{FileFormat, KeyStyle};

/// Entry point for building a [`Loader`].
pub struct Pathfig;

impl Pathfig {
    pub fn builder() -> PathfigBuilder {
        PathfigBuilder::new()
    }
}

/// Builder for configuring where a [`Loader`] reads from.
///
/// Only [`app_name()`](Self::app_name) is required; every other input has a
/// default taken from the running process:
///
/// - **Flags**: the process arguments, program name skipped.
/// - **Environment**: the process environment, filtered by the prefix.
/// - **Files**: the working directory and each of its ancestors.
#[derive(Debug, Clone)]
pub struct PathfigBuilder {
    app_name: Option<String>,
    env_prefix: Option<String>,
    file_stems: Option<Vec<String>>,
    args: Option<Vec<String>>,
    env_vars: Option<Vec<String>>,
    search_start: Option<PathBuf>,
    formats: Vec<FileFormat>,
    key_style: KeyStyle,
    platform_dir: bool,
}

impl PathfigBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            env_prefix: None,
            file_stems: None,
            args: None,
            env_vars: None,
            search_start: None,
            formats: vec![FileFormat::Toml],
            key_style: KeyStyle::default(),
            platform_dir: false,
        }
    }

    /// Set the application name. This derives sensible defaults:
    /// - env prefix → `testApplication` becomes `TEST_APPLICATION`
    /// - file stem → `testApplication` becomes `test-application`
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the environment variable prefix. Variables are matched as
    /// `{prefix}__KEY`.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Replace the file-name stems probed in each directory, in order.
    pub fn file_stems<I, S>(mut self, stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_stems = Some(stems.into_iter().map(Into::into).collect());
        self
    }

    /// Append a stem after the derived one (or after those already set).
    pub fn add_file_stem(mut self, stem: &str) -> Self {
        let derived = self.app_name.as_deref().map(stem_for).into_iter();
        self.file_stems
            .get_or_insert_with(|| derived.collect())
            .push(stem.to_string());
        self
    }

    /// Use these tokens as the command line instead of the process arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Use these `KEY=VALUE` lines instead of the process environment.
    pub fn env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(Into::into).collect());
        self
    }

    /// Start the file search here instead of the working directory.
    pub fn search_start(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_start = Some(dir.into());
        self
    }

    /// Formats probed per stem, in order (default: TOML only).
    pub fn formats(mut self, formats: &[FileFormat]) -> Self {
        self.formats = formats.to_vec();
        self
    }

    /// How file keys become path segments (default: [`KeyStyle::Camel`]).
    pub fn key_style(mut self, style: KeyStyle) -> Self {
        self.key_style = style;
        self
    }

    /// Also probe the platform config directory, after every ancestor.
    pub fn platform_dir(mut self, enabled: bool) -> Self {
        self.platform_dir = enabled;
        self
    }

    fn effective_app_name(&self) -> Result<&str, PathfigError> {
        self.app_name
            .as_deref()
            .ok_or(PathfigError::AppNameRequired)
    }

    fn effective_env_prefix(&self) -> Result<String, PathfigError> {
        if let Some(prefix) = &self.env_prefix {
            return Ok(prefix.clone());
        }
        Ok(env_prefix_for(self.effective_app_name()?))
    }

    fn effective_file_stems(&self) -> Result<Vec<String>, PathfigError> {
        if let Some(stems) = &self.file_stems {
            return Ok(stems.clone());
        }
        Ok(vec![stem_for(self.effective_app_name()?)])
    }

    fn effective_search_dirs(&self) -> Result<Vec<PathBuf>, PathfigError> {
        let start = match &self.search_start {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(PathfigError::CurrentDir)?,
        };
        let mut dirs = file::ancestor_dirs(&start);
        if self.platform_dir
            && let Some(dir) = file::platform_dir(self.effective_app_name()?)
        {
            dirs.push(dir);
        }
        Ok(dirs)
    }

    /// Read every source and produce a [`Loader`].
    pub fn load(self) -> Result<Loader, PathfigError> {
        let env_prefix = self.effective_env_prefix()?;
        let stems = self.effective_file_stems()?;
        let dirs = self.effective_search_dirs()?;

        let flags = match &self.args {
            Some(args) => flags_to_values(args),
            None => flags_to_values(std::env::args_os().skip(1).filter_map(|a| a.into_string().ok())),
        };
        let environment = match &self.env_vars {
            Some(lines) => env_to_values(&env_prefix, lines),
            None => env_to_values(&env_prefix, process_env_lines()),
        };

        debug!(
            env_prefix = %env_prefix,
            stems = ?stems,
            dirs = dirs.len(),
            "loading configuration"
        );

        Loader::assemble(LoadPlan {
            flags,
            environment,
            dirs,
            stems: &stems,
            formats: &self.formats,
            key_style: self.key_style,
        })
    }
}

/// The process environment as `KEY=VALUE` lines. Non-UTF-8 entries are
/// skipped.
fn process_env_lines() -> impl Iterator<Item = String> {
    std::env::vars_os().filter_map(|(key, value)| {
        let key = key.into_string().ok()?;
        let value = value.into_string().ok()?;
        Some(format!("{key}={value}"))
    })
}

/// `testApplication` → `TEST_APPLICATION`; `-` is dropped.
pub fn env_prefix_for(app_name: &str) -> String {
    let chars: Vec<char> = app_name.chars().collect();
    let mut prefix = String::with_capacity(app_name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            continue;
        }
        if c.is_lowercase() {
            prefix.extend(c.to_uppercase());
            if chars.get(i + 1).is_some_and(|next| next.is_uppercase()) {
                prefix.push('_');
            }
        } else {
            prefix.push(c);
        }
    }
    prefix
}

/// `testApplication` → `test-application`; `_` is dropped.
pub fn stem_for(app_name: &str) -> String {
    let chars: Vec<char> = app_name.chars().collect();
    let mut stem = String::with_capacity(app_name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            continue;
        }
        if c.is_uppercase() {
            stem.extend(c.to_lowercase());
        } else {
            stem.push(c);
            if c.is_lowercase() && chars.get(i + 1).is_some_and(|next| next.is_uppercase()) {
                stem.push('-');
            }
        }
    }
    stem
}
