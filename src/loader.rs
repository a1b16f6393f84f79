use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::env_to_values;
use crate::error::PathfigError;
use crate::file::{self, ConfigFile, FileQuery};
use crate::flags::flags_to_values;
use crate::populate::populate;
use crate::target::Populate;
use crate::types::{FileFormat, KeyStyle};
use crate::value::FlatValues;

/// Flag and environment key naming the environment-specific file set.
const CONFIG_ENVIRONMENT: &str = "config_environment";

/// A loaded, immutable snapshot of every configuration source.
///
/// Flags take precedence over environment variables, which take precedence
/// over files. `files` is ordered closest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loader {
    pub(crate) flags: FlatValues,
    pub(crate) environment: FlatValues,
    pub(crate) files: Vec<ConfigFile>,
}

impl Loader {
    /// Assemble a loader from already-normalized sources.
    pub fn new(flags: FlatValues, environment: FlatValues, files: Vec<ConfigFile>) -> Self {
        Loader {
            flags,
            environment,
            files,
        }
    }

    /// Load for `app_name` from the process arguments, the process
    /// environment, and config files found from the working directory up.
    pub fn load(app_name: &str) -> Result<Self, PathfigError> {
        crate::Pathfig::builder().app_name(app_name).load()
    }

    /// Load from explicit inputs, touching the filesystem only to probe for
    /// config files at and above `search_start`.
    ///
    /// `env_lines` are `KEY=VALUE` strings.
    pub fn from_values<A, E>(
        args: A,
        env_prefix: &str,
        env_lines: E,
        search_start: &Path,
        stems: &[String],
    ) -> Result<Self, PathfigError>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self::assemble(LoadPlan {
            flags: flags_to_values(args),
            environment: env_to_values(env_prefix, env_lines),
            dirs: file::ancestor_dirs(search_start),
            stems,
            formats: &[FileFormat::Toml],
            key_style: KeyStyle::default(),
        })
    }

    /// Normalize the non-file sources, pick the environment name from them,
    /// then discover and decode files.
    pub(crate) fn assemble(plan: LoadPlan<'_>) -> Result<Self, PathfigError> {
        let LoadPlan {
            flags,
            environment,
            dirs,
            stems,
            formats,
            key_style,
        } = plan;

        let config_environment = [&flags, &environment]
            .into_iter()
            .find_map(|source| source.get(CONFIG_ENVIRONMENT))
            .and_then(|values| values.first())
            .map(|value| value.to_string());

        let query = FileQuery {
            stems,
            environment: config_environment.as_deref(),
            formats,
            key_style,
        };
        let files = file::load_config_files(&dirs, &query)?;

        debug!(
            flags = flags.len(),
            environment = environment.len(),
            files = files.len(),
            config_environment = config_environment.as_deref().unwrap_or(""),
            "configuration loaded"
        );

        Ok(Loader {
            flags,
            environment,
            files,
        })
    }

    pub fn flags(&self) -> &FlatValues {
        &self.flags
    }

    pub fn environment(&self) -> &FlatValues {
        &self.environment
    }

    /// Decoded files, closest first.
    pub fn files(&self) -> &[ConfigFile] {
        &self.files
    }

    /// Populate `target` from the configuration rooted at `path`.
    ///
    /// Leaves with no resolvable value keep whatever `target` already held,
    /// so pre-set fields act as defaults. An empty `path` means the root.
    pub fn get<T: Populate>(&self, path: &str, target: &mut T) -> Result<(), PathfigError> {
        populate(self, path, target, 0)
    }

    /// Populate `target` from the whole configuration. Same as `get("", target)`.
    pub fn get_all<T: Populate>(&self, target: &mut T) -> Result<(), PathfigError> {
        self.get("", target)
    }
}

/// Inputs for [`Loader::assemble`], produced by the builder.
pub(crate) struct LoadPlan<'a> {
    pub flags: FlatValues,
    pub environment: FlatValues,
    pub dirs: Vec<PathBuf>,
    pub stems: &'a [String],
    pub formats: &'a [FileFormat],
    pub key_style: KeyStyle,
}
