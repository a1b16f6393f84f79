//! File discovery and loading for config files.
//!
//! # Discovery
//!
//! The search walks from a start directory up to the filesystem root,
//! **closest first**, so a file next to the start directory shadows one
//! further up. The platform config directory can be appended as a final,
//! lowest-precedence location.
//!
//! In each directory, for each file-name stem and each enabled format, the
//! loader probes `{stem}.config.{ext}`, or `{stem}.{environment}.config.{ext}`
//! when an environment name is in effect.
//!
//! # Missing files
//!
//! Not-found and permission-denied files are silently skipped, since listing a
//! location is a suggestion, not a requirement. Other I/O errors and decode
//! failures are propagated.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::PathfigError;
use crate::flatten;
use crate::types::{FileFormat, KeyStyle};
use crate::value::FlatValues;

/// One decoded configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Where the file was read from.
    pub path: PathBuf,
    /// The file's contents lowered to the flat path model.
    pub values: FlatValues,
}

/// Everything discovery needs besides the directory list.
#[derive(Debug, Clone)]
pub struct FileQuery<'a> {
    pub stems: &'a [String],
    pub environment: Option<&'a str>,
    pub formats: &'a [FileFormat],
    pub key_style: KeyStyle,
}

/// File name for a stem, optional environment name, and format.
pub fn config_file_name(stem: &str, environment: Option<&str>, format: FileFormat) -> String {
    let ext = format.extension();
    match environment {
        Some(env) => format!("{stem}.{env}.config.{ext}"),
        None => format!("{stem}.config.{ext}"),
    }
}

/// Directories from `start` up to the filesystem root, closest first.
pub fn ancestor_dirs(start: &Path) -> Vec<PathBuf> {
    start.ancestors().map(Path::to_path_buf).collect()
}

/// The platform config directory for `app_name` (XDG on Linux,
/// `~/Library/Application Support` on macOS), if one can be determined.
pub fn platform_dir(app_name: &str) -> Option<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", app_name)?;
    Some(proj.config_dir().to_path_buf())
}

/// Probe every directory in order and decode the files that exist.
///
/// The returned list keeps directory order, so the first entry has the
/// highest precedence.
pub fn load_config_files(
    dirs: &[PathBuf],
    query: &FileQuery<'_>,
) -> Result<Vec<ConfigFile>, PathfigError> {
    let mut files = Vec::new();
    for dir in dirs {
        for stem in query.stems {
            for &format in query.formats {
                let file_path = dir.join(config_file_name(stem, query.environment, format));
                if let Some(file) = maybe_load_file(&file_path, format, query.key_style)? {
                    files.push(file);
                }
            }
        }
    }
    Ok(files)
}

/// Read and flatten one file. `Ok(None)` when the file is absent or unreadable
/// for permission reasons.
pub fn maybe_load_file(
    file_path: &Path,
    format: FileFormat,
    key_style: KeyStyle,
) -> Result<Option<ConfigFile>, PathfigError> {
    let content = match std::fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            trace!(path = %file_path.display(), error = %e, "config file skipped");
            return Ok(None);
        }
        Err(e) => {
            return Err(PathfigError::IoError {
                path: file_path.to_path_buf(),
                source: e,
            });
        }
    };

    let values = parse_content(&content, file_path, format, key_style)?;
    debug!(path = %file_path.display(), keys = values.len(), "config file loaded");
    Ok(Some(ConfigFile {
        path: file_path.to_path_buf(),
        values,
    }))
}

/// Decode `content` in `format` and flatten it.
pub fn parse_content(
    content: &str,
    file_path: &Path,
    format: FileFormat,
    key_style: KeyStyle,
) -> Result<FlatValues, PathfigError> {
    let flattened = match format {
        FileFormat::Toml => {
            let table: toml::Table =
                toml::from_str(content).map_err(|e| PathfigError::ParseError {
                    path: file_path.to_path_buf(),
                    source: e,
                })?;
            flatten::flatten(&table, key_style)
        }
        FileFormat::Json => {
            let tree: serde_json::Value =
                serde_json::from_str(content).map_err(|e| PathfigError::JsonError {
                    path: file_path.to_path_buf(),
                    source: e,
                })?;
            flatten::flatten(&tree, key_style)
        }
    };
    flattened.map_err(|e| PathfigError::Flatten {
        path: file_path.to_path_buf(),
        source: e,
    })
}
