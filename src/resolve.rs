//! Lookups against the loaded sources, in precedence order.
//!
//! Flags win over environment variables, which win over files; files are
//! consulted closest first. A lookup never merges sources: the first source
//! that has the path answers for it.
//!
//! Pure over the loaded data; no I/O happens here.

use std::collections::HashSet;

use crate::error::PathfigError;
use crate::loader::Loader;
use crate::path::sibling_index_path;
use crate::value::{FlatValues, Value};

impl Loader {
    /// Every source in precedence order, highest first.
    fn sources(&self) -> impl Iterator<Item = &FlatValues> {
        [&self.flags, &self.environment]
            .into_iter()
            .chain(self.files.iter().map(|file| &file.values))
    }

    /// The value sequence stored at exactly `path` in the highest-precedence
    /// source that has it.
    ///
    /// `Ok(None)` when no source has the path; an empty path is an error.
    pub fn resolve_value(&self, path: &str) -> Result<Option<&[Value]>, PathfigError> {
        if path.is_empty() {
            return Err(PathfigError::EmptyPath);
        }
        Ok(self
            .sources()
            .find_map(|source| source.get(path))
            .map(Vec::as_slice))
    }

    /// How many distinct `path[i]` element prefixes the highest-precedence
    /// source mentioning any of them defines.
    ///
    /// Each source is counted on its own; the first nonzero count wins, so a
    /// list given on the command line replaces one from a file instead of
    /// being merged with it.
    pub fn resolve_path_len(&self, path: &str) -> Result<usize, PathfigError> {
        if path.is_empty() {
            return Err(PathfigError::EmptyPath);
        }
        Ok(self
            .sources()
            .map(|source| count_elements(source, path))
            .find(|&count| count > 0)
            .unwrap_or(0))
    }
}

fn count_elements(source: &FlatValues, path: &str) -> usize {
    source
        .keys()
        .filter_map(|key| sibling_index_path(key, path))
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::ConfigFile;
    use crate::fixtures::test::{flat, multi_value_loader, single_value_loader};

    fn strings(values: Option<&[Value]>) -> Vec<String> {
        values
            .unwrap_or_default()
            .iter()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn single_values_follow_precedence() {
        let loader = single_value_loader();
        let expected = [
            ("a", "1"),
            ("b", "2"),
            ("c", "3"),
            ("d", "4"),
            ("e", "6"),
            ("f", "8"),
            ("g", "10"),
            ("h", "10"),
        ];
        for (path, value) in expected {
            assert_eq!(strings(loader.resolve_value(path).unwrap()), [value], "{path}");
        }
    }

    #[test]
    fn multi_values_come_back_whole() {
        let loader = multi_value_loader();
        assert_eq!(strings(loader.resolve_value("b").unwrap()), ["3", "4"]);
        assert_eq!(strings(loader.resolve_value("e").unwrap()), ["11", "12"]);
    }

    #[test]
    fn missing_path_is_none() {
        let loader = single_value_loader();
        assert!(loader.resolve_value("zzz").unwrap().is_none());
    }

    #[test]
    fn empty_path_is_an_error() {
        let loader = single_value_loader();
        assert!(matches!(loader.resolve_value(""), Err(PathfigError::EmptyPath)));
        assert!(matches!(loader.resolve_path_len(""), Err(PathfigError::EmptyPath)));
    }

    #[test]
    fn path_len_counts_distinct_elements() {
        let loader = Loader::new(
            flat(&[
                ("servers[0].host", "a"),
                ("servers[0].port", "1"),
                ("servers[1].host", "b"),
                ("serversx[5]", "no"),
            ]),
            FlatValues::new(),
            Vec::new(),
        );
        assert_eq!(loader.resolve_path_len("servers").unwrap(), 2);
        assert_eq!(loader.resolve_path_len("clients").unwrap(), 0);
    }

    #[test]
    fn path_len_does_not_merge_sources() {
        let loader = Loader::new(
            FlatValues::new(),
            flat(&[("servers[0].host", "env")]),
            vec![ConfigFile {
                path: "app.config.toml".into(),
                values: flat(&[
                    ("servers[0].host", "a"),
                    ("servers[1].host", "b"),
                    ("servers[2].host", "c"),
                ]),
            }],
        );
        assert_eq!(loader.resolve_path_len("servers").unwrap(), 1);
    }

    #[test]
    fn path_len_falls_through_to_files_in_order() {
        let loader = Loader::new(
            FlatValues::new(),
            FlatValues::new(),
            vec![
                ConfigFile {
                    path: "near.config.toml".into(),
                    values: flat(&[("other", "x")]),
                },
                ConfigFile {
                    path: "far.config.toml".into(),
                    values: flat(&[("list[0]", "a"), ("list[1]", "b")]),
                },
            ],
        );
        assert_eq!(loader.resolve_path_len("list").unwrap(), 2);
    }
}
