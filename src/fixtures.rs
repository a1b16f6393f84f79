#[cfg(test)]
pub mod test {
    use crate::error::PathfigError;
    use crate::file::ConfigFile;
    use crate::loader::Loader;
    use crate::target::{Field, Fields, Populate, Shape};
    use crate::value::{FlatValues, Value, push_value};

    /// Implement the target traits by hand, so engine tests do not depend on
    /// the derive macro.
    macro_rules! fields {
        ($ty:ident { $($field:ident => $desc:expr),* $(,)? }) => {
            impl Populate for $ty {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Struct(self)
                }
            }

            impl Fields for $ty {
                fn visit_fields(
                    &mut self,
                    visit: &mut dyn FnMut(Field, &mut dyn Populate) -> Result<(), PathfigError>,
                ) -> Result<(), PathfigError> {
                    $(visit($desc, &mut self.$field)?;)*
                    Ok(())
                }
            }
        };
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
        pub debug: bool,
        pub database: Option<DbConfig>,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct DbConfig {
        pub connection_uri: String,
        pub pool_size: usize,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Channel {
        pub name: String,
        pub id: i64,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Common {
        pub level: u32,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct NestedConfig {
        pub name: String,
        pub common: Common,
        pub inner: Common,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Tagged {
        pub string_to_int: i64,
        pub leaf: String,
    }

    fields!(ServerConfig {
        host => Field::named("host"),
        port => Field::named("port"),
        debug => Field::named("debug"),
        database => Field::named("database"),
    });

    fields!(DbConfig {
        connection_uri => Field::named("connectionUri"),
        pool_size => Field::named("pool_size"),
    });

    fields!(Channel {
        name => Field::named("name"),
        id => Field::named("id"),
    });

    fields!(Common {
        level => Field::named("level"),
    });

    fields!(NestedConfig {
        name => Field::named("name"),
        common => Field { flatten: true, ..Field::named("common") },
        inner => Field::named("inner"),
    });

    fields!(Tagged {
        string_to_int => Field { tag: Some("stringToInt"), ..Field::named("string_to_int") },
        leaf => Field { tag: Some("custom.leaf"), ..Field::named("leaf") },
    });

    /// String values keyed by path; repeated keys accumulate.
    pub fn flat(pairs: &[(&str, &str)]) -> FlatValues {
        let mut values = FlatValues::new();
        for (path, value) in pairs {
            push_value(&mut values, path.to_string(), Value::from(*value));
        }
        values
    }

    /// Every source holds single values; `g` is defined by both files.
    pub fn single_value_loader() -> Loader {
        Loader::new(
            flat(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]),
            flat(&[("b", "5"), ("e", "6")]),
            vec![
                ConfigFile {
                    path: "path/to/other/file-2.toml".into(),
                    values: flat(&[("d", "9"), ("g", "10")]),
                },
                ConfigFile {
                    path: "path/to/file-1.toml".into(),
                    values: flat(&[("c", "7"), ("f", "8"), ("g", "9"), ("h", "10")]),
                },
            ],
        )
    }

    /// Flags and environment each hold two values per path; no files.
    pub fn multi_value_loader() -> Loader {
        Loader::new(
            flat(&[
                ("a", "1"),
                ("a", "2"),
                ("b", "3"),
                ("b", "4"),
                ("c", "5"),
                ("c", "6"),
                ("d", "7"),
                ("d", "8"),
            ]),
            flat(&[("b", "9"), ("b", "10"), ("e", "11"), ("e", "12")]),
            Vec::new(),
        )
    }

    #[test]
    fn fixtures_describe_their_fields_in_order() {
        let mut config = ServerConfig::default();
        let mut names = Vec::new();
        config
            .visit_fields(&mut |field: Field, _value: &mut dyn Populate| {
                names.push(field.name);
                Ok(())
            })
            .unwrap();
        assert_eq!(names, ["host", "port", "debug", "database"]);
    }
}
