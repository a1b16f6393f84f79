/// How raw keys in configuration files become path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// `pool_size` and `pool-size` both become `poolSize`.
    #[default]
    Camel,
    /// `pool-size` and `poolSize` both become `pool_size`, matching derived
    /// field tags and the flag/environment normalizers.
    Snake,
}

/// On-disk format of a configuration file, selected by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Toml => "toml",
            FileFormat::Json => "json",
        }
    }
}
