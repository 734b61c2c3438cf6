use std::path::PathBuf;

/// Why a flag glyph could not be produced. Never surfaces to callers of the widgets; the flag
/// falls back to a placeholder glyph instead.
#[derive(Debug, thiserror::Error)]
pub enum FlagError {
    #[error("no flag asset configured")]
    Missing,
    #[error("failed to read flag asset {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("flag glyph is empty or has no display width")]
    EmptyGlyph,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to parse country dataset: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("country #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("country {name:?} has invalid calling code {code:?}")]
    InvalidCallingCode { name: String, code: String },
    #[error("duplicate country key {0:?}")]
    DuplicateKey(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse phone input config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("fallback flag glyph must not be empty")]
    EmptyFallbackFlag,
}
