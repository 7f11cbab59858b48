use thiserror::Error;

/// Everything that can go wrong while binding, parsing or storing a sensor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    // The form has no element with this id
    #[error("field `{0}` not found in form")]
    MissingField(String),

    // INI syntax error, 1-based line number
    #[error("ini parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("missing ini entry: {section} / {key}")]
    Missing { section: String, key: String },

    #[error("invalid value for {section} / {key}: `{value}`")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    #[error("file not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
