use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Occupant not found: {0}")]
    OccupantNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoverError>;
