use thiserror::Error;

#[derive(Debug, Error)]
pub enum CumulateError {
    #[error("no extractable activity data in the input batch")]
    NoData,

    #[error("input directory not found: {0}")]
    InputDirNotFound(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CumulateError>;
