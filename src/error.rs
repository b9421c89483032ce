use thiserror::Error;

/// Unified application error type to simplify bubbling errors through async flows.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Errored while handling a file. {0}")]
    Io(#[from] std::io::Error),
    #[error("Error accessing the repository API. {0}")]
    Http(#[from] reqwest::Error),
    #[error("The repository API answered {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("Error decoding the API response. {0}")]
    Decode(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error("Error decoding base64 file content. {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Unsupported content encoding '{0}'")]
    Encoding(String),
    #[error("No patch for {0} in the comparison")]
    MissingPatch(String),
    #[error("Invalid API URL. {0}")]
    Url(#[from] url::ParseError),
    #[error("Error parsing the config file. {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config directory not found. {0}")]
    Dirs(#[from] post_history_dirs::DirError),
    #[error("Missing configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

/// Convenience alias for results that bubble `AppError`.
pub type AppResult<T> = Result<T, AppError>;
