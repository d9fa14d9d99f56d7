use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HAR log could not be parsed: {0}")]
    Har(#[source] serde_json::Error),

    #[error("Output error: {0}")]
    Output(String),
}
