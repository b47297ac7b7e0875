#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not running in a pull request context: {0}")]
    Context(String),

    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    #[error("unexpected GitHub API response: {0}")]
    ApiResponse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
