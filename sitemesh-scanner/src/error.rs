use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Server answered {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported content type {content_type} for {url}")]
    UnsupportedContent { url: String, content_type: String },

    #[error("No valid seed URLs to crawl")]
    NoSeeds,
}

pub type Result<T> = std::result::Result<T, ScanError>;
