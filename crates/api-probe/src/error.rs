use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("login response did not contain a token")]
    MissingToken,
    #[error("not logged in")]
    NotAuthenticated,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ProbeError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
