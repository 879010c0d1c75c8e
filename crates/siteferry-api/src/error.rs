#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to obtain an upload credential for '{project}': {detail}")]
    Credential { project: String, detail: String },

    #[error("hosting platform returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// Best-effort upstream payload, for relaying to the caller as
    /// diagnostics.
    pub fn upstream_detail(&self) -> Option<&str> {
        match self {
            Error::Upstream { body, .. } => Some(body),
            Error::Credential { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
