use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynapseError {
    #[error("No Synapse credentials found: set authtoken in the [authentication] section of {0} or SYNAPSE_AUTH_TOKEN")]
    MissingCredentials(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Synapse returned {status}: {reason}")]
    Server { status: u16, reason: String },

    #[error("Submission {submission_id} has no downloadable file{}", entity_suffix(.entity_type))]
    NoDownloadableFile {
        submission_id: String,
        entity_type: Option<String>,
    },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn entity_suffix(entity_type: &Option<String>) -> String {
    match entity_type {
        Some(t) => format!(" (entity type {t})"),
        None => String::new(),
    }
}
