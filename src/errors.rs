use crate::metadata::ExtractionError;

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("invalid video url: {0}")]
    InvalidUrl(String),

    #[error("metadata extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("channel name not found: '{name}'. Example available: {available:?}")]
    NotFound { name: String, available: Vec<String> },

    #[error("ambiguous channel name: '{name}'. Matches: {}", format_matches(.matches))]
    Ambiguous {
        name: String,
        matches: Vec<ChannelMatch>,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("catalog responded with {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("transient network failure: {0}")]
    Transient(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0:?}")]
    IO(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identifying fields of one candidate in an ambiguous channel lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMatch {
    pub id: Option<String>,
    pub channel_number: Option<String>,
    pub provider: Option<String>,
}

fn format_matches(matches: &[ChannelMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            format!(
                "{{id: {}, channel_number: {}, provider: {}}}",
                m.id.as_deref().unwrap_or("-"),
                m.channel_number.as_deref().unwrap_or("-"),
                m.provider.as_deref().unwrap_or("-"),
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl IngestError {
    /// Network or timeout failures that are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, IngestError::Transient(_))
    }

    /// Batch-level failures that abort the run regardless of `continue_on_error`.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            IngestError::Validation(_)
                | IngestError::NotFound { .. }
                | IngestError::Ambiguous { .. }
                | IngestError::Config(_)
        )
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if !status.is_server_error() => IngestError::Remote {
                status: status.as_u16(),
                body: crate::scrape::get_error(&err),
            },
            _ => IngestError::Transient(crate::scrape::get_error(&err)),
        }
    }
}
