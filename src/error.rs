use thiserror::Error;

/// Failures of a single translation request
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("source text is empty")]
    EmptySource,

    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("translation service returned no message content")]
    EmptyReply,

    #[error("translation reply is not valid JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),

    #[error("translation reply is missing `{0}`")]
    MissingField(&'static str),

    #[error("unsupported LLM provider: {0}")]
    UnsupportedProvider(String),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("no voices available")]
    NoVoices,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("local store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid link: {0}")]
    InvalidLink(String),

    #[error("link fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("link returned {0}")]
    Status(u16),
}
