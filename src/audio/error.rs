use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("audio output device error: {0}")]
    Device(String),

    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {locator}: {reason}")]
    Decode { locator: String, reason: String },
}
