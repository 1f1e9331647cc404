//! Error type shared by the radar client.
//!
//! Nothing in the viewport core is fatal; these errors surface at the
//! boundaries (query parsing, config fetch, socket payloads, calibration
//! derivation) and are turned into a connection status or a log line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadarError {
    #[error("no room provided in the page query")]
    MissingRoom,

    #[error("failed to fetch server config: {0}")]
    ConfigFetch(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("calibration reference points are degenerate")]
    DegenerateCalibration,

    #[error("socket error: {0}")]
    Socket(String),
}

pub type Result<T> = std::result::Result<T, RadarError>;
