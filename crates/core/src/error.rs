use thiserror::Error;

/// Errors raised while setting up or controlling a strip.
///
/// Transport failures during normal sending are not represented here: the
/// UDP transport logs them and carries on, and the next frame supersedes the
/// lost one.
#[derive(Debug, Error)]
pub enum StripError {
    #[error("invalid strip configuration: {}", .0.join(", "))]
    Configuration(Vec<String>),

    #[error("LED payload of {payload_len} bytes exceeds the {max}-byte length field")]
    ProtocolConstraint { payload_len: usize, max: usize },

    #[error("a strip is already configured for host {0}")]
    DuplicateHost(String),

    #[error("no strip is configured for host {0}")]
    UnknownHost(String),

    #[error("{parameter} must be between {min} and {max}, got {value}")]
    OutOfRange {
        parameter: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("malformed envelope: {0}")]
    Envelope(String),

    #[error("malformed packet: {0}")]
    Packet(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}
