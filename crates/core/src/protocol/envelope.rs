use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::StripError;

/// Command name the device expects for raw frames
const RAZER_CMD: &str = "razer";

/// JSON message carried by each datagram:
/// `{"msg":{"cmd":"razer","data":{"pt":"<base64 frame>"}}}`
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    msg: EnvelopeMessage,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnvelopeMessage {
    cmd: String,
    data: EnvelopeData,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnvelopeData {
    pt: String,
}

/// Wrap a binary frame into the UTF-8 JSON datagram body.
pub fn wrap_envelope(frame: &[u8]) -> Vec<u8> {
    let envelope = Envelope {
        msg: EnvelopeMessage {
            cmd: RAZER_CMD.to_string(),
            data: EnvelopeData {
                pt: STANDARD.encode(frame),
            },
        },
    };
    // Serialising plain strings cannot fail
    serde_json::to_vec(&envelope).unwrap_or_default()
}

/// Recover the binary frame from a datagram body.
pub fn unwrap_envelope(message: &[u8]) -> Result<Vec<u8>, StripError> {
    let envelope: Envelope =
        serde_json::from_slice(message).map_err(|e| StripError::Envelope(e.to_string()))?;

    if envelope.msg.cmd != RAZER_CMD {
        return Err(StripError::Envelope(format!(
            "unexpected command {:?}",
            envelope.msg.cmd
        )));
    }

    STANDARD
        .decode(envelope.msg.data.pt.as_bytes())
        .map_err(|e| StripError::Envelope(e.to_string()))
}
