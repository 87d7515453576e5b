//! Canonical press payload.
//!
//! The wire format is a compatibility contract with every downstream
//! subscriber: UTF-8 JSON, exactly these keys, in exactly this order.
//!
//! ```json
//! {"device":"esp8266_lolin","action":"button_pressed","timestamp":140,"status":"active"}
//! ```
//!
//! Encoding goes through one serde-derived structure so the bytes are a
//! deterministic function of `(device, timestamp)` — field order follows
//! declaration order.

use serde::Serialize;

/// Action value reported for a confirmed press.
pub const ACTION_BUTTON_PRESSED: &str = "button_pressed";
/// Status value reported for a confirmed press.
pub const STATUS_ACTIVE: &str = "active";

#[derive(Debug, Serialize)]
struct PressPayload<'a> {
    device: &'a str,
    action: &'a str,
    timestamp: u64,
    status: &'a str,
}

/// Encode one confirmed press for publication.
///
/// `timestamp_ms` is monotonic milliseconds since agent start, taken from
/// the confirming input sample.
pub fn encode_press(device: &str, timestamp_ms: u64) -> String {
    let payload = PressPayload {
        device,
        action: ACTION_BUTTON_PRESSED,
        timestamp: timestamp_ms,
        status: STATUS_ACTIVE,
    };
    // A flat struct of borrowed strings and an integer cannot fail to
    // serialise.
    serde_json::to_string(&payload).expect("press payload serialisation")
}
