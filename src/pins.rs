//! GPIO pin assignments for the ButtonLink node.
//!
//! Single source of truth — wiring changes here and propagates everywhere.

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button. D1 on Lolin-style boards.
pub const BUTTON_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Status indicator
// ---------------------------------------------------------------------------

/// On-board LED, toggled once per successful publish.
pub const STATUS_LED_GPIO: i32 = 2;
