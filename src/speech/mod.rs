//! Speech adapter ports.
//!
//! Both platform speech engines are modelled as message-passing ports: a
//! command trait the controller calls, plus a single typed event channel the
//! controller drains on its own task.
//!
//! ```text
//!                 start / stop                      speak / stop_all
//! Controller ───────────────▶ SpeechCapture   Controller ─────────────▶ SpeechOutput
//!     ▲                            │              ▲                        │
//!     └── CaptureMessage (mpsc) ◀──┘              └── OutputEvent (mpsc) ◀─┘
//! ```

pub mod capture;
pub mod output;

#[cfg(test)]
pub mod mock;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use capture::{
    CaptureError, CaptureErrorCode, CaptureEvent, CaptureMessage, CaptureSession, SpeechCapture,
};
pub use output::{
    OutputError, OutputEvent, OutputOutcome, SpeakOptions, SpeechOutput, UtteranceId,
    UtteranceRequest,
};
