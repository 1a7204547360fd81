//! Speech capture port.
//!
//! The platform speech-to-text engine sits behind [`SpeechCapture`]: the
//! controller sends commands through the trait and receives everything else
//! as [`CaptureMessage`]s on one `tokio::sync::mpsc` channel.  Every message
//! carries the [`CaptureSession`] it belongs to, so events queued by an
//! aborted session are never credited to the next one.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CaptureErrorCode
// ---------------------------------------------------------------------------

/// Why a recognition session failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureErrorCode {
    /// Nothing was recognised before the platform gave up.
    NoSpeech,
    /// Microphone or speech-recognition permission is missing.
    Permission,
    /// The audio device failed or is busy.
    Device,
    /// Online recognition could not reach its service.
    Network,
    /// Any platform code without a dedicated variant.
    Other(String),
}

impl fmt::Display for CaptureErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureErrorCode::NoSpeech => write!(f, "no speech detected"),
            CaptureErrorCode::Permission => write!(f, "permission denied"),
            CaptureErrorCode::Device => write!(f, "audio device error"),
            CaptureErrorCode::Network => write!(f, "network error"),
            CaptureErrorCode::Other(code) => write!(f, "platform error {code}"),
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors returned by [`SpeechCapture`] commands.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// Speech recognition is not available on this device.
    #[error("speech recognition is not available on this device")]
    Unavailable,

    /// The recognizer refused to start.
    #[error("failed to start speech recognition: {0}")]
    Start(String),
}

// ---------------------------------------------------------------------------
// CaptureSession
// ---------------------------------------------------------------------------

/// Token identifying one recognition session, handed out by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureSession(u64);

impl CaptureSession {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The session following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cap-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CaptureEvent
// ---------------------------------------------------------------------------

/// Lifecycle and result events emitted by a capture adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Started,
    /// Interim transcript; may be superseded.
    Recognized(String),
    /// Final transcript of the session.  May be empty.
    FinalResult(String),
    /// The recognizer stopped listening; informational only.
    Ended,
    Error(CaptureErrorCode),
}

/// A [`CaptureEvent`] tagged with the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMessage {
    pub session: CaptureSession,
    pub event: CaptureEvent,
}

impl CaptureMessage {
    pub fn new(session: CaptureSession, event: CaptureEvent) -> Self {
        Self { session, event }
    }
}

// ---------------------------------------------------------------------------
// SpeechCapture trait
// ---------------------------------------------------------------------------

/// Command side of the speech-to-text adapter.
///
/// Implementations report progress by sending [`CaptureMessage`]s, tagged
/// with the session passed to `start`, on the channel they were constructed
/// with.  Exactly one `FinalResult` or `Error` is expected per successful
/// `start`, unless `stop` is called first.
pub trait SpeechCapture: Send {
    /// Whether recognition can be used at all.  Checked once at startup.
    fn is_available(&self) -> bool;

    /// Begin recognition session `session` for the BCP-47 `language_tag`.
    fn start(&mut self, session: CaptureSession, language_tag: &str) -> Result<(), CaptureError>;

    /// Abort the current session.  Events that were already queued may still
    /// arrive and are dropped by the controller.
    fn stop(&mut self) -> Result<(), CaptureError>;
}

// Compile-time assertion: Box<dyn SpeechCapture> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechCapture>) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_increase() {
        let first = CaptureSession::new(1);
        assert!(first.next() > first);
        assert_eq!(first.next().get(), 2);
        assert_eq!(first.to_string(), "cap-1");
    }

    #[test]
    fn message_keeps_its_session() {
        let msg = CaptureMessage::new(CaptureSession::new(4), CaptureEvent::Ended);
        assert_eq!(msg.session, CaptureSession::new(4));
        assert_eq!(msg.event, CaptureEvent::Ended);
    }
}
