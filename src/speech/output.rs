//! Speech output port.
//!
//! [`SpeechOutput`] wraps the platform text-to-speech engine.  Every
//! accepted [`UtteranceRequest`] produces exactly one terminal
//! [`OutputEvent`] tagged with the request's [`UtteranceId`], unless the
//! adapter is stopped first, in which case it may produce one or none.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// UtteranceId
// ---------------------------------------------------------------------------

/// Opaque token identifying one speak request.
///
/// The controller hands out strictly increasing ids, so an id never repeats
/// within a session and a stale terminal event can be recognised by a plain
/// equality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(u64);

impl UtteranceId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utt-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Voice parameters passed with every utterance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeakOptions {
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// One unit of speech, moved into the adapter by value.
#[derive(Debug, PartialEq)]
pub struct UtteranceRequest {
    pub id: UtteranceId,
    pub text: String,
    /// BCP-47 tag of the voice to use.
    pub language_tag: String,
    pub options: SpeakOptions,
}

// ---------------------------------------------------------------------------
// Events / errors
// ---------------------------------------------------------------------------

/// How an utterance ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputOutcome {
    Done,
    Failed(String),
}

/// Terminal event for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEvent {
    pub id: UtteranceId,
    pub outcome: OutputOutcome,
}

impl OutputEvent {
    pub fn done(id: UtteranceId) -> Self {
        Self {
            id,
            outcome: OutputOutcome::Done,
        }
    }

    pub fn failed(id: UtteranceId, reason: impl Into<String>) -> Self {
        Self {
            id,
            outcome: OutputOutcome::Failed(reason.into()),
        }
    }
}

/// Synchronous failure of [`SpeechOutput::speak`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OutputError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

// ---------------------------------------------------------------------------
// SpeechOutput trait
// ---------------------------------------------------------------------------

/// Command side of the text-to-speech adapter.
pub trait SpeechOutput: Send {
    /// Queue `request` and return its handle (the request's id).
    fn speak(&mut self, request: UtteranceRequest) -> Result<UtteranceId, OutputError>;

    /// Stop the current utterance and drop anything queued.
    fn stop_all(&mut self);
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechOutput>) {}
};
