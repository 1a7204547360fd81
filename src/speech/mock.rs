//! Recording test doubles for the speech ports (test-only).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::capture::{CaptureError, CaptureEvent, CaptureMessage, CaptureSession, SpeechCapture};
use super::output::{OutputError, OutputEvent, SpeechOutput, UtteranceId, UtteranceRequest};

/// A call received by [`MockOutput`].
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Speak {
        id: UtteranceId,
        text: String,
        language_tag: String,
    },
    StopAll,
}

/// Records every call; optionally completes each utterance at once.
pub struct MockOutput {
    pub calls: Arc<Mutex<Vec<OutputCall>>>,
    events: mpsc::UnboundedSender<OutputEvent>,
    auto_complete: bool,
    fail_speak: bool,
}

impl MockOutput {
    /// Utterances stay outstanding until the test delivers an event.
    pub fn manual(events: mpsc::UnboundedSender<OutputEvent>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            events,
            auto_complete: false,
            fail_speak: false,
        }
    }

    /// Every utterance reports `Done` immediately.
    pub fn auto(events: mpsc::UnboundedSender<OutputEvent>) -> Self {
        Self {
            auto_complete: true,
            ..Self::manual(events)
        }
    }

    /// `speak` fails synchronously.
    pub fn failing(events: mpsc::UnboundedSender<OutputEvent>) -> Self {
        Self {
            fail_speak: true,
            ..Self::manual(events)
        }
    }
}

impl SpeechOutput for MockOutput {
    fn speak(&mut self, request: UtteranceRequest) -> Result<UtteranceId, OutputError> {
        self.calls.lock().unwrap().push(OutputCall::Speak {
            id: request.id,
            text: request.text.clone(),
            language_tag: request.language_tag.clone(),
        });
        if self.fail_speak {
            return Err(OutputError::Synthesis("mock synthesis failure".into()));
        }
        if self.auto_complete {
            let _ = self.events.send(OutputEvent::done(request.id));
        }
        Ok(request.id)
    }

    fn stop_all(&mut self) {
        self.calls.lock().unwrap().push(OutputCall::StopAll);
    }
}

/// A call received by [`MockCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureCall {
    Start(CaptureSession, String),
    Stop,
}

/// Records calls and replays one scripted batch of events per `start`,
/// tagged with the session being started.
pub struct MockCapture {
    pub calls: Arc<Mutex<Vec<CaptureCall>>>,
    events: mpsc::UnboundedSender<CaptureMessage>,
    script: VecDeque<Vec<CaptureEvent>>,
    available: bool,
    fail_start: bool,
}

impl MockCapture {
    pub fn new(events: mpsc::UnboundedSender<CaptureMessage>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            events,
            script: VecDeque::new(),
            available: true,
            fail_start: false,
        }
    }

    /// Events sent in order on the next `start`.
    pub fn then(mut self, batch: Vec<CaptureEvent>) -> Self {
        self.script.push_back(batch);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Reports available but refuses every `start`.
    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }
}

impl SpeechCapture for MockCapture {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self, session: CaptureSession, language_tag: &str) -> Result<(), CaptureError> {
        self.calls
            .lock()
            .unwrap()
            .push(CaptureCall::Start(session, language_tag.to_string()));
        if !self.available {
            return Err(CaptureError::Unavailable);
        }
        if self.fail_start {
            return Err(CaptureError::Start("microphone busy".into()));
        }
        for event in self.script.pop_front().unwrap_or_default() {
            let _ = self.events.send(CaptureMessage::new(session, event));
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.calls.lock().unwrap().push(CaptureCall::Stop);
        Ok(())
    }
}
