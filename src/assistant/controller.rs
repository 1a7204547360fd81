//! Conversation controller driving the push-to-talk cycle.
//!
//! [`ConversationController`] owns the [`Session`] and the three leaf
//! adapters.  [`run`](ConversationController::run) drains four channels on a
//! single task, so every state change happens in arrival order on one
//! logical thread:
//!
//! ```text
//! AssistantInput (UI) ───┐
//! CaptureMessage ────────┤
//! OutputEvent ───────────┼──▶ handle_*() ──▶ Session ──▶ AssistantEvent (UI)
//! BackendReply (task) ───┘
//! ```
//!
//! # Cycle
//!
//! ```text
//! Tap (first use) ─▶ speak greeting            [Greeting]
//!   └─ done ─▶ speak listening prompt          [Listening]
//!        └─ done ─▶ capture.start
//!             └─ final transcript ─▶ backend   [Processing]
//!                  ├─ Ok  ─▶ speak answer      [Speaking] ─ done ─▶ [Idle]
//!                  └─ Err ─▶ speak error       [Idle]
//! ```
//!
//! Sequencing relies only on completion events; there are no timers apart
//! from the backend timeout.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{AppConfig, SpeechConfig};
use crate::llm::{compose_prompt, BackendError, BackendQuery, LanguageBackend};
use crate::speech::{
    CaptureEvent, CaptureMessage, CaptureSession, OutputEvent, OutputOutcome, SpeakOptions,
    SpeechCapture, SpeechOutput, UtteranceId, UtteranceRequest,
};

use super::catalog::QuickQuestionCatalog;
use super::phrases::{phrases, Phrasebook};
use super::state::{AssistantState, Language, Session};

// ---------------------------------------------------------------------------
// Inputs / events / errors
// ---------------------------------------------------------------------------

/// Gestures and selections sent by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantInput {
    /// Primary gesture: start, cancel or interrupt.
    Tap,
    /// Secondary gesture: cancel whatever runs and open the catalog.
    LongPress,
    /// Select catalog entry `n` for the current language.
    QuickQuestion(usize),
    /// Ask literal text, bypassing speech capture.
    Ask(String),
    ToggleLanguage,
}

/// Notifications for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEvent {
    StateChanged(AssistantState),
    /// Text for the transcript bubble.
    TranscriptUpdated { text: String, is_final: bool },
    CatalogOpened {
        language: Language,
        questions: &'static [&'static str],
        help: &'static str,
    },
    LanguageChanged(Language),
    /// Published once, at construction, when recognition is unavailable.
    CaptureUnavailable,
    InputRejected(AssistantError),
}

/// Reasons an input is refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssistantError {
    #[error("language can only be changed while idle (currently {})", .0.label())]
    BusyToggle(AssistantState),

    #[error("speech recognition is not available on this device")]
    CaptureUnavailable,

    #[error("no quick question at position {0}")]
    UnknownQuickQuestion(usize),
}

/// Result of one backend query, tagged with the query it answers.
#[derive(Debug)]
pub struct BackendReply {
    query_id: u64,
    result: Result<String, BackendError>,
}

// ---------------------------------------------------------------------------
// Internal bookkeeping
// ---------------------------------------------------------------------------

/// What the pending utterance is for; decides what happens when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UtteranceKind {
    Greeting,
    ListeningPrompt,
    Answer,
    /// Error messages and confirmations, spoken while idle.
    Notice,
}

struct InFlightQuery {
    id: u64,
    task: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// ConversationController
// ---------------------------------------------------------------------------

/// Owns the session and mediates every adapter call.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tokio::sync::mpsc;
/// use agri_voice::assistant::{AssistantInput, ConversationController};
/// use agri_voice::config::AppConfig;
/// use agri_voice::llm::GeminiClient;
/// # use agri_voice::speech::{SpeechCapture, SpeechOutput, CaptureMessage, OutputEvent};
/// # fn adapters(
/// #     _c: mpsc::UnboundedSender<CaptureMessage>,
/// #     _o: mpsc::UnboundedSender<OutputEvent>,
/// # ) -> (Box<dyn SpeechCapture>, Box<dyn SpeechOutput>) { unimplemented!() }
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let (capture_tx, capture_rx) = mpsc::unbounded_channel();
/// let (output_tx, output_rx) = mpsc::unbounded_channel();
/// let (event_tx, _event_rx) = mpsc::unbounded_channel();
/// let (input_tx, input_rx) = mpsc::channel(16);
///
/// let (capture, output) = adapters(capture_tx, output_tx);
/// let backend = Arc::new(GeminiClient::from_config(&config.backend));
/// let controller = ConversationController::new(capture, output, backend, &config, event_tx);
///
/// tokio::spawn(controller.run(input_rx, capture_rx, output_rx));
/// input_tx.send(AssistantInput::Tap).await.unwrap();
/// # }
/// ```
pub struct ConversationController {
    session: Session,
    capture: Box<dyn SpeechCapture>,
    output: Box<dyn SpeechOutput>,
    backend: Arc<dyn LanguageBackend>,
    catalog: QuickQuestionCatalog,
    speech: SpeechConfig,
    greet_on_first_use: bool,
    backend_timeout: Duration,

    capture_available: bool,
    /// The recognition session that was started and has not ended yet.
    active_capture: Option<CaptureSession>,
    last_capture: CaptureSession,
    /// Kind of `session.pending_utterance`; set and cleared together with it.
    pending_kind: Option<UtteranceKind>,
    last_utterance: UtteranceId,
    in_flight: Option<InFlightQuery>,
    query_seq: u64,

    backend_tx: mpsc::UnboundedSender<BackendReply>,
    backend_rx: Option<mpsc::UnboundedReceiver<BackendReply>>,
    events: mpsc::UnboundedSender<AssistantEvent>,
}

impl ConversationController {
    /// Create a controller in `Idle`.
    ///
    /// Capture availability is checked here, once.  When it is missing a
    /// single [`AssistantEvent::CaptureUnavailable`] is published and every
    /// gesture that would start listening is rejected from then on.
    pub fn new(
        capture: Box<dyn SpeechCapture>,
        output: Box<dyn SpeechOutput>,
        backend: Arc<dyn LanguageBackend>,
        config: &AppConfig,
        events: mpsc::UnboundedSender<AssistantEvent>,
    ) -> Self {
        let (backend_tx, backend_rx) = mpsc::unbounded_channel();
        let capture_available = capture.is_available();

        let controller = Self {
            session: Session::new(config.assistant.language),
            capture,
            output,
            backend,
            catalog: QuickQuestionCatalog::builtin(),
            speech: config.speech.clone(),
            greet_on_first_use: config.assistant.greet_on_first_use,
            backend_timeout: config.backend.timeout(),
            capture_available,
            active_capture: None,
            last_capture: CaptureSession::new(0),
            pending_kind: None,
            last_utterance: UtteranceId::new(0),
            in_flight: None,
            query_seq: 0,
            backend_tx,
            backend_rx: Some(backend_rx),
            events,
        };

        if !capture_available {
            log::warn!("assistant: speech recognition unavailable, listening disabled");
            controller.emit(AssistantEvent::CaptureUnavailable);
        }
        controller
    }

    /// Override the backend timeout taken from the config.
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    pub fn state(&self) -> AssistantState {
        self.session.state
    }

    pub fn language(&self) -> Language {
        self.session.language
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until `inputs` is closed, then cancel whatever is active.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<AssistantInput>,
        mut capture_events: mpsc::UnboundedReceiver<CaptureMessage>,
        mut output_events: mpsc::UnboundedReceiver<OutputEvent>,
    ) {
        let Some(mut backend_rx) = self.backend_rx.take() else {
            log::error!("assistant: controller loop started twice");
            return;
        };

        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.handle_input(input),
                    None => break,
                },
                Some(message) = capture_events.recv() => self.handle_capture_event(message),
                Some(event) = output_events.recv() => self.handle_output_event(event),
                Some(reply) = backend_rx.recv() => self.handle_backend_reply(reply),
            }
        }

        self.cancel_active();
        log::info!("assistant: input channel closed, controller shutting down");
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Dispatch one UI input; refusals are published as
    /// [`AssistantEvent::InputRejected`].
    pub fn handle_input(&mut self, input: AssistantInput) {
        log::debug!("assistant: input {input:?} in {:?}", self.session.state);

        let outcome = match input {
            AssistantInput::Tap => self.handle_tap(),
            AssistantInput::LongPress => {
                self.handle_long_press();
                Ok(())
            }
            AssistantInput::QuickQuestion(index) => self.select_quick_question(index),
            AssistantInput::Ask(text) => {
                self.submit_question(&text);
                Ok(())
            }
            AssistantInput::ToggleLanguage => self.toggle_language(),
        };

        if let Err(e) = outcome {
            log::warn!("assistant: input rejected: {e}");
            self.emit(AssistantEvent::InputRejected(e));
        }
    }

    /// Primary gesture.
    pub fn handle_tap(&mut self) -> Result<(), AssistantError> {
        match self.session.state {
            AssistantState::Idle => self.begin_cycle(),
            AssistantState::Greeting | AssistantState::Speaking => {
                self.interrupt_output();
                self.set_state(AssistantState::Idle);
                Ok(())
            }
            AssistantState::Listening => {
                self.cancel_active();
                self.session.last_transcript = None;
                Ok(())
            }
            AssistantState::Processing => {
                log::debug!("assistant: tap ignored while waiting for the backend");
                Ok(())
            }
        }
    }

    /// Secondary gesture: cancel anything active, then publish the catalog.
    pub fn handle_long_press(&mut self) {
        if self.session.state.is_busy() {
            self.cancel_active();
        }
        let language = self.session.language;
        self.emit(AssistantEvent::CatalogOpened {
            language,
            questions: self.catalog.questions(language),
            help: phrases(language).help,
        });
    }

    /// Ask catalog entry `index` of the current language.
    pub fn select_quick_question(&mut self, index: usize) -> Result<(), AssistantError> {
        let question = self
            .catalog
            .get(self.session.language, index)
            .ok_or(AssistantError::UnknownQuickQuestion(index))?;
        self.submit_question(question);
        Ok(())
    }

    /// Treat `text` as a final transcript, skipping `Listening`.
    pub fn submit_question(&mut self, text: &str) {
        if self.session.state.is_busy() {
            self.cancel_active();
        }
        self.process_transcript(text);
    }

    /// Switch language; only allowed while idle.
    pub fn toggle_language(&mut self) -> Result<(), AssistantError> {
        if self.session.state != AssistantState::Idle {
            return Err(AssistantError::BusyToggle(self.session.state));
        }
        self.session.language = self.session.language.toggled();
        log::info!("assistant: language is now {:?}", self.session.language);
        self.emit(AssistantEvent::LanguageChanged(self.session.language));
        self.speak_notice(|p| p.language_switched);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Adapter events
    // -----------------------------------------------------------------------

    /// Apply one recognition event.  Messages from any session other than the
    /// active one are dropped.
    pub fn handle_capture_event(&mut self, message: CaptureMessage) {
        let CaptureMessage { session, event } = message;
        if self.active_capture != Some(session) || self.session.state != AssistantState::Listening
        {
            log::debug!("assistant: dropping {event:?} from inactive {session}");
            return;
        }

        match event {
            CaptureEvent::Started => log::debug!("assistant: recognition started"),
            CaptureEvent::Ended => log::debug!("assistant: recognition ended"),
            CaptureEvent::Recognized(partial) => {
                self.session.last_transcript = Some(partial.clone());
                self.emit(AssistantEvent::TranscriptUpdated {
                    text: partial,
                    is_final: false,
                });
            }
            CaptureEvent::FinalResult(text) => {
                self.active_capture = None;
                self.process_transcript(&text);
            }
            CaptureEvent::Error(code) => {
                log::warn!("assistant: recognition failed: {code}");
                self.recover_from_capture_error();
            }
        }
    }

    pub fn handle_output_event(&mut self, event: OutputEvent) {
        if self.session.pending_utterance != Some(event.id) {
            log::debug!("assistant: ignoring stale output event for {}", event.id);
            return;
        }
        self.session.pending_utterance = None;
        let kind = self.pending_kind.take();

        match (kind, event.outcome) {
            (Some(kind), OutputOutcome::Done) => self.on_speech_done(kind),
            (Some(kind), OutputOutcome::Failed(reason)) => self.on_output_failure(kind, &reason),
            (None, _) => {}
        }
    }

    pub fn handle_backend_reply(&mut self, reply: BackendReply) {
        match &self.in_flight {
            Some(query) if query.id == reply.query_id => {}
            _ => {
                log::debug!("assistant: ignoring reply for query {}", reply.query_id);
                return;
            }
        }
        self.in_flight = None;

        match reply.result {
            Ok(answer) => {
                log::debug!("assistant: backend answered ({} chars)", answer.len());
                self.set_state(AssistantState::Speaking);
                self.speak(UtteranceKind::Answer, &answer);
            }
            Err(e) => {
                log::warn!("assistant: backend query failed: {e}");
                self.set_state(AssistantState::Idle);
                self.speak_notice(|p| p.backend_error);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Cycle steps
    // -----------------------------------------------------------------------

    fn begin_cycle(&mut self) -> Result<(), AssistantError> {
        if !self.capture_available {
            return Err(AssistantError::CaptureUnavailable);
        }

        if self.session.take_first_interaction() && self.greet_on_first_use {
            self.set_state(AssistantState::Greeting);
            let greeting = self.phrasebook().greeting;
            self.speak(UtteranceKind::Greeting, greeting);
        } else {
            self.start_listening();
        }
        Ok(())
    }

    fn start_listening(&mut self) {
        self.session.last_transcript = None;
        self.set_state(AssistantState::Listening);
        let prompt = self.phrasebook().listening;
        self.speak(UtteranceKind::ListeningPrompt, prompt);
    }

    fn start_capture(&mut self) {
        let tag = self.language_tag();
        self.last_capture = self.last_capture.next();
        let session = self.last_capture;
        match self.capture.start(session, &tag) {
            Ok(()) => {
                log::debug!("assistant: capturing speech ({session}, {tag})");
                self.active_capture = Some(session);
            }
            Err(e) => {
                log::warn!("assistant: could not start recognition: {e}");
                self.recover_from_capture_error();
            }
        }
    }

    fn process_transcript(&mut self, text: &str) {
        let question = text.trim();
        if question.is_empty() {
            log::warn!("assistant: empty transcript, not asking the backend");
            self.set_state(AssistantState::Idle);
            self.speak_notice(|p| p.no_question);
            return;
        }

        // A notice may still be playing; nothing speaks while awaiting the backend.
        self.interrupt_output();

        self.session.last_transcript = Some(question.to_string());
        self.emit(AssistantEvent::TranscriptUpdated {
            text: question.to_string(),
            is_final: true,
        });
        self.set_state(AssistantState::Processing);

        let query = BackendQuery {
            composed_prompt: compose_prompt(question, self.session.language),
            language_tag: self.language_tag(),
        };
        self.dispatch_query(query);
    }

    /// Run `query` on its own task, bounded by the backend timeout.
    fn dispatch_query(&mut self, query: BackendQuery) {
        self.abort_query();
        self.query_seq += 1;
        let query_id = self.query_seq;

        let backend = Arc::clone(&self.backend);
        let replies = self.backend_tx.clone();
        let timeout = self.backend_timeout;

        let task = tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, backend.query(&query)).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout),
            };
            let _ = replies.send(BackendReply { query_id, result });
        });

        self.in_flight = Some(InFlightQuery { id: query_id, task });
    }

    fn on_speech_done(&mut self, kind: UtteranceKind) {
        match (kind, self.session.state) {
            (UtteranceKind::Greeting, AssistantState::Greeting) => self.start_listening(),
            (UtteranceKind::ListeningPrompt, AssistantState::Listening) => self.start_capture(),
            (UtteranceKind::Answer, AssistantState::Speaking) => {
                self.set_state(AssistantState::Idle)
            }
            _ => {}
        }
    }

    fn on_output_failure(&mut self, kind: UtteranceKind, reason: &str) {
        if kind == UtteranceKind::Notice {
            log::warn!("assistant: notice could not be spoken: {reason}");
            return;
        }
        log::warn!("assistant: speech output failed during {kind:?}: {reason}");
        self.stop_capture();
        self.set_state(AssistantState::Idle);
        self.speak_notice(|p| p.output_error);
    }

    fn recover_from_capture_error(&mut self) {
        self.active_capture = None;
        self.set_state(AssistantState::Idle);
        self.speak_notice(|p| p.capture_error);
    }

    // -----------------------------------------------------------------------
    // Speech output
    // -----------------------------------------------------------------------

    /// Issue a new utterance, stopping the outstanding one first.
    fn speak(&mut self, kind: UtteranceKind, text: &str) {
        self.interrupt_output();

        self.last_utterance = self.last_utterance.next();
        let request = UtteranceRequest {
            id: self.last_utterance,
            text: text.to_string(),
            language_tag: self.language_tag(),
            options: SpeakOptions {
                rate: self.speech.rate,
                pitch: self.speech.pitch,
            },
        };

        match self.output.speak(request) {
            Ok(handle) => {
                self.session.pending_utterance = Some(handle);
                self.pending_kind = Some(kind);
            }
            Err(e) => self.on_output_failure(kind, &e.to_string()),
        }
    }

    fn speak_notice(&mut self, pick: fn(&Phrasebook) -> &'static str) {
        let text = pick(self.phrasebook());
        self.speak(UtteranceKind::Notice, text);
    }

    /// Stop the outstanding utterance, if any.  Its terminal event becomes
    /// stale.
    fn interrupt_output(&mut self) {
        self.pending_kind = None;
        if self.session.pending_utterance.take().is_some() {
            self.output.stop_all();
        }
    }

    // -----------------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------------

    /// Stop output, capture and the backend query; end in `Idle`.
    fn cancel_active(&mut self) {
        self.interrupt_output();
        self.stop_capture();
        self.abort_query();
        self.set_state(AssistantState::Idle);
    }

    fn stop_capture(&mut self) {
        let Some(session) = self.active_capture.take() else {
            return;
        };
        log::debug!("assistant: stopping {session}");
        if let Err(e) = self.capture.stop() {
            log::warn!("assistant: failed to stop recognition: {e}");
        }
    }

    fn abort_query(&mut self) {
        if let Some(query) = self.in_flight.take() {
            log::debug!("assistant: abandoning query {}", query.id);
            query.task.abort();
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_state(&mut self, state: AssistantState) {
        if self.session.state == state {
            return;
        }
        log::debug!("assistant: {:?} → {:?}", self.session.state, state);
        self.session.state = state;
        self.emit(AssistantEvent::StateChanged(state));
    }

    fn phrasebook(&self) -> &'static Phrasebook {
        phrases(self.session.language)
    }

    fn language_tag(&self) -> String {
        self.speech.tag_for(self.session.language).to_string()
    }

    fn emit(&self, event: AssistantEvent) {
        // The UI may already be gone; the conversation does not depend on it.
        let _ = self.events.send(event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
