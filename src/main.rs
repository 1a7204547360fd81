//! Console front-end for the farming voice assistant.
//!
//! Stands in for the rover's on-screen button.  Spoken output is printed and
//! "finishes" after a delay proportional to its length; while the assistant
//! is listening, a typed line is treated as the recognised transcript.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk; on first run write the defaults out.
//! 3. Build the Gemini client from config.
//! 4. Create the adapter, input and event channels.
//! 5. Spawn the controller loop and the event printer.
//! 6. Read commands from stdin until `quit` or end of input.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agri_voice::{
    assistant::{AssistantEvent, AssistantInput, ConversationController},
    config::{AppConfig, AppPaths},
    llm::GeminiClient,
    speech::{
        CaptureError, CaptureEvent, CaptureMessage, CaptureSession, OutputError, OutputEvent,
        SpeechCapture, SpeechOutput, UtteranceId, UtteranceRequest,
    },
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Simulated speaking time per character at rate 1.0.
const MILLIS_PER_CHAR: f32 = 25.0;

const USAGE: &str = "\
commands:
  tap        primary gesture (start / cancel / interrupt)
  hold       long press: open the quick-question list
  ask <n>    ask quick question n from the list
  lang       switch between English and Hindi
  quit       exit
while listening, type your question and press enter";

// ---------------------------------------------------------------------------
// Console speech output
// ---------------------------------------------------------------------------

/// Prints each utterance and reports `Done` once its simulated playback ends.
struct ConsoleOutput {
    events: mpsc::UnboundedSender<OutputEvent>,
    playing: Vec<JoinHandle<()>>,
}

impl ConsoleOutput {
    fn new(events: mpsc::UnboundedSender<OutputEvent>) -> Self {
        Self {
            events,
            playing: Vec::new(),
        }
    }
}

impl SpeechOutput for ConsoleOutput {
    fn speak(&mut self, request: UtteranceRequest) -> Result<UtteranceId, OutputError> {
        if request.options.rate <= 0.0 {
            return Err(OutputError::Synthesis(format!(
                "invalid speaking rate {}",
                request.options.rate
            )));
        }

        println!("🔊 [{}] {}", request.language_tag, request.text);

        let chars = request.text.chars().count() as f32;
        let millis = (chars * MILLIS_PER_CHAR / request.options.rate) as u64;
        let events = self.events.clone();
        let id = request.id;

        self.playing.retain(|task| !task.is_finished());
        self.playing.push(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            let _ = events.send(OutputEvent::done(id));
        }));
        Ok(id)
    }

    fn stop_all(&mut self) {
        for task in self.playing.drain(..) {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Console speech capture
// ---------------------------------------------------------------------------

/// Raw id of the session the console is listening for; 0 when not listening.
type ActiveSession = Arc<AtomicU64>;

/// End the active session, returning it if there was one.
fn take_session(active: &AtomicU64) -> Option<CaptureSession> {
    match active.swap(0, Ordering::SeqCst) {
        0 => None,
        raw => Some(CaptureSession::new(raw)),
    }
}

/// Marks the console as listening; the stdin loop supplies the transcript.
struct ConsoleCapture {
    events: mpsc::UnboundedSender<CaptureMessage>,
    active: ActiveSession,
}

impl SpeechCapture for ConsoleCapture {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, session: CaptureSession, language_tag: &str) -> Result<(), CaptureError> {
        if self
            .active
            .compare_exchange(0, session.get(), Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CaptureError::Start("already listening".into()));
        }
        println!("🎤 listening ({language_tag}), type your question:");
        let _ = self
            .events
            .send(CaptureMessage::new(session, CaptureEvent::Started));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(session) = take_session(&self.active) {
            let _ = self
                .events
                .send(CaptureMessage::new(session, CaptureEvent::Ended));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Event printer
// ---------------------------------------------------------------------------

async fn print_events(mut events: mpsc::UnboundedReceiver<AssistantEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            AssistantEvent::StateChanged(state) => {
                let marker = if state.is_busy() { "●" } else { "○" };
                println!("{marker} {}", state.label());
            }
            AssistantEvent::TranscriptUpdated { text, is_final } => {
                let tag = if is_final { "you" } else { "…" };
                println!("💬 {tag}: {text}");
            }
            AssistantEvent::CatalogOpened {
                language,
                questions,
                help,
            } => {
                println!("📋 {}: {help}", language.native_name());
                for (n, question) in questions.iter().enumerate() {
                    println!("  {}. {question}", n + 1);
                }
            }
            AssistantEvent::LanguageChanged(language) => {
                println!("🌐 {}", language.native_name());
            }
            AssistantEvent::CaptureUnavailable => {
                println!("⚠ speech recognition unavailable, use `hold` and `ask <n>`");
            }
            AssistantEvent::InputRejected(e) => println!("⚠ {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

enum Command {
    Input(AssistantInput),
    Transcript(String),
    Usage,
    Quit,
    Ignore,
}

fn parse_command(line: &str, listening: bool) -> Command {
    let line = line.trim();

    // Everything typed while listening is the spoken question.
    if listening && !matches!(line, "tap" | "hold" | "quit") {
        return Command::Transcript(line.to_string());
    }

    match line.split_once(' ').unwrap_or((line, "")) {
        ("", _) => Command::Ignore,
        ("tap", _) => Command::Input(AssistantInput::Tap),
        ("hold", _) => Command::Input(AssistantInput::LongPress),
        ("lang", _) => Command::Input(AssistantInput::ToggleLanguage),
        ("quit" | "exit", _) => Command::Quit,
        ("help" | "?", _) => Command::Usage,
        ("ask", n) => match n.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Command::Input(AssistantInput::QuickQuestion(n - 1)),
            _ => Command::Usage,
        },
        _ => Command::Input(AssistantInput::Ask(line.to_string())),
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Agri Voice starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let paths = AppPaths::new();
    if !paths.settings_file.exists() {
        match config.save() {
            Ok(()) => log::info!("Wrote default settings to {}", paths.settings_file.display()),
            Err(e) => log::warn!("Could not write default settings ({e})"),
        }
    }

    // 3. Language backend
    let backend = Arc::new(GeminiClient::from_config(&config.backend));
    if config.backend.resolved_api_key().is_none() {
        log::warn!("No API key configured; every question will fail");
    }

    // 4. Channel setup
    let (capture_tx, capture_rx) = mpsc::unbounded_channel::<CaptureMessage>();
    let (output_tx, output_rx) = mpsc::unbounded_channel::<OutputEvent>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AssistantEvent>();
    let (input_tx, input_rx) = mpsc::channel::<AssistantInput>(16);

    let active: ActiveSession = Arc::new(AtomicU64::new(0));
    let capture = ConsoleCapture {
        events: capture_tx.clone(),
        active: Arc::clone(&active),
    };
    let output = ConsoleOutput::new(output_tx);

    // 5. Controller and printer
    let controller = ConversationController::new(
        Box::new(capture),
        Box::new(output),
        backend,
        &config,
        event_tx,
    );
    let initial_state = controller.state();
    let controller_task = tokio::spawn(controller.run(input_rx, capture_rx, output_rx));
    let printer_task = tokio::spawn(print_events(event_rx));

    println!("{USAGE}");
    println!("○ {}", initial_state.label());

    // 6. Stdin loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line, active.load(Ordering::SeqCst) != 0) {
            Command::Input(input) => {
                if input_tx.send(input).await.is_err() {
                    log::error!("controller stopped unexpectedly");
                    break;
                }
            }
            Command::Transcript(text) => {
                if let Some(session) = take_session(&active) {
                    let final_result = CaptureEvent::FinalResult(text);
                    let _ = capture_tx.send(CaptureMessage::new(session, final_result));
                    let _ = capture_tx.send(CaptureMessage::new(session, CaptureEvent::Ended));
                }
            }
            Command::Usage => println!("{USAGE}"),
            Command::Quit => break,
            Command::Ignore => {}
        }
    }

    // Closing the input channel ends the controller loop.
    drop(input_tx);
    controller_task.await?;
    printer_task.await?;
    log::info!("Agri Voice stopped");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
