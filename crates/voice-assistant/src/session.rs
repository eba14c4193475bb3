//! Capture session: listening lifecycle and debounced command dispatch
//!
//! ```text
//!            start()                    Final(text) ──► debounce ──► dispatch
//!   Idle ───────────────► Listening ◄─┐
//!    ▲                       │   │    └─ Interim(text): display only
//!    └── stop() / Error / Ended ─┘
//! ```
//!
//! Each `start()` opens a new capture handle under a fresh generation number.
//! Events arriving through a sink of an older generation, or after the session
//! went idle, are dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::{
    classifier::classify,
    config::AssistantConfig,
    dispatcher::ActionDispatcher,
    ports::{CaptureEvent, CaptureHandle, CaptureSink, SessionObserver, SpeechCapture},
    timer::DebounceTimer,
    AssistantError, CaptureError, Result,
};

const CAPTURE_UNSUPPORTED: &str = "Speech recognition is not supported in your browser.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Idle,
    Listening,
}

struct SessionState {
    generation: u64,
    status: SessionStatus,
    handle: Option<Box<dyn CaptureHandle>>,
    /// Last dispatched command, remembered until the cool-down clears it
    last_command: Option<String>,
    pending: DebounceTimer,
    cooldown: DebounceTimer,
}

impl SessionState {
    fn reset_commands(&mut self) {
        self.pending.cancel();
        self.cooldown.cancel();
        self.last_command = None;
    }
}

pub(crate) struct SessionInner {
    config: AssistantConfig,
    /// Runtime for timers and dispatch; capture events may arrive on any thread.
    runtime: Handle,
    capture: Arc<dyn SpeechCapture>,
    dispatcher: Arc<ActionDispatcher>,
    observer: Option<Arc<dyn SessionObserver>>,
    state: Mutex<SessionState>,
}

/// One consumer's speech-capture session
pub struct CaptureSession {
    inner: Arc<SessionInner>,
}

impl CaptureSession {
    pub fn new(
        config: AssistantConfig,
        capture: Arc<dyn SpeechCapture>,
        dispatcher: Arc<ActionDispatcher>,
    ) -> Result<Self> {
        Self::build(config, capture, dispatcher, None)
    }

    pub fn with_observer(
        config: AssistantConfig,
        capture: Arc<dyn SpeechCapture>,
        dispatcher: Arc<ActionDispatcher>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<Self> {
        Self::build(config, capture, dispatcher, Some(observer))
    }

    fn build(
        config: AssistantConfig,
        capture: Arc<dyn SpeechCapture>,
        dispatcher: Arc<ActionDispatcher>,
        observer: Option<Arc<dyn SessionObserver>>,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| {
            AssistantError::Config("capture session created outside a Tokio runtime".to_string())
        })?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                capture,
                dispatcher,
                observer,
                state: Mutex::new(SessionState {
                    generation: 0,
                    status: SessionStatus::Idle,
                    handle: None,
                    last_command: None,
                    pending: DebounceTimer::new(runtime.clone()),
                    cooldown: DebounceTimer::new(runtime.clone()),
                }),
                runtime,
            }),
        })
    }

    /// Start listening, stopping any capture handle opened earlier.
    pub fn start(&self) -> SessionStatus {
        let (generation, previous) = {
            let mut state = self.inner.lock();
            state.generation += 1;
            state.status = SessionStatus::Listening;
            state.reset_commands();
            (state.generation, state.handle.take())
        };

        if let Some(mut previous) = previous {
            debug!("Stopping previous capture handle before generation {}", generation);
            previous.stop();
        }
        self.inner.show_transcript("");

        let sink = CaptureSink::new(generation, &self.inner);
        let options = self.inner.config.capture_options();
        match self.inner.capture.start(&options, sink) {
            Ok(mut handle) => {
                let mut state = self.inner.lock();
                // The engine may already have failed or ended from inside start().
                if state.generation != generation || state.status != SessionStatus::Listening {
                    let status = if state.generation == generation {
                        SessionStatus::Idle
                    } else {
                        state.status
                    };
                    drop(state);
                    handle.stop();
                    return status;
                }
                state.handle = Some(handle);
                drop(state);

                info!("Voice capture started (generation {})", generation);
                self.inner.set_listening(true);
                SessionStatus::Listening
            }
            Err(err) => {
                warn!("Voice capture failed to start: {}", err);
                self.inner.go_idle(generation);
                let message = match err {
                    CaptureError::Unsupported => CAPTURE_UNSUPPORTED.to_string(),
                    CaptureError::Engine(reason) => capture_error_message(&reason),
                };
                self.inner.dispatcher.speak(&message);
                SessionStatus::Idle
            }
        }
    }

    /// Stop listening and forget pending and remembered commands.
    pub fn stop(&self) {
        let handle = {
            let mut state = self.inner.lock();
            if state.status == SessionStatus::Idle && state.handle.is_none() {
                return;
            }
            state.status = SessionStatus::Idle;
            state.reset_commands();
            state.handle.take()
        };

        if let Some(mut handle) = handle {
            handle.stop();
        }
        info!("Voice capture stopped");
        self.inner.set_listening(false);
        self.inner.show_transcript("");
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.lock().status
    }

    pub fn is_listening(&self) -> bool {
        self.status() == SessionStatus::Listening
    }

    pub fn last_command(&self) -> Option<String> {
        self.inner.lock().last_command.clone()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.inner.config
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_error_message(reason: &str) -> String {
    format!("Error during speech recognition: {}", reason)
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A panicking observer must not wedge the session.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn on_event(inner: &Arc<Self>, generation: u64, event: CaptureEvent) {
        let mut state = inner.lock();
        if state.generation != generation || state.status == SessionStatus::Idle {
            debug!(
                "Ignoring {:?} from retired capture handle (generation {}, current {})",
                event, generation, state.generation
            );
            return;
        }

        match event {
            CaptureEvent::Started => {
                drop(state);
                inner.show_transcript("");
            }
            CaptureEvent::Interim(text) => {
                drop(state);
                inner.show_transcript(&text);
            }
            CaptureEvent::Final(text) => {
                let command = text.trim().to_string();
                if command.is_empty() {
                    return;
                }

                if state.last_command.as_deref() == Some(command.as_str()) {
                    debug!("Suppressing repeated command '{}'", command);
                } else {
                    let weak = Arc::downgrade(inner);
                    state.pending.arm(inner.config.debounce(), async move {
                        if let Some(inner) = weak.upgrade() {
                            SessionInner::process(&inner, generation, command);
                        }
                    });
                }
                drop(state);
                inner.show_transcript(&text);
            }
            CaptureEvent::Error(reason) => {
                state.status = SessionStatus::Idle;
                state.handle = None;
                drop(state);

                warn!("Voice capture error: {}", reason);
                inner.set_listening(false);
                inner.show_transcript("");
                inner.dispatcher.speak(&capture_error_message(&reason));
            }
            CaptureEvent::Ended => {
                state.status = SessionStatus::Idle;
                state.handle = None;
                drop(state);

                info!("Voice capture ended");
                inner.set_listening(false);
                inner.show_transcript("");
            }
        }
    }

    /// Debounce window elapsed: remember the command, then classify and
    /// dispatch it on its own task.
    fn process(inner: &Arc<Self>, generation: u64, command: String) {
        {
            let mut state = inner.lock();
            if state.generation != generation {
                return;
            }
            state.last_command = Some(command.clone());

            let weak = Arc::downgrade(inner);
            state.cooldown.arm(inner.config.cooldown(), async move {
                if let Some(inner) = weak.upgrade() {
                    inner.forget_command(generation);
                }
            });
        }
        inner.show_transcript("");

        let dispatcher = inner.dispatcher.clone();
        inner.runtime.spawn(async move {
            let intent = classify(&command);
            info!("Voice command '{}' classified as {}", command, intent.kind());
            dispatcher.dispatch(&intent).await;
        });
    }

    fn forget_command(&self, generation: u64) {
        {
            let mut state = self.lock();
            if state.generation != generation {
                return;
            }
            state.last_command = None;
        }
        self.show_transcript("");
    }

    fn go_idle(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation == generation {
            state.status = SessionStatus::Idle;
            state.handle = None;
        }
    }

    fn set_listening(&self, listening: bool) {
        if let Some(observer) = &self.observer {
            observer.listening_changed(listening);
        }
    }

    fn show_transcript(&self, text: &str) {
        if let Some(observer) = &self.observer {
            observer.transcript_changed(text);
        }
    }
}
