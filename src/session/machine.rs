//! Session state machine
//!
//! All inputs (assistant events and trigger presses) are consumed by a single
//! task. Recognized text is dispatched inline, while the turn is in the
//! Thinking phase. The only state shared with another thread is the
//! [`StartGate`], which the trigger listener reads at press time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::assistant::{AssistantEvent, AssistantHandle};
use crate::dispatch::ActionExecutor;
use crate::events::StatusEvent;
use crate::feedback::Announcer;
use crate::intent::IntentParser;
use crate::trigger::{StartGate, TriggerEvent};

use super::gate::strip_activation_keyword;

/// How long a button-requested conversation may take to begin before the
/// button is re-armed
const START_TIMEOUT: Duration = Duration::from_secs(10);

/// Conversation lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Assistant not ready yet
    #[default]
    Idle,
    /// Ready, no turn active
    ReadyIdle,
    /// Turn active, user speaking
    Listening,
    /// User finished speaking, turn still active
    Thinking,
    /// Fatal error received
    Terminated,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::ReadyIdle => write!(f, "ReadyIdle"),
            SessionState::Listening => write!(f, "Listening"),
            SessionState::Thinking => write!(f, "Thinking"),
            SessionState::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Errors that end the session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("assistant reported a fatal error")]
    FatalAssistant,
}

/// Owns the conversation lifecycle and routes recognized text
pub struct SessionController {
    state: SessionState,
    /// Closed until ready, while a turn is active, and between a trigger
    /// press and the turn it requested
    start_gate: StartGate,
    /// The trigger is only honoured once the assistant is ready
    trigger_enabled: bool,
    /// Set when a press asked the assistant to start a conversation
    pending_start: Option<tokio::time::Instant>,
    turn_started_at: Option<Instant>,
    activation_keyword: String,
    parser: IntentParser,
    executor: ActionExecutor,
    assistant: Arc<dyn AssistantHandle>,
    announcer: Arc<dyn Announcer>,
    status_tx: broadcast::Sender<StatusEvent>,
}

impl SessionController {
    pub fn new(
        activation_keyword: impl Into<String>,
        parser: IntentParser,
        executor: ActionExecutor,
        assistant: Arc<dyn AssistantHandle>,
        announcer: Arc<dyn Announcer>,
        status_tx: broadcast::Sender<StatusEvent>,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            start_gate: StartGate::new(),
            trigger_enabled: false,
            pending_start: None,
            turn_started_at: None,
            activation_keyword: activation_keyword.into().to_lowercase(),
            parser,
            executor,
            assistant,
            announcer,
            status_tx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_start_conversation(&self) -> bool {
        self.start_gate.is_open()
    }

    /// Gate to hand to the trigger listener
    pub fn start_gate(&self) -> StartGate {
        self.start_gate.clone()
    }

    /// Process assistant events and trigger presses until the assistant goes
    /// away or reports a fatal error.
    pub async fn run(
        &mut self,
        mut assistant_rx: mpsc::Receiver<AssistantEvent>,
        mut trigger_rx: mpsc::Receiver<TriggerEvent>,
    ) -> Result<(), SessionError> {
        info!("session started in Idle state");
        let mut trigger_open = true;

        loop {
            let start_deadline = self.pending_start.map(|at| at + START_TIMEOUT);

            tokio::select! {
                event = assistant_rx.recv() => match event {
                    Some(event) => self.handle_event(event).await?,
                    None => break,
                },
                press = trigger_rx.recv(), if trigger_open => match press {
                    Some(TriggerEvent::Pressed) => self.handle_trigger(),
                    None => {
                        debug!("trigger channel closed");
                        trigger_open = false;
                    }
                },
                _ = sleep_until_deadline(start_deadline), if start_deadline.is_some() => {
                    self.expire_pending_start();
                }
            }
        }

        info!("assistant disconnected, session stopped");
        Ok(())
    }

    /// Apply one assistant lifecycle event
    pub async fn handle_event(&mut self, event: AssistantEvent) -> Result<(), SessionError> {
        if self.state == SessionState::Terminated {
            debug!(?event, "session terminated, dropping event");
            return Err(SessionError::FatalAssistant);
        }

        match event {
            AssistantEvent::Ready => {
                self.start_gate.open();
                self.trigger_enabled = true;
                self.transition_to(SessionState::ReadyIdle);
                info!(
                    keyword = %self.activation_keyword,
                    "assistant ready: say the hotword or press the button, \
                     then start commands with the activation keyword"
                );
            }
            AssistantEvent::TurnStarted => {
                self.start_gate.close();
                self.pending_start = None;
                self.turn_started_at = Some(Instant::now());
                self.transition_to(SessionState::Listening);
            }
            AssistantEvent::EndOfUtterance => {
                self.transition_to(SessionState::Thinking);
            }
            AssistantEvent::RecognizedText { text } => {
                self.handle_text(&text).await;
            }
            AssistantEvent::TurnFinished => {
                let duration_ms = self
                    .turn_started_at
                    .take()
                    .map(|t| t.elapsed().as_millis() as u64)
                    .unwrap_or(0);
                debug!(duration_ms, "turn finished");
                self.start_gate.open();
                self.transition_to(SessionState::ReadyIdle);
            }
            AssistantEvent::Error { is_fatal: false } => {
                warn!("assistant reported a non-fatal error");
                if self.pending_start.take().is_some() {
                    debug!("requested conversation did not start, re-arming trigger");
                    self.start_gate.open();
                }
            }
            AssistantEvent::Error { is_fatal: true } => {
                error!("assistant reported a fatal error");
                self.start_gate.close();
                self.pending_start = None;
                self.trigger_enabled = false;
                self.transition_to(SessionState::Terminated);
                return Err(SessionError::FatalAssistant);
            }
        }

        Ok(())
    }

    /// Button press: start a turn if one may begin, otherwise do nothing.
    ///
    /// Presses arriving through the listener already passed the gate when
    /// they happened; this re-checks in case a turn began since.
    pub fn handle_trigger(&mut self) {
        if !self.trigger_enabled {
            debug!(state = %self.state, "trigger pressed before assistant ready, ignoring");
            return;
        }
        if !self.can_start_conversation() || self.state != SessionState::ReadyIdle {
            debug!(state = %self.state, "trigger pressed during a turn, ignoring");
            return;
        }

        info!("trigger pressed, starting conversation");
        self.start_gate.close();
        self.pending_start = Some(tokio::time::Instant::now());
        self.assistant.start_conversation();
    }

    /// The assistant never began the turn a press asked for
    fn expire_pending_start(&mut self) {
        if self.pending_start.take().is_some() && self.state == SessionState::ReadyIdle {
            warn!("conversation did not start after trigger press, re-arming trigger");
            self.start_gate.open();
        }
    }

    /// Route recognized text: keyword-prefixed commands are handled here,
    /// everything else is left to the assistant
    async fn handle_text(&mut self, text: &str) {
        info!(text, "you said");
        let text = text.to_lowercase();

        let Some(command) = strip_activation_keyword(&text, &self.activation_keyword) else {
            debug!("no activation keyword, passing through");
            return;
        };

        // Keep the assistant from answering the command itself
        self.assistant.stop_conversation();

        let intent = self.parser.parse(command);
        let Some(outcome) = self.executor.execute(&intent).await else {
            return;
        };

        self.announcer.announce(outcome.phrase());
        self.emit(StatusEvent::CommandHandled { outcome });
    }

    fn transition_to(&mut self, new_state: SessionState) {
        let old_state = self.state;
        if old_state == new_state {
            return;
        }

        info!(from = %old_state, to = %new_state, "session transition");
        self.state = new_state;

        let event = match new_state {
            SessionState::Idle => return,
            SessionState::ReadyIdle => StatusEvent::Ready,
            SessionState::Listening => StatusEvent::Listening,
            SessionState::Thinking => StatusEvent::Thinking,
            SessionState::Terminated => StatusEvent::Terminated,
        };
        self.emit(event);
    }

    fn emit(&self, event: StatusEvent) {
        debug!(%event, "emitting status event");
        let _ = self.status_tx.send(event);
    }
}

async fn sleep_until_deadline(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
