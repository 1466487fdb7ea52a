//! Federated sign-in handshake channel.
//!
//! A [`ProviderChannel`] drives a single sign-in attempt against an
//! external chooser surface to exactly one outcome: a selection, a user
//! cancellation, or a blocked surface. Two triggers race (the inbound
//! selection message and the close watchdog), and whichever fires first
//! takes the one-shot resolution sender; the loser finds it already taken
//! and is a no-op. Teardown runs on every path, so a finished attempt
//! leaves no listener and no poll behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::fsm::{ChannelMachine, ChannelMachineInput, ChannelState};
use crate::providers::{Provider, ProviderSelection};

/// Fixed chooser surface width in logical pixels.
pub const SURFACE_WIDTH: u32 = 500;

/// Fixed chooser surface height in logical pixels.
pub const SURFACE_HEIGHT: u32 = 600;

/// How often the channel checks whether the surface was closed.
pub const CLOSE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Request to create one chooser surface.
#[derive(Debug, Clone)]
pub struct SurfaceRequest {
    pub provider: Provider,
    pub url: Url,
    pub width: u32,
    pub height: u32,
}

impl SurfaceRequest {
    /// Build the request for a provider under the given identity origin.
    pub fn new(provider: Provider, identity_origin: &Url) -> Self {
        Self {
            provider,
            url: provider.chooser_url(identity_origin),
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
        }
    }
}

/// The channel's side of one open surface: the inbound message stream
/// and the closed flag the watchdog polls.
#[derive(Debug)]
pub struct SurfaceHandle {
    messages: mpsc::UnboundedReceiver<ProviderSelection>,
    closed: Arc<AtomicBool>,
}

impl SurfaceHandle {
    /// Create a handle from a message stream and a shared closed flag.
    pub fn new(
        messages: mpsc::UnboundedReceiver<ProviderSelection>,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self { messages, closed }
    }

    /// Whether the surface has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// An environment able to open chooser surfaces (a popup analog).
pub trait ChooserEnvironment: Send + Sync {
    /// Open a surface for the request. Returns `None` when surface
    /// creation is refused by policy (the popup-blocked case).
    fn open(&self, request: &SurfaceRequest) -> Option<SurfaceHandle>;
}

/// What resolved the handshake.
#[derive(Debug)]
enum ChannelOutcome {
    Selected(ProviderSelection),
    Cancelled,
}

/// Drives one federated sign-in handshake.
///
/// A channel is good for exactly one [`authenticate`](Self::authenticate)
/// call; the FSM rejects a second attempt on the same channel.
pub struct ProviderChannel {
    environment: Arc<dyn ChooserEnvironment>,
    identity_origin: Url,
    fsm: Mutex<ChannelMachine>,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl ProviderChannel {
    /// Create a channel over the given environment.
    pub fn new(environment: Arc<dyn ChooserEnvironment>, identity_origin: Url) -> Self {
        Self {
            environment,
            identity_origin,
            fsm: Mutex::new(ChannelMachine::new()),
            poll_interval: CLOSE_POLL_INTERVAL,
            timeout: None,
        }
    }

    /// Override the close-watchdog poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bound the whole handshake. Off by default: without a limit the
    /// only early exit is the user closing the surface.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Current handshake state.
    pub fn state(&self) -> ChannelState {
        ChannelState::from(self.fsm.lock().unwrap().state())
    }

    /// Transition the FSM, mapping a rejected input to a typed error.
    fn transition(&self, input: &ChannelMachineInput) -> AuthResult<ChannelState> {
        let mut fsm = self.fsm.lock().unwrap();
        fsm.consume(input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;
        let state = ChannelState::from(fsm.state());
        debug!(?input, ?state, "channel transition");
        Ok(state)
    }

    /// Drive one handshake to exactly one outcome.
    ///
    /// Opens the chooser surface, installs exactly one inbound-message
    /// listener, and starts the close watchdog. Whichever trigger fires
    /// first resolves the attempt; the other becomes a no-op. Every path
    /// ends with the listener and watchdog torn down and the surface
    /// closed.
    pub async fn authenticate(&self, provider: Provider) -> AuthResult<ProviderSelection> {
        self.transition(&ChannelMachineInput::OpenRequested)?;

        let request = SurfaceRequest::new(provider, &self.identity_origin);
        debug!(provider = provider.slug(), url = %request.url, "opening chooser surface");

        let Some(surface) = self.environment.open(&request) else {
            warn!(provider = provider.slug(), "chooser surface was blocked");
            self.transition(&ChannelMachineInput::SurfaceBlocked)?;
            self.transition(&ChannelMachineInput::TornDown)?;
            return Err(AuthError::ChannelBlocked);
        };
        self.transition(&ChannelMachineInput::SurfaceReady)?;

        let SurfaceHandle {
            mut messages,
            closed,
        } = surface;

        // One-shot resolution: the first trigger to take the sender wins
        let (sender, receiver) = oneshot::channel::<ChannelOutcome>();
        let sender = Arc::new(Mutex::new(Some(sender)));

        // Exactly one inbound-message listener for this attempt
        let listener = tokio::spawn({
            let sender = Arc::clone(&sender);
            async move {
                if let Some(selection) = messages.recv().await {
                    if let Some(sender) = sender.lock().unwrap().take() {
                        let _ = sender.send(ChannelOutcome::Selected(selection));
                    }
                }
            }
        });

        // Watchdog observing a user-closed surface
        let watchdog = tokio::spawn({
            let sender = Arc::clone(&sender);
            let closed = Arc::clone(&closed);
            let interval = self.poll_interval;
            async move {
                let mut ticker = tokio::time::interval(interval);
                // the first tick completes immediately
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    if closed.load(Ordering::SeqCst) {
                        if let Some(sender) = sender.lock().unwrap().take() {
                            let _ = sender.send(ChannelOutcome::Cancelled);
                        }
                        break;
                    }
                }
            }
        });

        let outcome = if let Some(limit) = self.timeout {
            match tokio::time::timeout(limit, receiver).await {
                Ok(Ok(outcome)) => Some(outcome),
                Ok(Err(_)) => {
                    warn!("resolution channel dropped without an outcome");
                    Some(ChannelOutcome::Cancelled)
                }
                Err(_) => None,
            }
        } else {
            match receiver.await {
                Ok(outcome) => Some(outcome),
                Err(_) => {
                    warn!("resolution channel dropped without an outcome");
                    Some(ChannelOutcome::Cancelled)
                }
            }
        };

        // Teardown runs before the outcome is reported, on every path
        listener.abort();
        watchdog.abort();
        let _ = listener.await;
        let _ = watchdog.await;
        closed.store(true, Ordering::SeqCst);

        match outcome {
            Some(ChannelOutcome::Selected(selection)) => {
                info!(
                    provider = provider.slug(),
                    email = %selection.email,
                    "provider selection received"
                );
                self.transition(&ChannelMachineInput::SelectionReceived)?;
                self.transition(&ChannelMachineInput::TornDown)?;
                Ok(selection)
            }
            Some(ChannelOutcome::Cancelled) => {
                info!(
                    provider = provider.slug(),
                    "surface closed before a selection arrived"
                );
                self.transition(&ChannelMachineInput::CloseObserved)?;
                self.transition(&ChannelMachineInput::TornDown)?;
                Err(AuthError::UserCancelled)
            }
            None => {
                info!(provider = provider.slug(), "handshake timed out");
                self.transition(&ChannelMachineInput::TimedOut)?;
                self.transition(&ChannelMachineInput::TornDown)?;
                Err(AuthError::HandshakeTimeout)
            }
        }
    }
}
