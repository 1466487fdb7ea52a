//! Simulated provider chooser environment.
//!
//! The platform never talks to Google or GitHub: the chooser is a
//! self-contained surface listing fixed candidate identities, and it
//! emits at most one selection before it goes away. `SimulatedChooser`
//! is that surface without the rendering; a [`SurfaceControl`] plays the
//! user's part, picking an identity or closing the window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::debug;

use crate::channel::{ChooserEnvironment, SurfaceHandle, SurfaceRequest};
use crate::providers::ProviderSelection;

/// Control handle for one simulated surface.
#[derive(Debug, Clone)]
pub struct SurfaceControl {
    sender: mpsc::UnboundedSender<ProviderSelection>,
    closed: Arc<AtomicBool>,
}

impl SurfaceControl {
    /// Emit the "selection made" message. After the handshake has
    /// resolved nobody is listening and the message goes nowhere.
    pub fn select(&self, selection: ProviderSelection) {
        let _ = self.sender.send(selection);
    }

    /// Close the surface without selecting.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Whether the surface has been closed (by either side).
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Whether a channel listener is still attached to this surface.
    pub fn has_listener(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Chooser environment used by the platform shell and by tests.
pub struct SimulatedChooser {
    refuse_surfaces: bool,
    surfaces: Mutex<Vec<SurfaceControl>>,
}

impl SimulatedChooser {
    /// An environment that opens every requested surface.
    pub fn new() -> Self {
        Self {
            refuse_surfaces: false,
            surfaces: Mutex::new(Vec::new()),
        }
    }

    /// An environment whose policy refuses every surface (popups blocked).
    pub fn blocked() -> Self {
        Self {
            refuse_surfaces: true,
            surfaces: Mutex::new(Vec::new()),
        }
    }

    /// Control handle for the most recently opened surface.
    pub fn last_surface(&self) -> Option<SurfaceControl> {
        self.surfaces.lock().unwrap().last().cloned()
    }

    /// Number of surfaces opened over this environment's lifetime.
    pub fn opened_count(&self) -> usize {
        self.surfaces.lock().unwrap().len()
    }
}

impl Default for SimulatedChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChooserEnvironment for SimulatedChooser {
    fn open(&self, request: &SurfaceRequest) -> Option<SurfaceHandle> {
        if self.refuse_surfaces {
            debug!(
                provider = request.provider.slug(),
                "refusing chooser surface"
            );
            return None;
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let control = SurfaceControl {
            sender,
            closed: Arc::clone(&closed),
        };

        debug!(
            provider = request.provider.slug(),
            url = %request.url,
            "opened simulated chooser surface"
        );
        self.surfaces.lock().unwrap().push(control);
        Some(SurfaceHandle::new(receiver, closed))
    }
}
