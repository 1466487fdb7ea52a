//! Handshake state machine for the provider channel.
//!
//! One federated sign-in attempt moves through an explicit FSM rather
//! than a bundle of flags.
//!
//! ## State Diagram
//!
//! ```text
//! ┌──────────┐ OpenRequested ┌──────────┐ SurfaceReady ┌────────────────┐
//! │   Idle   │ ─────────────►│ Opening  │ ────────────►│ AwaitingResult │
//! └──────────┘               └────┬─────┘              └───────┬────────┘
//!                                 │ SurfaceBlocked             │
//!                                 ▼                            │ SelectionReceived ──► Resolved
//!                             Blocked                          │ CloseObserved ──────► Cancelled
//!                                 │                            │ TimedOut ───────────► Cancelled
//!                                 │ TornDown                   │
//!                                 ▼                            ▼ TornDown
//!                              Closed ◄────────────────── Resolved/Cancelled
//! ```
//!
//! `Closed` is terminal. A second terminal trigger is rejected by the
//! machine, which is what makes late triggers a no-op at the state level.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `channel_machine` with:
// - channel_machine::State (enum)
// - channel_machine::Input (enum)
// - channel_machine::StateMachine (type alias)
// - channel_machine::Impl (trait impl)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub channel_machine(Idle)

    Idle => {
        OpenRequested => Opening
    },
    Opening => {
        SurfaceReady => AwaitingResult,
        SurfaceBlocked => Blocked
    },
    AwaitingResult => {
        SelectionReceived => Resolved,
        CloseObserved => Cancelled,
        TimedOut => Cancelled
    },
    Resolved => {
        TornDown => Closed
    },
    Cancelled => {
        TornDown => Closed
    },
    Blocked => {
        TornDown => Closed
    }
}

// Re-export the generated types with clearer names
pub use channel_machine::Input as ChannelMachineInput;
pub use channel_machine::State as ChannelMachineState;
pub use channel_machine::StateMachine as ChannelMachine;

/// External view of a handshake's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    Idle,
    Opening,
    AwaitingResult,
    Resolved,
    Cancelled,
    Blocked,
    Closed,
}

impl ChannelState {
    /// Returns true once the attempt has an outcome (listeners may still
    /// be mid-teardown).
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            ChannelState::Resolved
                | ChannelState::Cancelled
                | ChannelState::Blocked
                | ChannelState::Closed
        )
    }

    /// Returns true for the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChannelState::Closed)
    }
}

impl From<&ChannelMachineState> for ChannelState {
    fn from(state: &ChannelMachineState) -> Self {
        match state {
            ChannelMachineState::Idle => ChannelState::Idle,
            ChannelMachineState::Opening => ChannelState::Opening,
            ChannelMachineState::AwaitingResult => ChannelState::AwaitingResult,
            ChannelMachineState::Resolved => ChannelState::Resolved,
            ChannelMachineState::Cancelled => ChannelState::Cancelled,
            ChannelMachineState::Blocked => ChannelState::Blocked,
            ChannelMachineState::Closed => ChannelState::Closed,
        }
    }
}
