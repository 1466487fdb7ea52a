//! Client-side authentication and session engine for Mentora.
//!
//! This crate provides:
//! - Session token issuance and fail-closed validation
//! - A durable session store (token + user written and cleared together)
//! - The federated sign-in handshake channel with exactly-once resolution
//! - The session service: register, login, provider sign-in, logout,
//!   current-user reads, and startup session restoration

mod channel;
mod chooser;
mod error;
mod fsm;
mod providers;
mod service;
mod store;
mod tokens;
mod users;

pub use channel::{
    ChooserEnvironment, ProviderChannel, SurfaceHandle, SurfaceRequest, CLOSE_POLL_INTERVAL,
    SURFACE_HEIGHT, SURFACE_WIDTH,
};
pub use chooser::{SimulatedChooser, SurfaceControl};
pub use error::{AuthError, AuthResult};
pub use fsm::channel_machine;
pub use fsm::{ChannelMachine, ChannelMachineInput, ChannelMachineState, ChannelState};
pub use providers::{CandidateIdentity, Provider, ProviderSelection};
pub use service::{AuthService, RegisterInput, Session};
pub use store::{PersistedSession, SessionStore};
pub use tokens::{Claims, TokenService, TOKEN_TTL_HOURS};
pub use users::{
    AccountOrigin, LearnerProfile, Permissions, PlanTier, ProfileStats, Role, Subscription,
    SubscriptionStatus, User, DEMO_EMAIL, DEMO_USER_ID,
};
