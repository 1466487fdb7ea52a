//! The session service.
//!
//! One `AuthService` is constructed at process start and shared by
//! reference; it owns the in-memory session and is the only writer of the
//! persisted one.

use std::sync::{Arc, Mutex};

use auth_config::Config;
use tracing::{debug, info};
use url::Url;

use crate::channel::{ChooserEnvironment, ProviderChannel};
use crate::error::{AuthError, AuthResult};
use crate::providers::Provider;
use crate::store::SessionStore;
use crate::tokens::TokenService;
use crate::users::{Role, User, DEMO_EMAIL};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Input to [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// The in-memory (token, user) pair for the signed-in account.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Client-side session service.
pub struct AuthService {
    identity_origin: Url,
    store: SessionStore,
    tokens: TokenService,
    environment: Arc<dyn ChooserEnvironment>,
    current: Mutex<Option<Session>>,
}

impl AuthService {
    /// Create the service and restore any persisted session.
    ///
    /// A stored session is restored only if its token still validates;
    /// anything else (absent, corrupt, or expired) leaves the service
    /// logged out with storage cleared.
    pub fn new(
        config: Config,
        store: SessionStore,
        environment: Arc<dyn ChooserEnvironment>,
    ) -> AuthResult<Self> {
        let identity_origin = config
            .identity_origin()
            .map_err(|error| AuthError::Config(error.to_string()))?;

        let service = Self {
            identity_origin,
            store,
            tokens: TokenService::new(),
            environment,
            current: Mutex::new(None),
        };
        service.restore_session()?;
        Ok(service)
    }

    fn restore_session(&self) -> AuthResult<()> {
        match self.store.load()? {
            Some(persisted) if self.tokens.validate(&persisted.token) => {
                info!(user_id = %persisted.user.id, "restored persisted session");
                *self.current.lock().unwrap() = Some(Session {
                    token: persisted.token,
                    user: persisted.user,
                });
            }
            Some(persisted) => {
                info!(
                    user_id = %persisted.user.id,
                    "stored token no longer validates, clearing session"
                );
                self.logout()?;
            }
            None => {
                debug!("no persisted session found");
                self.logout()?;
            }
        }
        Ok(())
    }

    /// Register a new email/password account.
    ///
    /// Fails with `Validation` on a malformed email or short password and
    /// with `DuplicateAccount` if the email is already registered; a
    /// failed call mutates nothing. On success the account is appended to
    /// the registered list and signed in.
    pub fn register(&self, input: RegisterInput) -> AuthResult<User> {
        if !input.email.contains('@') {
            return Err(AuthError::Validation(
                "email address must contain '@'".to_string(),
            ));
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let registered = self.store.registered_users()?;
        if registered
            .iter()
            .any(|existing| existing.email == input.email)
        {
            return Err(AuthError::DuplicateAccount(input.email));
        }

        let user = User::register(&input.name, &input.email, input.role);
        self.store.append_registered_user(&user)?;
        info!(user_id = %user.id, role = ?user.role, "registered new account");

        self.establish_session(user)
    }

    /// Log in to an existing account.
    ///
    /// The reserved demo identity signs in without touching the
    /// registered-users list. Accounts carry no stored credential, so the
    /// password is accepted as given and only the email is matched.
    pub fn login(&self, email: &str, _password: &str) -> AuthResult<User> {
        if email == DEMO_EMAIL {
            info!("demo identity login");
            return self.establish_session(User::demo());
        }

        let registered = self.store.registered_users()?;
        let user = registered
            .into_iter()
            .find(|candidate| candidate.email == email)
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        info!(user_id = %user.id, "login");
        self.establish_session(user)
    }

    /// Federated sign-in through a provider chooser.
    ///
    /// Runs one handshake on a fresh channel. Cancellation and
    /// blocked-surface failures propagate unchanged; a successful
    /// selection becomes a full signed-in account.
    pub async fn sign_in_with_provider(&self, provider: Provider) -> AuthResult<User> {
        let channel = ProviderChannel::new(Arc::clone(&self.environment), self.identity_origin.clone());
        let selection = channel.authenticate(provider).await?;

        let user = User::from_provider(provider, &selection);
        info!(
            user_id = %user.id,
            provider = provider.slug(),
            "federated sign-in complete"
        );
        self.establish_session(user)
    }

    /// Clear the in-memory session and the persisted one. Idempotent.
    pub fn logout(&self) -> AuthResult<()> {
        self.current.lock().unwrap().take();
        self.store.clear()?;
        info!("logged out");
        Ok(())
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(|session| session.user.clone())
    }

    /// Whether an account is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }

    /// Issue a token for the user, persist the pair, and make it current.
    fn establish_session(&self, user: User) -> AuthResult<User> {
        let token = self.tokens.issue(&user)?;
        self.store.persist(&token, &user)?;
        *self.current.lock().unwrap() = Some(Session {
            token,
            user: user.clone(),
        });
        Ok(user)
    }
}
