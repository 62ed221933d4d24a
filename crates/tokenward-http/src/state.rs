//! Shared state for handlers and extractors.

use std::sync::Arc;

use tokenward::clock::Clock;
use tokenward::config::AuthConfig;
use tokenward::storage::{BlacklistStore, PrincipalStore, RefreshTokenStore};
use tokenward::token::{TokenCodec, TokenPolicy, TokenService};

use crate::transport::{TokenTransport, transport_from_config};

/// State required for token extraction, validation, and refresh.
///
/// Include it in your application state and expose it to the extractors
/// via `FromRef`:
///
/// ```ignore
/// #[derive(Clone)]
/// struct AppState {
///     auth: AuthState,
///     // ... other state
/// }
///
/// impl FromRef<AppState> for AuthState {
///     fn from_ref(state: &AppState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthState {
    /// Token lifecycle engine.
    pub service: Arc<TokenService>,

    /// Transport strategy selected by configuration.
    pub transport: Arc<dyn TokenTransport>,
}

impl AuthState {
    /// Creates auth state from an existing service and transport.
    #[must_use]
    pub fn new(service: Arc<TokenService>, transport: Arc<dyn TokenTransport>) -> Self {
        Self { service, transport }
    }

    /// Wires up the engine and transport from configuration and stores.
    #[must_use]
    pub fn from_config(
        config: &AuthConfig,
        refresh_store: Arc<dyn RefreshTokenStore>,
        blacklist_store: Arc<dyn BlacklistStore>,
        principal_store: Arc<dyn PrincipalStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(&config.signing_secret));
        let service = Arc::new(TokenService::new(
            codec,
            refresh_store,
            blacklist_store,
            principal_store,
            clock,
            TokenPolicy::from(config),
        ));

        Self {
            service,
            transport: transport_from_config(config),
        }
    }
}
