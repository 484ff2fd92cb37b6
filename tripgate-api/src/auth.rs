use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use tripgate_core::identity::{AuthState, Identity};
use tripgate_core::provider::{IdentityProvider, ProviderError};

use crate::error::ApiError;
use crate::state::AppState;

/// Claims carried by the external identity provider's ID token.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub exp: usize,
}

/// Verifies ID tokens minted by the external identity provider.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: String,
}

impl TokenVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn verify(&self, token: &str) -> Result<Identity, jsonwebtoken::errors::Error> {
        let data = decode::<IdTokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(Identity {
            uid: data.claims.sub,
            email: data.claims.email,
            phone: data.claims.phone_number,
        })
    }
}

/// Identity provider backed by this process's session endpoints.
///
/// Sign-in itself (federated popup, phone challenge) happens at the external
/// provider; what arrives here is its ID token. Publishing a new state fans
/// out to every subscriber as a fresh snapshot.
pub struct SessionAuth {
    state_tx: watch::Sender<AuthState>,
}

impl SessionAuth {
    pub fn new() -> Self {
        // No persisted principal to restore at boot; the signal starts
        // settled rather than Unknown.
        let (state_tx, _) = watch::channel(AuthState::SignedOut);
        Self { state_tx }
    }

    pub fn publish(&self, state: AuthState) {
        self.state_tx.send_replace(state);
    }
}

impl Default for SessionAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for SessionAuth {
    fn identity_changes(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.state_tx.send_replace(AuthState::SignedOut);
        Ok(())
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/session/sign-in", post(sign_in))
        .route("/v1/session/sign-out", post(sign_out))
}

#[derive(Debug, Deserialize)]
struct SignInRequest {
    id_token: String,
}

async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<StatusCode, ApiError> {
    let identity = state.verifier.verify(&req.id_token).map_err(|err| {
        warn!(%err, "id token rejected");
        ApiError::Authentication("Sign-in failed. Please try again.".to_string())
    })?;

    info!(uid = %identity.uid, "guest signed in");
    state.auth.publish(AuthState::SignedIn(identity));
    Ok(StatusCode::NO_CONTENT)
}

async fn sign_out(State(state): State<AppState>) -> StatusCode {
    if let Err(err) = state.auth.sign_out().await {
        warn!(%err, "provider sign-out failed; clearing session anyway");
    }
    state.cache.clear_reservation();
    info!("guest signed out");
    StatusCode::NO_CONTENT
}
