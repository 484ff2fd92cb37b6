use async_trait::async_trait;
use tokio::sync::watch;

use crate::identity::AuthState;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("sign-out failed: {0}")]
    SignOut(String),
}

/// Seam to the external identity provider.
///
/// The provider owns sign-in itself (federated popup, phone challenge); this
/// core only observes the resulting state and can force a sign-out. A new
/// subscriber sees the current snapshot immediately and every later change.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Cancellable subscription handle onto the provider's auth-state signal.
    fn identity_changes(&self) -> watch::Receiver<AuthState>;

    /// Force the current principal out. Callers proceed with their redirect
    /// whether or not this succeeds.
    async fn sign_out(&self) -> Result<(), ProviderError>;
}
