use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::SessionCache;
use crate::identity::{lookup_keys, AuthState};
use crate::provider::IdentityProvider;
use crate::reservation::ReservationRecord;
use crate::resolver::resolve_reservation;
use crate::store::RecordStore;

/// Machine-readable reason carried on the redirect back to the entry view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthorized,
    LookupError,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::NotAuthorized => "not-authorized",
            DenyReason::LookupError => "lookup-error",
        }
    }
}

/// Terminal state of one guarded navigation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// A reservation was resolved and cached; navigation may proceed.
    Allowed(ReservationRecord),
    /// Nobody is signed in. Redirect to the entry view, no reason code.
    DeniedUnauthenticated,
    /// Signed in, but no reservation matches this identity. The principal
    /// has been signed out.
    DeniedUnauthorized,
    /// The record store failed, so authorization is undecided. The principal
    /// stays signed in.
    LookupFailed,
}

impl GuardDecision {
    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            GuardDecision::DeniedUnauthorized => Some(DenyReason::NotAuthorized),
            GuardDecision::LookupFailed => Some(DenyReason::LookupError),
            GuardDecision::Allowed(_) | GuardDecision::DeniedUnauthenticated => None,
        }
    }
}

/// Gates navigation into protected views: identity check, reservation
/// resolution, cache update, then an allow or deny decision.
pub struct AccessGuard {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn RecordStore>,
    cache: Arc<SessionCache>,
}

impl AccessGuard {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn RecordStore>,
        cache: Arc<SessionCache>,
    ) -> Self {
        Self { provider, store, cache }
    }

    /// Run one navigation attempt to completion.
    ///
    /// The lookup runs against the identity snapshot taken when the attempt
    /// entered `Resolving`. If the provider signal moves while the lookup is
    /// in flight, the result is thrown away and the attempt restarts from
    /// the fresh snapshot, so a stale match can never land in the cache.
    pub async fn authorize(&self) -> GuardDecision {
        let attempt = Uuid::new_v4();
        let mut auth_changes = self.provider.identity_changes();

        loop {
            // AwaitingIdentity: the provider may not have reported yet.
            let snapshot = match auth_changes.wait_for(AuthState::is_known).await {
                Ok(state) => state.clone(),
                // Provider gone; nothing to authenticate against.
                Err(_) => AuthState::SignedOut,
            };

            let identity = match snapshot {
                AuthState::SignedIn(identity) => identity,
                _ => {
                    self.cache.clear_reservation();
                    info!(%attempt, "navigation denied: nobody signed in");
                    return GuardDecision::DeniedUnauthenticated;
                }
            };

            let keys = lookup_keys(&identity);
            let outcome = resolve_reservation(&keys, self.store.as_ref()).await;

            // The snapshot this lookup ran against may have been superseded.
            if auth_changes.has_changed().unwrap_or(false) {
                info!(%attempt, "identity changed mid-resolution; discarding result");
                continue;
            }

            return match outcome {
                Ok(Some(record)) => {
                    self.cache.set_reservation(record.clone());
                    info!(%attempt, uid = %identity.uid, "navigation allowed");
                    GuardDecision::Allowed(record)
                }
                Ok(None) => {
                    if let Err(err) = self.provider.sign_out().await {
                        warn!(%attempt, %err, "sign-out failed; redirecting anyway");
                    }
                    self.cache.clear_reservation();
                    info!(%attempt, uid = %identity.uid, "navigation denied: no reservation for this identity");
                    GuardDecision::DeniedUnauthorized
                }
                Err(err) => {
                    warn!(%attempt, %err, "reservation lookup unavailable; keeping the principal signed in");
                    GuardDecision::LookupFailed
                }
            };
        }
    }
}
