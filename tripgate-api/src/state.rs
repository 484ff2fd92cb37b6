use std::sync::Arc;

use tripgate_core::{AccessGuard, SessionCache};

use crate::auth::{SessionAuth, TokenVerifier};
use crate::submit::SubmitClient;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<SessionAuth>,
    pub cache: Arc<SessionCache>,
    pub guard: Arc<AccessGuard>,
    pub verifier: TokenVerifier,
    pub submit: SubmitClient,
}
