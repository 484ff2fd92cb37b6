use axum::{extract::Query, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use tripgate_core::DenyReason;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/entry", get(entry))
}

#[derive(Debug, Deserialize)]
struct EntryParams {
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct EntryView {
    sign_in: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Entry view: where denied navigation attempts land. The reason code from
/// the redirect maps to a short guest-facing message.
async fn entry(Query(params): Query<EntryParams>) -> Json<EntryView> {
    let message = match params.reason.as_deref() {
        Some(r) if r == DenyReason::NotAuthorized.as_str() => {
            Some("Please sign in with the email or phone number reserved to your trip.")
        }
        Some(r) if r == DenyReason::LookupError.as_str() => {
            Some("We could not check your reservation just now. Please try again.")
        }
        _ => None,
    };

    Json(EntryView {
        sign_in: vec!["federated", "phone-otp"],
        message,
    })
}
