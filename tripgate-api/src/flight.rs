use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};

use tripgate_core::guard::GuardDecision;
use tripgate_core::reservation::{FlightDraft, ReservationRecord};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reservation", get(reservation))
        .route("/v1/flight", get(current_draft).put(update_draft))
        .route("/v1/flight/submit", post(submit_flight))
}

fn entry_redirect(decision: &GuardDecision) -> Redirect {
    match decision.reason() {
        Some(reason) => Redirect::to(&format!("/entry?reason={}", reason.as_str())),
        None => Redirect::to("/entry"),
    }
}

/// Run the guard for one navigation attempt; any deny becomes a redirect to
/// the entry view.
async fn authorize(state: &AppState) -> Result<ReservationRecord, Response> {
    match state.guard.authorize().await {
        GuardDecision::Allowed(record) => Ok(record),
        decision => Err(entry_redirect(&decision).into_response()),
    }
}

async fn reservation(State(state): State<AppState>) -> Response {
    match authorize(&state).await {
        Ok(record) => Json(record).into_response(),
        Err(redirect) => redirect,
    }
}

async fn current_draft(State(state): State<AppState>) -> Response {
    match authorize(&state).await {
        Ok(_) => Json(state.cache.current_draft()).into_response(),
        Err(redirect) => redirect,
    }
}

async fn update_draft(
    State(state): State<AppState>,
    Json(draft): Json<FlightDraft>,
) -> Response {
    let record = match authorize(&state).await {
        Ok(record) => record,
        Err(redirect) => return redirect,
    };

    if let Err(err) = draft.validate(&record) {
        return ApiError::Validation(err.to_string()).into_response();
    }

    state.cache.set_draft(draft);
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    next: &'static str,
}

async fn submit_flight(State(state): State<AppState>) -> Response {
    let record = match authorize(&state).await {
        Ok(record) => record,
        Err(redirect) => return redirect,
    };

    let Some(draft) = state.cache.current_draft() else {
        return ApiError::Validation("Please enter your flight details first.".to_string())
            .into_response();
    };

    if let Err(err) = draft.validate(&record) {
        return ApiError::Validation(err.to_string()).into_response();
    }

    match state.submit.send(&draft).await {
        Ok(()) => {
            info!("flight details submitted");
            Json(SubmitResponse { next: "/done" }).into_response()
        }
        Err(err) => {
            // The draft stays cached so the guest can resubmit.
            warn!(%err, "flight submission failed");
            ApiError::SubmissionFailed("Submission failed. Please try again.".to_string())
                .into_response()
        }
    }
}
