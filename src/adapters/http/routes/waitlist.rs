use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    use_cases::waitlist::{ReferralStatus, SignupOutcome},
};

const WELCOME_MESSAGE: &str = "Welcome to the founding crew!";
const ALREADY_LISTED_MESSAGE: &str = "You're already on the list! We'll be in touch soon.";

pub fn router() -> Router<AppState> {
    Router::new().route("/waitlist", get(lookup).post(signup))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct SignupPayload {
    email: Option<String>,
    #[serde(rename = "ref")]
    referrer: Option<String>,
}

#[derive(Deserialize)]
struct LookupQuery {
    #[serde(rename = "ref")]
    ref_code: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    already_exists: bool,
    position: u64,
    ref_code: String,
    total: u64,
    referral_link: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferralStatusResponse {
    position: u64,
    total: u64,
    ref_code: String,
    referral_count: u64,
    referral_link: String,
}

#[derive(Serialize)]
struct CountResponse {
    count: u64,
}

impl SignupResponse {
    fn new(outcome: SignupOutcome, app_origin: &Url) -> Self {
        let message = if outcome.already_exists {
            ALREADY_LISTED_MESSAGE
        } else {
            WELCOME_MESSAGE
        };
        Self {
            message,
            already_exists: outcome.already_exists,
            referral_link: referral_link(app_origin, &outcome.ref_code),
            position: outcome.position,
            ref_code: outcome.ref_code,
            total: outcome.total,
        }
    }
}

impl ReferralStatusResponse {
    fn new(status: ReferralStatus, app_origin: &Url) -> Self {
        Self {
            referral_link: referral_link(app_origin, &status.ref_code),
            position: status.position,
            total: status.total,
            ref_code: status.ref_code,
            referral_count: status.referral_count,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/waitlist
/// 201 for a new signup, 200 when the email was already registered.
async fn signup(
    State(app_state): State<AppState>,
    payload: Result<Json<SignupPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let email = payload.email.unwrap_or_default();

    let outcome = app_state
        .waitlist_use_cases
        .signup(&email, payload.referrer.as_deref())
        .await?;

    let status = if outcome.already_exists {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(SignupResponse::new(outcome, &app_state.config.app_origin)),
    ))
}

/// GET /api/waitlist?ref=<code> returns that signup's standing.
/// GET /api/waitlist returns the total count.
async fn lookup(
    State(app_state): State<AppState>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    match query.ref_code.filter(|code| !code.is_empty()) {
        Some(ref_code) => {
            let status = app_state
                .waitlist_use_cases
                .lookup_by_ref_code(&ref_code)
                .await?;
            Ok(Json(ReferralStatusResponse::new(status, &app_state.config.app_origin)).into_response())
        }
        None => {
            let count = app_state.waitlist_use_cases.total_count().await?;
            Ok(Json(CountResponse { count }).into_response())
        }
    }
}

/// Shareable landing page link carrying the referral code.
fn referral_link(app_origin: &Url, ref_code: &str) -> String {
    let mut url = app_origin.clone();
    url.query_pairs_mut().clear().append_pair("ref", ref_code);
    url.to_string()
}
