//! Admission gate middleware.
//!
//! Runs the gate for every request on a `/room` path, whatever its method,
//! and applies its decision to the HTTP exchange. All other paths pass
//! straight through.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use roomgate_admission::{Admission, RejectReason, is_gated_path};
use roomgate_core::types::SeatToken;

use crate::error::ApiError;
use crate::state::AppState;

/// Gate room requests.
///
/// A forward runs the inner handler and, for a new seat, attaches the token
/// cookie to its response. A redirect short-circuits to the lobby. Store
/// failures become an error response and never a redirect.
pub async fn admission_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !is_gated_path(&path) {
        return next.run(request).await;
    }

    let settings = &state.config.admission;
    let presented = jar.get(&settings.cookie_name).map(|c| c.value().to_string());

    let admission = match state.gate.admit(&path, presented.as_deref()).await {
        Ok(admission) => admission,
        Err(err) => return ApiError(err).into_response(),
    };
    let outcome = GateOutcome(admission.outcome());

    let mut response = match admission {
        Admission::Forward { set_cookie: None } => next.run(request).await,
        Admission::Forward {
            set_cookie: Some(token),
        } => {
            let cookie = seat_cookie(&settings.cookie_name, token, state.config.secure_cookies());
            let response = next.run(request).await;
            (jar.add(cookie), response).into_response()
        }
        Admission::Redirect { reason } => {
            Redirect::to(&lobby_location(&settings.lobby_path, reason)).into_response()
        }
    };
    response.extensions_mut().insert(outcome);
    response
}

/// Gate decision label, left on the response for the request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome(pub &'static str);

/// Site-wide, script-inaccessible, same-site-only seat cookie.
pub fn seat_cookie(name: &str, token: SeatToken, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), token.into_inner()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .build()
}

/// Lobby URL for a rejection, with the reason in the `error` query parameter.
pub fn lobby_location(lobby_path: &str, reason: Option<RejectReason>) -> String {
    match reason {
        None => lobby_path.to_string(),
        Some(reason) => {
            let separator = if lobby_path.contains('?') { '&' } else { '?' };
            format!("{lobby_path}{separator}error={}", reason.code())
        }
    }
}
