//! CAPTCHA issuing and verification endpoints.

use axum::{
    Form, Json,
    extract::{ConnectInfo, FromRequest, Multipart, Request, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;

use tollgate_common::constants::fields;
use tollgate_common::{ChallengeResponse, ResultCode, ValidationFailure, VerifyResponse};

use crate::state::AppState;

/// Issue a new challenge and its sealed token
pub async fn get_challenge(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<ChallengeResponse>, StatusCode> {
    let client_ip = client_identity(&state, &headers, peer);
    let now = chrono::Utc::now().timestamp();
    let locale = state.rotation.choose(now);

    let issued = state.issuer.issue(&client_ip, locale, now).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue CAPTCHA token");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ChallengeResponse {
        token: issued.token,
        challenge: issued.challenge,
        lang: issued.locale,
    }))
}

/// Check a submitted answer against its token
pub async fn verify_challenge(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    submission: Submission,
) -> Json<VerifyResponse> {
    let client_ip = client_identity(&state, &headers, peer);
    let now = chrono::Utc::now().timestamp();

    let outcome = match (submission.token.as_deref(), submission.response.as_deref()) {
        (Some(token), Some(answer)) => state.validator.validate(token, answer, &client_ip, now),
        _ => {
            tracing::warn!(client_ip = %client_ip, "Submission is missing token or response");
            Err(ValidationFailure::TokenInvalid("missing form field".into()))
        }
    };

    Json(match outcome {
        Ok(()) => VerifyResponse {
            result: ResultCode::Ok,
            lang: None,
        },
        Err(failure) => VerifyResponse {
            result: failure.result_code(),
            lang: Some(state.rotation.choose(now)),
        },
    })
}

/// Resolve the requester's network identity.
///
/// With a trusted proxy header configured, its first entry wins; the peer
/// address is the fallback.
fn client_identity(state: &AppState, headers: &HeaderMap, peer: SocketAddr) -> String {
    state
        .client_ip_header
        .as_ref()
        .and_then(|name| headers.get(name))
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Answer submission, accepted as urlencoded or multipart form data
#[derive(Debug, Default, Deserialize)]
pub struct Submission {
    #[serde(rename = "simple-captcha-token")]
    token: Option<String>,

    #[serde(rename = "simple-captcha-response")]
    response: Option<String>,
}

impl<S: Send + Sync> FromRequest<S> for Submission {
    type Rejection = Infallible;

    /// An unreadable body yields an empty submission, which the handler
    /// reports as `validation-failed` like any other missing field
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let parsed = if is_multipart {
            read_multipart(req, state).await
        } else {
            Form::<Submission>::from_request(req, state)
                .await
                .map(|Form(submission)| submission)
                .map_err(|e| e.body_text())
        };

        Ok(parsed.unwrap_or_else(|reason| {
            tracing::warn!(reason = %reason, "Unreadable CAPTCHA submission body");
            Submission::default()
        }))
    }
}

async fn read_multipart<S: Send + Sync>(req: Request, state: &S) -> Result<Submission, String> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| e.body_text())?;

    let mut submission = Submission::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        let name = field.name().map(str::to_owned);
        let slot = match name.as_deref() {
            Some(fields::TOKEN) => &mut submission.token,
            Some(fields::RESPONSE) => &mut submission.response,
            // The rest of the page's form travels along; ignore it
            _ => continue,
        };
        *slot = Some(field.text().await.map_err(|e| e.body_text())?);
    }

    Ok(submission)
}
