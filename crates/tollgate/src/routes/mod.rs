//! HTTP route handlers for Tollgate.

use axum::{
    Router,
    http::{Method, StatusCode},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod captcha;
mod health;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.request_timeout(),
        ))
        .layer(cors_layer(&state));

    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))

        // CAPTCHA endpoints
        .route(
            "/captcha",
            get(captcha::get_challenge).post(captcha::verify_challenge),
        )

        .layer(middleware)

        // Add shared state
        .with_state(state)
}

/// Only configured origins are reflected back; credentials are never allowed
fn cors_layer(state: &AppState) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.allowed_origins.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, header};
    use std::net::SocketAddr;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::token::{SecretKey, TokenCodec};
    use tollgate_common::{ChallengeResponse, TokenPayload, VerifyResponse, ResultCode};

    const KEY: &str = "3wLGwrsT4Rx31U4m9biGdiAVp3cJkCdHHN4LfMjdMNc=";

    fn app_with(config: AppConfig, peer: [u8; 4]) -> Router {
        let state = AppState::new(config).unwrap();
        create_router(state).layer(MockConnectInfo(SocketAddr::from((peer, 40000))))
    }

    fn test_config() -> AppConfig {
        AppConfig {
            key: Some(KEY.to_string()),
            ..Default::default()
        }
    }

    fn app(peer: [u8; 4]) -> Router {
        app_with(test_config(), peer)
    }

    fn solution_of(token: &str) -> TokenPayload {
        let codec = TokenCodec::new(SecretKey::from_base64(KEY).unwrap());
        serde_json::from_slice(&codec.unseal(token).unwrap()).unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn fetch_challenge(app: Router) -> ChallengeResponse {
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/captcha")
                    .header(header::ACCEPT, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        json_body(resp).await
    }

    fn form_encode(value: &str) -> String {
        value
            .replace('%', "%25")
            .replace('=', "%3D")
            .replace('&', "%26")
            .replace('+', "%2B")
            .replace(' ', "+")
    }

    async fn submit(app: Router, token: &str, answer: &str) -> VerifyResponse {
        let body = format!(
            "simple-captcha-token={}&simple-captcha-response={}&name=Jane",
            form_encode(token),
            form_encode(answer)
        );
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/captcha")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        json_body(resp).await
    }

    #[tokio::test]
    async fn test_health() {
        let resp = app([127, 0, 0, 1])
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = json_body(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_issue_binds_peer_address() {
        let challenge = fetch_challenge(app([203, 0, 113, 5])).await;
        assert!(!challenge.challenge.is_empty());

        let payload = solution_of(&challenge.token);
        assert_eq!(payload.client_ip, "203.0.113.5");
        assert_eq!(payload.valid_until - payload.valid_from, 180);
    }

    #[tokio::test]
    async fn test_correct_answer_is_ok() {
        let challenge = fetch_challenge(app([203, 0, 113, 5])).await;
        let answer = solution_of(&challenge.token).solution;

        let resp = submit(app([203, 0, 113, 5]), &challenge.token, &answer).await;
        assert_eq!(resp.result, ResultCode::Ok);
        assert!(resp.lang.is_none());
    }

    #[tokio::test]
    async fn test_wrong_answer_reports_locale() {
        let challenge = fetch_challenge(app([203, 0, 113, 5])).await;
        let answer = solution_of(&challenge.token).solution;

        let resp = submit(app([203, 0, 113, 5]), &challenge.token, &format!("{answer}!")).await;
        assert_eq!(resp.result, ResultCode::WrongAnswer);
        assert!(resp.lang.is_some());
    }

    #[tokio::test]
    async fn test_other_client_fails_generically() {
        let challenge = fetch_challenge(app([203, 0, 113, 5])).await;
        let answer = solution_of(&challenge.token).solution;

        let resp = submit(app([198, 51, 100, 9]), &challenge.token, &answer).await;
        assert_eq!(resp.result, ResultCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_tampered_token_fails_generically() {
        let challenge = fetch_challenge(app([203, 0, 113, 5])).await;
        let answer = solution_of(&challenge.token).solution;
        let mut tampered = challenge.token.clone();
        let first = if tampered.starts_with('A') { "B" } else { "A" };
        tampered.replace_range(0..1, first);

        let resp = submit(app([203, 0, 113, 5]), &tampered, &answer).await;
        assert_eq!(resp.result, ResultCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_missing_fields_fail_generically() {
        let resp = app([203, 0, 113, 5])
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/captcha")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("simple-captcha-response=3"))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body: VerifyResponse = json_body(resp).await;
        assert_eq!(body.result, ResultCode::ValidationFailed);
    }

    async fn post_raw(content_type: Option<&str>, body: &'static str) -> VerifyResponse {
        let mut request = Request::builder().method("POST").uri("/captcha");
        if let Some(ct) = content_type {
            request = request.header(header::CONTENT_TYPE, ct);
        }
        let resp = app([203, 0, 113, 5])
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        json_body(resp).await
    }

    #[tokio::test]
    async fn test_empty_post_without_content_type_fails_generically() {
        let resp = post_raw(None, "").await;
        assert_eq!(resp.result, ResultCode::ValidationFailed);
        assert!(resp.lang.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_field_fails_generically() {
        let resp = post_raw(
            Some("application/x-www-form-urlencoded"),
            "simple-captcha-token=a&simple-captcha-token=b&simple-captcha-response=3",
        )
        .await;
        assert_eq!(resp.result, ResultCode::ValidationFailed);
        assert!(resp.lang.is_some());
    }

    #[tokio::test]
    async fn test_json_body_fails_generically() {
        let resp = post_raw(
            Some("application/json"),
            r#"{"simple-captcha-token":"a","simple-captcha-response":"3"}"#,
        )
        .await;
        assert_eq!(resp.result, ResultCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_multipart_submission() {
        let challenge = fetch_challenge(app([203, 0, 113, 5])).await;
        let answer = solution_of(&challenge.token).solution;

        let boundary = "XtollgateBoundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\njane@example.com\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"simple-captcha-token\"\r\n\r\n{t}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"simple-captcha-response\"\r\n\r\n{a}\r\n\
             --{b}--\r\n",
            b = boundary,
            t = challenge.token,
            a = answer
        );
        let resp = app([203, 0, 113, 5])
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/captcha")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body: VerifyResponse = json_body(resp).await;
        assert_eq!(body.result, ResultCode::Ok);
    }

    #[tokio::test]
    async fn test_forwarded_header_identity() {
        let mut config = test_config();
        config.http.client_ip_header = Some("x-forwarded-for".into());

        let resp = app_with(config, [10, 0, 0, 1])
            .oneshot(
                Request::builder()
                    .uri("/captcha")
                    .header("x-forwarded-for", "203.0.113.5, 10.0.0.7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let challenge: ChallengeResponse = json_body(resp).await;
        assert_eq!(solution_of(&challenge.token).client_ip, "203.0.113.5");
    }

    #[tokio::test]
    async fn test_cors_reflects_allowed_origin_only() {
        let preflight = |origin: &'static str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/captcha")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };

        let resp = app([127, 0, 0, 1])
            .oneshot(preflight("http://localhost:8002"))
            .await
            .unwrap();
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:8002"
        );
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());

        let resp = app([127, 0, 0, 1])
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
