/*
 * Responsibility
 * - tracing / panic hook 初期化
 * - Config読み込み → Signer 生成 → Router 組み立て
 * - Middleware の適用 (HTTP 共通 / Bearer)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, HttpConfig};
use crate::services::auth::build_signer;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,bearer_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: fail fast. Production: default behavior, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    let signer = build_signer(&config.auth)?;
    tracing::info!(
        auth_enabled = signer.enabled(),
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let app = build_router(AppState::new(signer), &config.http);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, http: &HttpConfig) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router, http)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{HeaderValue, Request, StatusCode, header},
    };
    use futures_util::{SinkExt, StreamExt};
    use serde_json::{Value, json};
    use tokio::net::TcpStream;
    use tokio_tungstenite::tungstenite::{Message, client::IntoClientRequest};
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
    use tower::ServiceExt;

    use crate::services::auth::signer::testing::{SECRET, expires_in, mint};
    use crate::services::auth::{JwtSigner, SignerOptions};

    const SUB: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn app(signer: JwtSigner) -> Router {
        build_router(AppState::new(Arc::new(signer)), &HttpConfig::default())
    }

    fn enabled() -> JwtSigner {
        JwtSigner::from_secret(SECRET, SignerOptions::default())
    }

    async fn get(app: Router, uri: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().uri(uri);
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }

        let response = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = get(app(enabled()), "/api/v1/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_whoami_returns_subject() {
        let token = mint(SECRET, &json!({ "sub": SUB, "exp": expires_in(600) }));
        let header = format!("Bearer {}", token);

        let (status, body) = get(app(enabled()), "/api/v1/whoami", Some(&header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "subject": SUB, "bypassed": false }));
    }

    #[tokio::test]
    async fn test_whoami_rejects_missing_header() {
        let (status, body) = get(app(enabled()), "/api/v1/whoami", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert_eq!(body["error"]["message"], "access token is invalid");
    }

    #[tokio::test]
    async fn test_whoami_rejects_bad_signature() {
        let (status, body) = get(
            app(enabled()),
            "/api/v1/whoami",
            Some("Bearer abc.def.ghi"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "access token is invalid");
    }

    #[tokio::test]
    async fn test_whoami_rejects_invalid_sub() {
        let token = mint(SECRET, &json!({ "sub": "not-a-uuid", "exp": expires_in(600) }));
        let header = format!("Bearer {}", token);

        let (status, body) = get(app(enabled()), "/api/v1/whoami", Some(&header)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "invalid sub claim");
    }

    #[tokio::test]
    async fn test_whoami_in_bypass_mode_is_not_authenticated() {
        let (status, body) = get(app(JwtSigner::disabled()), "/api/v1/whoami", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "subject": null, "bypassed": true }));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = app(enabled())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header(middleware::http::REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get(middleware::http::REQUEST_ID_HEADER)
                .unwrap(),
            "req-123"
        );
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let http = HttpConfig {
            body_limit_bytes: 16,
            ..HttpConfig::default()
        };
        let app = build_router(AppState::new(Arc::new(enabled())), &http);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header(header::CONTENT_LENGTH, 64)
                    .body(Body::from(vec![0u8; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    async fn serve(signer: JwtSigner) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app(signer);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn connect(
        addr: std::net::SocketAddr,
        authorization: &str,
    ) -> WebSocketStream<MaybeTlsStream<TcpStream>> {
        let mut req = format!("ws://{}/api/v1/ws", addr)
            .into_client_request()
            .unwrap();
        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );

        let (socket, response) = connect_async(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
        socket
    }

    #[tokio::test]
    async fn test_ws_rejected_connection_is_closed_with_policy_code() {
        let addr = serve(enabled()).await;
        let mut socket = connect(addr, "Bearer abc.def.ghi").await;

        match socket.next().await {
            Some(Ok(Message::Close(Some(frame)))) => {
                assert_eq!(u16::from(frame.code), 1008);
                assert_eq!(frame.reason.as_str(), "unauthorized");
            }
            other => panic!("expected close frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ws_accepted_connection_echoes_messages() {
        let addr = serve(enabled()).await;
        let token = mint(SECRET, &json!({ "sub": SUB, "exp": expires_in(600) }));
        let mut socket = connect(addr, &format!("Bearer {}", token)).await;

        socket.send(Message::Text("hello".into())).await.unwrap();

        match socket.next().await {
            Some(Ok(Message::Text(text))) => assert_eq!(text.as_str(), "hello"),
            other => panic!("expected echoed text, got {:?}", other),
        }

        socket.close(None).await.unwrap();
    }
}
