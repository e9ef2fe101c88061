use super::shutdown::{ShutdownCoordinator, shutdown_signal};
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, parse_allowed_origins, security_headers};
use axum::{Router, http::StatusCode, middleware};
use core_config::server::ServerConfig;
use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Assembles the public router around already-stateful API routes.
///
/// - Swagger UI at `/swagger-ui`, spec at `/api-docs/openapi.json`
/// - `apis` nested under `/api`
/// - JSON 404 fallback
/// - request tracing, security headers, compression and the per-request
///   timeout from `server_config`
/// - CORS only when `cors_allowed_origin` is set
///
/// # Errors
/// Returns `InvalidInput` when the configured origin list contains a value
/// that is not a valid header, or nothing at all once blanks are dropped.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server_config.request_timeout(),
        ))
        .layer(middleware::from_fn(security_headers))
        .layer(CompressionLayer::new());

    let Some(raw) = server_config.cors_allowed_origin.as_deref() else {
        return Ok(router);
    };

    let origins = parse_allowed_origins(raw).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid CORS_ALLOWED_ORIGIN value: {e}"),
        )
    })?;
    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    info!("CORS configured with allowed origins: {}", raw);
    Ok(router.layer(create_cors_layer(origins)))
}

/// Binds `server_config.address()` and serves until SIGINT/SIGTERM.
///
/// See [`serve_with_shutdown`] for the drain and cleanup sequence.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    serve_with_shutdown(listener, router, shutdown_signal(), shutdown_timeout, cleanup).await
}

/// Serves `router` on `listener` until `signal` resolves.
///
/// Once it resolves, new connections are refused and in-flight requests get
/// up to `drain_timeout` to finish. Whatever is still running after that is
/// abandoned. `cleanup` runs exactly once afterwards, itself bounded by
/// `drain_timeout`.
pub async fn serve_with_shutdown<S, F>(
    listener: TcpListener,
    router: Router,
    signal: S,
    drain_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
    F: Future<Output = ()> + Send,
{
    info!("Server starting on {}", listener.local_addr()?);

    let coordinator = ShutdownCoordinator::new();
    let mut shutdown_rx = coordinator.subscribe();
    let trigger = coordinator.clone();

    let serve = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            signal.await;
            trigger.shutdown();
        })
        .into_future();
    tokio::pin!(serve);

    let drain_deadline = async {
        let _ = shutdown_rx.recv().await;
        tokio::time::sleep(drain_timeout).await;
    };

    let serve_result = tokio::select! {
        result = &mut serve => result.inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        }),
        _ = drain_deadline => {
            warn!(
                "In-flight requests exceeded drain timeout of {:?}, abandoning them",
                drain_timeout
            );
            Ok(())
        }
    };

    info!("Running cleanup (timeout: {:?})", drain_timeout);
    match tokio::time::timeout(drain_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => warn!("Cleanup exceeded timeout of {:?}", drain_timeout),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::AsyncWriteExt;
    use tokio::sync::oneshot;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn api() -> Router {
        Router::new().route("/ping", get(|| async { "pong" }))
    }

    #[tokio::test]
    async fn test_router_nests_api_and_serves_openapi() {
        let router = create_router::<TestDoc>(api(), &ServerConfig::default()).unwrap();

        let response = router
            .clone()
            .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_gets_json_not_found() {
        let router = create_router::<TestDoc>(api(), &ServerConfig::default()).unwrap();

        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
    }

    #[test]
    fn test_invalid_cors_origin_is_rejected() {
        let config = ServerConfig {
            cors_allowed_origin: Some(" , ".to_string()),
            ..ServerConfig::default()
        };
        let err = create_router::<TestDoc>(api(), &config).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_cleanup_runs_once_after_signal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let cleanups = Arc::new(AtomicUsize::new(0));
        let counter = cleanups.clone();

        let server = tokio::spawn(serve_with_shutdown(
            listener,
            api(),
            async move {
                let _ = rx.await;
            },
            Duration::from_secs(1),
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        ));

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stuck_request_is_abandoned_after_drain_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (entered_tx, entered_rx) = oneshot::channel::<()>();
        let entered_tx = Arc::new(tokio::sync::Mutex::new(Some(entered_tx)));

        let router = Router::new().route(
            "/slow",
            get(move || {
                let entered_tx = entered_tx.clone();
                async move {
                    if let Some(tx) = entered_tx.lock().await.take() {
                        let _ = tx.send(());
                    }
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    "late"
                }
            }),
        );

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let cleaned = Arc::new(AtomicUsize::new(0));
        let counter = cleaned.clone();
        let server = tokio::spawn(serve_with_shutdown(
            listener,
            router,
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_millis(100),
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        ));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        entered_rx.await.unwrap();

        stop_tx.send(()).unwrap();
        let finished = tokio::time::timeout(Duration::from_secs(5), server).await;
        assert!(finished.is_ok(), "server did not stop after the drain timeout");
        assert_eq!(cleaned.load(Ordering::SeqCst), 1);
        drop(stream);
    }
}
