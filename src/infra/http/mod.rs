pub mod admin;
mod middleware;
mod public;

pub use admin::{AdminState, build_admin_router};
pub use public::{HttpState, build_router};

use std::future::{Future, IntoFuture};
use std::pin::pin;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tracing::warn;

use crate::application::error::{ErrorReport, HttpError};
use crate::application::repos::RepoError;

/// Run the server until `shutdown` resolves, then give in-flight requests
/// up to `grace` to drain before aborting the remaining connections.
pub async fn serve_until_shutdown(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
    grace: Duration,
) -> std::io::Result<()> {
    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown = async move {
        shutdown.await;
        let _ = drain_tx.send(());
    };

    let mut server = pin!(
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .into_future()
    );

    tokio::select! {
        result = server.as_mut() => result,
        _ = drain_rx => match tokio::time::timeout(grace, server.as_mut()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    target = "foglio::http",
                    grace_secs = grace.as_secs(),
                    "graceful shutdown timed out, dropping open connections"
                );
                Ok(())
            }
        },
    }
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to a consistent HTTP error response for the admin surface.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    match err {
        RepoError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "resource not found",
        ),
        RepoError::Validation { message } => {
            HttpError::new(source, StatusCode::BAD_REQUEST, "Invalid input", message)
        }
        RepoError::Unavailable(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[tokio::test]
    async fn idle_server_stops_once_shutdown_fires() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let router = Router::new().route("/", get(|| async { "ok" }));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(serve_until_shutdown(
            listener,
            router,
            async move {
                let _ = rx.await;
            },
            Duration::from_secs(5),
        ));

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not stop after the shutdown signal")
            .expect("server task panicked");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn slow_request_is_abandoned_after_the_grace_period() {
        use std::io::Write;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                "done"
            }),
        );
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(serve_until_shutdown(
            listener,
            router,
            async move {
                let _ = rx.await;
            },
            Duration::from_millis(100),
        ));

        let mut stream = std::net::TcpStream::connect(addr).unwrap();
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nhost: localhost\r\n\r\n")
            .unwrap();

        // Let the server accept the request before signalling shutdown.
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server kept waiting past the grace period")
            .expect("server task panicked");
        assert!(result.is_ok());
        drop(stream);
    }
}
