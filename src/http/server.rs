//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all report handler
//! - Wire up middleware (tracing, request timeout)
//! - Serve plaintext connections from a bound `TcpListener`
//! - Serve TLS connections through the session-capturing acceptor
//! - Stop on the shutdown broadcast

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::InspectorConfig;
use crate::http::request::RequestFacts;
use crate::net::tls::TlsSessionAcceptor;

/// HTTP server answering every request with a report of what it received.
pub struct HttpServer {
    router: Router,
    config: InspectorConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: InspectorConfig) -> Self {
        let router = Self::build_router(&config);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &InspectorConfig) -> Router {
        Router::new()
            .route("/{*path}", any(report_handler))
            .route("/", any(report_handler))
            // Targets the path router cannot match (`OPTIONS *`, authority-form).
            .fallback(report_handler)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router with all layers applied, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server over plaintext HTTP on the given listener.
    ///
    /// Returns once `shutdown` fires (or its sender is dropped) and in-flight
    /// requests have finished.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, tls = false, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on an already bound listener.
    ///
    /// Binding happens before this call, so listen failures are reported
    /// the same way for plaintext and TLS.
    pub async fn run_tls(
        self,
        listener: std::net::TcpListener,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;
        tracing::info!(address = %addr, tls = true, "HTTP server starting");

        let handle = Handle::new();
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!(grace_secs = grace.as_secs(), "Shutdown signal received");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum_server::from_tcp(listener)
            .acceptor(TlsSessionAcceptor::new(tls))
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: report the request back to the client.
async fn report_handler(
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    // The body is never read.
    let (parts, _body) = request.into_parts();
    let facts = RequestFacts::from_parts(&parts, remote_addr);

    tracing::debug!(
        method = %facts.method(),
        uri = %facts.request_uri(),
        remote_addr = %facts.remote_addr(),
        tls = facts.tls().is_some(),
        "Reporting request"
    );

    facts.report().render().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{parse_json_section, TlsSession};
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{header, Method, StatusCode};
    use tower::ServiceExt;

    fn test_router() -> Router {
        HttpServer::new(InspectorConfig::default())
            .router()
            .layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 5], 4444))))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn reports_plaintext_get() {
        let request = Request::builder()
            .uri("/test?x=1")
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.starts_with("Headers received:\n"));
        assert!(body.contains("Accept: text/html\n"));
        assert!(body.contains("Method: GET\n"));
        assert!(body.contains("RequestURI: /test?x=1\n"));
        assert!(body.contains("RemoteAddr: 10.0.0.5:4444\n"));
        assert!(body.contains("Protocol: HTTP/1.1\n"));
        assert!(!body.contains("TLS-"));

        let report = parse_json_section(&body).unwrap();
        assert_eq!(report.info.len(), 4);
        assert_eq!(report.headers.get("Host"), Some(""));
    }

    #[tokio::test]
    async fn any_method_and_path_is_reported() {
        for (method, uri) in [
            (Method::POST, "/"),
            (Method::DELETE, "/deep/nested/path"),
            (Method::PATCH, "/a?b=c&d"),
        ] {
            let request = Request::builder()
                .method(method.clone())
                .uri(uri)
                .header(header::HOST, "other.com")
                .body(Body::from("ignored"))
                .unwrap();

            let response = test_router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let report = parse_json_section(&body_text(response).await).unwrap();
            assert_eq!(report.info.get("Method"), Some(method.as_str()));
            assert_eq!(report.info.get("RequestURI"), Some(uri));
            assert_eq!(report.headers.get("Host"), Some("other.com"));
        }
    }

    #[tokio::test]
    async fn tls_extension_adds_tls_fields() {
        let mut request = Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(TlsSession {
            version: 0x0304,
            cipher_suite: 0x9999,
            server_name: "secure.test".to_string(),
        });

        let response = test_router().oneshot(request).await.unwrap();
        let report = parse_json_section(&body_text(response).await).unwrap();

        assert_eq!(report.info.len(), 7);
        assert_eq!(report.info.get("TLS-Version"), Some("TLS 1.3"));
        assert_eq!(report.info.get("TLS-CipherSuite"), Some("Unknown (39321)"));
        assert_eq!(report.info.get("TLS-ServerName"), Some("secure.test"));
    }
}
