//! # Server
//!
//! Binds the listener and serves the router until a fatal error.
//!
//! Connections are driven by hyper's HTTP/1 builder directly (rather than
//! `axum::serve`) so the header read timeout can be enforced. Body read and
//! response timeouts are router layers, see [`crate::routes::create_router`].

use crate::routes::create_router;
use crate::state::{AppConfig, AppState};
use anyhow::Context;
use axum::{extract::ConnectInfo, http::Request, Router};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use std::io;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tracing::{debug, info};

/// Bind the configured address and serve until a fatal error
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.socket_addr()?;
    let config = state.config.clone();

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", listener.local_addr()?);

    serve(listener, create_router(state), &config).await
}

/// Serve `router` on every connection accepted from `listener`.
///
/// Each connection runs on its own task. Returns only when accepting fails
/// with something other than a per-connection error.
pub async fn serve(listener: TcpListener, router: Router, config: &AppConfig) -> anyhow::Result<()> {
    let header_read_timeout = config.read_header_timeout;

    loop {
        let (stream, remote_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) if is_connection_error(&e) => {
                debug!("Dropped incoming connection: {}", e);
                continue;
            }
            Err(e) => return Err(e).context("Failed to accept connection"),
        };

        // Handlers and the access log read the peer address as ConnectInfo
        let service = ServiceExt::<Request<Incoming>>::map_request(
            router.clone(),
            move |mut request: Request<Incoming>| {
                request.extensions_mut().insert(ConnectInfo(remote_addr));
                request
            },
        );

        tokio::spawn(async move {
            let result = http1::Builder::new()
                .timer(TokioTimer::new())
                .header_read_timeout(header_read_timeout)
                .serve_connection(TokioIo::new(stream), TowerToHyperService::new(service))
                .await;

            if let Err(e) = result {
                debug!("Connection from {} closed: {}", remote_addr, e);
            }
        });
    }
}

fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}
