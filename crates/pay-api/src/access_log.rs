//! # Access Log
//!
//! Middleware writing one Common Log Format line per request:
//!
//! ```text
//! 10.0.0.7 - - [19/Oct/2026:09:15:02 +0000] "POST /rest/v1/charge HTTP/1.1" 200 62
//! ```
//!
//! Lines are emitted as `info` events under the `access` target, so they
//! follow the subscriber's output (stdout) and filtering.

use axum::{
    body::HttpBody,
    extract::{ConnectInfo, Request},
    http::{Method, StatusCode, Uri, Version},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, FixedOffset, Local};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

/// Common Log Format timestamp, e.g. `10/Oct/2000:13:55:36 -0700`
const CLF_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One access log entry
#[derive(Debug, Clone)]
pub struct AccessLogLine {
    pub client: Option<IpAddr>,
    pub time: DateTime<FixedOffset>,
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub status: StatusCode,
    pub size: u64,
}

impl fmt::Display for AccessLogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.client {
            Some(ip) => write!(f, "{}", ip)?,
            None => f.write_str("-")?,
        }
        write!(
            f,
            " - - [{}] \"{} {} {:?}\" {} {}",
            self.time.format(CLF_TIME_FORMAT),
            self.method,
            self.uri,
            self.version,
            self.status.as_u16(),
            self.size
        )
    }
}

/// Log every request after its response has been produced
pub async fn access_log(request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();
    let time = Local::now().fixed_offset();

    let response = next.run(request).await;

    let line = AccessLogLine {
        client,
        time,
        method,
        uri,
        version,
        status: response.status(),
        size: response.body().size_hint().exact().unwrap_or(0),
    };
    info!(target: "access", "{}", line);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::state::{AppConfig, AppState};
    use axum::body::{to_bytes, Body};
    use chrono::TimeZone;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use tracing_subscriber::EnvFilter;

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn access_subscriber(capture: &Capture) -> impl tracing::Subscriber + Send + Sync {
        let capture = capture.clone();
        tracing_subscriber::fmt()
            .with_writer(move || capture.clone())
            .with_ansi(false)
            .without_time()
            .with_level(false)
            .with_env_filter(EnvFilter::new("access=info"))
            .finish()
    }

    /// Send one request from `peer` and return (status, body length)
    async fn send(method: Method, uri: &str, body: &str, peer: SocketAddr) -> (StatusCode, usize) {
        let mut request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        let response = create_router(AppState::with_config(AppConfig::default()))
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.len())
    }

    #[tokio::test]
    async fn test_one_line_per_request() {
        let capture = Capture::default();
        let _guard = tracing::subscriber::set_default(access_subscriber(&capture));
        let peer: SocketAddr = "10.1.2.3:40000".parse().unwrap();

        let cases = [
            (Method::POST, "/rest/v1/charge", r#"{"customer_id":1,"value":301.99}"#, 200),
            (Method::POST, "/rest/v1/charge", "this is not a valid body", 400),
            (Method::GET, "/rest/ready", "", 200),
            (Method::GET, "/rest/alive", "", 200),
            (Method::GET, "/rest/v1/charge", "", 405),
            (Method::GET, "/nowhere", "", 404),
        ];

        for (i, (method, uri, body, expected)) in cases.into_iter().enumerate() {
            let (status, size) = send(method.clone(), uri, body, peer).await;
            assert_eq!(status.as_u16(), expected, "{} {}", method, uri);

            let lines = capture.lines();
            assert_eq!(lines.len(), i + 1, "{} {} logged {:?}", method, uri, lines);

            let line = &lines[i];
            assert!(line.contains("access: 10.1.2.3 - - ["), "{}", line);
            assert!(
                line.ends_with(&format!(
                    "\"{} {} HTTP/1.1\" {} {}",
                    method, uri, expected, size
                )),
                "{}",
                line
            );
        }
    }

    #[tokio::test]
    async fn test_charge_size_matches_body() {
        let capture = Capture::default();
        let _guard = tracing::subscriber::set_default(access_subscriber(&capture));
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();

        let (status, size) = send(
            Method::POST,
            "/rest/v1/charge",
            r#"{"currency":{},"customer_id":1,"value":301.99}"#,
            peer,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(size > 0);
        assert!(capture.lines()[0].ends_with(&format!(" 200 {}", size)));
    }

    fn line(client: Option<IpAddr>) -> AccessLogLine {
        AccessLogLine {
            client,
            time: FixedOffset::west_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2000, 10, 10, 13, 55, 36)
                .unwrap(),
            method: Method::POST,
            uri: Uri::from_static("/rest/v1/charge"),
            version: Version::HTTP_11,
            status: StatusCode::OK,
            size: 62,
        }
    }

    #[test]
    fn test_common_log_format() {
        let entry = line(Some("127.0.0.1".parse().unwrap()));
        assert_eq!(
            entry.to_string(),
            r#"127.0.0.1 - - [10/Oct/2000:13:55:36 -0700] "POST /rest/v1/charge HTTP/1.1" 200 62"#
        );
    }

    #[test]
    fn test_unknown_client() {
        let entry = line(None);
        assert!(entry.to_string().starts_with("- - - ["));
    }

    #[test]
    fn test_query_string_is_kept() {
        let mut entry = line(None);
        entry.method = Method::GET;
        entry.uri = Uri::from_static("/rest/ready?verbose=1");
        entry.status = StatusCode::NOT_FOUND;
        entry.size = 0;

        assert!(entry
            .to_string()
            .ends_with(r#""GET /rest/ready?verbose=1 HTTP/1.1" 404 0"#));
    }
}
