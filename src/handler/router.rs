//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! resolution, dispatching, and access logging.

use crate::config::AppState;
use crate::handler::random;
use crate::http;
use crate::logger;
use crate::logger::AccessLogEntry;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Resolved route for a `(method, path)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Random,
    Liveness,
    Readiness,
    Preflight,
    NotFound,
    MethodNotAllowed,
}

/// Resolve a request line to a route.
///
/// Pure over `(method, path)` so routing is testable without a socket.
/// Paths match exactly; `/random/` is not `/random`.
pub fn resolve(method: &Method, path: &str) -> Routed {
    match *method {
        Method::GET | Method::HEAD => match path {
            "/random" => Routed::Random,
            "/healthz" => Routed::Liveness,
            "/readyz" => Routed::Readiness,
            _ => Routed::NotFound,
        },
        Method::OPTIONS => Routed::Preflight,
        _ => Routed::MethodNotAllowed,
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let is_head = *req.method() == Method::HEAD;

    let response = match resolve(req.method(), req.uri().path()) {
        Routed::Random => random::handle_random(&state, is_head),
        Routed::Liveness | Routed::Readiness => http::build_health_response(is_head),
        Routed::Preflight => http::build_options_response(state.config.http.enable_cors),
        Routed::NotFound => http::build_404_response(),
        Routed::MethodNotAllowed => {
            logger::log_warning(&format!("Method not allowed: {}", req.method()));
            http::build_405_response()
        }
    };

    if state.access_log_enabled() {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Assemble the access log entry for a completed request
fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;

    fn test_state() -> Arc<AppState> {
        let config = Config::load_from("no_such_config_file").expect("defaults should load");
        Arc::new(AppState::new(config))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().expect("peer address parses")
    }

    fn request(method: Method, path: &str) -> Request<()> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .expect("request builds")
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let collected = response.into_body().collect().await.expect("body collects");
        String::from_utf8(collected.to_bytes().to_vec()).expect("body is utf-8")
    }

    #[test]
    fn test_resolve_random_route() {
        assert_eq!(resolve(&Method::GET, "/random"), Routed::Random);
        assert_eq!(resolve(&Method::HEAD, "/random"), Routed::Random);
    }

    #[test]
    fn test_resolve_is_exact_match() {
        assert_eq!(resolve(&Method::GET, "/random/"), Routed::NotFound);
        assert_eq!(resolve(&Method::GET, "/random/extra"), Routed::NotFound);
        assert_eq!(resolve(&Method::GET, "/RANDOM"), Routed::NotFound);
        assert_eq!(resolve(&Method::GET, "/"), Routed::NotFound);
    }

    #[test]
    fn test_resolve_health_routes() {
        assert_eq!(resolve(&Method::GET, "/healthz"), Routed::Liveness);
        assert_eq!(resolve(&Method::GET, "/readyz"), Routed::Readiness);
    }

    #[test]
    fn test_resolve_method_gate() {
        assert_eq!(resolve(&Method::POST, "/random"), Routed::MethodNotAllowed);
        assert_eq!(resolve(&Method::PUT, "/random"), Routed::MethodNotAllowed);
        assert_eq!(resolve(&Method::DELETE, "/anything"), Routed::MethodNotAllowed);
        assert_eq!(resolve(&Method::OPTIONS, "/random"), Routed::Preflight);
    }

    #[tokio::test]
    async fn test_get_random_returns_single_digit() {
        let state = test_state();
        let response = handle_request(request(Method::GET, "/random"), state, peer())
            .await
            .expect("handler is infallible");

        assert_eq!(response.status(), 200);
        let body = body_string(response).await;
        assert!(body == "0" || body == "1", "unexpected body: {body:?}");
    }

    #[tokio::test]
    async fn test_repeated_requests_stay_in_range() {
        let state = test_state();
        for _ in 0..50 {
            let response =
                handle_request(request(Method::GET, "/random"), Arc::clone(&state), peer())
                    .await
                    .expect("handler is infallible");
            assert_eq!(response.status(), 200);
            let body = body_string(response).await;
            assert_eq!(body.len(), 1);
            assert!(body == "0" || body == "1");
        }
    }

    #[tokio::test]
    async fn test_head_random_has_empty_body() {
        let state = test_state();
        let response = handle_request(request(Method::HEAD, "/random"), state, peer())
            .await
            .expect("handler is infallible");

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Content-Length").unwrap(), "1");
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = test_state();
        let response = handle_request(request(Method::GET, "/nonexistent"), state, peer())
            .await
            .expect("handler is infallible");

        assert_eq!(response.status(), 404);
        let body = body_string(response).await;
        assert!(body != "0" && body != "1");
    }

    #[tokio::test]
    async fn test_post_random_is_405() {
        let state = test_state();
        let response = handle_request(request(Method::POST, "/random"), state, peer())
            .await
            .expect("handler is infallible");

        assert_eq!(response.status(), 405);
        let body = body_string(response).await;
        assert!(body != "0" && body != "1");
    }

    #[tokio::test]
    async fn test_healthz_responds_ok() {
        let state = test_state();
        let response = handle_request(request(Method::GET, "/healthz"), state, peer())
            .await
            .expect("handler is infallible");

        assert_eq!(response.status(), 200);
        assert_eq!(body_string(response).await, "ok");
    }
}
