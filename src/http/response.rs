//! HTTP response building module
//!
//! Provides builders for the status codes this server emits. Each builder
//! falls back to a minimal valid response if header assembly fails, with
//! the failure logged.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 response with a text body
///
/// Sets `Content-Length` from the full body even for HEAD requests,
/// which get the same headers with an empty body.
pub fn build_text_response(content: String, content_type: &str, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build health probe response
pub fn build_health_response(is_head: bool) -> Response<Full<Bytes>> {
    build_text_response("ok".to_string(), "text/plain", is_head)
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let collected = response.into_body().collect().await.expect("body collects");
        String::from_utf8(collected.to_bytes().to_vec()).expect("body is utf-8")
    }

    #[tokio::test]
    async fn test_text_response() {
        let response = build_text_response("1".to_string(), "text/html; charset=utf-8", false);
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(response.headers().get("Content-Length").unwrap(), "1");
        assert_eq!(body_string(response).await, "1");
    }

    #[tokio::test]
    async fn test_text_response_head_keeps_headers_drops_body() {
        let response = build_text_response("0".to_string(), "text/plain", true);
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Content-Length").unwrap(), "1");
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_health_response() {
        let response = build_health_response(false);
        assert_eq!(response.status(), 200);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn test_404_response() {
        let response = build_404_response();
        assert_eq!(response.status(), 404);
        assert_eq!(body_string(response).await, "404 Not Found");
    }

    #[tokio::test]
    async fn test_405_response_carries_allow_header() {
        let response = build_405_response();
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers().get("Allow").unwrap(), "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn test_options_response_without_cors() {
        let response = build_options_response(false);
        assert_eq!(response.status(), 204);
        assert!(response.headers().get("Access-Control-Allow-Origin").is_none());
    }

    #[tokio::test]
    async fn test_options_response_with_cors() {
        let response = build_options_response(true);
        assert_eq!(response.status(), 204);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }
}
