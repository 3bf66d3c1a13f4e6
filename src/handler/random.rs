//! Random value handler
//!
//! Draws a bounded pseudo-random integer and writes it as the response body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use rand::Rng;

use crate::config::AppState;
use crate::http;
use crate::logger;

/// Draw a uniform integer from `[0, upper)`.
///
/// `upper` must be at least 1 (enforced at configuration load).
pub fn draw(rng: &mut impl Rng, upper: u64) -> u64 {
    rng.gen_range(0..upper)
}

/// Handle `GET /random`: respond 200 with a fresh draw as a decimal string.
///
/// The request is not read beyond its route; the value has no identity
/// beyond this single response.
pub fn handle_random(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    logger::log_handler_invoked("/random");

    let value = draw(&mut rand::thread_rng(), state.config.random.upper_bound);
    http::build_text_response(
        value.to_string(),
        &state.config.http.default_content_type,
        is_head,
    )
}
