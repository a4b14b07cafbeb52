//! Request timing middleware.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

pub static PROCESS_TIME_HEADER: HeaderName = HeaderName::from_static("x-process-time");

/// Adds an `X-Process-Time` header holding the handling time in seconds.
pub async fn process_time(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
        response
            .headers_mut()
            .insert(PROCESS_TIME_HEADER.clone(), value);
    }

    tracing::debug!(
        "{} {} -> {} in {:.6}s",
        method,
        path,
        response.status().as_u16(),
        elapsed
    );

    response
}
