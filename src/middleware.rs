use axum::{body::HttpBody, extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        method = %method,
        url = %uri,
        status = response.status().as_u16(),
        length = response_length(&response),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "HTTP request"
    );

    response
}

/// Body size of a response. Buffered bodies report it exactly; otherwise
/// the `Content-Length` header is used, and 0 when neither is known.
fn response_length(response: &Response) -> u64 {
    response.body().size_hint().exact().unwrap_or_else(|| {
        response
            .headers()
            .get(axum::http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{response::IntoResponse, Json};
    use serde_json::json;

    #[test]
    fn test_json_response_length() {
        let body = json!({"success": true, "message": "Movies seeded!"});
        let expected = serde_json::to_vec(&body).unwrap().len() as u64;

        let response = Json(body).into_response();
        assert!(response
            .headers()
            .get(axum::http::header::CONTENT_LENGTH)
            .is_none());
        assert_eq!(response_length(&response), expected);
    }

    #[test]
    fn test_empty_response_length() {
        let response = axum::http::StatusCode::NO_CONTENT.into_response();
        assert_eq!(response_length(&response), 0);
    }
}
