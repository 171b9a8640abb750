//! The request/response contract for serving generated documents over HTTP.
//!
//! [`handle`] is a plain function over [`http`] types, so any server (or a
//! serverless function runtime) can mount it. The request body is a JSON
//! document spec. Generation itself is synchronous; callers on an async runtime
//! should run it on a blocking-capable thread.

use crate::document::generate_from_json;
use crate::error::DocumentError;
use crate::font::FontSet;
use crate::layout::LayoutConfig;
use http::{header, HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use log::{error, info};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody<'e> {
    error: &'e str,
}

/// Answer one request: `OPTIONS` preflights get an empty `204`, `POST` bodies
/// are generated into a PDF attachment, and anything that goes wrong becomes a
/// JSON error. A failed generation never returns partial document bytes.
pub fn handle(
    request: &Request<Vec<u8>>,
    config: &LayoutConfig,
    fonts: &FontSet,
) -> Response<Vec<u8>> {
    match request.method() {
        &Method::OPTIONS => respond(StatusCode::NO_CONTENT, Vec::new()),
        &Method::POST => generate_response(request.body(), config, fonts),
        other => {
            let mut response = error_response(
                StatusCode::METHOD_NOT_ALLOWED,
                &format!("method {other} is not supported"),
            );
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST, OPTIONS"));
            response
        }
    }
}

fn generate_response(body: &[u8], config: &LayoutConfig, fonts: &FontSet) -> Response<Vec<u8>> {
    let result = std::str::from_utf8(body)
        .map_err(|e| DocumentError::InputValidation(format!("request body is not UTF-8: {e}")))
        .and_then(|json| generate_from_json(json, config, fonts));

    match result {
        Ok(artifact) => {
            info!(
                "generated `{}` ({} bytes)",
                artifact.filename,
                artifact.bytes.len()
            );
            let disposition = HeaderValue::from_str(&format!(
                "attachment; filename=\"{}\"",
                artifact.filename
            ))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"document.pdf\""));

            let mut response = respond(StatusCode::OK, artifact.bytes);
            let headers = response.headers_mut();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(artifact.mime_type),
            );
            headers.insert(header::CONTENT_DISPOSITION, disposition);
            response
        }
        Err(err) => {
            error!("document generation failed ({}): {err}", err.kind());
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response<Vec<u8>> {
    let body = serde_json::to_vec(&ErrorBody { error: message })
        .unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec());
    let mut response = respond(status, body);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

fn respond(status: StatusCode, body: Vec<u8>) -> Response<Vec<u8>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    add_cors_headers(response.headers_mut());
    response
}

fn add_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, x-client-info, apikey, content-type"),
    );
}
