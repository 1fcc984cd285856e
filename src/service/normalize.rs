//! Mapping of every failure shape into one [`A2AError`]
//!
//! The server's structured error body is preferred when it is present and
//! well-formed; otherwise the HTTP status decides the class.

use serde_json::Value;

use crate::protocol::{
    envelope::Envelope,
    error::{A2AError, ErrorKind},
    status::StatusCode,
};

/// Normalize a non-2xx HTTP response
pub fn http_failure(status: u16, body: &[u8]) -> A2AError {
    let error = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(obj)) if obj.contains_key("code") || obj.contains_key("message") => {
            let code = obj.get("code").and_then(Value::as_str).map(StatusCode::from);
            let kind = code
                .as_ref()
                .and_then(ErrorKind::from_code)
                .unwrap_or_else(|| ErrorKind::from_http_status(status));

            let api_code = code
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| fallback_code(kind, status).to_string());

            let message = obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {} error", status));

            let details = match obj.get("errors") {
                Some(errors) if !errors.is_null() => errors.clone(),
                _ => Value::Object(obj),
            };

            A2AError::new(kind, message)
                .with_code(api_code)
                .with_details(details)
        }
        _ => {
            let kind = ErrorKind::from_http_status(status);
            let error = A2AError::new(kind, format!("HTTP {} error", status))
                .with_code(fallback_code(kind, status));

            let raw = String::from_utf8_lossy(body);
            if raw.trim().is_empty() {
                error
            } else {
                error.with_details(serde_json::json!({ "raw": raw }))
            }
        }
    };

    let error = error.with_http_status(status);
    tracing::warn!(
        status,
        api_code = %error.api_code,
        message = %error.message,
        "Gateway returned an error response"
    );
    error
}

/// Machine code for a status-derived class
///
/// Statuses that fit no class are reported as internal errors.
fn fallback_code(kind: ErrorKind, status: u16) -> &'static str {
    if kind == ErrorKind::ServerError && !(500..600).contains(&status) {
        "INTERNAL_ERROR"
    } else {
        kind.default_code()
    }
}

/// Surface a `success: false` envelope with a fatal code as an error
///
/// `WAITING_USER`, `INTERPRETING` and every other non-fatal code pass through.
pub fn business_failure(envelope: Envelope, http_status: u16) -> Result<Envelope, A2AError> {
    if envelope.success || !envelope.code.is_fatal() {
        return Ok(envelope);
    }

    let kind = ErrorKind::from_code(&envelope.code).unwrap_or(ErrorKind::ServerError);
    let message = if envelope.message.is_empty() {
        format!("Agent reported {}", envelope.code)
    } else {
        envelope.message.clone()
    };

    let details = envelope.errors.clone().or_else(|| {
        envelope
            .data
            .as_ref()
            .and_then(|data| serde_json::to_value(data).ok())
    });

    let error = A2AError::new(kind, message)
        .with_code(envelope.code.as_str())
        .with_http_status(http_status);

    Err(match details {
        Some(details) => error.with_details(details),
        None => error,
    })
}
