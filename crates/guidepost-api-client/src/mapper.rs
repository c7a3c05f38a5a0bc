//! Result mapping: raw HTTP responses into domain values or typed failures.
//!
//! A response is a success only when its status is in `[200, 300)` and its
//! body holds a non-null value. Everything else becomes a `ClientError`.

use crate::RawResponse;
use guidepost_core::ClientError;
use serde::de::DeserializeOwned;

/// Classify a `reqwest` failure. Body decoding problems are ours to report;
/// anything that went wrong on the wire is a network error.
pub fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_decode() || err.is_builder() {
        ClientError::Generic(err.to_string())
    } else {
        ClientError::Network(err.to_string())
    }
}

/// Message for a failed response: the body text when there is one,
/// otherwise the call site's fallback.
fn failure_message(raw: &RawResponse, fallback: &str) -> String {
    let text = raw.text();
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

fn missing_body(raw: &RawResponse, fallback: &str) -> ClientError {
    ClientError::api(fallback, Some(raw.status))
}

/// Decode a JSON body into `T`.
pub fn map_json<T: DeserializeOwned>(raw: &RawResponse, fallback: &str) -> Result<T, ClientError> {
    if !raw.is_success() {
        return Err(ClientError::api(
            failure_message(raw, fallback),
            Some(raw.status),
        ));
    }

    if raw.body.iter().all(u8::is_ascii_whitespace) {
        return Err(missing_body(raw, fallback));
    }

    let value: serde_json::Value = serde_json::from_slice(&raw.body).map_err(|e| {
        tracing::error!(status = raw.status, error = %e, "Malformed JSON in success response");
        ClientError::from(e)
    })?;
    if value.is_null() {
        return Err(missing_body(raw, fallback));
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::error!(status = raw.status, error = %e, "Unexpected response shape");
        ClientError::from(e)
    })
}

/// Take the body as-is (image downloads). An empty 2xx body is an empty image.
pub fn map_bytes(raw: &RawResponse, fallback: &str) -> Result<Vec<u8>, ClientError> {
    if !raw.is_success() {
        return Err(ClientError::api(
            failure_message(raw, fallback),
            Some(raw.status),
        ));
    }
    Ok(raw.body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use guidepost_core::{AnalysisListResponse, AnalysisResponse, ErrorKind};

    fn raw(status: u16, body: &'static str) -> RawResponse {
        RawResponse {
            status,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    const FALLBACK: &str = "Failed to fetch analysis";

    #[test]
    fn test_success_requires_2xx_and_body() {
        let list: AnalysisListResponse =
            map_json(&raw(200, r#"{"success":true,"data":[]}"#), FALLBACK).unwrap();
        assert!(list.data.is_empty());

        let single: AnalysisResponse = map_json(
            &raw(
                299,
                r#"{"success":true,"data":{"imageId":"a","filename":"f","status":"processing"}}"#,
            ),
            FALLBACK,
        )
        .unwrap();
        assert_eq!(single.data.image_id, "a");
    }

    #[test]
    fn test_error_uses_body_text_and_status() {
        let err = map_json::<AnalysisResponse>(&raw(404, "not found"), FALLBACK).unwrap_err();
        assert_eq!(err, ClientError::api("not found", Some(404)));
    }

    #[test]
    fn test_error_falls_back_when_body_empty() {
        let err = map_json::<AnalysisResponse>(&raw(500, ""), FALLBACK).unwrap_err();
        assert_eq!(err, ClientError::api(FALLBACK, Some(500)));

        let err = map_json::<AnalysisResponse>(&raw(302, "  \n"), FALLBACK).unwrap_err();
        assert_eq!(err, ClientError::api(FALLBACK, Some(302)));
    }

    #[test]
    fn test_null_or_empty_success_body_is_an_error() {
        let err = map_json::<AnalysisListResponse>(&raw(200, "null"), FALLBACK).unwrap_err();
        assert_eq!(err, ClientError::api(FALLBACK, Some(200)));

        let err = map_json::<AnalysisListResponse>(&raw(204, ""), FALLBACK).unwrap_err();
        assert_eq!(err, ClientError::api(FALLBACK, Some(204)));
    }

    #[test]
    fn test_malformed_json_is_generic_error() {
        let err = map_json::<AnalysisListResponse>(&raw(200, "{\"success\":tru"), FALLBACK)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.to_string().starts_with("Error: "));

        let err = map_json::<AnalysisListResponse>(&raw(200, r#"{"success":true}"#), FALLBACK)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn test_map_bytes() {
        let bytes = map_bytes(&raw(200, "\u{1}\u{2}"), "Failed to fetch image").unwrap();
        assert_eq!(bytes, vec![1, 2]);

        let empty = map_bytes(&raw(200, ""), "Failed to fetch image").unwrap();
        assert!(empty.is_empty());

        let err = map_bytes(&raw(403, "forbidden"), "Failed to fetch image").unwrap_err();
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.to_string(), "forbidden");
    }
}
