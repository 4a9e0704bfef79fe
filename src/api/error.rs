use thiserror::Error;

pub const DUPLICATE_TITLE_DETAIL: &str = "Kurz s tímto názvem již existuje";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("failed to read local file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("server returned an error: {status}{}", .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },
}

impl ApiError {
    /// Text fit for an inline error panel.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Conflict(detail) => detail.clone(),
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Status { status, .. } => format!("Chyba serveru: {}", status),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Pulls `detail` out of a FastAPI style error body. Validation errors carry a list
/// of objects with `msg` fields instead of a string.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

/// Maps a non-2xx status onto the error taxonomy. A 400 from creating a course is
/// a duplicate-title conflict.
pub(crate) fn status_error(status: u16, body: &str, course_create: bool) -> ApiError {
    let detail = extract_detail(body);
    match status {
        404 => ApiError::NotFound(detail.unwrap_or_else(|| String::from("resource not found"))),
        400 if course_create => {
            ApiError::Conflict(detail.unwrap_or_else(|| DUPLICATE_TITLE_DETAIL.to_string()))
        }
        _ => ApiError::Status { status, detail },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_extracted() {
        assert_eq!(
            extract_detail(r#"{"detail": "Kurz už existuje"}"#).as_deref(),
            Some("Kurz už existuje")
        );
    }

    #[test]
    fn validation_detail_list_is_joined() {
        let body = r#"{"detail": [{"msg": "field required"}, {"msg": "too long"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; too long")
        );
    }

    #[test]
    fn non_json_body_has_no_detail() {
        assert_eq!(extract_detail("<html>bad gateway</html>"), None);
    }

    #[test]
    fn bad_request_on_course_create_is_conflict_with_fallback() {
        match status_error(400, "", true) {
            ApiError::Conflict(msg) => assert_eq!(msg, DUPLICATE_TITLE_DETAIL),
            other => panic!("unexpected {other:?}"),
        }
        match status_error(400, r#"{"detail":"Název je obsazen"}"#, true) {
            ApiError::Conflict(msg) => assert_eq!(msg, "Název je obsazen"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_request_elsewhere_stays_generic() {
        assert!(matches!(
            status_error(400, "", false),
            ApiError::Status { status: 400, detail: None }
        ));
        assert!(matches!(status_error(404, "", false), ApiError::NotFound(_)));
    }

    #[test]
    fn user_message_prefers_detail() {
        let err = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(), "Chyba serveru: 500");
    }
}
