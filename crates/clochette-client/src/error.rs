//! Mapping of backend error answers to `CoreError`

use clochette_core::CoreError;
use reqwest::StatusCode;
use serde_json::Value;

/// Message carried by a backend error body.
///
/// Looks for a `detail` string, a `detail` list of validation errors
/// (their `msg` joined with `; `) or a `message` string. Falls back to
/// the status reason phrase.
pub fn error_message(status: u16, body: &str) -> String {
    body_message(body).unwrap_or_else(|| reason(status))
}

/// Non-blank message found in a backend error body
fn body_message(body: &str) -> Option<String> {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        match json.get("detail") {
            Some(Value::String(detail)) => return Some(detail.clone()),
            Some(Value::Array(entries)) => {
                let messages: Vec<&str> = entries
                    .iter()
                    .filter_map(|e| e.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return Some(messages.join("; "));
                }
            }
            _ => {}
        }
        json.get("message").and_then(Value::as_str).map(str::to_string)
    });

    from_body.filter(|m| !m.trim().is_empty())
}

fn reason(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Error for a non-2xx answer to a request on `resource`
pub fn status_error(status: u16, body: &str, resource: &str) -> CoreError {
    match status {
        401 => CoreError::Unauthorized,
        403 => CoreError::Forbidden {
            message: body_message(body).unwrap_or_else(|| "Accès refusé".to_string()),
        },
        // The request path is only shown when the body explains nothing
        404 => CoreError::NotFound {
            resource: body_message(body).unwrap_or_else(|| resource.to_string()),
        },
        _ => CoreError::Api {
            status,
            message: error_message(status, body),
        },
    }
}

/// Error for a request that never got an answer
pub fn transport_error(err: reqwest::Error) -> CoreError {
    let message = if err.is_timeout() {
        "délai dépassé".to_string()
    } else if err.is_connect() {
        "connexion refusée".to_string()
    } else {
        err.to_string()
    };
    CoreError::Transport { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        assert_eq!(
            error_message(400, r#"{"detail": "Stock insuffisant"}"#),
            "Stock insuffisant"
        );
    }

    #[test]
    fn test_detail_list_joined() {
        let body = r#"{"detail": [
            {"loc": ["body", "name"], "msg": "field required"},
            {"loc": ["body", "price"], "msg": "must be positive"}
        ]}"#;
        assert_eq!(error_message(422, body), "field required; must be positive");
    }

    #[test]
    fn test_message_field() {
        assert_eq!(error_message(409, r#"{"message": "Déjà monté"}"#), "Déjà monté");
    }

    #[test]
    fn test_fallback_to_reason() {
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "Bad Gateway");
        assert_eq!(error_message(500, r#"{"detail": ""}"#), "Internal Server Error");
        assert_eq!(error_message(599, ""), "HTTP 599");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_error(401, "", "/account/me"), CoreError::Unauthorized);
        assert_eq!(
            status_error(403, "", "/account/"),
            CoreError::Forbidden {
                message: "Accès refusé".to_string()
            }
        );
        assert_eq!(
            status_error(404, "", "/drink/9"),
            CoreError::NotFound {
                resource: "/drink/9".to_string()
            }
        );
        assert_eq!(
            status_error(400, r#"{"detail": "Panier vide"}"#, "/transaction/"),
            CoreError::Api {
                status: 400,
                message: "Panier vide".to_string()
            }
        );
    }

    #[test]
    fn test_not_found_and_forbidden_keep_backend_message() {
        let error = status_error(404, r#"{"detail": "Drink not found"}"#, "/drink/9");
        assert_eq!(error.to_string(), "Introuvable : Drink not found");
        assert!(!error.to_string().contains("/drink/9"));

        let error = status_error(403, r#"{"detail": "Treasurer role required"}"#, "/account/");
        assert_eq!(error.to_string(), "Treasurer role required");
    }
}
