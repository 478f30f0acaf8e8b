use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::*;

const REALM: &str = "Basic realm=\"Authentication required\"";

/// HTTP Basic authentication middleware.
///
/// Returns 401 Unauthorized with a Basic challenge unless the request carries
/// the configured username and password. When no credentials are configured
/// every request passes through.
pub async fn require_basic_auth(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some((username, password)) = app_state.config.credentials() else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(BasicCredentials::from_header)
        .is_some_and(|credentials| credentials.matches(username, password));

    if authorized {
        next.run(request).await
    } else {
        debug!("Rejecting unauthenticated request to {}", request.uri());
        authenticate()
    }
}

/// 401 response that prompts the client for Basic credentials.
fn authenticate() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, REALM)],
        "Authentication required",
    )
        .into_response()
}

#[derive(Debug, PartialEq, Eq)]
struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    /// Parses an `Authorization: Basic <base64(username:password)>` value.
    fn from_header(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_for(userpass: &str) -> String {
        format!("Basic {}", STANDARD.encode(userpass))
    }

    #[test]
    fn parses_basic_credentials() {
        assert_eq!(
            BasicCredentials::from_header(&header_for("admin:s3cret")),
            Some(BasicCredentials {
                username: "admin".to_string(),
                password: "s3cret".to_string(),
            })
        );
    }

    #[test]
    fn password_may_contain_colons() {
        let credentials = BasicCredentials::from_header(&header_for("admin:a:b")).unwrap();
        assert!(credentials.matches("admin", "a:b"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let value = format!("basic {}", STANDARD.encode("u:p"));
        assert!(BasicCredentials::from_header(&value).is_some());
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(BasicCredentials::from_header(""), None);
        assert_eq!(BasicCredentials::from_header("Basic"), None);
        assert_eq!(BasicCredentials::from_header("Bearer abc"), None);
        assert_eq!(BasicCredentials::from_header("Basic !!notbase64!!"), None);
        assert_eq!(
            BasicCredentials::from_header(&header_for("no-colon-here")),
            None
        );
    }

    #[test]
    fn wrong_credentials_do_not_match() {
        let credentials = BasicCredentials::from_header(&header_for("admin:s3cret")).unwrap();
        assert!(!credentials.matches("admin", "other"));
        assert!(!credentials.matches("root", "s3cret"));
    }

    #[test]
    fn challenge_response() {
        let response = authenticate();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], REALM);
    }
}
