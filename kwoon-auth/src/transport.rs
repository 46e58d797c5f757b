//! Credential transport for the association backend
//!
//! Exchanges a username and password for a backend token and attaches the
//! token to subsequent requests using the `Token` authorization scheme.

use async_trait::async_trait;
use kwoon_core::{normalize_roles, ApiConfig, ErrorContext, KwoonError, KwoonResult, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};

/// The outcome of a successful credential exchange
#[derive(Debug, Clone)]
pub struct CredentialGrant {
    /// Backend token for subsequent requests
    pub token: String,
    /// Backend user id
    pub user_id: i64,
    /// Account name as the backend knows it
    pub username: String,
    /// Contact address, when the backend has one on file
    pub email: Option<String>,
    /// Roles granted to the account
    pub roles: HashSet<Role>,
}

/// Trait for exchanging and holding backend credentials
#[async_trait]
pub trait CredentialTransport: Send + Sync {
    /// Exchange a username and password for a credential grant
    ///
    /// A successful exchange installs the granted token on the transport.
    async fn authenticate(&self, username: &str, password: &str) -> KwoonResult<CredentialGrant>;

    /// Install a token so later requests carry it
    fn install_credential(&self, token: &str);

    /// Drop the installed token
    fn clear_credential(&self);

    /// Whether a token is currently installed
    fn has_credential(&self) -> bool;
}

/// Login request body expected by the backend
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Login response body returned by the backend
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user_id: i64,
    username: String,
    email: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

/// HTTP implementation of [`CredentialTransport`]
///
/// Talks to the association backend's token login endpoint. The installed
/// token lives in memory only; persistence is the vault's job.
pub struct HttpCredentialTransport {
    client: reqwest::Client,
    config: ApiConfig,
    token: RwLock<Option<String>>,
}

impl HttpCredentialTransport {
    /// Create a transport for the configured backend
    pub fn new(config: ApiConfig) -> KwoonResult<Self> {
        let client = build_http_client(&config)?;

        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
        })
    }

    /// Build a request for a backend path, attaching the installed token
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.endpoint(path));

        match self.current_token() {
            Some(token) => builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", token),
            ),
            None => builder,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CredentialTransport for HttpCredentialTransport {
    async fn authenticate(&self, username: &str, password: &str) -> KwoonResult<CredentialGrant> {
        let request = LoginRequest { username, password };

        let response = self
            .client
            .post(self.endpoint("auth/token/login/"))
            .json(&request)
            .send()
            .await
            .map_err(|e| KwoonError::Authentication {
                message: format!("Login request failed: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("credential_transport")
                    .with_operation("authenticate")
                    .with_suggestion("Check network connectivity and the backend URL"),
            })?;

        if !response.status().is_success() {
            return Err(rejection_error(response).await);
        }

        let body: LoginResponse =
            response
                .json()
                .await
                .map_err(|e| KwoonError::Authentication {
                    message: format!("Failed to decode login response: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("credential_transport")
                        .with_operation("authenticate")
                        .with_suggestion("Check that the backend is the expected version"),
                })?;

        let roles = normalize_roles(&body.roles);
        self.install_credential(&body.token);

        info!(
            user_id = body.user_id,
            username = %body.username,
            "Credential exchange succeeded"
        );

        Ok(CredentialGrant {
            token: body.token,
            user_id: body.user_id,
            username: body.username,
            email: body.email.filter(|email| !email.is_empty()),
            roles,
        })
    }

    fn install_credential(&self, token: &str) {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.to_string());
    }

    fn clear_credential(&self) {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            debug!("Cleared installed credential");
        }
    }

    fn has_credential(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Build an HTTP client with the configured user agent and timeout
fn build_http_client(config: &ApiConfig) -> KwoonResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            KwoonError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("build_client"),
            }
        })?,
    );

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| KwoonError::Config {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("build_client"),
        })?;

    Ok(client)
}

/// Turn a non-success login response into an authentication error
async fn rejection_error(response: reqwest::Response) -> KwoonError {
    let status = response.status();
    let error_body = response.text().await.unwrap_or_default();

    KwoonError::Authentication {
        message: format!(
            "Login rejected with HTTP {}: {}",
            status.as_u16(),
            if error_body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error")
            } else {
                &error_body
            }
        ),
        source: None,
        context: ErrorContext::new("credential_transport")
            .with_operation("authenticate")
            .with_metadata("status", &status.as_u16().to_string())
            .with_suggestion(match status.as_u16() {
                400 | 401 => "Check the username and password",
                403 => "The account is not allowed to sign in",
                _ => "Check backend availability",
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_matches_backend_wire_format() {
        let body = r#"{
            "token": "9f2b",
            "user_id": 42,
            "username": "mestre",
            "email": "mestre@example.org",
            "roles": ["Instrutor", "Diretoria"]
        }"#;

        let response: LoginResponse = serde_json::from_str(body).expect("decode");
        assert_eq!(response.token, "9f2b");
        assert_eq!(response.user_id, 42);
        assert_eq!(response.username, "mestre");
        assert_eq!(response.email.as_deref(), Some("mestre@example.org"));

        let roles = normalize_roles(&response.roles);
        assert!(roles.contains(&Role::Instructor));
        assert!(roles.contains(&Role::Directorate));
    }

    #[test]
    fn login_response_tolerates_missing_roles_and_email() {
        let body = r#"{"token": "t", "user_id": 1, "username": "ana"}"#;

        let response: LoginResponse = serde_json::from_str(body).expect("decode");
        assert!(response.email.is_none());
        assert!(response.roles.is_empty());
    }

    #[test]
    fn installed_credential_is_tracked_and_cleared() {
        let transport =
            HttpCredentialTransport::new(ApiConfig::default()).expect("build transport");

        assert!(!transport.has_credential());
        transport.install_credential("s3cret");
        assert!(transport.has_credential());

        transport.clear_credential();
        assert!(!transport.has_credential());
        // Clearing twice is harmless
        transport.clear_credential();
        assert!(!transport.has_credential());
    }

    #[test]
    fn authorized_requests_carry_the_token_scheme_header() {
        let transport =
            HttpCredentialTransport::new(ApiConfig::default()).expect("build transport");
        transport.install_credential("s3cret");

        let request = transport
            .request(reqwest::Method::GET, "/api/students/")
            .build()
            .expect("build request");

        assert_eq!(request.url().as_str(), "http://localhost:8000/api/students/");
        assert_eq!(
            request
                .headers()
                .get(reqwest::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
            Some("Token s3cret")
        );
    }

    #[test]
    fn anonymous_requests_carry_no_authorization_header() {
        let transport =
            HttpCredentialTransport::new(ApiConfig::default()).expect("build transport");

        let request = transport
            .request(reqwest::Method::GET, "api/schools/")
            .build()
            .expect("build request");

        assert!(request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .is_none());
    }
}
