//! Cookie-based sign-in handshake
//!
//! The service authenticates in three round trips on a single cookie jar:
//! fetch an anti-forgery token, post the credentials form alongside it,
//! then ask the session endpoint who we are. Only that last answer decides
//! whether sign-in worked; the callback itself may answer 200 or a redirect
//! either way.

use crate::error::{AuthError, TransportError};
use crate::model::{CsrfToken, Role, SessionUser};
use crate::transport::{ApiRequest, ApiResponse, FilePart, Transport};
use tracing::{debug, info};

pub const CSRF_PATH: &str = "/api/auth/csrf";
pub const CALLBACK_PATH: &str = "/api/auth/callback/credentials";
pub const SESSION_PATH: &str = "/api/auth/session";
pub const PROVIDERS_PATH: &str = "/api/auth/providers";

/// An authenticated identity: its cookie jar plus the user it is bound to.
///
/// Owned by whoever authenticated it; nothing else shares the jar.
pub struct Session {
    transport: Box<dyn Transport>,
    user: SessionUser,
}

impl Session {
    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    pub fn role(&self) -> Option<Role> {
        self.user.known_role()
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.transport.send(request).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("user", &self.user).finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthHandshake {
    callback_url: String,
}

impl AuthHandshake {
    /// `base_url` is where the service should send the browser after
    /// sign-in; it is echoed back as `callbackUrl`.
    pub fn new(base_url: &str) -> Self {
        Self {
            callback_url: format!("{}/", base_url.trim_end_matches('/')),
        }
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Sign in on `transport` and hand it back wrapped as a [`Session`].
    ///
    /// No retries. Any transport failure ends the handshake.
    pub async fn authenticate(
        &self,
        transport: Box<dyn Transport>,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let csrf_token = fetch_csrf_token(transport.as_ref()).await?;

        let callback = transport
            .send(self.credentials_request(email, password, &csrf_token))
            .await?;
        debug!(
            status = callback.status,
            cookies = ?callback.cookies,
            "credentials callback answered"
        );

        match current_user(transport.as_ref()).await? {
            Some(user) => {
                info!(email, role = user.role_label(), "session established");
                Ok(Session { transport, user })
            }
            None => Err(AuthError::InvalidCredentials),
        }
    }

    fn credentials_request(&self, email: &str, password: &str, csrf_token: &str) -> ApiRequest {
        ApiRequest::post(CALLBACK_PATH).with_form(&[
            ("email", email),
            ("password", password),
            ("csrfToken", csrf_token),
            ("callbackUrl", &self.callback_url),
            ("json", "true"),
        ])
    }

    /// Walk the handshake step by step, recording every response instead
    /// of stopping at the first problem.
    ///
    /// When no user comes out of it, the protected endpoints are tried on
    /// the same jar to show how the service treats the failed sign-in.
    pub async fn trace(
        &self,
        transport: &dyn Transport,
        email: &str,
        password: &str,
    ) -> HandshakeTrace {
        let mut trace = HandshakeTrace::default();

        trace
            .record("GET /api/auth/session", transport, ApiRequest::get(SESSION_PATH))
            .await;
        trace
            .record("GET /api/auth/providers", transport, ApiRequest::get(PROVIDERS_PATH))
            .await;

        let csrf = trace
            .record("GET /api/auth/csrf", transport, ApiRequest::get(CSRF_PATH))
            .await;
        let csrf_token = csrf
            .filter(|r| r.status == 200)
            .and_then(|r| r.json::<CsrfToken>().ok())
            .map(|t| t.csrf_token)
            .unwrap_or_default();
        trace.csrf_token = (!csrf_token.is_empty()).then(|| csrf_token.clone());

        trace
            .record(
                "POST /api/auth/callback/credentials",
                transport,
                self.credentials_request(email, password, &csrf_token),
            )
            .await;

        let session = trace
            .record(
                "GET /api/auth/session (after sign-in)",
                transport,
                ApiRequest::get(SESSION_PATH),
            )
            .await;
        trace.user = session
            .filter(|r| r.status == 200)
            .and_then(|r| parse_session_user(&r));

        if trace.user.is_none() {
            trace
                .record("GET /api/items", transport, ApiRequest::get("/api/items"))
                .await;
            let sample = FilePart {
                field: "file".to_string(),
                file_name: "test.txt".to_string(),
                content_type: "text/plain".to_string(),
                bytes: b"test content".to_vec(),
            };
            trace
                .record(
                    "POST /api/upload",
                    transport,
                    ApiRequest::post("/api/upload").with_files(vec![sample]),
                )
                .await;
        }

        trace
    }
}

async fn fetch_csrf_token(transport: &dyn Transport) -> Result<String, AuthError> {
    let response = transport.send(ApiRequest::get(CSRF_PATH)).await?;
    if response.status != 200 {
        return Err(AuthError::TokenUnavailable(response.status));
    }

    match response.json::<CsrfToken>() {
        Ok(token) if !token.csrf_token.is_empty() => Ok(token.csrf_token),
        _ => Err(AuthError::TokenUnavailable(response.status)),
    }
}

/// Ask the session endpoint who this cookie jar belongs to
pub async fn current_user(transport: &dyn Transport) -> Result<Option<SessionUser>, TransportError> {
    let response = transport.send(ApiRequest::get(SESSION_PATH)).await?;
    if response.status != 200 {
        return Ok(None);
    }
    Ok(parse_session_user(&response))
}

/// `{"user": {...}}` yields the user; an empty body, `{}` or `null` do not
fn parse_session_user(response: &ApiResponse) -> Option<SessionUser> {
    let value = response.json_value().ok()?;
    let user = value.get("user").filter(|u| u.is_object())?;
    serde_json::from_value(user.clone()).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub label: String,
    pub outcome: Result<ApiResponse, TransportError>,
}

/// Everything the handshake saw, in order
#[derive(Debug, Clone, Default)]
pub struct HandshakeTrace {
    pub steps: Vec<TraceStep>,
    pub csrf_token: Option<String>,
    /// Every `next-auth*` cookie set on the jar at any step, in order
    pub auth_cookies: Vec<String>,
    pub user: Option<SessionUser>,
}

impl HandshakeTrace {
    pub fn established(&self) -> bool {
        self.user.is_some()
    }

    async fn record(
        &mut self,
        label: &str,
        transport: &dyn Transport,
        request: ApiRequest,
    ) -> Option<ApiResponse> {
        let outcome = transport.send(request).await;
        let response = outcome.as_ref().ok().cloned();
        if let Some(response) = &response {
            for name in &response.cookies {
                if name.to_lowercase().contains("next-auth") && !self.auth_cookies.contains(name) {
                    self.auth_cookies.push(name.clone());
                }
            }
        }
        self.steps.push(TraceStep {
            label: label.to_string(),
            outcome,
        });
        response
    }
}
