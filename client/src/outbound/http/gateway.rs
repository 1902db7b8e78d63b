//! Reqwest-backed LoanFlow backend adapter.
//!
//! One adapter implements every backend port. It owns transport details
//! only: URL building, bearer attachment, timeouts, status mapping, and JSON
//! decoding.

use std::time::Duration;

use async_trait::async_trait;
use pagination::ListPayload;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{ActiveUpdateDto, ApplyLoanDto, CredentialsDto, ErrorBodyDto, RoleUpdateDto};
use crate::domain::ports::{AdminApi, AuthApi, GatewayError, LoanApi};
use crate::domain::{
    AdminMetrics, AdminUser, LoanApplicationInput, LoanId, LoanQuery, LoanRecord,
    LoginCredentials, LoginResponse, Role, SessionContext, SignupRequest, UserId,
};

/// Backend adapter performing HTTP requests relative to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
    session: SessionContext,
}

impl HttpGateway {
    /// Build an adapter with an explicit request timeout.
    ///
    /// `base` is treated as a directory: a missing trailing slash is added
    /// so relative endpoint paths resolve beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration, session: SessionContext) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
            session,
        })
    }

    /// API base URL requests are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, GatewayError> {
        let url = self
            .base
            .join(path)
            .map_err(|err| GatewayError::transport(format!("invalid endpoint '{path}': {err}")))?;
        let token = self
            .session
            .bearer_token()
            .map_err(|err| GatewayError::session(err.to_string()))?;

        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn dispatch(&self, builder: RequestBuilder, path: &str) -> Result<Vec<u8>, GatewayError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(path, status = status.as_u16(), bytes = body.len(), "backend responded");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<T, GatewayError> {
        let body = self.dispatch(builder, path).await?;
        decode(&body)
    }
}

#[async_trait]
impl AuthApi for HttpGateway {
    async fn register(&self, request: &SignupRequest) -> Result<(), GatewayError> {
        const PATH: &str = "auth/register";
        let builder = self.request(Method::POST, PATH)?.json(&CredentialsDto {
            username: request.username(),
            password: request.password(),
        });
        // success body is a plain-text confirmation
        self.dispatch(builder, PATH).await.map(|_| ())
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, GatewayError> {
        const PATH: &str = "auth/login";
        let builder = self.request(Method::POST, PATH)?.json(&CredentialsDto {
            username: credentials.username(),
            password: credentials.password(),
        });
        self.fetch(builder, PATH).await
    }
}

#[async_trait]
impl LoanApi for HttpGateway {
    async fn apply(&self, input: &LoanApplicationInput) -> Result<LoanRecord, GatewayError> {
        const PATH: &str = "loans/apply";
        let builder = self
            .request(Method::POST, PATH)?
            .json(&ApplyLoanDto::from(input));
        self.fetch(builder, PATH).await
    }

    async fn list(&self, query: &LoanQuery) -> Result<Vec<LoanRecord>, GatewayError> {
        const PATH: &str = "loans";
        let builder = self
            .request(Method::GET, PATH)?
            .query(&query.query_pairs());
        let body = self.dispatch(builder, PATH).await?;
        let payload = ListPayload::<LoanRecord>::from_json_slice(&body)
            .map_err(|err| GatewayError::decode(err.to_string()))?;
        Ok(payload.into_items())
    }

    async fn approve(&self, id: LoanId) -> Result<LoanRecord, GatewayError> {
        let path = format!("loans/{id}/approve");
        let builder = self.request(Method::PATCH, &path)?;
        self.fetch(builder, &path).await
    }

    async fn reject(&self, id: LoanId) -> Result<LoanRecord, GatewayError> {
        let path = format!("loans/{id}/reject");
        let builder = self.request(Method::PATCH, &path)?;
        self.fetch(builder, &path).await
    }
}

#[async_trait]
impl AdminApi for HttpGateway {
    async fn metrics(&self) -> Result<AdminMetrics, GatewayError> {
        const PATH: &str = "admin/metrics";
        let builder = self.request(Method::GET, PATH)?;
        self.fetch(builder, PATH).await
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<AdminUser>, GatewayError> {
        const PATH: &str = "admin/users";
        let mut builder = self.request(Method::GET, PATH)?;
        if let Some(role) = role {
            builder = builder.query(&[("role", role.as_str())]);
        }
        self.fetch(builder, PATH).await
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<AdminUser, GatewayError> {
        let path = format!("admin/users/{id}/role");
        let builder = self
            .request(Method::PUT, &path)?
            .json(&RoleUpdateDto { role });
        self.fetch(builder, &path).await
    }

    async fn update_active(&self, id: UserId, active: bool) -> Result<AdminUser, GatewayError> {
        let path = format!("admin/users/{id}/active");
        let builder = self
            .request(Method::PUT, &path)?
            .json(&ActiveUpdateDto { active });
        self.fetch(builder, &path).await
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|err| {
        GatewayError::decode(format!("{err} (body: {})", body_preview(body)))
    })
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let message = match ErrorBodyDto::parse(body) {
        ErrorBodyDto::Text(text) if status != StatusCode::UNAUTHORIZED => {
            return GatewayError::rejected_text(status.as_u16(), text);
        }
        ErrorBodyDto::Json(message) => message.unwrap_or_default(),
        ErrorBodyDto::Text(_) | ErrorBodyDto::Empty => String::new(),
    };
    if status == StatusCode::UNAUTHORIZED {
        GatewayError::unauthorized(message)
    } else {
        GatewayError::rejected(status.as_u16(), message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
