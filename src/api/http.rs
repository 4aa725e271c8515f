//! reqwest implementation of the backend traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, Method, RequestBuilder, Response, Url};

use crate::api::errors::{ApiError, ApiResult};
use crate::api::{AuthApi, LeadsApi};
use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::query::{LeadPage, QueryState};
use crate::domain::types::LeadId;
use crate::domain::user::{CurrentUser, CurrentUserResponse};

/// HTTP client for the leads backend.
///
/// Cloning is cheap; the connection pool is shared. Each visitor gets a clone
/// carrying their backend session cookie.
#[derive(Clone, Debug)]
pub struct HttpLeadsApi {
    client: Client,
    base_url: Url,
    session_cookie: Option<String>,
}

impl HttpLeadsApi {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("Invalid api url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "Invalid api url {base_url}: cannot be a base"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            session_cookie: None,
        })
    }

    /// Returns a client that forwards `name=value` as the backend session.
    pub fn with_session_cookie(&self, name: &str, value: Option<&str>) -> Self {
        Self {
            session_cookie: value.map(|value| format!("{name}={value}")),
            ..self.clone()
        }
    }

    /// Absolute URL for the given path segments, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport("Api url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        log::debug!("{method} {url}");
        let builder = self.client.request(method, url);
        match &self.session_cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }
}

#[async_trait]
impl LeadsApi for HttpLeadsApi {
    async fn list_leads(&self, query: &QueryState) -> ApiResult<LeadPage> {
        let url = self.endpoint(&["api", "leads"])?;
        let pairs = query.to_query_pairs()?;
        let response = self
            .send(self.request(Method::GET, url).query(&pairs))
            .await?;
        Ok(response.json::<LeadPage>().await?)
    }

    async fn get_lead(&self, id: &LeadId) -> ApiResult<Lead> {
        let url = self.endpoint(&["api", "leads", id.as_str()])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Ok(response.json::<Lead>().await?)
    }

    async fn create_lead(&self, lead: &LeadPayload) -> ApiResult<()> {
        let url = self.endpoint(&["api", "leads"])?;
        self.send(self.request(Method::POST, url).json(lead)).await?;
        Ok(())
    }

    async fn update_lead(&self, id: &LeadId, lead: &LeadPayload) -> ApiResult<()> {
        let url = self.endpoint(&["api", "leads", id.as_str()])?;
        self.send(self.request(Method::PUT, url).json(lead)).await?;
        Ok(())
    }

    async fn delete_lead(&self, id: &LeadId) -> ApiResult<()> {
        let url = self.endpoint(&["api", "leads", id.as_str()])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for HttpLeadsApi {
    async fn current_user(&self) -> ApiResult<CurrentUser> {
        let url = self.endpoint(&["api", "auth", "me"])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Ok(response.json::<CurrentUserResponse>().await?.user)
    }

    async fn logout(&self) -> ApiResult<()> {
        let url = self.endpoint(&["api", "auth", "logout"])?;
        self.send(self.request(Method::POST, url)).await?;
        Ok(())
    }
}
