//! Boundary to the leads backend.
//!
//! Services and the query controller only see these traits; the reqwest
//! implementation lives in [`http`] and mocks in `mock` (feature
//! `test-mocks`).

use async_trait::async_trait;

use crate::api::errors::ApiResult;
use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::query::{LeadPage, QueryState};
use crate::domain::types::LeadId;
use crate::domain::user::CurrentUser;

pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

#[async_trait]
pub trait LeadsApi: Send + Sync {
    /// `GET /api/leads` for one page.
    async fn list_leads(&self, query: &QueryState) -> ApiResult<LeadPage>;
    async fn get_lead(&self, id: &LeadId) -> ApiResult<Lead>;
    async fn create_lead(&self, lead: &LeadPayload) -> ApiResult<()>;
    async fn update_lead(&self, id: &LeadId, lead: &LeadPayload) -> ApiResult<()>;
    async fn delete_lead(&self, id: &LeadId) -> ApiResult<()>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn current_user(&self) -> ApiResult<CurrentUser>;
    async fn logout(&self) -> ApiResult<()>;
}
