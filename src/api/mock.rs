//! Mock backend implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::api::errors::ApiResult;
use crate::api::{AuthApi, LeadsApi};
use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::query::{LeadPage, QueryState};
use crate::domain::types::LeadId;
use crate::domain::user::CurrentUser;

mock! {
    pub LeadsApi {}

    #[async_trait]
    impl LeadsApi for LeadsApi {
        async fn list_leads(&self, query: &QueryState) -> ApiResult<LeadPage>;
        async fn get_lead(&self, id: &LeadId) -> ApiResult<Lead>;
        async fn create_lead(&self, lead: &LeadPayload) -> ApiResult<()>;
        async fn update_lead(&self, id: &LeadId, lead: &LeadPayload) -> ApiResult<()>;
        async fn delete_lead(&self, id: &LeadId) -> ApiResult<()>;
    }
}

mock! {
    pub AuthApi {}

    #[async_trait]
    impl AuthApi for AuthApi {
        async fn current_user(&self) -> ApiResult<CurrentUser>;
        async fn logout(&self) -> ApiResult<()>;
    }
}
