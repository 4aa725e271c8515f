use validator::Validate;

use crate::api::LeadsApi;
use crate::domain::lead::{Lead, LeadPayload};
use crate::domain::types::LeadId;
use crate::forms::FormError;
use crate::forms::lead::LeadForm;
use crate::services::{ServiceError, ServiceResult};

pub const CREATE_FAILED_MESSAGE: &str = "Failed to create lead";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update lead";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch lead details";

fn parse_id(id: &str) -> ServiceResult<LeadId> {
    LeadId::new(id).map_err(|_| ServiceError::Validation("Invalid lead ID".to_string()))
}

/// Validates the form and converts it into the request body.
fn validated_payload(form: LeadForm) -> ServiceResult<LeadPayload> {
    let validation = form.validate();
    let payload = LeadPayload::try_from(form)?;
    if let Err(err) = validation {
        log::error!("Failed to validate lead form: {err}");
        return Err(FormError::from(err).into());
    }
    Ok(payload)
}

/// Fetches a lead to prefill the edit form.
pub async fn load_lead<A>(api: &A, id: &str) -> ServiceResult<Lead>
where
    A: LeadsApi + ?Sized,
{
    let id = parse_id(id)?;
    api.get_lead(&id).await.map_err(|err| {
        log::error!("Failed to fetch lead {id}: {err}");
        ServiceError::from(err)
    })
}

/// Creates a lead from the submitted form.
pub async fn create_lead<A>(api: &A, form: LeadForm) -> ServiceResult<()>
where
    A: LeadsApi + ?Sized,
{
    let payload = validated_payload(form)?;

    api.create_lead(&payload).await.map_err(|err| {
        log::error!("Failed to create lead: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Created lead {}", payload.email);
    Ok(())
}

/// Replaces the lead `id` with the submitted form.
pub async fn update_lead<A>(api: &A, id: &str, form: LeadForm) -> ServiceResult<()>
where
    A: LeadsApi + ?Sized,
{
    let id = parse_id(id)?;
    let payload = validated_payload(form)?;

    api.update_lead(&id, &payload).await.map_err(|err| {
        log::error!("Failed to update lead {id}: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Updated lead {id}");
    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::api::errors::ApiError;
    use crate::api::mock::MockLeadsApi;
    use crate::domain::lead::{LeadSource, LeadStatus};

    fn ada() -> LeadForm {
        LeadForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@x.com".into(),
            source: "referral".into(),
            ..LeadForm::default()
        }
    }

    #[tokio::test]
    async fn create_sends_typed_payload() {
        let mut api = MockLeadsApi::new();
        api.expect_create_lead()
            .withf(|payload| {
                payload.first_name.as_str() == "Ada"
                    && payload.source == LeadSource::Referral
                    && payload.status == LeadStatus::New
                    && payload.score.get() == 0
                    && payload.last_activity_at.is_none()
            })
            .times(1)
            .returning(|_| Ok(()));

        create_lead(&api, ada()).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_form_is_never_sent() {
        let mut api = MockLeadsApi::new();
        api.expect_create_lead().times(0);
        let form = LeadForm {
            first_name: " ".into(),
            ..ada()
        };

        let result = create_lead(&api, form).await;

        match result {
            Err(err @ ServiceError::Validation(_)) => {
                assert_eq!(err.message_or(CREATE_FAILED_MESSAGE), "first_name is required");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_message_is_surfaced_verbatim() {
        let mut api = MockLeadsApi::new();
        api.expect_update_lead().times(1).returning(|_, _| {
            Err(ApiError::ServerReported {
                status: 409,
                message: "Email already exists".into(),
            })
        });

        let err = update_lead(&api, "7", ada()).await.unwrap_err();

        assert_eq!(err.message_or(UPDATE_FAILED_MESSAGE), "Email already exists");
    }

    #[tokio::test]
    async fn transport_failure_falls_back_to_generic_message() {
        let mut api = MockLeadsApi::new();
        api.expect_create_lead()
            .times(1)
            .returning(|_| Err(ApiError::Transport("connection reset".into())));

        let err = create_lead(&api, ada()).await.unwrap_err();

        assert_eq!(err.message_or(CREATE_FAILED_MESSAGE), CREATE_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn missing_lead_is_not_found() {
        let mut api = MockLeadsApi::new();
        api.expect_get_lead()
            .withf(|id| id.as_str() == "99")
            .times(1)
            .returning(|_| Err(ApiError::NotFound));

        let result = load_lead(&api, "99").await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
