use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::domain::lead::{Lead, LeadPayload, LeadSource, LeadStatus};
use crate::domain::types::{LeadEmail, LeadScore, LeadValue, NonEmptyString};
use crate::forms::FormError;

#[derive(Clone, Debug, Deserialize, Serialize, Validate, PartialEq)]
/// Form data for creating or editing a lead. Every input arrives as text.
pub struct LeadForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub last_name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub lead_value: String,
    /// `YYYY-MM-DD` or empty.
    #[serde(default)]
    pub last_activity_at: String,
    /// Checkbox: present when ticked.
    #[serde(default, deserialize_with = "checkbox")]
    pub is_qualified: bool,
}

impl Default for LeadForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            city: String::new(),
            state: String::new(),
            source: LeadSource::default().as_str().to_string(),
            status: LeadStatus::default().as_str().to_string(),
            score: "0".to_string(),
            lead_value: "0".to_string(),
            last_activity_at: String::new(),
            is_qualified: false,
        }
    }
}

impl From<&Lead> for LeadForm {
    /// Prefills the edit form from a fetched lead.
    fn from(lead: &Lead) -> Self {
        Self {
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone().unwrap_or_default(),
            company: lead.company.clone().unwrap_or_default(),
            city: lead.city.clone().unwrap_or_default(),
            state: lead.state.clone().unwrap_or_default(),
            source: lead.source.as_str().to_string(),
            status: lead.status.as_str().to_string(),
            score: lead.score.to_string(),
            lead_value: lead.lead_value.to_string(),
            last_activity_at: lead
                .last_activity_at
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            is_qualified: lead.is_qualified,
        }
    }
}

impl TryFrom<LeadForm> for LeadPayload {
    type Error = FormError;

    /// Parses every text input into its typed counterpart.
    fn try_from(form: LeadForm) -> Result<Self, Self::Error> {
        let first_name =
            NonEmptyString::new(form.first_name).map_err(|_| FormError::MissingField("first_name"))?;
        let last_name =
            NonEmptyString::new(form.last_name).map_err(|_| FormError::MissingField("last_name"))?;
        if form.email.trim().is_empty() {
            return Err(FormError::MissingField("email"));
        }
        let email = LeadEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?;

        let source = match form.source.trim() {
            "" => LeadSource::default(),
            value => value.parse().map_err(|_| FormError::InvalidSource)?,
        };
        let status = match form.status.trim() {
            "" => LeadStatus::default(),
            value => value.parse().map_err(|_| FormError::InvalidStatus)?,
        };

        let score = parse_score(&form.score)?;
        let lead_value = parse_lead_value(&form.lead_value)?;

        let last_activity_at = match form.last_activity_at.trim() {
            "" => None,
            value => Some(
                NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FormError::InvalidDate)?,
            ),
        };

        Ok(Self {
            first_name,
            last_name,
            email,
            phone: optional(form.phone),
            company: optional(form.company),
            city: optional(form.city),
            state: optional(form.state),
            source,
            status,
            score,
            lead_value,
            last_activity_at,
            is_qualified: form.is_qualified,
        })
    }
}

fn optional(value: String) -> Option<String> {
    Some(value.trim().to_string()).filter(|s| !s.is_empty())
}

/// Integer score; fractional input is truncated, blank means zero.
fn parse_score(raw: &str) -> Result<LeadScore, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(LeadScore::default());
    }
    let value = match raw.parse::<i32>() {
        Ok(value) => value,
        Err(_) => {
            let value = raw.parse::<f64>().map_err(|_| FormError::InvalidScore)?;
            if !value.is_finite() {
                return Err(FormError::InvalidScore);
            }
            value.trunc() as i32
        }
    };
    LeadScore::new(value).map_err(|_| FormError::InvalidScore)
}

/// Decimal amount, blank means zero.
fn parse_lead_value(raw: &str) -> Result<LeadValue, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(LeadValue::default());
    }
    let value = raw.parse::<f64>().map_err(|_| FormError::InvalidLeadValue)?;
    LeadValue::new(value).map_err(|_| FormError::InvalidLeadValue)
}

fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(value.as_deref(), Some("on" | "true" | "1")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> LeadForm {
        LeadForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@x.com".into(),
            source: "referral".into(),
            ..LeadForm::default()
        }
    }

    #[test]
    fn defaults_produce_a_new_unqualified_lead() {
        let payload = LeadPayload::try_from(ada()).unwrap();

        assert_eq!(payload.first_name.as_str(), "Ada");
        assert_eq!(payload.source, LeadSource::Referral);
        assert_eq!(payload.status, LeadStatus::New);
        assert_eq!(payload.score.get(), 0);
        assert_eq!(payload.lead_value.get(), 0.0);
        assert_eq!(payload.last_activity_at, None);
        assert_eq!(payload.phone, None);
        assert!(!payload.is_qualified);
    }

    #[test]
    fn required_fields_must_not_be_blank() {
        let form = LeadForm {
            last_name: "   ".into(),
            ..ada()
        };

        assert!(matches!(
            LeadPayload::try_from(form),
            Err(FormError::MissingField("last_name"))
        ));

        let form = LeadForm {
            email: String::new(),
            ..ada()
        };

        assert!(matches!(
            LeadPayload::try_from(form),
            Err(FormError::MissingField("email"))
        ));
    }

    #[test]
    fn numbers_are_coerced() {
        let form = LeadForm {
            score: "42.9".into(),
            lead_value: "1250.75".into(),
            last_activity_at: "2024-03-05".into(),
            ..ada()
        };

        let payload = LeadPayload::try_from(form).unwrap();

        assert_eq!(payload.score.get(), 42);
        assert_eq!(payload.lead_value.get(), 1250.75);
        assert_eq!(payload.last_activity_at, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        let form = LeadForm {
            score: "101".into(),
            ..ada()
        };
        assert!(matches!(LeadPayload::try_from(form), Err(FormError::InvalidScore)));

        let form = LeadForm {
            lead_value: "-5".into(),
            ..ada()
        };
        assert!(matches!(
            LeadPayload::try_from(form),
            Err(FormError::InvalidLeadValue)
        ));
    }

    #[test]
    fn checkbox_reads_presence() {
        let form: LeadForm = serde_json::from_str(
            r#"{"first_name":"Ada","last_name":"Lovelace","email":"ada@x.com","is_qualified":"on"}"#,
        )
        .unwrap();
        assert!(form.is_qualified);

        let form: LeadForm =
            serde_json::from_str(r#"{"first_name":"Ada","last_name":"Lovelace","email":"ada@x.com"}"#)
                .unwrap();
        assert!(!form.is_qualified);
    }
}
