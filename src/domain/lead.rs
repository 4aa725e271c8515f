use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{
    LeadEmail, LeadId, LeadScore, LeadValue, NonEmptyString, TypeConstraintError,
};

/// Marketing channel a lead arrived through.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    #[default]
    Website,
    FacebookAds,
    GoogleAds,
    Referral,
    Events,
    Other,
}

impl LeadSource {
    pub const ALL: [LeadSource; 6] = [
        LeadSource::Website,
        LeadSource::FacebookAds,
        LeadSource::GoogleAds,
        LeadSource::Referral,
        LeadSource::Events,
        LeadSource::Other,
    ];

    /// Wire representation used by the backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            LeadSource::Website => "website",
            LeadSource::FacebookAds => "facebook_ads",
            LeadSource::GoogleAds => "google_ads",
            LeadSource::Referral => "referral",
            LeadSource::Events => "events",
            LeadSource::Other => "other",
        }
    }

    /// Human readable label for select boxes.
    pub const fn label(self) -> &'static str {
        match self {
            LeadSource::Website => "Website",
            LeadSource::FacebookAds => "Facebook Ads",
            LeadSource::GoogleAds => "Google Ads",
            LeadSource::Referral => "Referral",
            LeadSource::Events => "Events",
            LeadSource::Other => "Other",
        }
    }
}

impl Display for LeadSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadSource {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadSource::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown source `{s}`")))
    }
}

/// Position of a lead in the sales funnel.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
    Won,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Lost,
        LeadStatus::Won,
    ];

    /// Wire representation used by the backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Lost => "lost",
            LeadStatus::Won => "won",
        }
    }

    /// Human readable label for select boxes.
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Lost => "Lost",
            LeadStatus::Won => "Won",
        }
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown status `{s}`")))
    }
}

/// Lead record as returned by the backend.
///
/// This is a transient copy of server state; it is never patched locally.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: LeadId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: LeadSource,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: i32,
    #[serde(default, deserialize_with = "decimal_from_number_or_string")]
    pub lead_value: f64,
    #[serde(default, deserialize_with = "date_prefix")]
    pub last_activity_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_qualified: bool,
}

impl Lead {
    /// First and last name joined by a space, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Body of a create or update request: a lead without its identity.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LeadPayload {
    pub first_name: NonEmptyString,
    pub last_name: NonEmptyString,
    pub email: LeadEmail,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub score: LeadScore,
    pub lead_value: LeadValue,
    pub last_activity_at: Option<NaiveDate>,
    pub is_qualified: bool,
}

impl LeadPayload {
    /// Builds a payload with the required fields and defaults for the rest.
    pub fn new(first_name: NonEmptyString, last_name: NonEmptyString, email: LeadEmail) -> Self {
        Self {
            first_name,
            last_name,
            email,
            phone: None,
            company: None,
            city: None,
            state: None,
            source: LeadSource::default(),
            status: LeadStatus::default(),
            score: LeadScore::default(),
            lead_value: LeadValue::default(),
            last_activity_at: None,
            is_qualified: false,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `12.5`, `"12.50"` or `null` (decimal columns often arrive as text).
fn decimal_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDecimal {
        Number(f64),
        Text(String),
    }

    match Option::<RawDecimal>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(RawDecimal::Number(value)) => Ok(value),
        Some(RawDecimal::Text(value)) => value
            .trim()
            .parse::<f64>()
            .map_err(serde::de::Error::custom),
    }
}

/// Keeps only the date part of an ISO date or timestamp.
fn date_prefix<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let date = raw.split('T').next().unwrap_or_default().trim();
    if date.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(Some)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lead_fills_defaults_for_missing_and_null_fields() {
        let lead: Lead = serde_json::from_value(json!({
            "id": 7,
            "first_name": "Ada",
            "last_name": null,
            "email": "ada@x.com",
            "status": null,
            "lead_value": "1250.50",
            "last_activity_at": "2024-03-05T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(lead.id.as_str(), "7");
        assert_eq!(lead.last_name, "");
        assert_eq!(lead.source, LeadSource::Website);
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.score, 0);
        assert_eq!(lead.lead_value, 1250.5);
        assert_eq!(
            lead.last_activity_at,
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert!(!lead.is_qualified);
        assert_eq!(lead.full_name(), "Ada");
    }

    #[test]
    fn enums_parse_from_wire_names() {
        assert_eq!("facebook_ads".parse::<LeadSource>(), Ok(LeadSource::FacebookAds));
        assert_eq!("won".parse::<LeadStatus>(), Ok(LeadStatus::Won));
        assert!("cold".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn payload_serializes_absent_date_as_null() {
        let payload = LeadPayload::new(
            NonEmptyString::new("Ada").unwrap(),
            NonEmptyString::new("Lovelace").unwrap(),
            LeadEmail::new("ada@x.com").unwrap(),
        );

        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["last_activity_at"], serde_json::Value::Null);
        assert_eq!(value["score"], json!(0));
        assert_eq!(value["lead_value"], json!(0.0));
        assert_eq!(value["status"], json!("new"));
        assert_eq!(value["source"], json!("website"));
        assert!(value.get("id").is_none());
    }
}
