//! Field-keyed filter descriptors sent to the lead list endpoint.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Lead fields the list endpoint accepts constraints for.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Email,
    Company,
    City,
    Status,
    Source,
    IsQualified,
    Score,
    LeadValue,
    CreatedAt,
    LastActivityAt,
}

impl FilterField {
    pub const TEXT: [FilterField; 3] = [FilterField::Email, FilterField::Company, FilterField::City];
    pub const ENUM: [FilterField; 2] = [FilterField::Status, FilterField::Source];
    pub const NUMERIC: [FilterField; 2] = [FilterField::Score, FilterField::LeadValue];
    pub const DATE: [FilterField; 2] = [FilterField::CreatedAt, FilterField::LastActivityAt];

    /// Field name as used on the wire and in form keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            FilterField::Email => "email",
            FilterField::Company => "company",
            FilterField::City => "city",
            FilterField::Status => "status",
            FilterField::Source => "source",
            FilterField::IsQualified => "is_qualified",
            FilterField::Score => "score",
            FilterField::LeadValue => "lead_value",
            FilterField::CreatedAt => "created_at",
            FilterField::LastActivityAt => "last_activity_at",
        }
    }
}

impl Display for FilterField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied by a single filter condition.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    Contains,
    Equals,
    GreaterThan,
    LessThan,
    Between,
    True,
    False,
    Before,
    After,
    On,
}

impl FilterKind {
    fn describe(self) -> &'static str {
        match self {
            FilterKind::Contains => "contains",
            FilterKind::Equals => "=",
            FilterKind::GreaterThan => ">",
            FilterKind::LessThan => "<",
            FilterKind::Between => "between",
            FilterKind::True => "is yes",
            FilterKind::False => "is no",
            FilterKind::Before => "before",
            FilterKind::After => "after",
            FilterKind::On => "on",
        }
    }
}

/// Typed operand of a filter condition.
///
/// Serialized untagged. Reading one back needs the field it belongs to, so
/// deserialization goes through [`FilterDescriptor`].
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FilterValue {
    Number(Number),
    Date(NaiveDate),
    Text(String),
}

impl FilterValue {
    /// Parses a finite number, keeping integral input as a JSON integer.
    pub fn parse_number(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(value) = raw.parse::<i64>() {
            return Some(FilterValue::Number(value.into()));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(FilterValue::Number)
    }

    /// Parses an ISO `YYYY-MM-DD` date.
    pub fn parse_date(raw: &str) -> Option<Self> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .ok()
            .map(FilterValue::Date)
    }
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Number(number) => write!(f, "{number}"),
            FilterValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            FilterValue::Text(text) => f.write_str(text),
        }
    }
}

/// One `{type, filter, filterTo}` constraint.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FilterCondition {
    #[serde(rename = "type")]
    pub kind: FilterKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterValue>,
    #[serde(rename = "filterTo", skip_serializing_if = "Option::is_none")]
    pub filter_to: Option<FilterValue>,
}

impl FilterCondition {
    /// Condition with a single operand.
    pub fn single(kind: FilterKind, value: FilterValue) -> Self {
        Self {
            kind,
            filter: Some(value),
            filter_to: None,
        }
    }

    /// Inclusive range condition.
    pub fn between(from: FilterValue, to: FilterValue) -> Self {
        Self {
            kind: FilterKind::Between,
            filter: Some(from),
            filter_to: Some(to),
        }
    }

    /// Substring match on a text field.
    pub fn contains(text: impl Into<String>) -> Self {
        Self::single(FilterKind::Contains, FilterValue::Text(text.into()))
    }

    /// Exact match on an enum field.
    pub fn equals_text(text: impl Into<String>) -> Self {
        Self::single(FilterKind::Equals, FilterValue::Text(text.into()))
    }

    /// Boolean presence filter, carries no operand.
    pub fn flag(value: bool) -> Self {
        Self {
            kind: if value {
                FilterKind::True
            } else {
                FilterKind::False
            },
            filter: None,
            filter_to: None,
        }
    }
}

/// Normalized constraint map; a field appears at most once.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FilterDescriptor(BTreeMap<FilterField, FilterCondition>);

/// A condition as read from JSON, before its operands are typed.
#[derive(Deserialize)]
struct RawCondition {
    #[serde(rename = "type")]
    kind: FilterKind,
    #[serde(default)]
    filter: Option<Value>,
    #[serde(rename = "filterTo", default)]
    filter_to: Option<Value>,
}

/// Types `raw` by the kind of `field`: numbers for numeric ranges, dates for
/// date ranges, text for everything else.
fn typed_operand<E: de::Error>(field: FilterField, raw: Value) -> Result<FilterValue, E> {
    let value = match (field, raw) {
        (FilterField::Score | FilterField::LeadValue, Value::Number(number)) => {
            Some(FilterValue::Number(number))
        }
        (FilterField::CreatedAt | FilterField::LastActivityAt, Value::String(text)) => {
            FilterValue::parse_date(&text)
        }
        (
            FilterField::Score
            | FilterField::LeadValue
            | FilterField::CreatedAt
            | FilterField::LastActivityAt,
            _,
        ) => None,
        (_, Value::String(text)) => Some(FilterValue::Text(text)),
        _ => None,
    };
    value.ok_or_else(|| E::custom(format!("invalid operand for filter field {field}")))
}

impl<'de> Deserialize<'de> for FilterDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<FilterField, RawCondition>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(field, condition)| {
                let filter = condition
                    .filter
                    .map(|value| typed_operand::<D::Error>(field, value))
                    .transpose()?;
                let filter_to = condition
                    .filter_to
                    .map(|value| typed_operand::<D::Error>(field, value))
                    .transpose()?;
                Ok((
                    field,
                    FilterCondition {
                        kind: condition.kind,
                        filter,
                        filter_to,
                    },
                ))
            })
            .collect()
    }
}

impl FilterDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the constraint for `field`, replacing any previous one.
    pub fn insert(&mut self, field: FilterField, condition: FilterCondition) {
        self.0.insert(field, condition);
    }

    pub fn get(&self, field: FilterField) -> Option<&FilterCondition> {
        self.0.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FilterField, FilterCondition> {
        self.0.iter()
    }

    /// JSON form used for the `filters` query parameter.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Short human readable description of every active constraint.
    pub fn summary(&self) -> Vec<String> {
        self.iter()
            .map(|(field, condition)| {
                let mut line = format!("{field} {}", condition.kind.describe());
                if let Some(value) = &condition.filter {
                    line.push_str(&format!(" {value}"));
                }
                if let Some(to) = &condition.filter_to {
                    line.push_str(&format!(" and {to}"));
                }
                line
            })
            .collect()
    }
}

impl FromIterator<(FilterField, FilterCondition)> for FilterDescriptor {
    fn from_iter<I: IntoIterator<Item = (FilterField, FilterCondition)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FilterDescriptor {
    type Item = (&'a FilterField, &'a FilterCondition);
    type IntoIter = btree_map::Iter<'a, FilterField, FilterCondition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_wire_shape() {
        let descriptor: FilterDescriptor = [
            (FilterField::City, FilterCondition::contains("Boston")),
            (FilterField::IsQualified, FilterCondition::flag(true)),
            (
                FilterField::Score,
                FilterCondition::between(
                    FilterValue::parse_number("10").unwrap(),
                    FilterValue::parse_number("50").unwrap(),
                ),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            descriptor.to_json().unwrap(),
            r#"{"city":{"type":"contains","filter":"Boston"},"is_qualified":{"type":"true"},"score":{"type":"between","filter":10,"filterTo":50}}"#
        );
    }

    #[test]
    fn descriptor_survives_json_round_trip() {
        let mut descriptor = FilterDescriptor::new();
        descriptor.insert(
            FilterField::CreatedAt,
            FilterCondition::single(
                FilterKind::Before,
                FilterValue::parse_date("2024-01-31").unwrap(),
            ),
        );
        descriptor.insert(
            FilterField::LeadValue,
            FilterCondition::single(
                FilterKind::GreaterThan,
                FilterValue::parse_number("99.5").unwrap(),
            ),
        );

        let json = descriptor.to_json().unwrap();
        let restored: FilterDescriptor = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, descriptor);
    }

    #[test]
    fn date_like_text_stays_text() {
        let mut descriptor = FilterDescriptor::new();
        descriptor.insert(FilterField::Company, FilterCondition::contains("2024-1-5"));
        descriptor.insert(FilterField::City, FilterCondition::contains("42"));
        descriptor.insert(FilterField::Status, FilterCondition::equals_text("new"));

        let json = descriptor.to_json().unwrap();
        let restored: FilterDescriptor = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, descriptor);
        assert_eq!(restored.to_json().unwrap(), json);
    }

    #[test]
    fn mistyped_operands_are_rejected() {
        for json in [
            r#"{"score":{"type":"equals","filter":"10"}}"#,
            r#"{"created_at":{"type":"on","filter":"yesterday"}}"#,
            r#"{"city":{"type":"contains","filter":7}}"#,
        ] {
            assert!(serde_json::from_str::<FilterDescriptor>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn number_parsing_rejects_garbage() {
        assert_eq!(FilterValue::parse_number("abc"), None);
        assert_eq!(FilterValue::parse_number(""), None);
        assert_eq!(FilterValue::parse_number("NaN"), None);
        assert_eq!(FilterValue::parse_number("inf"), None);
        assert_eq!(
            FilterValue::parse_number(" 7 "),
            Some(FilterValue::Number(7.into()))
        );
    }

    #[test]
    fn summary_lists_active_constraints() {
        let mut descriptor = FilterDescriptor::new();
        descriptor.insert(FilterField::City, FilterCondition::contains("Boston"));
        descriptor.insert(FilterField::IsQualified, FilterCondition::flag(false));

        assert_eq!(
            descriptor.summary(),
            vec!["city contains Boston".to_string(), "is_qualified is no".to_string()]
        );
    }
}
