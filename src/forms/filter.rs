//! Filter panel form and its translation into a [`FilterDescriptor`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::filter::{
    FilterCondition, FilterDescriptor, FilterField, FilterKind, FilterValue,
};
use crate::domain::lead::{LeadSource, LeadStatus};

/// Raw values submitted from the filter panel, keyed by input name.
///
/// Numeric ranges use `<field>_operator`, `<field>_value1` and
/// `<field>_value2`; date ranges use `<field>_operator`, `<field>1` and
/// `<field>2`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FilterForm {
    fields: HashMap<String, String>,
}

impl FilterForm {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Raw value of an input, empty when it was not submitted.
    pub fn value(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or_default()
    }

    /// Builds the descriptor for the submitted values.
    ///
    /// Blank, unknown or unparsable inputs are left out rather than sent as
    /// malformed constraints.
    pub fn build(&self) -> FilterDescriptor {
        let mut descriptor = FilterDescriptor::new();

        for field in FilterField::TEXT {
            let value = self.value(field.as_str()).trim();
            if !value.is_empty() {
                descriptor.insert(field, FilterCondition::contains(value));
            }
        }

        let status = self.value(FilterField::Status.as_str()).trim();
        if let Ok(status) = status.parse::<LeadStatus>() {
            descriptor.insert(FilterField::Status, FilterCondition::equals_text(status.as_str()));
        }

        let source = self.value(FilterField::Source.as_str()).trim();
        if let Ok(source) = source.parse::<LeadSource>() {
            descriptor.insert(FilterField::Source, FilterCondition::equals_text(source.as_str()));
        }

        match self.value(FilterField::IsQualified.as_str()) {
            "true" => descriptor.insert(FilterField::IsQualified, FilterCondition::flag(true)),
            "false" => descriptor.insert(FilterField::IsQualified, FilterCondition::flag(false)),
            _ => {}
        }

        for field in FilterField::NUMERIC {
            let name = field.as_str();
            let condition = range_condition(
                self.value(&format!("{name}_operator")),
                self.value(&format!("{name}_value1")),
                self.value(&format!("{name}_value2")),
                FilterValue::parse_number,
                numeric_kind,
            );
            if let Some(condition) = condition {
                descriptor.insert(field, condition);
            }
        }

        for field in FilterField::DATE {
            let name = field.as_str();
            let condition = range_condition(
                self.value(&format!("{name}_operator")),
                self.value(&format!("{name}1")),
                self.value(&format!("{name}2")),
                FilterValue::parse_date,
                date_kind,
            );
            if let Some(condition) = condition {
                descriptor.insert(field, condition);
            }
        }

        descriptor
    }

    /// Form values that reproduce `descriptor`, used to refill the panel.
    pub fn from_descriptor(descriptor: &FilterDescriptor) -> Self {
        let mut fields = HashMap::new();

        for (field, condition) in descriptor {
            let name = field.as_str();
            let first = condition.filter.as_ref().map(ToString::to_string);
            let second = condition.filter_to.as_ref().map(ToString::to_string);

            match field {
                FilterField::IsQualified => {
                    let flag = match condition.kind {
                        FilterKind::True => "true",
                        _ => "false",
                    };
                    fields.insert(name.to_string(), flag.to_string());
                }
                FilterField::Score | FilterField::LeadValue => {
                    let operator = match condition.kind {
                        FilterKind::GreaterThan => "gt",
                        FilterKind::LessThan => "lt",
                        FilterKind::Between => "between",
                        _ => "equals",
                    };
                    fields.insert(format!("{name}_operator"), operator.to_string());
                    fields.insert(format!("{name}_value1"), first.unwrap_or_default());
                    fields.insert(format!("{name}_value2"), second.unwrap_or_default());
                }
                FilterField::CreatedAt | FilterField::LastActivityAt => {
                    let operator = match condition.kind {
                        FilterKind::Before => "before",
                        FilterKind::After => "after",
                        FilterKind::Between => "between",
                        _ => "on",
                    };
                    fields.insert(format!("{name}_operator"), operator.to_string());
                    fields.insert(format!("{name}1"), first.unwrap_or_default());
                    fields.insert(format!("{name}2"), second.unwrap_or_default());
                }
                _ => {
                    fields.insert(name.to_string(), first.unwrap_or_default());
                }
            }
        }

        Self { fields }
    }
}

/// A range input: `between` needs both bounds, otherwise the first bound is
/// used with the operator mapped by `single_kind`.
fn range_condition(
    operator: &str,
    first: &str,
    second: &str,
    parse: fn(&str) -> Option<FilterValue>,
    single_kind: fn(&str) -> FilterKind,
) -> Option<FilterCondition> {
    let first = parse(first)?;
    if operator == "between" {
        if let Some(second) = parse(second) {
            return Some(FilterCondition::between(first, second));
        }
    }
    Some(FilterCondition::single(single_kind(operator), first))
}

fn numeric_kind(operator: &str) -> FilterKind {
    match operator {
        "gt" => FilterKind::GreaterThan,
        "lt" => FilterKind::LessThan,
        _ => FilterKind::Equals,
    }
}

fn date_kind(operator: &str) -> FilterKind {
    match operator {
        "before" => FilterKind::Before,
        "after" => FilterKind::After,
        _ => FilterKind::On,
    }
}
