use std::collections::HashMap;

use serde_json::{Value, json};

use pushkind_leads::domain::filter::{FilterDescriptor, FilterField};
use pushkind_leads::domain::query::{PaginationState, QueryState};
use pushkind_leads::forms::filter::FilterForm;
use pushkind_leads::services::controller::QuerySnapshot;

fn build(pairs: &[(&str, &str)]) -> FilterDescriptor {
    let fields: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    FilterForm::new(fields).build()
}

fn json_of(descriptor: &FilterDescriptor) -> Value {
    serde_json::from_str(&descriptor.to_json().unwrap()).unwrap()
}

#[test]
fn repeated_builds_are_byte_identical() {
    let input = [
        ("city", " Boston "),
        ("company", "Acme"),
        ("status", "qualified"),
        ("score_operator", "gt"),
        ("score_value1", "40"),
        ("created_at_operator", "between"),
        ("created_at1", "2024-01-01"),
        ("created_at2", "2024-06-30"),
    ];

    let first = build(&input).to_json().unwrap();
    let second = build(&input).to_json().unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        r#"{"company":{"type":"contains","filter":"Acme"},"city":{"type":"contains","filter":"Boston"},"status":{"type":"equals","filter":"qualified"},"score":{"type":"greaterThan","filter":40},"created_at":{"type":"between","filter":"2024-01-01","filterTo":"2024-06-30"}}"#
    );
}

#[test]
fn whitespace_text_is_not_provided() {
    let descriptor = build(&[("email", "   "), ("company", "\t"), ("city", "")]);

    assert!(descriptor.is_empty());
}

#[test]
fn score_between_needs_both_bounds() {
    let both = build(&[
        ("score_operator", "between"),
        ("score_value1", "10"),
        ("score_value2", "50"),
    ]);
    assert_eq!(
        json_of(&both),
        json!({"score": {"type": "between", "filter": 10, "filterTo": 50}})
    );

    let one = build(&[("score_operator", "between"), ("score_value1", "10")]);
    assert_eq!(json_of(&one), json!({"score": {"type": "equals", "filter": 10}}));
}

#[test]
fn numeric_operators_map_to_filter_types() {
    let descriptor = build(&[
        ("score_operator", "lt"),
        ("score_value1", "30"),
        ("lead_value_operator", "gt"),
        ("lead_value_value1", "999.5"),
    ]);

    assert_eq!(
        json_of(&descriptor),
        json!({
            "score": {"type": "lessThan", "filter": 30},
            "lead_value": {"type": "greaterThan", "filter": 999.5}
        })
    );
}

#[test]
fn unparsable_numbers_are_dropped() {
    let descriptor = build(&[
        ("score_operator", "equals"),
        ("score_value1", "lots"),
        ("lead_value_operator", "gt"),
        ("lead_value_value1", "NaN"),
    ]);

    assert!(descriptor.is_empty());
}

#[test]
fn qualified_selector_is_tri_state() {
    assert!(build(&[("is_qualified", "")]).is_empty());
    assert_eq!(
        json_of(&build(&[("is_qualified", "true")])),
        json!({"is_qualified": {"type": "true"}})
    );
    assert_eq!(
        json_of(&build(&[("is_qualified", "false")])),
        json!({"is_qualified": {"type": "false"}})
    );
}

#[test]
fn dates_default_to_on() {
    let descriptor = build(&[
        ("last_activity_at_operator", "between"),
        ("last_activity_at1", "2024-03-01"),
        ("created_at_operator", "after"),
        ("created_at1", "2023-12-31"),
    ]);

    assert_eq!(
        json_of(&descriptor),
        json!({
            "created_at": {"type": "after", "filter": "2023-12-31"},
            "last_activity_at": {"type": "on", "filter": "2024-03-01"}
        })
    );
}

#[test]
fn bad_dates_are_dropped() {
    let descriptor = build(&[("created_at_operator", "on"), ("created_at1", "03/01/2024")]);

    assert_eq!(descriptor.get(FilterField::CreatedAt), None);
}

#[test]
fn city_filter_goes_on_the_wire_at_page_one() {
    let query = QueryState::default()
        .with_page(3)
        .with_filters(build(&[("city", "Boston")]));

    let pairs = query.to_query_pairs().unwrap();

    assert_eq!(
        pairs,
        vec![
            ("page", "1".to_string()),
            ("limit", "20".to_string()),
            (
                "filters",
                r#"{"city":{"type":"contains","filter":"Boston"}}"#.to_string()
            ),
        ]
    );
}

#[test]
fn refilling_the_panel_rebuilds_the_same_filters() {
    let descriptor = build(&[
        ("city", "Boston"),
        ("source", "referral"),
        ("is_qualified", "false"),
        ("lead_value_operator", "between"),
        ("lead_value_value1", "100"),
        ("lead_value_value2", "250.25"),
        ("created_at_operator", "before"),
        ("created_at1", "2024-02-29"),
    ]);

    let rebuilt = FilterForm::from_descriptor(&descriptor).build();

    assert_eq!(rebuilt, descriptor);
}

#[test]
fn saved_query_restores_the_same_request() {
    let filters = build(&[
        ("company", "2024-1-5"),
        ("city", "1999"),
        ("score_operator", "between"),
        ("score_value1", "10"),
        ("score_value2", "50.5"),
        ("last_activity_at_operator", "before"),
        ("last_activity_at1", "2024-02-29"),
        ("is_qualified", "true"),
    ]);
    let snapshot = QuerySnapshot {
        query: QueryState::default().with_filters(filters).with_page(2),
        pagination: PaginationState {
            page: 2,
            limit: 20,
            total: 45,
            total_pages: 3,
        },
    };

    let saved = serde_json::to_string(&snapshot).unwrap();
    let restored: QuerySnapshot = serde_json::from_str(&saved).unwrap();

    assert_eq!(restored, snapshot);
    assert_eq!(
        restored.query.to_query_pairs().unwrap(),
        snapshot.query.to_query_pairs().unwrap()
    );
    assert_eq!(
        json_of(&restored.query.filters)["company"],
        json!({"type": "contains", "filter": "2024-1-5"})
    );
}
