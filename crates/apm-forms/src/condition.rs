//! Conditional display logic

use crate::value::{FieldValue, FormValues};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a single condition
///
/// Unknown operator names are preserved and evaluate as satisfied, so a
/// rule this engine does not understand never hides a field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
    In,
    NotIn,
    Other(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not_equals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "not_contains",
            ConditionOperator::StartsWith => "starts_with",
            ConditionOperator::EndsWith => "ends_with",
            ConditionOperator::GreaterThan => "greater_than",
            ConditionOperator::LessThan => "less_than",
            ConditionOperator::IsEmpty => "is_empty",
            ConditionOperator::IsNotEmpty => "is_not_empty",
            ConditionOperator::In => "in",
            ConditionOperator::NotIn => "not_in",
            ConditionOperator::Other(name) => name,
        }
    }
}

impl From<String> for ConditionOperator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => ConditionOperator::Equals,
            "not_equals" => ConditionOperator::NotEquals,
            "contains" => ConditionOperator::Contains,
            "not_contains" => ConditionOperator::NotContains,
            "starts_with" => ConditionOperator::StartsWith,
            "ends_with" => ConditionOperator::EndsWith,
            "greater_than" => ConditionOperator::GreaterThan,
            "less_than" => ConditionOperator::LessThan,
            "is_empty" => ConditionOperator::IsEmpty,
            "is_not_empty" => ConditionOperator::IsNotEmpty,
            "in" => ConditionOperator::In,
            "not_in" => ConditionOperator::NotIn,
            _ => ConditionOperator::Other(name),
        }
    }
}

impl From<&str> for ConditionOperator {
    fn from(name: &str) -> Self {
        ConditionOperator::from(name.to_string())
    }
}

impl From<ConditionOperator> for String {
    fn from(operator: ConditionOperator) -> Self {
        match operator {
            ConditionOperator::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a condition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Text(String),
    Number(#[serde(serialize_with = "crate::value::serialize_number")] f64),
    List(Vec<String>),
}

impl From<&str> for ConditionValue {
    fn from(text: &str) -> Self {
        ConditionValue::Text(text.to_string())
    }
}

impl From<f64> for ConditionValue {
    fn from(n: f64) -> Self {
        ConditionValue::Number(n)
    }
}

impl From<Vec<&str>> for ConditionValue {
    fn from(items: Vec<&str>) -> Self {
        ConditionValue::List(items.into_iter().map(String::from).collect())
    }
}

/// Predicate over another field's current value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    /// Id of the field being inspected
    pub field: String,
    pub operator: ConditionOperator,
    /// Absent for `is_empty` / `is_not_empty`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConditionValue>,
}

impl FieldCondition {
    pub fn new(field: impl Into<String>, operator: impl Into<ConditionOperator>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<ConditionValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// How a display rule combines its conditions
///
/// Anything other than `and` combines with OR. Unrecognized names are kept
/// in [`ConditionLogic::Other`] so they are written back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionLogic {
    #[default]
    And,
    Or,
    Other(String),
}

impl ConditionLogic {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionLogic::And => "and",
            ConditionLogic::Or => "or",
            ConditionLogic::Other(name) => name,
        }
    }
}

impl From<String> for ConditionLogic {
    fn from(name: String) -> Self {
        match name.as_str() {
            "and" => ConditionLogic::And,
            "or" => ConditionLogic::Or,
            _ => ConditionLogic::Other(name),
        }
    }
}

impl From<ConditionLogic> for String {
    fn from(logic: ConditionLogic) -> Self {
        match logic {
            ConditionLogic::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Show/hide rule attached to a field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionalDisplay {
    /// `true`: visible when the conditions hold. `false`: hidden when they hold.
    pub show: bool,
    #[serde(default)]
    pub logic: ConditionLogic,
    #[serde(default)]
    pub conditions: Vec<FieldCondition>,
}

impl ConditionalDisplay {
    pub fn show_when(logic: ConditionLogic, conditions: Vec<FieldCondition>) -> Self {
        Self {
            show: true,
            logic,
            conditions,
        }
    }

    pub fn hide_when(logic: ConditionLogic, conditions: Vec<FieldCondition>) -> Self {
        Self {
            show: false,
            logic,
            conditions,
        }
    }
}

/// Evaluate one condition against the current values
pub fn evaluate_condition(condition: &FieldCondition, values: &FormValues) -> bool {
    let actual = values.get(&condition.field);
    let expected = condition.value.as_ref();

    match &condition.operator {
        ConditionOperator::Equals => strictly_equal(actual, expected),
        ConditionOperator::NotEquals => !strictly_equal(actual, expected),
        ConditionOperator::Contains => contains(actual, expected).unwrap_or(false),
        ConditionOperator::NotContains => contains(actual, expected).map_or(true, |hit| !hit),
        ConditionOperator::StartsWith => text_pair(actual, expected)
            .map_or(false, |(a, b)| a.to_lowercase().starts_with(&b.to_lowercase())),
        ConditionOperator::EndsWith => text_pair(actual, expected)
            .map_or(false, |(a, b)| a.to_lowercase().ends_with(&b.to_lowercase())),
        ConditionOperator::GreaterThan => number_pair(actual, expected).map_or(false, |(a, b)| a > b),
        ConditionOperator::LessThan => number_pair(actual, expected).map_or(false, |(a, b)| a < b),
        ConditionOperator::IsEmpty => is_blank(actual),
        ConditionOperator::IsNotEmpty => !is_blank(actual),
        ConditionOperator::In => match expected {
            Some(ConditionValue::List(set)) => member_of(actual, set),
            _ => false,
        },
        ConditionOperator::NotIn => match expected {
            Some(ConditionValue::List(set)) => !member_of(actual, set),
            _ => false,
        },
        ConditionOperator::Other(name) => {
            tracing::debug!(operator = %name, field = %condition.field, "unknown condition operator treated as satisfied");
            true
        }
    }
}

/// Combine a display rule's conditions and apply its polarity
pub fn evaluate_display(display: &ConditionalDisplay, values: &FormValues) -> bool {
    if display.conditions.is_empty() {
        return display.show;
    }

    let mut results = display
        .conditions
        .iter()
        .map(|condition| evaluate_condition(condition, values));
    let met = match &display.logic {
        ConditionLogic::And => results.all(|r| r),
        ConditionLogic::Or | ConditionLogic::Other(_) => results.any(|r| r),
    };

    if display.show {
        met
    } else {
        !met
    }
}

fn is_blank(actual: Option<&FieldValue>) -> bool {
    actual.map_or(true, FieldValue::is_empty)
}

// Same-shape comparison only; a missing value equals a missing comparand.
fn strictly_equal(actual: Option<&FieldValue>, expected: Option<&ConditionValue>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(FieldValue::Text(a)), Some(ConditionValue::Text(b))) => a == b,
        (Some(FieldValue::Number(a)), Some(ConditionValue::Number(b))) => a == b,
        (Some(FieldValue::List(a)), Some(ConditionValue::List(b))) => a == b,
        _ => false,
    }
}

// None when the operand shapes do not support a containment test.
fn contains(actual: Option<&FieldValue>, expected: Option<&ConditionValue>) -> Option<bool> {
    match (actual?, expected?) {
        (FieldValue::Text(haystack), ConditionValue::Text(needle)) => {
            Some(haystack.to_lowercase().contains(&needle.to_lowercase()))
        }
        (FieldValue::List(items), ConditionValue::Text(needle)) => {
            Some(items.iter().any(|item| item == needle))
        }
        _ => None,
    }
}

fn text_pair<'a>(
    actual: Option<&'a FieldValue>,
    expected: Option<&'a ConditionValue>,
) -> Option<(&'a str, &'a str)> {
    match (actual?, expected?) {
        (FieldValue::Text(a), ConditionValue::Text(b)) => Some((a, b)),
        _ => None,
    }
}

fn number_pair(actual: Option<&FieldValue>, expected: Option<&ConditionValue>) -> Option<(f64, f64)> {
    match (actual?, expected?) {
        (FieldValue::Number(a), ConditionValue::Number(b)) => Some((*a, *b)),
        _ => None,
    }
}

fn member_of(actual: Option<&FieldValue>, set: &[String]) -> bool {
    actual
        .and_then(FieldValue::as_text)
        .map_or(false, |value| set.iter().any(|s| s == value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(operator: &str, value: Option<ConditionValue>, values: &FormValues) -> bool {
        let condition = FieldCondition {
            field: "x".into(),
            operator: operator.into(),
            value,
        };
        evaluate_condition(&condition, values)
    }

    fn with_x(value: impl Into<FieldValue>) -> FormValues {
        FormValues::new().with("x", value)
    }

    #[test]
    fn test_equals_is_shape_strict() {
        let values = with_x("ya");
        assert!(check("equals", Some("ya".into()), &values));
        assert!(!check("equals", Some("YA".into()), &values));
        assert!(check("not_equals", Some("tidak".into()), &values));
        assert!(!check("equals", Some(1.0.into()), &with_x("1")));
        assert!(check("equals", None, &FormValues::new()));
    }

    #[test]
    fn test_contains_variants() {
        assert!(check("contains", Some("BOT".into()), &with_x("Robotik")));
        assert!(check("contains", Some("ai".into()), &with_x(vec!["ai", "iot"])));
        assert!(!check("contains", Some("AI".into()), &with_x(vec!["ai"])));
        assert!(!check("contains", Some("1".into()), &with_x(1)));
        assert!(check("not_contains", Some("1".into()), &with_x(1)));
        assert!(check("not_contains", Some("x".into()), &FormValues::new()));
    }

    #[test]
    fn test_prefix_suffix_case_insensitive() {
        let values = with_x("Teknik Informatika");
        assert!(check("starts_with", Some("teknik".into()), &values));
        assert!(check("ends_with", Some("MATIKA".into()), &values));
        assert!(!check("starts_with", Some(3.0.into()), &values));
    }

    #[test]
    fn test_numeric_comparison() {
        assert!(check("greater_than", Some(3.0.into()), &with_x(5)));
        assert!(!check("greater_than", Some(3.0.into()), &with_x("5")));
        assert!(check("less_than", Some(3.0.into()), &with_x(2)));
    }

    #[test]
    fn test_emptiness() {
        assert!(check("is_empty", None, &with_x("")));
        assert!(check("is_empty", None, &FormValues::new()));
        assert!(check("is_empty", None, &with_x(Vec::<String>::new())));
        assert!(!check("is_empty", None, &with_x("0")));
        assert!(!check("is_empty", None, &with_x(0)));
        assert!(!check("is_empty", None, &with_x(false)));
        assert!(!check("is_empty", None, &with_x(vec!["x"])));
        assert!(check("is_not_empty", None, &with_x(vec!["x"])));
    }

    #[test]
    fn test_set_membership() {
        let set = Some(ConditionValue::from(vec!["ft", "fk"]));
        assert!(check("in", set.clone(), &with_x("ft")));
        assert!(!check("in", set.clone(), &with_x("fh")));
        assert!(check("not_in", set.clone(), &with_x("fh")));
        assert!(!check("not_in", Some("ft".into()), &with_x("fh")));
        assert!(!check("in", Some("ft".into()), &with_x("ft")));
    }

    #[test]
    fn test_unknown_operator_is_satisfied() {
        assert!(check("flibbertigibbet", None, &FormValues::new()));
    }

    #[test]
    fn test_display_polarity() {
        let values = with_x("ya");
        let hit = FieldCondition::new("x", "equals").with_value("ya");
        let miss = FieldCondition::new("x", "equals").with_value("tidak");

        let and = ConditionalDisplay::show_when(ConditionLogic::And, vec![hit.clone(), miss.clone()]);
        let or = ConditionalDisplay::show_when(ConditionLogic::Or, vec![hit.clone(), miss.clone()]);
        assert!(!evaluate_display(&and, &values));
        assert!(evaluate_display(&or, &values));

        let hide = ConditionalDisplay::hide_when(ConditionLogic::And, vec![hit]);
        assert!(!evaluate_display(&hide, &values));

        let static_hidden = ConditionalDisplay::hide_when(ConditionLogic::And, vec![]);
        assert!(!evaluate_display(&static_hidden, &values));
    }

    #[test]
    fn test_unrecognized_logic_combines_with_or() {
        let display: ConditionalDisplay = serde_json::from_str(
            r#"{"show":true,"logic":"xor","conditions":[
                {"field":"x","operator":"equals","value":"ya"},
                {"field":"x","operator":"equals","value":"tidak"}]}"#,
        )
        .unwrap();
        assert_eq!(display.logic, ConditionLogic::Other("xor".into()));
        assert!(evaluate_display(&display, &with_x("ya")));

        let encoded = serde_json::to_value(&display).unwrap();
        assert_eq!(encoded["logic"], "xor");
    }

    #[test]
    fn test_equals_compares_lists_by_content() {
        let values = with_x(vec!["ai", "iot"]);
        assert!(check("equals", Some(vec!["ai", "iot"].into()), &values));
        assert!(!check("equals", Some(vec!["iot", "ai"].into()), &values));
        assert!(!check("not_equals", Some(vec!["ai", "iot"].into()), &values));
    }
}
