//! Per-type constraint builders
//!
//! Each field type maps to one builder in [`rule_builder`]. A builder turns a
//! field definition into the value shape it expects plus an ordered list of
//! rules. Adding a field type means adding a variant and one arm there.
//!
//! Builders never fail. A definition mistake (no options on a select, a
//! pattern that does not compile) degrades that one field to a permissive
//! check and is logged.

use crate::field::{FieldDefinition, FieldType, FieldValidation};
use crate::value::FieldValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9+]+$").expect("static phone regex"))
}

/// Value shape a field accepts before any rule runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Text,
    Number,
    List,
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Temporal {
    Date,
    Time,
    DateTime,
}

impl Temporal {
    /// Parseability only; no timezone normalization
    fn parses(&self, raw: &str) -> bool {
        match self {
            Temporal::Date => {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
                    || DateTime::parse_from_rfc3339(raw).is_ok()
            }
            Temporal::Time => ["%H:%M", "%H:%M:%S"]
                .iter()
                .any(|format| NaiveTime::parse_from_str(raw, format).is_ok()),
            Temporal::DateTime => {
                DateTime::parse_from_rfc3339(raw).is_ok()
                    || ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
                        .iter()
                        .any(|format| NaiveDateTime::parse_from_str(raw, format).is_ok())
                    || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
            }
        }
    }
}

/// One constraint; each carries the message it reports
#[derive(Clone, Debug)]
pub enum Rule {
    MinLength { limit: usize, message: String },
    MaxLength { limit: usize, message: String },
    Pattern { regex: Regex, message: String },
    Email,
    Url,
    Min { limit: f64, message: String },
    Max { limit: f64, message: String },
    OneOf { allowed: Vec<String>, message: String },
    EachOneOf { allowed: Vec<String>, message: String },
    MinItems { limit: usize, message: String },
    MaxItems { limit: usize, message: String },
    Temporal { kind: Temporal, message: String },
}

impl Rule {
    /// Rules only inspect the shape their field's [`Shape`] guarantees
    fn apply(&self, value: &FieldValue) -> Result<(), String> {
        let passed = match (self, value) {
            (Rule::MinLength { limit, .. }, FieldValue::Text(text)) => text.chars().count() >= *limit,
            (Rule::MaxLength { limit, .. }, FieldValue::Text(text)) => text.chars().count() <= *limit,
            (Rule::Pattern { regex, .. }, FieldValue::Text(text)) => regex.is_match(text),
            (Rule::Email, FieldValue::Text(text)) => email_regex().is_match(text),
            (Rule::Url, FieldValue::Text(text)) => url::Url::parse(text).is_ok(),
            (Rule::Min { limit, .. }, FieldValue::Number(n)) => n >= limit,
            (Rule::Max { limit, .. }, FieldValue::Number(n)) => n <= limit,
            (Rule::OneOf { allowed, .. }, FieldValue::Text(text)) => allowed.contains(text),
            (Rule::EachOneOf { allowed, .. }, FieldValue::List(items)) => {
                items.iter().all(|item| allowed.contains(item))
            }
            (Rule::MinItems { limit, .. }, FieldValue::List(items)) => items.len() >= *limit,
            (Rule::MaxItems { limit, .. }, FieldValue::List(items)) => items.len() <= *limit,
            (Rule::Temporal { kind, .. }, FieldValue::Text(text)) => kind.parses(text),
            _ => true,
        };
        if passed {
            Ok(())
        } else {
            Err(self.message().to_string())
        }
    }

    fn message(&self) -> &str {
        match self {
            Rule::Email => "Format email tidak valid",
            Rule::Url => "Format URL tidak valid",
            Rule::MinLength { message, .. }
            | Rule::MaxLength { message, .. }
            | Rule::Pattern { message, .. }
            | Rule::Min { message, .. }
            | Rule::Max { message, .. }
            | Rule::OneOf { message, .. }
            | Rule::EachOneOf { message, .. }
            | Rule::MinItems { message, .. }
            | Rule::MaxItems { message, .. }
            | Rule::Temporal { message, .. } => message,
        }
    }
}

/// Executable check for one field
#[derive(Clone, Debug)]
pub struct FieldChecker {
    label: String,
    required: Option<String>,
    shape: Shape,
    rules: Vec<Rule>,
}

impl FieldChecker {
    /// Check one value; `None` means the field was not submitted
    pub fn check(&self, value: Option<&FieldValue>) -> Result<(), String> {
        let value = match value {
            Some(value) if !value.is_empty() => value,
            _ => {
                return match &self.required {
                    Some(message) => Err(message.clone()),
                    None => Ok(()),
                }
            }
        };

        self.check_shape(value)?;
        self.rules.iter().try_for_each(|rule| rule.apply(value))
    }

    fn check_shape(&self, value: &FieldValue) -> Result<(), String> {
        match (self.shape, value) {
            (Shape::Any, _)
            | (Shape::Text, FieldValue::Text(_))
            | (Shape::Number, FieldValue::Number(_))
            | (Shape::List, FieldValue::List(_)) => Ok(()),
            (Shape::Text, _) => Err(format!("{} harus berupa teks", self.label)),
            (Shape::Number, _) => Err(format!("{} harus berupa angka", self.label)),
            (Shape::List, _) => Err(format!("{} harus berupa daftar pilihan", self.label)),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

type RuleBuilder = fn(&FieldDefinition) -> (Shape, Vec<Rule>);

/// Builder table, one entry per field type
fn rule_builder(field_type: &FieldType) -> RuleBuilder {
    match field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Nim | FieldType::Prodi => text_rules,
        FieldType::Email => email_rules,
        FieldType::Url => url_rules,
        FieldType::Number => number_rules,
        FieldType::Phone => phone_rules,
        FieldType::Select | FieldType::Radio | FieldType::Fakultas => choice_rules,
        FieldType::Checkbox | FieldType::Multiselect => multi_choice_rules,
        FieldType::Date => date_rules,
        FieldType::Time => time_rules,
        FieldType::Datetime => datetime_rules,
        FieldType::File | FieldType::Hidden | FieldType::Other(_) => unconstrained,
    }
}

/// Build the checker for one field
pub fn build_checker(field: &FieldDefinition) -> FieldChecker {
    if let FieldType::Other(name) = &field.field_type {
        tracing::warn!(field = %field.id, field_type = %name, "unknown field type, accepting any value");
    }
    let (shape, rules) = rule_builder(&field.field_type)(field);
    FieldChecker {
        label: field.label.clone(),
        required: field.required.then(|| field.required_message()),
        shape,
        rules,
    }
}

fn validation(field: &FieldDefinition) -> FieldValidation {
    field.validation.clone().unwrap_or_default()
}

/// minLength / maxLength / pattern, shared by every text-shaped type
fn length_and_pattern(field: &FieldDefinition) -> Vec<Rule> {
    let validation = validation(field);
    let mut rules = Vec::new();

    if let Some(limit) = validation.min_length.filter(|n| *n > 0) {
        rules.push(Rule::MinLength {
            limit,
            message: validation
                .min_length_message
                .clone()
                .unwrap_or_else(|| format!("{} minimal {} karakter", field.label, limit)),
        });
    }
    if let Some(limit) = validation.max_length.filter(|n| *n > 0) {
        rules.push(Rule::MaxLength {
            limit,
            message: validation
                .max_length_message
                .clone()
                .unwrap_or_else(|| format!("{} maksimal {} karakter", field.label, limit)),
        });
    }
    if let Some(pattern) = validation.pattern.as_deref().filter(|p| !p.is_empty()) {
        match Regex::new(pattern) {
            Ok(regex) => rules.push(Rule::Pattern {
                regex,
                message: validation
                    .pattern_message
                    .clone()
                    .unwrap_or_else(|| format!("Format {} tidak valid", field.label)),
            }),
            Err(e) => {
                tracing::warn!(field = %field.id, pattern, error = %e, "pattern does not compile, skipping");
            }
        }
    }

    rules
}

fn text_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    (Shape::Text, length_and_pattern(field))
}

fn email_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    let mut rules = vec![Rule::Email];
    rules.extend(length_and_pattern(field));
    (Shape::Text, rules)
}

fn url_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    let mut rules = vec![Rule::Url];
    rules.extend(length_and_pattern(field));
    (Shape::Text, rules)
}

fn phone_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    let mut rules = vec![
        Rule::MinLength {
            limit: PHONE_MIN_DIGITS,
            message: format!("Nomor telepon minimal {PHONE_MIN_DIGITS} digit"),
        },
        Rule::MaxLength {
            limit: PHONE_MAX_DIGITS,
            message: format!("Nomor telepon maksimal {PHONE_MAX_DIGITS} digit"),
        },
        Rule::Pattern {
            regex: phone_regex().clone(),
            message: "Nomor telepon tidak valid".into(),
        },
    ];
    rules.extend(length_and_pattern(field));
    (Shape::Text, rules)
}

fn number_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    let validation = validation(field);
    let mut rules = Vec::new();
    if let Some(limit) = validation.min {
        rules.push(Rule::Min {
            limit,
            message: format!("{} minimal {}", field.label, limit),
        });
    }
    if let Some(limit) = validation.max {
        rules.push(Rule::Max {
            limit,
            message: format!("{} maksimal {}", field.label, limit),
        });
    }
    (Shape::Number, rules)
}

fn choice_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    let mut rules = Vec::new();
    if field.options.is_empty() {
        tracing::warn!(field = %field.id, "selection field has no options, accepting any text");
    } else {
        rules.push(Rule::OneOf {
            allowed: field.option_values(),
            message: format!("Pilihan {} tidak valid", field.label),
        });
    }
    rules.extend(length_and_pattern(field));
    (Shape::Text, rules)
}

fn multi_choice_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    let validation = validation(field);
    let mut rules = Vec::new();
    if field.options.is_empty() {
        tracing::warn!(field = %field.id, "multi-choice field has no options, accepting any entries");
    } else {
        rules.push(Rule::EachOneOf {
            allowed: field.option_values(),
            message: format!("Pilihan {} tidak valid", field.label),
        });
    }
    if let Some(limit) = validation.min.filter(|n| *n > 0.0) {
        let limit = limit.ceil() as usize;
        rules.push(Rule::MinItems {
            limit,
            message: format!("Pilih minimal {limit} opsi"),
        });
    }
    if let Some(limit) = validation.max.filter(|n| *n > 0.0) {
        let limit = limit.floor() as usize;
        rules.push(Rule::MaxItems {
            limit,
            message: format!("Pilih maksimal {limit} opsi"),
        });
    }
    (Shape::List, rules)
}

fn temporal_rules(field: &FieldDefinition, kind: Temporal) -> (Shape, Vec<Rule>) {
    (
        Shape::Text,
        vec![Rule::Temporal {
            kind,
            message: format!("Format {} tidak valid", field.label),
        }],
    )
}

fn date_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    temporal_rules(field, Temporal::Date)
}

fn time_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    temporal_rules(field, Temporal::Time)
}

fn datetime_rules(field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    temporal_rules(field, Temporal::DateTime)
}

/// File bytes are checked at the upload boundary, not here
fn unconstrained(_field: &FieldDefinition) -> (Shape, Vec<Rule>) {
    (Shape::Any, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FileHandle;

    fn field(field_type: FieldType) -> FieldDefinition {
        FieldDefinition::new("f", field_type, "Isian")
    }

    fn check(field: &FieldDefinition, value: impl Into<FieldValue>) -> Result<(), String> {
        build_checker(field).check(Some(&value.into()))
    }

    #[test]
    fn test_required_and_optional_empty_values() {
        let optional = field(FieldType::Text);
        assert!(build_checker(&optional).check(None).is_ok());
        assert!(check(&optional, "").is_ok());

        let required = field(FieldType::Text).required();
        assert_eq!(build_checker(&required).check(None), Err("Isian wajib diisi".into()));
        assert_eq!(check(&required, ""), Err("Isian wajib diisi".into()));

        let multi = field(FieldType::Checkbox).with_options(["a"]).required();
        assert_eq!(check(&multi, Vec::<String>::new()), Err("Isian wajib diisi".into()));
    }

    #[test]
    fn test_optional_value_still_checked_when_present() {
        let email = field(FieldType::Email);
        assert_eq!(check(&email, "bukan-email"), Err("Format email tidak valid".into()));
    }

    #[test]
    fn test_text_length_boundaries() {
        let f = field(FieldType::Text).required().with_validation(FieldValidation {
            min_length: Some(5),
            max_length: Some(8),
            ..Default::default()
        });
        assert_eq!(check(&f, "abcd"), Err("Isian minimal 5 karakter".into()));
        assert!(check(&f, "abcde").is_ok());
        assert!(check(&f, "abcdefgh").is_ok());
        assert_eq!(check(&f, "abcdefghi"), Err("Isian maksimal 8 karakter".into()));
    }

    #[test]
    fn test_custom_length_messages() {
        let f = field(FieldType::Text).with_validation(FieldValidation {
            min_length: Some(3),
            min_length_message: Some("Terlalu pendek".into()),
            max_length: Some(4),
            max_length_message: Some("Terlalu panjang".into()),
            ..Default::default()
        });
        assert_eq!(check(&f, "ab"), Err("Terlalu pendek".into()));
        assert_eq!(check(&f, "abcde"), Err("Terlalu panjang".into()));
    }

    #[test]
    fn test_pattern_and_custom_message() {
        let f = field(FieldType::Nim).with_validation(FieldValidation {
            pattern: Some("^[0-9A-Za-z]+$".into()),
            pattern_message: Some("NIM hanya boleh berisi huruf dan angka".into()),
            ..Default::default()
        });
        assert!(check(&f, "2106012345").is_ok());
        assert_eq!(check(&f, "21-06"), Err("NIM hanya boleh berisi huruf dan angka".into()));
    }

    #[test]
    fn test_bad_pattern_degrades_to_permissive() {
        let f = field(FieldType::Text).with_validation(FieldValidation {
            pattern: Some("([".into()),
            ..Default::default()
        });
        assert!(build_checker(&f).rules().is_empty());
        assert!(check(&f, "apa saja").is_ok());
    }

    #[test]
    fn test_phone_rules() {
        let f = field(FieldType::Phone);
        assert_eq!(check(&f, "0812"), Err("Nomor telepon minimal 10 digit".into()));
        assert_eq!(check(&f, "0812345678901234"), Err("Nomor telepon maksimal 15 digit".into()));
        assert_eq!(check(&f, "0812-3456-789"), Err("Nomor telepon tidak valid".into()));
        assert!(check(&f, "+6281234567890").is_ok());
    }

    #[test]
    fn test_url_rules() {
        let f = field(FieldType::Url);
        assert!(check(&f, "https://github.com/apm").is_ok());
        assert_eq!(check(&f, "github dot com"), Err("Format URL tidak valid".into()));
    }

    #[test]
    fn test_number_bounds_and_shape() {
        let f = field(FieldType::Number).with_validation(FieldValidation {
            min: Some(1.0),
            max: Some(5.0),
            ..Default::default()
        });
        assert!(check(&f, 3).is_ok());
        assert_eq!(check(&f, 0), Err("Isian minimal 1".into()));
        assert_eq!(check(&f, 6), Err("Isian maksimal 5".into()));
        assert_eq!(check(&f, "3"), Err("Isian harus berupa angka".into()));
        assert!(check(&f, 2.5).is_ok());
    }

    #[test]
    fn test_choice_rules() {
        let f = field(FieldType::Radio).with_options(["ya", "tidak"]);
        assert!(check(&f, "ya").is_ok());
        assert_eq!(check(&f, "mungkin"), Err("Pilihan Isian tidak valid".into()));

        let bare = field(FieldType::Select);
        assert!(check(&bare, "apa saja").is_ok());
    }

    #[test]
    fn test_multi_choice_rules() {
        let f = field(FieldType::Multiselect)
            .with_options(["a", "b", "c"])
            .with_validation(FieldValidation {
                min: Some(2.0),
                ..Default::default()
            });
        assert!(check(&f, vec!["a", "c"]).is_ok());
        assert_eq!(check(&f, vec!["a"]), Err("Pilih minimal 2 opsi".into()));
        assert_eq!(check(&f, vec!["a", "z"]), Err("Pilihan Isian tidak valid".into()));
        assert_eq!(check(&f, "a"), Err("Isian harus berupa daftar pilihan".into()));
    }

    #[test]
    fn test_temporal_parseability() {
        let date = field(FieldType::Date);
        assert!(check(&date, "2024-08-17").is_ok());
        assert_eq!(check(&date, "17/08/2024"), Err("Format Isian tidak valid".into()));

        let time = field(FieldType::Time);
        assert!(check(&time, "09:30").is_ok());
        assert!(check(&time, "25:00").is_err());

        let datetime = field(FieldType::Datetime);
        assert!(check(&datetime, "2024-08-17T09:30").is_ok());
        assert!(check(&datetime, "2024-08-17T09:30:00+07:00").is_ok());
        assert!(check(&datetime, "besok pagi").is_err());
    }

    #[test]
    fn test_file_and_unknown_types_accept_anything() {
        let file = field(FieldType::File).required();
        assert!(check(&file, FileHandle::new("cv.pdf", 10)).is_ok());
        assert!(check(&file, "uploads/cv.pdf").is_ok());
        assert!(build_checker(&file).check(None).is_err());

        let other = field(FieldType::from("signature"));
        assert!(check(&other, 42).is_ok());
    }
}
