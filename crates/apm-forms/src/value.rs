//! Submission values
//!
//! The HTTP layer hands us loosely typed JSON. It is narrowed here, once, into
//! a closed set of value shapes before anything else in the engine sees it.

use crate::error::{FormsError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Reference to an already uploaded file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: None,
            url: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Lowercased extension including the dot, e.g. `.pdf`
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(format!(".{}", ext.to_ascii_lowercase()))
    }
}

// Largest integer an f64 holds exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Writes integral numbers without a fraction, the way a JSON client sent them
pub(crate) fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*n as i64)
    } else {
        serializer.serialize_f64(*n)
    }
}

pub(crate) fn serialize_optional_number<S: Serializer>(
    n: &Option<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match n {
        Some(n) => serialize_number(n, serializer),
        None => serializer.serialize_none(),
    }
}

/// One entered value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(#[serde(serialize_with = "serialize_number")] f64),
    Bool(bool),
    List(Vec<String>),
    File(FileHandle),
}

impl FieldValue {
    /// `""` and `[]` count as not filled in
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            FieldValue::File(file) => Some(file),
            _ => None,
        }
    }

    /// Short shape name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "bool",
            FieldValue::List(_) => "list",
            FieldValue::File(_) => "file",
        }
    }

    /// Narrow one raw JSON member. `null` means absent.
    fn from_json(key: &str, raw: &Value) -> Result<Option<Self>> {
        let value = match raw {
            Value::Null => return Ok(None),
            Value::String(text) => FieldValue::Text(text.clone()),
            Value::Bool(flag) => FieldValue::Bool(*flag),
            Value::Number(n) => FieldValue::Number(n.as_f64().ok_or_else(|| {
                invalid(key, format!("number {n} is out of range"))
            })?),
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => Ok(text.clone()),
                        Value::Number(n) => Ok(n.to_string()),
                        Value::Bool(flag) => Ok(flag.to_string()),
                        _ => Err(invalid(key, "list entries must be scalar values")),
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(_) => serde_json::from_value::<FileHandle>(raw.clone())
                .map(FieldValue::File)
                .map_err(|e| invalid(key, format!("unsupported object value: {e}")))?,
        };
        Ok(Some(value))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> FormsError {
    FormsError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Bool(flag)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(String::from).collect())
    }
}

impl From<FileHandle> for FieldValue {
    fn from(file: FileHandle) -> Self {
        FieldValue::File(file)
    }
}

/// Field id to value mapping for one submission
///
/// Keys are kept sorted so serialized payloads are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow a raw JSON object into typed values
    pub fn from_json(raw: &Value) -> Result<Self> {
        let object = raw
            .as_object()
            .ok_or_else(|| invalid("_form", "submission must be a JSON object"))?;
        let mut values = BTreeMap::new();
        for (key, member) in object {
            if let Some(value) = FieldValue::from_json(key, member)? {
                values.insert(key.clone(), value);
            }
        }
        Ok(Self(values))
    }

    /// Builder-style insert
    pub fn with(mut self, id: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn remove(&mut self, id: &str) -> Option<FieldValue> {
        self.0.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(id, value)| (id.as_str(), value))
    }

    /// Only the entries whose id is in `ids`
    pub fn restricted_to(&self, ids: &HashSet<String>) -> FormValues {
        self.0
            .iter()
            .filter(|(id, _)| ids.contains(id.as_str()))
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }

    /// Every entry except those listed in `ids`
    pub fn without(&self, ids: &[&str]) -> FormValues {
        self.0
            .iter()
            .filter(|(id, _)| !ids.contains(&id.as_str()))
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }

    /// Only the entries listed in `ids`
    pub fn only(&self, ids: &[&str]) -> FormValues {
        self.0
            .iter()
            .filter(|(id, _)| ids.contains(&id.as_str()))
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }
}

impl FromIterator<(String, FieldValue)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for FormValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_narrows_shapes() {
        let values = FormValues::from_json(&json!({
            "nama": "Budi",
            "umur": 20,
            "setuju": true,
            "minat": ["robotik", 3],
            "berkas": { "name": "cv.pdf", "size": 1024, "type": "application/pdf" },
            "kosong": null
        }))
        .unwrap();

        assert_eq!(values.get("nama"), Some(&FieldValue::from("Budi")));
        assert_eq!(values.get("umur"), Some(&FieldValue::Number(20.0)));
        assert_eq!(values.get("setuju"), Some(&FieldValue::Bool(true)));
        assert_eq!(values.get("minat"), Some(&FieldValue::from(vec!["robotik", "3"])));
        assert_eq!(values.get("berkas").and_then(FieldValue::as_file).map(|f| f.size), Some(1024));
        assert!(!values.contains("kosong"));
    }

    #[test]
    fn test_from_json_rejects_other_shapes() {
        assert!(FormValues::from_json(&json!(["a"])).is_err());
        assert!(FormValues::from_json(&json!({ "x": [{ "a": 1 }] })).is_err());
        assert!(FormValues::from_json(&json!({ "x": { "a": 1 } })).is_err());
    }

    #[test]
    fn test_integral_numbers_serialize_without_fraction() {
        let values = FormValues::from_json(&json!({ "jumlah": 3, "nilai": 87.5 })).unwrap();
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"{"jumlah":3,"nilai":87.5}"#);
    }

    #[test]
    fn test_deserialize_goes_through_ingestion() {
        let values: FormValues = serde_json::from_str(r#"{"a":"x","b":null}"#).unwrap();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_emptiness() {
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::from("0").is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(FileHandle::new("Poster.PNG", 1).extension().as_deref(), Some(".png"));
        assert_eq!(FileHandle::new("README", 1).extension(), None);
    }
}
