//! Loosely-typed form values
//!
//! HTML forms post numbers as strings and checkboxes as "on"/"true";
//! the JSON client posts real numbers and booleans. Both land here.

use serde::{Deserialize, Serialize};

/// A single submitted form value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FormValue {
    /// Text form of the value, trimmed
    ///
    /// Integral numbers are rendered without a fractional part so that a
    /// contact number posted as a JSON number keeps its digits.
    pub fn as_text(&self) -> String {
        match self {
            FormValue::Bool(b) => b.to_string(),
            FormValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FormValue::Number(n) => n.to_string(),
            FormValue::Text(s) => s.trim().to_string(),
        }
    }

    /// Empty string or whitespace only
    pub fn is_blank(&self) -> bool {
        matches!(self, FormValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        FormValue::Number(n)
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Number(n as f64)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_each_json_kind() {
        let v: FormValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FormValue::Bool(true));

        let v: FormValue = serde_json::from_str("12").unwrap();
        assert_eq!(v, FormValue::Number(12.0));

        let v: FormValue = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(v, FormValue::Text("12.5".into()));
    }

    #[test]
    fn integral_numbers_keep_digits() {
        assert_eq!(FormValue::Number(9876543210.0).as_text(), "9876543210");
        assert_eq!(FormValue::Number(72.5).as_text(), "72.5");
        assert_eq!(FormValue::Text("  98765 ".into()).as_text(), "98765");
    }

    #[test]
    fn blank_detection() {
        assert!(FormValue::Text("   ".into()).is_blank());
        assert!(!FormValue::Text("0".into()).is_blank());
        assert!(!FormValue::Number(0.0).is_blank());
    }
}
