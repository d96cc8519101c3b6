use serde_json::Value;

use crate::util::text;

// Define trait that provides necessary methods
pub trait FromValue {
    /// Total numeric coercion of the text form: anything unusable becomes 0.
    fn get_f64(&self) -> f64;
    /// Text form of the value as a browser would render it with `String(v)`.
    /// `None` only for null.
    fn get_text(&self) -> Option<String>;
    /// Whether the value would pass a truthiness check on the wire side.
    fn is_truthy(&self) -> bool;
}

/// Implements the conversions for `serde_json::Value`.
impl FromValue for Value {
    fn get_f64(&self) -> f64 {
        match self {
            Value::Null => Default::default(),
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or_default(),
            other => other.get_text().map(|t| text::to_number(&t)).unwrap_or_default(),
        }
    }

    fn get_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(render(other)),
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// `[100]` renders as `100`, `[1, null, "a"]` as `1,,a`, any object as
/// `[object Object]`.
fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Integral floats drop the trailing `.0`.
fn render_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        _ => n.to_string(),
    }
}

/// Absent fields coerce exactly like `null`.
impl FromValue for Option<&Value> {
    fn get_f64(&self) -> f64 {
        self.map(FromValue::get_f64).unwrap_or_default()
    }

    fn get_text(&self) -> Option<String> {
        self.and_then(FromValue::get_text)
    }

    fn is_truthy(&self) -> bool {
        self.is_some_and(FromValue::is_truthy)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_f64_is_total() {
        assert_eq!(json!("1,234.5").get_f64(), 1234.5);
        assert_eq!(json!(42).get_f64(), 42.0);
        assert_eq!(json!(-0.5).get_f64(), -0.5);
        assert_eq!(Value::Null.get_f64(), 0.0);
        assert_eq!(json!("abc").get_f64(), 0.0);
        assert_eq!(json!({"a": 1}).get_f64(), 0.0);
        assert_eq!(json!(true).get_f64(), 0.0);
        assert_eq!(None::<&Value>.get_f64(), 0.0);
    }

    #[test]
    fn test_get_text() {
        assert_eq!(json!("TCS").get_text().as_deref(), Some("TCS"));
        assert_eq!(json!(500325).get_text().as_deref(), Some("500325"));
        assert_eq!(json!(3500.0).get_text().as_deref(), Some("3500"));
        assert_eq!(json!(true).get_text().as_deref(), Some("true"));
        assert_eq!(json!(["A", null, 1]).get_text().as_deref(), Some("A,,1"));
        assert_eq!(json!({"x": 1}).get_text().as_deref(), Some("[object Object]"));
        assert_eq!(Value::Null.get_text(), None);
    }

    #[test]
    fn test_get_f64_reads_rendered_arrays() {
        assert_eq!(json!([100]).get_f64(), 100.0);
        assert_eq!(json!(["1,234"]).get_f64(), 1234.0);
        assert_eq!(json!([1, 2]).get_f64(), 12.0);
        assert_eq!(json!([]).get_f64(), 0.0);
        assert_eq!(json!([[]]).get_f64(), 0.0);
    }

    #[test]
    fn test_is_truthy() {
        assert!(json!("X").is_truthy());
        assert!(!json!("").is_truthy());
        assert!(!json!(0).is_truthy());
        assert!(json!(7).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!None::<&Value>.is_truthy());
    }
}
