//! Reusable field filters
//!
//! These filters normalise form values before validation

use anyhow::Result;
use serde_json::{Value, json};

/// Boxed filter as stored in a validation config
pub type Filter = Box<dyn Fn(&str, Value) -> Result<Value> + Send + Sync>;

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to uppercase (state codes, CRECI suffix)
pub fn uppercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_uppercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_lowercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: keep only ASCII digits (CEP, phone masks)
pub fn digits_only() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.chars().filter(char::is_ascii_digit).collect()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: parse a numeric string typed into a masked input.
///
/// Accepts Brazilian formatting (`1.250.000,50`); non-numeric strings are
/// left untouched for the validators to reject.
pub fn parse_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            let normalized: String = s
                .trim()
                .trim_start_matches("R$")
                .trim()
                .replace('.', "")
                .replace(',', ".");
            match normalized.parse::<f64>() {
                Ok(num) => Ok(json!(num)),
                Err(_) => Ok(value),
            }
        } else {
            Ok(value)
        }
    }
}

/// Filter: round number to specified decimal places
pub fn round_decimals(
    decimals: u32,
) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |_: &str, value: Value| {
        if let Some(num) = value.as_f64() {
            let factor = 10_f64.powi(decimals as i32);
            let rounded = (num * factor).round() / factor;
            Ok(json!(rounded))
        } else {
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // === trim() ===

    #[test]
    fn test_trim_removes_whitespace() {
        let f = trim();
        let result = f("titulo", json!("  Casa  ")).expect("should not fail");
        assert_eq!(result, json!("Casa"));
    }

    #[test]
    fn test_trim_non_string_passthrough() {
        let f = trim();
        let result = f("quartos", json!(42)).expect("should not fail");
        assert_eq!(result, json!(42));
    }

    // === uppercase() / lowercase() ===

    #[test]
    fn test_uppercase_converts_string() {
        let f = uppercase();
        let result = f("estado", json!("pr")).expect("should not fail");
        assert_eq!(result, json!("PR"));
    }

    #[test]
    fn test_lowercase_converts_string() {
        let f = lowercase();
        let result = f("email", json!("Ana@IMOB.com")).expect("should not fail");
        assert_eq!(result, json!("ana@imob.com"));
    }

    // === digits_only() ===

    #[test]
    fn test_digits_only_strips_mask() {
        let f = digits_only();
        let result = f("cep", json!("80.010-000")).expect("should not fail");
        assert_eq!(result, json!("80010000"));
    }

    // === parse_number() ===

    #[test]
    fn test_parse_number_brazilian_format() {
        let f = parse_number();
        let result = f("preco", json!("R$ 1.250.000,50")).expect("should not fail");
        assert_eq!(result, json!(1250000.5));
    }

    #[test]
    fn test_parse_number_leaves_text() {
        let f = parse_number();
        let result = f("preco", json!("a combinar")).expect("should not fail");
        assert_eq!(result, json!("a combinar"));
    }

    // === round_decimals() ===

    #[test]
    fn test_round_decimals_two_places() {
        let f = round_decimals(2);
        let result = f("percentual", json!(3.14159)).expect("should not fail");
        assert_eq!(result, json!(3.14));
    }

    #[test]
    fn test_round_decimals_non_number_passthrough() {
        let f = round_decimals(2);
        let result = f("titulo", json!("hello")).expect("should not fail");
        assert_eq!(result, json!("hello"));
    }
}
