//! Reusable field validators
//!
//! These validators back the per-step guards of registration wizards.
//! Messages are shown inline next to the offending field.

use crate::core::field::{FieldFormat, FieldValue};
use serde_json::Value;

/// Boxed validator as stored in a validation config
pub type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Validator: field is required (not null, not a blank string, not an empty list)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        let missing = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if missing {
            Err(format!("O campo '{}' é obrigatório", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: number must be positive
pub fn positive() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num <= 0.0 {
                Err(format!(
                    "O campo '{}' deve ser positivo (valor: {})",
                    field, num
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(()) // Non-numbers are left to other validators
        }
    }
}

/// Validator: string length must be within range (in characters)
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len < min {
                Err(format!(
                    "'{}' deve ter pelo menos {} caracteres (atual: {})",
                    field, min, len
                ))
            } else if len > max {
                Err(format!(
                    "'{}' não pode exceder {} caracteres (atual: {})",
                    field, max, len
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: number must lie within `[min, max]`
pub fn number_between(
    min: f64,
    max: f64,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num < min || num > max {
                Err(format!(
                    "'{}' deve estar entre {} e {} (valor: {})",
                    field, min, max, num
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if !allowed.iter().any(|a| a == s) {
                Err(format!(
                    "'{}' deve ser um dos valores: {:?} (valor atual: {})",
                    field, allowed, s
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: date must match format
pub fn date_format(
    format: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            match chrono::NaiveDate::parse_from_str(s, format) {
                Ok(_) => Ok(()),
                Err(_) => Err(format!(
                    "'{}' deve estar no formato {} (valor atual: {})",
                    field, format, s
                )),
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: non-empty strings must match a [`FieldFormat`]
pub fn format(format: FieldFormat) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        Some(s) if !s.is_empty() => {
            if format.validate(&FieldValue::String(s.to_string())) {
                Ok(())
            } else {
                Err(format!("'{}' não é um {} válido", field, format.label()))
            }
        }
        _ => Ok(()),
    }
}
