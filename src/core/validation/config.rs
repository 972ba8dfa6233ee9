//! Declarative per-field validation config

use super::filters::Filter;
use super::validators::Validator;
use crate::core::error::FieldValidationError;
use anyhow::Result;
use serde_json::{Map, Value};

/// Filters and validators of one field
pub struct FieldRules {
    pub field: String,
    pub filters: Vec<Filter>,
    pub validators: Vec<Validator>,
}

/// Validation config for one form or one wizard step
///
/// Filters run first (in declaration order) and may rewrite the value;
/// validators then see the normalised value. Missing fields are validated
/// as `null`.
pub struct FormValidationConfig {
    pub form: String,
    rules: Vec<FieldRules>,
}

impl FormValidationConfig {
    pub fn new(form: &str) -> Self {
        Self {
            form: form.to_string(),
            rules: Vec::new(),
        }
    }

    /// Add a filter to a field
    pub fn add_filter<F>(&mut self, field: &str, filter: F)
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.rules_for(field).filters.push(Box::new(filter));
    }

    /// Add a validator to a field
    pub fn add_validator<F>(&mut self, field: &str, validator: F)
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules_for(field).validators.push(Box::new(validator));
    }

    /// Builder form of [`add_filter`](Self::add_filter)
    pub fn filter<F>(mut self, field: &str, filter: F) -> Self
    where
        F: Fn(&str, Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.add_filter(field, filter);
        self
    }

    /// Builder form of [`add_validator`](Self::add_validator)
    pub fn validator<F>(mut self, field: &str, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.add_validator(field, validator);
        self
    }

    /// Names of the fields covered by this config
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.field.as_str())
    }

    fn rules_for(&mut self, field: &str) -> &mut FieldRules {
        let pos = match self.rules.iter().position(|r| r.field == field) {
            Some(pos) => pos,
            None => {
                self.rules.push(FieldRules {
                    field: field.to_string(),
                    filters: Vec::new(),
                    validators: Vec::new(),
                });
                self.rules.len() - 1
            }
        };
        &mut self.rules[pos]
    }

    /// Normalise then validate `payload`.
    ///
    /// Returns the filtered payload, or every field error found (one per
    /// field, the first failing validator wins).
    pub fn validate_and_filter(
        &self,
        payload: &Map<String, Value>,
    ) -> std::result::Result<Map<String, Value>, Vec<FieldValidationError>> {
        let mut output = payload.clone();
        let mut errors = Vec::new();

        for rules in &self.rules {
            let mut value = payload.get(&rules.field).cloned().unwrap_or(Value::Null);

            for filter in &rules.filters {
                match filter(&rules.field, value.clone()) {
                    Ok(filtered) => value = filtered,
                    Err(e) => {
                        errors.push(FieldValidationError {
                            field: rules.field.clone(),
                            message: e.to_string(),
                        });
                        break;
                    }
                }
            }

            if let Some(message) = rules
                .validators
                .iter()
                .find_map(|validator| validator(&rules.field, &value).err())
            {
                errors.push(FieldValidationError {
                    field: rules.field.clone(),
                    message,
                });
            }

            if !value.is_null() {
                output.insert(rules.field.clone(), value);
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }
}
