//! Multi-step registration forms as explicit state machines
//!
//! A [`Wizard`] is in exactly one step at a time. Moving forward is guarded
//! by the current step's validation rules, evaluated when the transition is
//! requested. Moving back is always allowed except from the first step.

pub mod builtin;

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::validation::FormValidationConfig;
use crate::mapping::FieldMapping;
use serde_json::{Map, Value};

/// One page of a wizard
pub struct Step {
    pub title: String,
    pub rules: FormValidationConfig,
}

impl Step {
    pub fn new(title: &str, rules: FormValidationConfig) -> Self {
        Self {
            title: title.to_string(),
            rules,
        }
    }
}

/// A wizard in progress
pub struct Wizard {
    name: String,
    steps: Vec<Step>,
    current: usize,
    values: Map<String, Value>,
    mapping: Option<FieldMapping>,
}

impl Wizard {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
            current: 0,
            values: Map::new(),
            mapping: None,
        }
    }

    /// Append a step
    pub fn step(mut self, title: &str, rules: FormValidationConfig) -> Self {
        self.steps.push(Step::new(title, rules));
        self
    }

    /// Rename submitted fields through `mapping`
    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn set_value(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
    }

    pub fn set_values(&mut self, values: Map<String, Value>) {
        self.values.extend(values);
    }

    /// Evaluate the guards of step `index` against the current values
    pub fn validate_step(&self, index: usize) -> Result<Map<String, Value>, ValidationError> {
        let step = self.steps.get(index).ok_or(ValidationError::InvalidStep {
            step: index,
            steps: self.steps.len(),
        })?;

        step.rules
            .validate_and_filter(&self.values)
            .map_err(ValidationError::FieldErrors)
    }

    /// Advance one step if the current one validates
    ///
    /// Filtered values (trimmed, parsed numbers) replace the raw ones.
    pub fn next(&mut self) -> Result<usize, ValidationError> {
        if self.is_last() {
            return Err(ValidationError::InvalidStep {
                step: self.current + 1,
                steps: self.steps.len(),
            });
        }

        self.values = self.validate_step(self.current)?;
        self.current += 1;
        tracing::debug!(wizard = %self.name, step = self.current, "wizard advanced");
        Ok(self.current)
    }

    /// Go back one step
    pub fn back(&mut self) -> Result<usize, ValidationError> {
        if self.current == 0 {
            return Err(ValidationError::InvalidStep {
                step: 0,
                steps: self.steps.len(),
            });
        }

        self.current -= 1;
        Ok(self.current)
    }

    /// Jump to `index` if every step before it validates
    pub fn go_to(&mut self, index: usize) -> Result<usize, ValidationError> {
        if index >= self.steps.len() {
            return Err(ValidationError::InvalidStep {
                step: index,
                steps: self.steps.len(),
            });
        }

        let mut values = self.values.clone();
        for step in &self.steps[..index] {
            values = step
                .rules
                .validate_and_filter(&values)
                .map_err(ValidationError::FieldErrors)?;
        }

        self.values = values;
        self.current = index;
        Ok(self.current)
    }

    /// Validate every step and return the form, mapped to API names when a
    /// mapping is attached
    pub fn submit(&self) -> Result<Map<String, Value>, ValidationError> {
        let mut values = self.values.clone();
        let mut errors: Vec<FieldValidationError> = Vec::new();

        for step in &self.steps {
            match step.rules.validate_and_filter(&values) {
                Ok(filtered) => values = filtered,
                Err(step_errors) => errors.extend(step_errors),
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError::FieldErrors(errors));
        }

        tracing::debug!(wizard = %self.name, "wizard submitted");
        Ok(match &self.mapping {
            Some(mapping) => mapping.to_api(&values),
            None => values,
        })
    }

    /// Restart at the first step with an empty form
    pub fn reset(&mut self) {
        self.current = 0;
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::{filters, validators};
    use serde_json::json;

    fn two_steps() -> Wizard {
        Wizard::new("teste")
            .step(
                "Dados",
                FormValidationConfig::new("dados")
                    .filter("nome", filters::trim())
                    .validator("nome", validators::required()),
            )
            .step(
                "Valores",
                FormValidationConfig::new("valores")
                    .filter("preco", filters::parse_number())
                    .validator("preco", validators::required())
                    .validator("preco", validators::positive()),
            )
    }

    #[test]
    fn test_next_blocked_until_step_valid() {
        let mut wizard = two_steps();

        let err = wizard.next().unwrap_err();
        assert_eq!(err.fields(), vec!["nome"]);
        assert_eq!(wizard.current(), 0);

        wizard.set_value("nome", json!("  Casa  "));
        assert_eq!(wizard.next().unwrap(), 1);
        assert_eq!(wizard.values()["nome"], json!("Casa"));
    }

    #[test]
    fn test_back_from_first_step_rejected() {
        let mut wizard = two_steps();
        assert!(matches!(
            wizard.back(),
            Err(ValidationError::InvalidStep { step: 0, steps: 2 })
        ));
    }

    #[test]
    fn test_go_to_requires_previous_steps() {
        let mut wizard = two_steps();
        assert!(wizard.go_to(1).is_err());

        wizard.set_value("nome", json!("Casa"));
        assert_eq!(wizard.go_to(1).unwrap(), 1);
        assert_eq!(wizard.go_to(0).unwrap(), 0);
        assert!(wizard.go_to(2).is_err());
    }

    #[test]
    fn test_submit_collects_errors_of_every_step() {
        let wizard = two_steps();
        let err = wizard.submit().unwrap_err();
        assert_eq!(err.fields(), vec!["nome", "preco"]);
    }

    #[test]
    fn test_submit_filters_values() {
        let mut wizard = two_steps();
        wizard.set_value("nome", json!("Casa"));
        wizard.set_value("preco", json!("R$ 450.000,00"));

        let form = wizard.submit().unwrap();
        assert_eq!(form["preco"], json!(450000.0));
    }

    #[test]
    fn test_next_past_last_step() {
        let mut wizard = two_steps();
        wizard.set_value("nome", json!("Casa"));
        wizard.next().unwrap();
        assert!(wizard.is_last());
        assert!(matches!(
            wizard.next(),
            Err(ValidationError::InvalidStep { step: 2, .. })
        ));
    }
}
