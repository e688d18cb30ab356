//! Boundary validation.
//!
//! Records are checked with [`validator`] derives; the resulting errors are
//! flattened into a [`ValidationError`] that names every offending field so
//! the caller can correct and resubmit.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::Result;

/// One field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// Every field that failed validation for a single record, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
  pub fields: Vec<FieldError>,
}

impl ValidationError {
  pub fn single(field: &str, message: &str) -> Self {
    Self {
      fields: vec![FieldError {
        field:   field.to_owned(),
        message: message.to_owned(),
      }],
    }
  }

  pub fn push(&mut self, field: &str, message: &str) {
    self.fields.push(FieldError {
      field:   field.to_owned(),
      message: message.to_owned(),
    });
    self.fields.sort_by(|a, b| a.field.cmp(&b.field));
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn has_field(&self, field: &str) -> bool {
    self.fields.iter().any(|f| f.field == field)
  }

  /// Names of the offending fields, in order.
  pub fn field_names(&self) -> Vec<&str> {
    self.fields.iter().map(|f| f.field.as_str()).collect()
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self
      .fields
      .iter()
      .map(|fe| format!("{} {}", fe.field, fe.message))
      .collect();
    f.write_str(&parts.join(", "))
  }
}

impl From<ValidationErrors> for ValidationError {
  fn from(errors: ValidationErrors) -> Self {
    let mut fields: Vec<FieldError> = errors
      .field_errors()
      .into_iter()
      .map(|(field, errs)| {
        let message = errs
          .first()
          .map(|e| match &e.message {
            Some(m) => m.to_string(),
            None => e.code.to_string(),
          })
          .unwrap_or_else(|| "is invalid".to_owned());
        FieldError { field: field.to_string(), message }
      })
      .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    Self { fields }
  }
}

/// Run the derived validations on `value`, collecting failures.
pub fn collect<T: Validate>(value: &T) -> ValidationError {
  match value.validate() {
    Ok(()) => ValidationError::default(),
    Err(errors) => errors.into(),
  }
}

/// Run the derived validations on `value` and fail if any field is invalid.
pub fn check<T: Validate>(value: &T) -> Result<()> {
  finish(collect(value))
}

/// Turn an accumulated [`ValidationError`] into a result.
pub fn finish(errors: ValidationError) -> Result<()> {
  if errors.is_empty() { Ok(()) } else { Err(errors.into()) }
}

#[cfg(test)]
mod tests {
  use validator::Validate;

  use super::*;

  #[derive(Validate)]
  struct Probe {
    #[validate(length(min = 1, message = "is required"))]
    name:   String,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    amount: f64,
  }

  #[test]
  fn valid_record_passes() {
    let p = Probe { name: "x".into(), amount: 1.0 };
    assert!(check(&p).is_ok());
  }

  #[test]
  fn every_bad_field_is_listed() {
    let p = Probe { name: String::new(), amount: 0.0 };
    let errors = collect(&p);
    assert_eq!(errors.field_names(), vec!["amount", "name"]);
    assert_eq!(errors.fields[0].message, "must be greater than zero");
    assert_eq!(errors.fields[1].message, "is required");
  }

  #[test]
  fn negative_amount_is_rejected() {
    let p = Probe { name: "x".into(), amount: -5.0 };
    let err = check(&p).unwrap_err();
    assert!(matches!(err, crate::Error::Validation(v) if v.has_field("amount")));
  }
}
