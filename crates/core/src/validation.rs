//! Pure field validation.
//!
//! Forms hand a draft to a `validate` function and get back either the
//! validated value or every field problem at once. Nothing here depends on how
//! fields are bound or rendered.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A problem with a single input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Non-empty list of field errors, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// First message recorded for `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.for_field(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            core::fmt::Display::fmt(err, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects field errors while a draft is checked.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Records `message` against `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) -> bool {
        if !ok {
            self.push(field, message);
        }
        ok
    }

    /// Trimmed, non-empty text.
    pub fn required(&mut self, field: &str, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(field, "is required");
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> bool {
        let ok = value.trim().chars().count() <= max;
        self.check(ok, field, format!("must be at most {max} characters"))
    }

    pub fn positive_money(&mut self, field: &str, value: Money) -> bool {
        self.check(value.is_positive(), field, "must be greater than zero")
    }

    pub fn non_negative_money(&mut self, field: &str, value: Money) -> bool {
        self.check(value.cents() >= 0, field, "cannot be negative")
    }

    pub fn non_negative(&mut self, field: &str, value: i64) -> bool {
        self.check(value >= 0, field, "cannot be negative")
    }

    pub fn positive(&mut self, field: &str, value: i64) -> bool {
        self.check(value > 0, field, "must be greater than zero")
    }

    /// Loose e-mail shape check (`local@domain.tld`, no whitespace).
    pub fn email(&mut self, field: &str, value: &str) -> bool {
        self.check(is_email(value.trim()), field, "must be a valid email address")
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finishes validation, yielding `value` when no field failed.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failure_in_order() {
        let mut v = Validator::new();
        assert!(v.required("name", "   ").is_none());
        v.positive_money("price", Money::ZERO);
        v.email("email", "not-an-email");

        let errs = v.finish(|| ()).unwrap_err();
        let fields: Vec<_> = errs.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "price", "email"]);
        assert_eq!(errs.for_field("name"), Some("is required"));
    }

    #[test]
    fn clean_validator_yields_value() {
        let mut v = Validator::new();
        let name = v.required("name", "  Adobo ");
        let out = v.finish(|| name).unwrap();
        assert_eq!(out.as_deref(), Some("Adobo"));
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("cashier@store.ph"));
        assert!(!is_email("cashier@store"));
        assert!(!is_email("@store.ph"));
        assert!(!is_email("a b@store.ph"));
        assert!(!is_email("a@b@store.ph"));
    }

    #[test]
    fn display_joins_errors() {
        let mut v = Validator::new();
        v.push("a", "bad");
        v.push("b", "worse");
        assert_eq!(v.finish(|| ()).unwrap_err().to_string(), "a: bad; b: worse");
    }
}
