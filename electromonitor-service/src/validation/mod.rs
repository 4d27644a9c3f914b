//! Form validation performed before the billing core is called.
//!
//! The core assumes well-formed input; every rule about what a user may
//! type lives here.

use electromonitor_core::domain::{Customer, CustomerDirectory};

pub const MAX_CHIP_ID_LEN: usize = 8;
pub const PHONE_DIGITS: usize = 10;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required and usage must be a positive number.")]
    UsageEntry,
    #[error("Chip ID must be alphanumeric and at most 8 characters.")]
    MalformedChipId,
    #[error("Unknown customer '{0}'.")]
    UnknownCustomer(String),
    #[error("All fields are required.")]
    MissingFields,
    #[error("Phone number must be exactly 10 digits.")]
    MalformedPhone,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

/// A usage reading that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageEntry<'a> {
    pub customer: &'a Customer,
    pub usage: f64,
    pub chip_id: String,
}

/// Validate the officer's usage form.
///
/// Rules:
/// - all fields present;
/// - usage parses as a finite number greater than zero;
/// - chip id is ASCII alphanumeric, at most 8 characters;
/// - customer id is in the directory.
pub fn validate_usage_entry<'a>(
    directory: &'a CustomerDirectory,
    customer_id: &str,
    usage: &str,
    chip_id: &str,
) -> Result<UsageEntry<'a>, ValidationError> {
    let chip_id = chip_id.trim();
    let usage = usage.trim().parse::<f64>().ok().filter(|u| u.is_finite() && *u > 0.0);

    let usage = match usage {
        Some(u) if !customer_id.trim().is_empty() && !chip_id.is_empty() => u,
        _ => return Err(ValidationError::UsageEntry),
    };

    if chip_id.len() > MAX_CHIP_ID_LEN || !chip_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::MalformedChipId);
    }

    let customer = directory
        .get(customer_id.trim())
        .ok_or_else(|| ValidationError::UnknownCustomer(customer_id.trim().to_string()))?;

    Ok(UsageEntry {
        customer,
        usage,
        chip_id: chip_id.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub phone: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.chars().all(|c| c.is_ascii_digit())
}

pub fn validate_signup(form: &SignUpForm) -> Result<(), ValidationError> {
    if form.phone.trim().is_empty() || form.name.trim().is_empty() || form.password.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_phone(&form.phone) {
        return Err(ValidationError::MalformedPhone);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Field checks only; credentials are not verified.
pub fn validate_login(form: &LoginForm) -> Result<(), ValidationError> {
    if form.phone.trim().is_empty() || form.password.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_phone(&form.phone) {
        return Err(ValidationError::MalformedPhone);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_entry_accepts_valid_reading() {
        let dir = CustomerDirectory::seeded();
        let entry = validate_usage_entry(&dir, "c1", "243", "CHIP99").unwrap();
        assert_eq!(entry.customer.name, "Arun Kumar");
        assert_eq!(entry.usage, 243.0);
        assert_eq!(entry.chip_id, "CHIP99");

        let fractional = validate_usage_entry(&dir, "c2", "12.75", " k9 ").unwrap();
        assert_eq!(fractional.usage, 12.75);
        assert_eq!(fractional.chip_id, "k9");
    }

    #[test]
    fn usage_entry_rejects_missing_or_non_positive_usage() {
        let dir = CustomerDirectory::seeded();
        for usage in ["", "0", "-5", "abc", "NaN", "inf"] {
            assert_eq!(
                validate_usage_entry(&dir, "c1", usage, "CHIPBAD"),
                Err(ValidationError::UsageEntry),
                "usage {usage:?}"
            );
        }
        assert_eq!(
            validate_usage_entry(&dir, "c1", "10", ""),
            Err(ValidationError::UsageEntry)
        );
        assert_eq!(
            validate_usage_entry(&dir, "", "10", "CHIP1"),
            Err(ValidationError::UsageEntry)
        );
    }

    #[test]
    fn usage_entry_rejects_malformed_chip_id() {
        let dir = CustomerDirectory::seeded();
        assert_eq!(
            validate_usage_entry(&dir, "c1", "10", "CHIP12345"),
            Err(ValidationError::MalformedChipId)
        );
        assert_eq!(
            validate_usage_entry(&dir, "c1", "10", "CH-1"),
            Err(ValidationError::MalformedChipId)
        );
    }

    #[test]
    fn usage_entry_rejects_unknown_customer() {
        let dir = CustomerDirectory::seeded();
        assert_eq!(
            validate_usage_entry(&dir, "c9", "10", "CHIP1"),
            Err(ValidationError::UnknownCustomer("c9".to_string()))
        );
    }

    #[test]
    fn signup_rules() {
        let mut form = SignUpForm {
            phone: "9876543210".to_string(),
            name: "Priya N.".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
        };
        assert_eq!(validate_signup(&form), Ok(()));

        form.confirm_password = "other".to_string();
        assert_eq!(validate_signup(&form), Err(ValidationError::PasswordMismatch));

        form.phone = "98765".to_string();
        assert_eq!(validate_signup(&form), Err(ValidationError::MalformedPhone));

        form.name = " ".to_string();
        assert_eq!(validate_signup(&form), Err(ValidationError::MissingFields));
    }

    #[test]
    fn login_checks_fields_only() {
        let form = LoginForm {
            phone: "9876543210".to_string(),
            password: "anything".to_string(),
        };
        assert_eq!(validate_login(&form), Ok(()));
        assert_eq!(
            validate_login(&LoginForm { phone: "98765432a0".to_string(), ..form.clone() }),
            Err(ValidationError::MalformedPhone)
        );
        assert_eq!(
            validate_login(&LoginForm { password: String::new(), ..form }),
            Err(ValidationError::MissingFields)
        );
    }
}
