//! Registration and login payload validation
//!
//! Payloads arrive as loose JSON. They are first normalized into typed
//! payload structs (accepting both `first_name` and `firstName` spellings),
//! then checked field by field. Every failing field is reported, and the
//! contact-method rule is reported separately under `non_field_errors`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::ValidateEmail;

/// Error key for errors that do not belong to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_NOT_A_STRING: &str = "Not a valid string.";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Ensure this field has at least 6 characters.";
pub const MSG_INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";
pub const MSG_PHONE_DIGITS: &str = "Phone number may only contain digits.";
pub const MSG_PHONE_LENGTH: &str = "Phone number must be 10-11 digits.";
pub const MSG_MISSING_CONTACT: &str =
    "At least one contact method is required: email or phone number.";
pub const MSG_LOGIN_REQUIRED: &str = "Username and password are both required.";
pub const MSG_NOT_AN_OBJECT: &str = "Invalid data. Expected a JSON object.";

const PASSWORD_MIN_LEN: usize = 6;
const NAME_MAX_LEN: usize = 150;
const EMAIL_MAX_LEN: usize = 254;

// Wire names of the registration fields
const FIELD_USERNAME: &str = "username";
const FIELD_PASSWORD: &str = "password";
const FIELD_FIRST_NAME: &str = "first_name";
const FIELD_LAST_NAME: &str = "last_name";
const FIELD_EMAIL: &str = "email";
const FIELD_PHONE: &str = "phoneNumber";

/// Field name -> ordered error messages
///
/// Serializes to the wire error body, e.g.
/// `{"email": ["Enter a valid email address."], "non_field_errors": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single error under `non_field_errors`
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    /// A single error under `field`
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Names of all fields carrying errors
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// ============================================================================
// Payloads
// ============================================================================

/// Registration payload after field-name normalization, before validation
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterPayload {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl RegisterPayload {
    /// Normalize a raw JSON body
    ///
    /// `first_name`/`last_name` win over `firstName`/`lastName` when both
    /// spellings are present. Values that cannot be read as text are
    /// reported against their field.
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let map = body
            .as_object()
            .ok_or_else(|| FieldErrors::non_field(MSG_NOT_AN_OBJECT))?;
        let mut errors = FieldErrors::new();

        let payload = Self {
            username: text_field(map, FIELD_USERNAME, &[FIELD_USERNAME], &mut errors),
            password: text_field(map, FIELD_PASSWORD, &[FIELD_PASSWORD], &mut errors),
            first_name: text_field(
                map,
                FIELD_FIRST_NAME,
                &[FIELD_FIRST_NAME, "firstName"],
                &mut errors,
            ),
            last_name: text_field(
                map,
                FIELD_LAST_NAME,
                &[FIELD_LAST_NAME, "lastName"],
                &mut errors,
            ),
            email: text_field(map, FIELD_EMAIL, &[FIELD_EMAIL], &mut errors),
            phone_number: text_field(map, FIELD_PHONE, &[FIELD_PHONE], &mut errors),
        };

        errors.into_result(|| payload)
    }

    /// Keys present in the payload, for request logging without values
    pub fn present_fields(&self) -> Vec<&'static str> {
        [
            (FIELD_USERNAME, self.username.is_some()),
            (FIELD_PASSWORD, self.password.is_some()),
            (FIELD_FIRST_NAME, self.first_name.is_some()),
            (FIELD_LAST_NAME, self.last_name.is_some()),
            (FIELD_EMAIL, self.email.is_some()),
            (FIELD_PHONE, self.phone_number.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

impl std::fmt::Debug for RegisterPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterPayload")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Login payload before validation
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginPayload {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginPayload {
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let map = body
            .as_object()
            .ok_or_else(|| FieldErrors::non_field(MSG_NOT_AN_OBJECT))?;
        let mut errors = FieldErrors::new();

        let payload = Self {
            username: text_field(map, FIELD_USERNAME, &[FIELD_USERNAME], &mut errors),
            password: text_field(map, FIELD_PASSWORD, &[FIELD_PASSWORD], &mut errors),
        };

        errors.into_result(|| payload)
    }
}

impl std::fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPayload")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Read the first present key of `keys` as text
///
/// `null` counts as absent; numbers are taken in their decimal form.
fn text_field(
    map: &Map<String, Value>,
    field: &str,
    keys: &[&str],
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = keys.iter().find_map(|key| map.get(*key))?;
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            errors.add(field, MSG_NOT_A_STRING);
            None
        }
    }
}

// ============================================================================
// Validated output
// ============================================================================

/// Registration fields that passed validation
///
/// Names are trimmed; blank contact fields are `None`; the password is
/// kept exactly as submitted.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl std::fmt::Debug for ValidatedRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedRegistration")
            .field("username", &self.username)
            .field("password", &"***")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Username and password that are both present
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Validate a registration payload
///
/// All field errors are collected. The contact-method rule is checked on
/// the trimmed values whatever the per-field outcome.
pub fn validate_registration(
    payload: &RegisterPayload,
) -> Result<ValidatedRegistration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let username = required(&mut errors, FIELD_USERNAME, payload.username.as_deref())
        .map(str::trim)
        .filter(|u| check_username(&mut errors, u));

    let password = required(&mut errors, FIELD_PASSWORD, payload.password.as_deref())
        .filter(|p| {
            let ok = p.chars().count() >= PASSWORD_MIN_LEN;
            if !ok {
                errors.add(FIELD_PASSWORD, MSG_PASSWORD_TOO_SHORT);
            }
            ok
        });

    let first_name = required(&mut errors, FIELD_FIRST_NAME, payload.first_name.as_deref())
        .map(str::trim)
        .filter(|n| check_max_len(&mut errors, FIELD_FIRST_NAME, n, NAME_MAX_LEN));

    let last_name = required(&mut errors, FIELD_LAST_NAME, payload.last_name.as_deref())
        .map(str::trim)
        .filter(|n| check_max_len(&mut errors, FIELD_LAST_NAME, n, NAME_MAX_LEN));

    let email = optional_trimmed(payload.email.as_deref());
    if let Some(email) = email {
        if check_max_len(&mut errors, FIELD_EMAIL, email, EMAIL_MAX_LEN) && !is_valid_email(email) {
            errors.add(FIELD_EMAIL, MSG_INVALID_EMAIL);
        }
    }

    let phone_number = optional_trimmed(payload.phone_number.as_deref());
    if let Some(phone) = phone_number {
        if !phone.chars().all(|c| c.is_ascii_digit()) {
            errors.add(FIELD_PHONE, MSG_PHONE_DIGITS);
        } else if !matches!(phone.len(), 10 | 11) {
            errors.add(FIELD_PHONE, MSG_PHONE_LENGTH);
        }
    }

    if email.is_none() && phone_number.is_none() {
        errors.add(NON_FIELD_ERRORS, MSG_MISSING_CONTACT);
    }

    errors.into_result(|| ValidatedRegistration {
        // Every field is Some when no error was recorded
        username: username.unwrap_or_default().to_string(),
        password: password.unwrap_or_default().to_string(),
        first_name: first_name.unwrap_or_default().to_string(),
        last_name: last_name.unwrap_or_default().to_string(),
        email: email.map(str::to_string),
        phone_number: phone_number.map(str::to_string),
    })
}

/// Validate a login payload: both fields present and non-blank
pub fn validate_login(payload: &LoginPayload) -> Result<Credentials, FieldErrors> {
    let username = optional_trimmed(payload.username.as_deref());
    let password = payload
        .password
        .as_deref()
        .filter(|p| !p.trim().is_empty());

    match (username, password) {
        (Some(username), Some(password)) => Ok(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }),
        _ => Err(FieldErrors::non_field(MSG_LOGIN_REQUIRED)),
    }
}

/// Present and non-blank, or record why not
fn required<'a>(errors: &mut FieldErrors, field: &str, value: Option<&'a str>) -> Option<&'a str> {
    match value {
        None => {
            errors.add(field, MSG_REQUIRED);
            None
        }
        Some(v) if v.trim().is_empty() => {
            errors.add(field, MSG_BLANK);
            None
        }
        Some(v) => Some(v),
    }
}

fn optional_trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_max_len(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> bool {
    let ok = value.chars().count() <= max;
    if !ok {
        errors.add(
            field,
            format!("Ensure this field has no more than {max} characters."),
        );
    }
    ok
}

/// Email grammar check; the domain must be dotted unless it is `localhost`
fn is_valid_email(email: &str) -> bool {
    let dotted_domain = email.rsplit_once('@').is_some_and(|(_, domain)| {
        domain.eq_ignore_ascii_case("localhost") || domain.contains('.')
    });
    dotted_domain && email.validate_email()
}

fn check_username(errors: &mut FieldErrors, username: &str) -> bool {
    if !check_max_len(errors, FIELD_USERNAME, username, NAME_MAX_LEN) {
        return false;
    }
    let ok = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !ok {
        errors.add(FIELD_USERNAME, MSG_INVALID_USERNAME);
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn alice() -> Value {
        json!({
            "username": "alice",
            "password": "secret1",
            "first_name": "Alice",
            "last_name": "A",
            "email": "a@x.com"
        })
    }

    fn register(body: Value) -> Result<ValidatedRegistration, FieldErrors> {
        validate_registration(&RegisterPayload::from_json(&body)?)
    }

    fn with(mut body: Value, key: &str, value: Value) -> Value {
        body[key] = value;
        body
    }

    fn without(mut body: Value, key: &str) -> Value {
        body.as_object_mut().unwrap().remove(key);
        body
    }

    #[test]
    fn test_valid_registration() {
        let fields = register(alice()).unwrap();

        assert_eq!(fields.username, "alice");
        assert_eq!(fields.password, "secret1");
        assert_eq!(fields.first_name, "Alice");
        assert_eq!(fields.email.as_deref(), Some("a@x.com"));
        assert_eq!(fields.phone_number, None);
    }

    #[test]
    fn test_camel_case_names_accepted() {
        let camel = json!({
            "username": "alice",
            "password": "secret1",
            "firstName": "Alice",
            "lastName": "A",
            "email": "a@x.com"
        });

        assert_eq!(register(camel).unwrap(), register(alice()).unwrap());
    }

    #[test]
    fn test_snake_case_wins_over_camel_case() {
        let body = with(with(alice(), "firstName", json!("Camel")), "lastName", json!("Case"));
        let fields = register(body).unwrap();

        assert_eq!(fields.first_name, "Alice");
        assert_eq!(fields.last_name, "A");
    }

    #[test]
    fn test_required_fields() {
        let errors = register(json!({ "email": "a@x.com" })).unwrap_err();

        for field in ["username", "password", "first_name", "last_name"] {
            assert_eq!(errors.get(field), Some(&[MSG_REQUIRED.to_string()][..]), "{field}");
        }
        assert!(!errors.contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_blank_names_rejected() {
        let errors = register(with(alice(), "last_name", json!("   "))).unwrap_err();
        assert_eq!(errors.get("last_name"), Some(&[MSG_BLANK.to_string()][..]));
    }

    #[test]
    fn test_names_are_trimmed() {
        let fields = register(with(alice(), "first_name", json!("  Alice  "))).unwrap();
        assert_eq!(fields.first_name, "Alice");
    }

    #[test]
    fn test_password_min_length() {
        let errors = register(with(alice(), "password", json!("12345"))).unwrap_err();
        assert_eq!(errors.get("password"), Some(&[MSG_PASSWORD_TOO_SHORT.to_string()][..]));

        assert!(register(with(alice(), "password", json!("123456"))).is_ok());
    }

    #[test]
    fn test_password_is_not_trimmed() {
        let fields = register(with(alice(), "password", json!(" secret1 "))).unwrap();
        assert_eq!(fields.password, " secret1 ");
    }

    #[test]
    fn test_username_characters() {
        assert!(register(with(alice(), "username", json!("a.l+i-c_e@1"))).is_ok());

        let errors = register(with(alice(), "username", json!("al ice"))).unwrap_err();
        assert_eq!(errors.get("username"), Some(&[MSG_INVALID_USERNAME.to_string()][..]));
    }

    #[test]
    fn test_username_too_long() {
        let errors = register(with(alice(), "username", json!("a".repeat(151)))).unwrap_err();
        assert!(errors.get("username").unwrap()[0].contains("150"));
    }

    #[test]
    fn test_invalid_email() {
        let errors = register(with(alice(), "email", json!("not-an-email"))).unwrap_err();

        assert_eq!(errors.get("email"), Some(&[MSG_INVALID_EMAIL.to_string()][..]));
        // A malformed email still counts as a contact method
        assert!(!errors.contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_email_domain_needs_a_dot() {
        let errors = register(with(alice(), "email", json!("a@x"))).unwrap_err();
        assert_eq!(errors.get("email"), Some(&[MSG_INVALID_EMAIL.to_string()][..]));

        assert!(register(with(alice(), "email", json!("a@localhost"))).is_ok());
        assert!(register(with(alice(), "email", json!("a@mail.x.co"))).is_ok());
    }

    #[test]
    fn test_snake_case_phone_key_is_not_read() {
        let body = with(without(alice(), "email"), "phone_number", json!("0912345678"));
        let errors = register(body).unwrap_err();

        assert_eq!(errors.get(NON_FIELD_ERRORS), Some(&[MSG_MISSING_CONTACT.to_string()][..]));
        assert!(!errors.contains("phoneNumber"));
    }

    #[test]
    fn test_missing_contact_method() {
        let errors = register(without(alice(), "email")).unwrap_err();
        assert_eq!(errors.get(NON_FIELD_ERRORS), Some(&[MSG_MISSING_CONTACT.to_string()][..]));

        let blank = with(with(alice(), "email", json!("  ")), "phoneNumber", json!(" "));
        let errors = register(blank).unwrap_err();
        assert_eq!(errors.get(NON_FIELD_ERRORS), Some(&[MSG_MISSING_CONTACT.to_string()][..]));

        let nulls = with(with(alice(), "email", Value::Null), "phoneNumber", Value::Null);
        assert!(register(nulls).unwrap_err().contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_joint_rule_reported_with_field_errors() {
        let errors = register(json!({ "username": "bob" })).unwrap_err();

        assert!(errors.contains("password"));
        assert!(errors.contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_phone_only_registration() {
        let body = with(without(alice(), "email"), "phoneNumber", json!(" 0912345678 "));
        let fields = register(body).unwrap();

        assert_eq!(fields.email, None);
        assert_eq!(fields.phone_number.as_deref(), Some("0912345678"));
    }

    #[test]
    fn test_phone_number_rules() {
        let phone = |p: &str| register(with(alice(), "phoneNumber", json!(p)));

        assert!(phone("0912345678").is_ok());
        assert!(phone("09123456789").is_ok());
        assert_eq!(
            phone("091234567").unwrap_err().get("phoneNumber"),
            Some(&[MSG_PHONE_LENGTH.to_string()][..])
        );
        assert_eq!(
            phone("09123a5678").unwrap_err().get("phoneNumber"),
            Some(&[MSG_PHONE_DIGITS.to_string()][..])
        );
        assert_eq!(phone("091234567890").unwrap_err().get("phoneNumber").unwrap().len(), 1);
    }

    #[test]
    fn test_numeric_values_coerced() {
        let body = with(without(alice(), "email"), "phoneNumber", json!(9123456789u64));
        let fields = register(body).unwrap();
        assert_eq!(fields.phone_number.as_deref(), Some("9123456789"));
    }

    #[test]
    fn test_non_string_values_rejected() {
        let errors =
            RegisterPayload::from_json(&with(alice(), "username", json!(true))).unwrap_err();
        assert_eq!(errors.get("username"), Some(&[MSG_NOT_A_STRING.to_string()][..]));

        let body = with(without(alice(), "last_name"), "lastName", json!([1]));
        let errors = RegisterPayload::from_json(&body).unwrap_err();
        // Reported under the canonical field name
        assert_eq!(errors.get("last_name"), Some(&[MSG_NOT_A_STRING.to_string()][..]));
    }

    #[test]
    fn test_non_object_body() {
        let errors = RegisterPayload::from_json(&json!(["alice"])).unwrap_err();
        assert_eq!(errors.get(NON_FIELD_ERRORS), Some(&[MSG_NOT_AN_OBJECT.to_string()][..]));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let payload = RegisterPayload::from_json(&alice()).unwrap();
        let fields = validate_registration(&payload).unwrap();
        let credentials = validate_login(&LoginPayload {
            username: Some("alice".into()),
            password: Some("secret1".into()),
        })
        .unwrap();

        for rendered in [
            format!("{payload:?}"),
            format!("{fields:?}"),
            format!("{credentials:?}"),
        ] {
            assert!(!rendered.contains("secret1"), "{rendered}");
            assert!(rendered.contains("***"));
        }
    }

    #[test]
    fn test_present_fields() {
        let payload =
            RegisterPayload::from_json(&json!({ "username": "a", "firstName": "A" })).unwrap();
        assert_eq!(payload.present_fields(), vec!["username", "first_name"]);
    }

    #[test]
    fn test_login_validation() {
        let login = |body: Value| validate_login(&LoginPayload::from_json(&body)?);

        let credentials = login(json!({ "username": " alice ", "password": "secret1" })).unwrap();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "secret1");

        for body in [
            json!({}),
            json!({ "username": "alice" }),
            json!({ "password": "secret1" }),
            json!({ "username": "", "password": "secret1" }),
            json!({ "username": "alice", "password": "   " }),
        ] {
            let errors = login(body).unwrap_err();
            assert_eq!(errors.get(NON_FIELD_ERRORS), Some(&[MSG_LOGIN_REQUIRED.to_string()][..]));
        }
    }

    #[test]
    fn test_field_errors_wire_shape() {
        let mut errors = FieldErrors::single("email", MSG_INVALID_EMAIL);
        errors.add(NON_FIELD_ERRORS, MSG_MISSING_CONTACT);

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({
                "email": [MSG_INVALID_EMAIL],
                "non_field_errors": [MSG_MISSING_CONTACT]
            })
        );
        assert!(errors.to_string().starts_with("email: "));
    }

    proptest! {
        #[test]
        fn prop_ten_or_eleven_digits_accepted(phone in "[0-9]{10,11}") {
            let body = with(without(alice(), "email"), "phoneNumber", json!(phone));
            prop_assert!(register(body).is_ok());
        }

        #[test]
        fn prop_other_digit_lengths_rejected(phone in "[0-9]{1,9}|[0-9]{12,20}") {
            let errors = register(with(alice(), "phoneNumber", json!(phone))).unwrap_err();
            prop_assert_eq!(errors.get("phoneNumber"), Some(&[MSG_PHONE_LENGTH.to_string()][..]));
        }

        #[test]
        fn prop_letters_in_phone_rejected(
            prefix in "[0-9]{0,5}",
            letter in "[a-zA-Z]",
            suffix in "[0-9]{0,5}",
        ) {
            let phone = format!("{prefix}{letter}{suffix}");
            let errors = register(with(alice(), "phoneNumber", json!(phone))).unwrap_err();
            prop_assert_eq!(errors.get("phoneNumber"), Some(&[MSG_PHONE_DIGITS.to_string()][..]));
        }

        #[test]
        fn prop_whitespace_contacts_always_rejected(email in "[ \t]{0,4}", phone in "[ \t]{0,4}") {
            let body = with(with(alice(), "email", json!(email)), "phoneNumber", json!(phone));
            let errors = register(body).unwrap_err();
            prop_assert!(errors.contains(NON_FIELD_ERRORS));
        }
    }
}
