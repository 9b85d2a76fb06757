use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

// The password rule mirrors the registration contract: at least 8 chars with
// upper, lower, digit and special. Written as character scans since the regex
// crate has no lookahead.
pub(crate) fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| "#?!@$%^&*-".contains(c))
}

fn require(value: &str, field: &str, errors: &mut Vec<String>) -> bool {
    if value.trim().is_empty() {
        errors.push(format!("The {field} field is required"));
        return false;
    }
    true
}

fn check_email(email: &str, errors: &mut Vec<String>) {
    if require(email, "email", errors) && !is_valid_email(email.trim()) {
        errors.push("Invalid email address".into());
    }
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        require(&self.first_name, "firstName", &mut errors);
        require(&self.last_name, "lastName", &mut errors);
        if require(&self.password, "password", &mut errors)
            && !is_strong_password(&self.password)
        {
            errors.push(
                "The password field must have capital & small letter, number and special character"
                    .into(),
            );
        }
        errors
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        require(&self.password, "password", &mut errors);
        errors
    }
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl RefreshTokenRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&self.refresh_token, "refreshToken", &mut errors);
        errors
    }
}

/// Response returned after register, login or refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expiry_time: String,
    pub refresh_token: String,
}

/// Read projection of the authenticated user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub create_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            password: password.into(),
        }
    }

    #[test]
    fn valid_register_request_passes() {
        let errors = register_request("ada@example.com", "Sunny-Day1").validate();
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn invalid_email_is_reported() {
        let errors = register_request("not-an-email", "Sunny-Day1").validate();
        assert_eq!(errors, vec!["Invalid email address".to_string()]);
    }

    #[test]
    fn weak_passwords_are_rejected() {
        for weak in ["short1!", "alllowercase1!", "ALLUPPERCASE1!", "NoDigits!", "NoSpecial1"] {
            let errors = register_request("ada@example.com", weak).validate();
            assert_eq!(
                errors,
                vec![
                    "The password field must have capital & small letter, number and special character"
                        .to_string()
                ],
                "password {weak:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_fields_are_aggregated() {
        let request = RegisterRequest {
            email: "".into(),
            first_name: "".into(),
            last_name: "".into(),
            password: "".into(),
        };
        let errors = request.validate();
        assert_eq!(
            errors,
            vec![
                "The email field is required".to_string(),
                "The firstName field is required".to_string(),
                "The lastName field is required".to_string(),
                "The password field is required".to_string(),
            ]
        );
    }

    #[test]
    fn refresh_request_requires_token() {
        let errors = RefreshTokenRequest {
            refresh_token: " ".into(),
        }
        .validate();
        assert_eq!(errors, vec!["The refreshToken field is required".to_string()]);
    }

    #[test]
    fn token_response_uses_camel_case() {
        let json = serde_json::to_value(TokenResponse {
            token: "jwt".into(),
            expiry_time: "2026-01-01T12:00:00Z".into(),
            refresh_token: "abc".into(),
        })
        .unwrap();
        assert!(json.get("expiryTime").is_some());
        assert!(json.get("refreshToken").is_some());
    }
}
