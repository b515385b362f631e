use lazy_static::lazy_static;
use regex::Regex;

use super::dto::SignupRequest;
use crate::api::ErrDetail;

const PASSWORD_MIN_LEN: usize = 5;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref LETTER_RE: Regex = Regex::new(r"[A-Za-z]").unwrap();
    static ref DIGIT_RE: Regex = Regex::new(r"[0-9]").unwrap();
    static ref SPECIAL_RE: Regex = Regex::new(r"[^A-Za-z0-9\s]").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least one letter, one digit and one special character.
pub(crate) fn matches_password_pattern(password: &str) -> bool {
    LETTER_RE.is_match(password) && DIGIT_RE.is_match(password) && SPECIAL_RE.is_match(password)
}

/// Every rule the signup body breaks, one detail per field.
pub fn validate_signup(req: &SignupRequest) -> Vec<ErrDetail> {
    let mut details = Vec::new();

    if req.email.is_empty() {
        details.push(ErrDetail::field("email", "field is required"));
    } else if !is_valid_email(&req.email) {
        details.push(ErrDetail::field("email", "must be a valid email address"));
    }

    if req.password.is_empty() {
        details.push(ErrDetail::field("password", "field is required"));
    } else if req.password.chars().count() < PASSWORD_MIN_LEN {
        details.push(ErrDetail::field(
            "password",
            format!("must be at least {PASSWORD_MIN_LEN} characters long"),
        ));
    } else if !matches_password_pattern(&req.password) {
        details.push(ErrDetail::field(
            "password",
            "must contain at least one letter, one digit and one special character",
        ));
    }

    if req.confirm_password.is_empty() {
        details.push(ErrDetail::field("confirm_password", "field is required"));
    } else if req.confirm_password != req.password {
        details.push(ErrDetail::field("confirm_password", "must match password"));
    }

    details
}
