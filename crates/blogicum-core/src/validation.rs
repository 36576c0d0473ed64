//! Input validation for user-submitted forms.
//!
//! Each function collects every failed field into one
//! [`ValidationErrors`] so the API can re-render the whole form state
//! in a single 422 response.

use crate::error::ValidationErrors;

pub const USERNAME_MAX_LEN: usize = 150;
pub const TITLE_MAX_LEN: usize = 256;
pub const PASSWORD_MIN_LEN: usize = 8;

fn check_username(username: &str, errors: &mut Vec<String>) {
    if username.is_empty() {
        errors.push("username must not be empty".to_owned());
    } else if username.chars().count() > USERNAME_MAX_LEN {
        errors.push(format!("username must be at most {USERNAME_MAX_LEN} characters"));
    } else if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.push("username may contain only letters, digits and @.+-_".to_owned());
    }
}

fn check_email(email: &str, errors: &mut Vec<String>) {
    if email.is_empty() || !email.contains('@') {
        errors.push("email address is invalid".to_owned());
    }
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    check_username(username, &mut errors);
    check_email(email, &mut errors);
    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.push(format!("password must be at least {PASSWORD_MIN_LEN} characters"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Profile edits are partial: only the submitted fields are re-checked.
pub fn validate_profile_update(
    username: Option<&str>,
    email: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if let Some(username) = username {
        check_username(username, &mut errors);
    }
    if let Some(email) = email {
        check_email(email, &mut errors);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

pub fn validate_post_input(title: &str, text: &str) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push("title must not be empty".to_owned());
    } else if title.chars().count() > TITLE_MAX_LEN {
        errors.push(format!("title must be at most {TITLE_MAX_LEN} characters"));
    }
    if text.trim().is_empty() {
        errors.push("text must not be empty".to_owned());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

pub fn validate_comment_input(text: &str) -> Result<(), ValidationErrors> {
    if text.trim().is_empty() {
        return Err(ValidationErrors(vec![
            "comment text must not be empty".to_owned(),
        ]));
    }
    Ok(())
}
