//! Client-side form validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[가-힣a-zA-Z0-9]{2,8}$").expect("name pattern compiles")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// A form field that failed validation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("2~8자, 한글/영어/숫자만 입력할 수 있어요.")]
    Nickname,

    #[error("올바른 이메일 형식이 아닙니다.")]
    Email,

    #[error("비밀번호는 8자 이상, 영문과 숫자를 포함해야 합니다.")]
    Password,

    #[error("비밀번호가 일치하지 않습니다.")]
    PasswordMismatch,
}

/// 2-8 characters, each a Hangul syllable, a Latin letter or a digit
pub fn validate_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

pub fn validate_nickname(name: &str) -> Result<(), ValidationError> {
    if validate_name(name) {
        Ok(())
    } else {
        Err(ValidationError::Nickname)
    }
}

/// Hint shown under the nickname field while typing
pub fn nickname_hint(value: &str) -> Option<String> {
    validate_nickname(value).err().map(|e| e.to_string())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::Email)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::Password)
    }
}

pub fn validate_password_confirm(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password == confirm {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}
