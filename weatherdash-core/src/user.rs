use thiserror::Error;

use crate::locale::{self, Key, Language};

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 31;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UserNameError {
    #[error("user name is required")]
    Required,
    #[error("user name must be at least 2 characters")]
    TooShort,
    #[error("user name must be at most 31 characters")]
    TooLong,
}

impl UserNameError {
    pub fn user_message(&self, lang: Language) -> &'static str {
        let key = match self {
            UserNameError::Required => Key::NameRequired,
            UserNameError::TooShort => Key::NameTooShort,
            UserNameError::TooLong => Key::NameTooLong,
        };
        locale::text(lang, key)
    }
}

/// Trim `input` and check its length in characters; returns the trimmed name.
pub fn validate_user_name(input: &str) -> Result<String, UserNameError> {
    let name = input.trim();
    let len = name.chars().count();

    match len {
        0 => Err(UserNameError::Required),
        n if n < MIN_NAME_CHARS => Err(UserNameError::TooShort),
        n if n > MAX_NAME_CHARS => Err(UserNameError::TooLong),
        _ => Ok(name.to_string()),
    }
}
