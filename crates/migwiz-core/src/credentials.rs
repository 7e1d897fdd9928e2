use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("username must be between 3 and 32 characters")]
    UsernameLength,
    #[error("username must start with a lowercase letter or digit")]
    UsernameFirstCharacter,
    #[error("username contains invalid character '{character}'")]
    UsernameCharacter { character: char },
    #[error("password must be at least 8 characters")]
    PasswordTooShort,
    #[error("password must contain at least one digit")]
    PasswordNeedsDigit,
}

pub fn validate_username(username: &str) -> Result<(), CredentialError> {
    if username.len() < 3 || username.len() > 32 {
        return Err(CredentialError::UsernameLength);
    }

    let mut characters = username.chars();
    let Some(first) = characters.next() else {
        return Err(CredentialError::UsernameLength);
    };

    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return Err(CredentialError::UsernameFirstCharacter);
    }

    for character in characters {
        if character.is_ascii_lowercase()
            || character.is_ascii_digit()
            || character == '.'
            || character == '_'
            || character == '-'
        {
            continue;
        }

        return Err(CredentialError::UsernameCharacter { character });
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.len() < 8 {
        return Err(CredentialError::PasswordTooShort);
    }

    if !password.chars().any(|character| character.is_ascii_digit()) {
        return Err(CredentialError::PasswordNeedsDigit);
    }

    Ok(())
}
