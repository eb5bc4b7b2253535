//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`] typed into a form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty or only whitespace.
    #[error("email cannot be empty")]
    Empty,
    /// The input is longer than the RFC 5321 limit.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input has no `@`, or nothing on one side of it.
    #[error("email must look like name@domain")]
    Malformed,
}

impl EmailError {
    /// Message shown next to the form field.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Empty => "Ingresa tu correo electronico.",
            Self::TooLong { .. } => "El correo electronico es demasiado largo.",
            Self::Malformed => "Ingresa un correo electronico valido.",
        }
    }
}

/// An email address as entered by a customer.
///
/// Parsing trims surrounding whitespace and checks only the coarse
/// `local@domain` shape; the backend owns real validation. Deserialization
/// is transparent and unchecked, since profiles come back from the backend
/// as-is.
///
/// ```
/// use dulces_momentos_core::Email;
///
/// assert!(Email::parse(" ana@pasteleria.com ").is_ok());
/// assert!(Email::parse("sin-arroba").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`], or not of the form `local@domain`.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        match s.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let email = Email::parse("  juan@email.com\n").unwrap();
        assert_eq!(email.as_str(), "juan@email.com");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_rejects_missing_parts() {
        assert_eq!(Email::parse("juan"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@email.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("juan@"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = format!("{}@email.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 254 })
        ));
    }

    #[test]
    fn test_user_messages_are_spanish() {
        assert_eq!(
            EmailError::Malformed.user_message(),
            "Ingresa un correo electronico valido."
        );
    }

    #[test]
    fn test_deserialize_is_unchecked() {
        let email: Email = serde_json::from_str("\"no-es-correo\"").unwrap();
        assert_eq!(email.to_string(), "no-es-correo");
    }
}
