//! Email address types.

use crate::{MailError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// The email address.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
}

impl Address {
    /// Create a new address with just an email.
    pub fn new(email: impl Into<String>) -> Result<Self> {
        let email = email.into();
        validate_email(&email)?;
        Ok(Self { email, name: None })
    }

    /// Create a new address with a display name.
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let email = email.into();
        validate_email(&email)?;
        Ok(Self {
            email,
            name: Some(name.into()),
        })
    }

    /// Parse an address from a string like "Name <email@example.com>" or "email@example.com".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        // Check for "Name <email>" format
        if let Some(start) = s.find('<')
            && let Some(end) = s.find('>')
            && start < end
        {
            let name = s[..start].trim().trim_matches('"');
            let email = s[start + 1..end].trim();

            if name.is_empty() {
                return Self::new(email);
            } else {
                return Self::with_name(email, name);
            }
        }

        Self::new(s)
    }

    /// Get the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Get the display name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

/// Check that an address is plausible enough to hand to a provider.
///
/// Only a non-empty value containing `@` is required; deliverability is the
/// provider's call.
pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(MailError::InvalidAddress(email.to_string()));
    }
    Ok(())
}
