//! Email message types.

use crate::{Address, MailError, Result};
use serde::{Deserialize, Serialize};

/// A single composed email, ready to hand to a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Sender address.
    pub from: Address,
    /// To recipients.
    pub to: Vec<Address>,
    /// Email subject.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

impl Email {
    /// Create an email for one recipient.
    pub fn new(
        from: Address,
        to: Address,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to: vec![to],
            subject: subject.into(),
            html: html.into(),
        }
    }

    /// Recipient addresses without display names.
    pub fn recipients(&self) -> Vec<&str> {
        self.to.iter().map(|a| a.email()).collect()
    }

    /// Validate the email.
    pub fn validate(&self) -> Result<()> {
        if self.to.is_empty() {
            return Err(MailError::MissingField("to"));
        }
        if self.subject.is_empty() {
            return Err(MailError::MissingField("subject"));
        }
        if self.html.is_empty() {
            return Err(MailError::MissingField("html body"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn test_new_email() {
        let email = Email::new(
            addr("noreply@example.com"),
            addr("ana@x.com"),
            "Welcome",
            "<p>Hi</p>",
        );

        assert_eq!(email.from.email(), "noreply@example.com");
        assert_eq!(email.recipients(), vec!["ana@x.com"]);
        assert!(email.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_fields() {
        let email = Email::new(addr("a@x.com"), addr("b@x.com"), "", "<p>Hi</p>");
        assert!(matches!(email.validate(), Err(MailError::MissingField("subject"))));

        let email = Email::new(addr("a@x.com"), addr("b@x.com"), "Hi", "");
        assert!(matches!(email.validate(), Err(MailError::MissingField("html body"))));
    }
}
