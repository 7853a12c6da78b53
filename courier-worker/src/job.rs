//! Queue message model.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{Result, WorkerError};

/// One unit of work decoded from a queue message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Job {
    /// Job identifier, kept as a string whatever its JSON type.
    #[serde(deserialize_with = "job_id")]
    pub job_id: String,

    /// Notification type selecting the template.
    #[serde(rename = "type", default)]
    pub job_type: String,

    /// Recipients in delivery order.
    #[serde(default)]
    pub recipients: Vec<RecipientSpec>,

    /// Subject override.
    #[serde(default)]
    pub custom_subject: Option<String>,

    /// HTML body override.
    #[serde(default)]
    pub custom_html: Option<String>,
}

impl Job {
    /// Decode a job from a message body.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(WorkerError::from)
    }
}

/// One recipient entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipientSpec {
    /// Target address. Missing decodes as empty and fails validation later.
    #[serde(default)]
    pub email: String,

    /// Template fields, either a JSON-encoded string or an object.
    #[serde(default)]
    pub recipient_data: Value,
}

impl RecipientSpec {
    /// Create a recipient with already-decoded data.
    pub fn new(email: impl Into<String>, data: Value) -> Self {
        Self {
            email: email.into(),
            recipient_data: data,
        }
    }

    /// Decode the template fields into a JSON object.
    pub fn data(&self) -> std::result::Result<Value, String> {
        let value = match &self.recipient_data {
            Value::Null => return Err("missing recipient_data".to_string()),
            Value::String(encoded) => serde_json::from_str(encoded).map_err(|e| e.to_string())?,
            other => other.clone(),
        };

        if value.is_object() {
            Ok(value)
        } else {
            Err(format!("expected a JSON object, found {}", kind(&value)))
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn job_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum JobId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match JobId::deserialize(deserializer)? {
        JobId::Text(s) => s,
        JobId::Signed(n) => n.to_string(),
        JobId::Unsigned(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_message() {
        let job = Job::from_json(
            r#"{
                "job_id": 42,
                "type": "user_created",
                "recipients": [
                    {"email": "ana@x.com", "recipient_data": "{\"firstname\":\"Ana\"}"}
                ],
                "custom_subject": "Hi",
                "custom_html": "<p>X</p>"
            }"#,
        )
        .unwrap();

        assert_eq!(job.job_id, "42");
        assert_eq!(job.job_type, "user_created");
        assert_eq!(job.recipients.len(), 1);
        assert_eq!(job.custom_subject.as_deref(), Some("Hi"));
        assert_eq!(job.custom_html.as_deref(), Some("<p>X</p>"));
        assert_eq!(job.recipients[0].data().unwrap(), json!({"firstname": "Ana"}));
    }

    #[test]
    fn test_string_job_id() {
        let job = Job::from_json(r#"{"job_id": "abc-1", "type": "x"}"#).unwrap();
        assert_eq!(job.job_id, "abc-1");
        assert!(job.recipients.is_empty());
        assert!(job.custom_subject.is_none());
    }

    #[test]
    fn test_missing_job_id_is_error() {
        let err = Job::from_json(r#"{"type": "x", "recipients": []}"#).unwrap_err();
        assert!(matches!(err, WorkerError::Decode(_)));
    }

    #[test]
    fn test_not_json_is_error() {
        assert!(matches!(Job::from_json("not json"), Err(WorkerError::Decode(_))));
    }

    #[test]
    fn test_missing_email_is_empty() {
        let job =
            Job::from_json(r#"{"job_id": 1, "recipients": [{"recipient_data": "{}"}]}"#).unwrap();
        assert_eq!(job.recipients[0].email, "");
    }

    #[test]
    fn test_object_recipient_data() {
        let spec = RecipientSpec::new("ana@x.com", json!({"firstname": "Ana"}));
        assert_eq!(spec.data().unwrap()["firstname"], "Ana");
    }

    #[test]
    fn test_invalid_recipient_data() {
        let not_json = RecipientSpec::new("a@x.com", json!("{oops"));
        assert!(not_json.data().is_err());

        let list = RecipientSpec::new("a@x.com", json!("[1, 2]"));
        assert_eq!(list.data().unwrap_err(), "expected a JSON object, found an array");

        let missing = RecipientSpec::new("a@x.com", Value::Null);
        assert_eq!(missing.data().unwrap_err(), "missing recipient_data");
    }
}
