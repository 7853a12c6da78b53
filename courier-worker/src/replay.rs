//! Local replay of queue input without AWS.

use aws_lambda_events::sqs::SqsEvent;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::{BatchResponse, JobIntake, Result, runtime::handle_event};

/// Read replay input from a file, or stdin for `-`.
pub fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(std::fs::read_to_string(Path::new(source))?)
    }
}

/// Interpret replay input as an SQS event.
///
/// A document with a `Records` array is an SQS event; anything else is
/// treated as the body of a single message.
pub fn parse_event(input: &str) -> Result<SqsEvent> {
    let document: Value = serde_json::from_str(input)?;

    if document.get("Records").is_some_and(Value::is_array) {
        return Ok(serde_json::from_value(document)?);
    }

    Ok(serde_json::from_value(serde_json::json!({
        "Records": [{"messageId": "replay-0", "body": input}]
    }))?)
}

/// Replay input through the intake.
pub async fn replay(intake: &JobIntake, input: &str) -> Result<BatchResponse> {
    let event = parse_event(input)?;
    Ok(handle_event(intake, event).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqs_event() {
        let event = parse_event(
            r#"{"Records": [{"messageId": "a", "body": "{}"}, {"messageId": "b", "body": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(event.records.len(), 2);
        assert_eq!(event.records[1].body.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_single_message() {
        let input = r#"{"job_id": 1, "type": "user_created", "recipients": []}"#;
        let event = parse_event(input).unwrap();
        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].body.as_deref(), Some(input));
    }

    #[test]
    fn test_parse_invalid_input() {
        assert!(parse_event("not json").is_err());
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_input("/nonexistent/courier/event.json"),
            Err(crate::WorkerError::Io(_))
        ));
    }
}
