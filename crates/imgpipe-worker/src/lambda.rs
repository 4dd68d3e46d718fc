//! SQS trigger adapter

use crate::dispatcher::{Dispatcher, QueuedMessage};
use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{Error, LambdaEvent};

/// Convert SQS records into dispatcher messages, keeping their order.
pub fn queued_messages(event: &SqsEvent) -> Vec<QueuedMessage> {
    event
        .records
        .iter()
        .map(|record| QueuedMessage {
            message_id: record.message_id.clone(),
            body: record.body.clone(),
        })
        .collect()
}

/// Lambda handler: run the whole batch and fail the invocation if any message fails.
pub async fn handle_sqs_event(
    dispatcher: &Dispatcher,
    event: LambdaEvent<SqsEvent>,
) -> Result<(), Error> {
    let (payload, context) = event.into_parts();
    let messages = queued_messages(&payload);

    tracing::info!(
        request_id = %context.request_id,
        records = messages.len(),
        "Received SQS batch"
    );

    match dispatcher.handle_batch(&messages).await {
        Ok(links) => {
            tracing::info!(
                request_id = %context.request_id,
                published = links.len(),
                "SQS batch completed"
            );
            Ok(())
        }
        Err(e) => {
            // Already logged by the dispatcher
            tracing::debug!(
                request_id = %context.request_id,
                index = e.index,
                error_code = e.source.error_code(),
                "SQS batch failed"
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lambda_events::event::sqs::SqsMessage;

    fn record(id: &str, body: Option<&str>) -> SqsMessage {
        let mut message = SqsMessage::default();
        message.message_id = Some(id.to_string());
        message.body = body.map(str::to_string);
        message
    }

    #[test]
    fn test_queued_messages_preserve_order() {
        let mut event = SqsEvent::default();
        event.records = vec![record("m-1", Some("{}")), record("m-2", None)];

        let messages = queued_messages(&event);
        assert_eq!(
            messages,
            vec![
                QueuedMessage::new("m-1", "{}"),
                QueuedMessage {
                    message_id: Some("m-2".to_string()),
                    body: None,
                },
            ]
        );
    }

    #[test]
    fn test_deserialize_sqs_event() {
        let event: SqsEvent = serde_json::from_value(serde_json::json!({
            "Records": [{
                "messageId": "059f36b4-87a3-44ab-83d2-661975830a7d",
                "receiptHandle": "AQEBwJnKyrHigUMZj6rYigCgxlaS3SLy0a",
                "body": "{\"imageUrl\":\"[]\"}",
                "attributes": {
                    "ApproximateReceiveCount": "1",
                    "SentTimestamp": "1545082649183",
                    "SenderId": "AIDAIENQZJOLO23YVJ4VO",
                    "ApproximateFirstReceiveTimestamp": "1545082649185"
                },
                "messageAttributes": {},
                "md5OfBody": "e4e68fb7bd0e697a0ae8f1bb342846b3",
                "eventSource": "aws:sqs",
                "eventSourceARN": "arn:aws:sqs:us-east-2:123456789012:my-queue",
                "awsRegion": "us-east-2"
            }]
        }))
        .unwrap();

        let messages = queued_messages(&event);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].message_id.as_deref(),
            Some("059f36b4-87a3-44ab-83d2-661975830a7d")
        );
        assert_eq!(messages[0].body.as_deref(), Some("{\"imageUrl\":\"[]\"}"));
    }
}
