mod helpers;

use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use helpers::fixtures::message_body;
use helpers::storage::TestStorage;
use helpers::test_dispatcher;
use imgpipe_worker::handle_sqs_event;
use lambda_runtime::{Context, LambdaEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::Layer;

/// Counts WARN and ERROR events
#[derive(Clone, Default)]
struct ProblemEvents(Arc<AtomicUsize>);

impl ProblemEvents {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: tracing::Subscriber> Layer<S> for ProblemEvents {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
        if *event.metadata().level() <= tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[tokio::test]
async fn test_failed_fetch_is_logged_once_per_layer() {
    let events = ProblemEvents::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/missing.png")
        .with_status(404)
        .create_async()
        .await;
    let storage = TestStorage::new().await;
    let dispatcher = test_dispatcher(&storage);

    let url = format!("{}/missing.png", server.url());
    let mut record = SqsMessage::default();
    record.message_id = Some("m-1".to_string());
    record.body = Some(message_body(&[url.as_str()], "req1", "10x10"));
    let mut event = SqsEvent::default();
    event.records = vec![record];

    handle_sqs_event(&dispatcher, LambdaEvent::new(event, Context::default()))
        .await
        .unwrap_err();

    // Fetcher diagnostic plus the dispatcher's batch-level record
    assert_eq!(events.count(), 2);
}
