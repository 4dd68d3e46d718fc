use imgpipe_core::Config;
use imgpipe_worker::{handle_sqs_event, init_telemetry, Dispatcher};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    init_telemetry(config.log_format)?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        "Starting imgpipe worker"
    );

    // Clients are built once and reused across invocations of a warm container
    let dispatcher = Arc::new(Dispatcher::from_config(&config).await?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<_>| {
        let dispatcher = dispatcher.clone();
        async move { handle_sqs_event(&dispatcher, event).await }
    }))
    .await
}
