//! Per-message pipeline and batch handling
//!
//! A batch is processed strictly in order. The first failing message stops the batch and is
//! reported as a [`ProcessingError`]; messages after it are never touched.

use anyhow::Context;
use bytes::Bytes;
use imgpipe_core::{
    AccessLink, Config, LogLevel, ParseError, PipelineError, PreparedJob, ProcessingError,
};
use imgpipe_processing::{detect_format, Fetcher, HttpFetcher, ImageTransformer, TransformOptions};
use imgpipe_storage::{create_storage, Publisher};
use std::sync::Arc;
use tracing::Instrument;

/// One record of an inbound batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueuedMessage {
    pub message_id: Option<String>,
    pub body: Option<String>,
}

impl QueuedMessage {
    pub fn new(message_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: Some(message_id.into()),
            body: Some(body.into()),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    fetcher: Arc<dyn Fetcher>,
    transformer: ImageTransformer,
    publisher: Publisher,
}

impl Dispatcher {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        transformer: ImageTransformer,
        publisher: Publisher,
    ) -> Self {
        Self {
            fetcher,
            transformer,
            publisher,
        }
    }

    /// Build the HTTP client, storage backend and transformer once for the process.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::from_config(config).context("Failed to create HTTP client")?;
        let storage = create_storage(config)
            .await
            .context("Failed to initialize storage backend")?;

        tracing::info!(
            backend = %storage.backend_type(),
            bucket = %storage.bucket(),
            max_download_bytes = config.max_download_bytes,
            fetch_timeout_secs = ?config.fetch_timeout_secs,
            "Dispatcher initialized"
        );

        Ok(Self::new(
            Arc::new(fetcher),
            ImageTransformer::new(TransformOptions::from_config(config)),
            Publisher::new(storage),
        ))
    }

    /// Process every message in order, stopping at the first failure.
    pub async fn handle_batch(
        &self,
        messages: &[QueuedMessage],
    ) -> Result<Vec<AccessLink>, ProcessingError> {
        let start = std::time::Instant::now();
        let mut links = Vec::with_capacity(messages.len());

        for (index, message) in messages.iter().enumerate() {
            let span = tracing::info_span!(
                "message",
                index,
                message_id = message.message_id.as_deref().unwrap_or("-")
            );

            let result = match message.body.as_deref() {
                Some(body) => self.process(body).instrument(span).await,
                None => Err(ParseError::MissingBody.into()),
            };

            match result {
                Ok(link) => links.push(link),
                Err(source) => {
                    log_failure(index, messages.len() - index - 1, message, &source);
                    return Err(ProcessingError {
                        index,
                        message_id: message.message_id.clone(),
                        source,
                    });
                }
            }
        }

        tracing::info!(
            messages = messages.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Batch processed"
        );

        Ok(links)
    }

    /// Run one message body through fetch, format check, transform and publish.
    pub async fn process(&self, body: &str) -> Result<AccessLink, PipelineError> {
        let job = PreparedJob::from_body(body)?;

        tracing::info!(
            image_url = %job.image_url,
            output_id = %job.output_id,
            dimensions = %job.dimensions,
            "Processing message"
        );

        let source = self.fetcher.fetch(&job.image_url).await?;
        let format = detect_format(&source)?;
        tracing::debug!(
            extension = format.extension,
            mime_type = format.mime_type,
            "Detected source format"
        );

        // Decode and resize are CPU-bound
        let transformer = self.transformer.clone();
        let dimensions = job.dimensions;
        let output =
            tokio::task::spawn_blocking(move || transformer.transform(&source, dimensions))
                .await
                .map_err(|e| PipelineError::Internal(format!("Transform task failed: {}", e)))??;

        let link = self
            .publisher
            .publish(&job.output_id, Bytes::from(output))
            .await?;
        Ok(link)
    }
}

/// The single batch-level record of a failed message; components log their own diagnostics.
fn log_failure(index: usize, skipped: usize, message: &QueuedMessage, error: &PipelineError) {
    let message_id = message.message_id.as_deref().unwrap_or("-");
    match error.log_level() {
        LogLevel::Warn => tracing::warn!(
            index,
            skipped,
            message_id = %message_id,
            error_code = error.error_code(),
            error = %error,
            "Message rejected"
        ),
        LogLevel::Error => tracing::error!(
            index,
            skipped,
            message_id = %message_id,
            error_code = error.error_code(),
            error = %error,
            "Message processing failed"
        ),
    }
}
