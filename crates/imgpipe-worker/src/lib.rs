//! imgpipe worker
//!
//! Runs queue messages through fetch, format check, transform and publish. The Lambda binary
//! feeds it SQS batches; `imgpipe-local` feeds it a single message from the command line.

pub mod dispatcher;
pub mod lambda;
pub mod telemetry;

pub use dispatcher::{Dispatcher, QueuedMessage};
pub use lambda::handle_sqs_event;
pub use telemetry::init_telemetry;
