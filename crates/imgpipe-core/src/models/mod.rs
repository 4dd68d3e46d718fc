//! Domain models
//!
//! The inbound queue message, the parsed job it becomes, and the link produced for each
//! published artifact.

pub mod dimensions;
pub mod link;
pub mod message;

pub use dimensions::Dimensions;
pub use link::AccessLink;
pub use message::{ImageReference, InboundMessage, PreparedJob};
