//! imgpipe processing library
//!
//! The three stages between a message and a published artifact:
//! - [`fetch`]: download the source bytes over HTTP
//! - [`validator`]: classify the bytes by signature and reject unsupported formats
//! - [`image`]: orient, resize, sharpen, modulate and re-encode as JPEG

pub mod fetch;
#[cfg(feature = "image")]
pub mod image;
#[cfg(feature = "image")]
pub mod validator;

pub use fetch::{Fetcher, HttpFetcher};
#[cfg(feature = "image")]
pub use crate::image::{ImageTransformer, TransformOptions};
#[cfg(feature = "image")]
pub use validator::{detect_format, DetectedFormat};
