//! Object key derivation.
//!
//! Keys are derived from the message's output identifier verbatim; backends apply their own
//! key safety checks.

use imgpipe_core::constants::{ARTIFACT_KEY_SUFFIX, LINK_KEY_SUFFIX};

/// Key of the stored image for an output identifier: `<id>.jpg`
pub fn artifact_key(id: &str) -> String {
    format!("{}{}", id, ARTIFACT_KEY_SUFFIX)
}

/// Key of the sidecar link object for an output identifier: `<id>_url.txt`
pub fn link_key(id: &str) -> String {
    format!("{}{}", id, LINK_KEY_SUFFIX)
}
