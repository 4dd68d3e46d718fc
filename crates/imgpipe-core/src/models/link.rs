use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed retrieval link for a published artifact, and where it was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLink {
    /// Key of the stored image (`<id>.jpg`)
    pub object_key: String,
    /// Key of the sidecar text object holding `url` (`<id>_url.txt`)
    pub link_key: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}
