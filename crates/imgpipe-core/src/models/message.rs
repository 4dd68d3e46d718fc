use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::models::Dimensions;

/// Queue message body as produced upstream.
///
/// `image_url` is itself a JSON document (an array of [`ImageReference`]), so decoding a
/// message is two explicit stages: the envelope here, then [`InboundMessage::image_references`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub image_url: String,
    pub user_search: String,
    pub image_size: String,
}

/// One element of the decoded `imageUrl` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub image: String,
}

/// A message after every field has been decoded and validated, before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedJob {
    pub image_url: String,
    pub output_id: String,
    pub dimensions: Dimensions,
}

impl InboundMessage {
    /// Decode the message envelope from a queue record body.
    pub fn from_json(body: &str) -> Result<Self, ParseError> {
        serde_json::from_str(body).map_err(|e| ParseError::Payload(e.to_string()))
    }

    /// Decode the nested `imageUrl` document.
    pub fn image_references(&self) -> Result<Vec<ImageReference>, ParseError> {
        serde_json::from_str(&self.image_url).map_err(|e| ParseError::ImageList(e.to_string()))
    }

    /// The first image of the list; later entries are ignored.
    pub fn first_image(&self) -> Result<ImageReference, ParseError> {
        self.image_references()?
            .into_iter()
            .next()
            .ok_or(ParseError::EmptyImageList)
    }

    pub fn dimensions(&self) -> Result<Dimensions, ParseError> {
        Dimensions::parse(&self.image_size)
    }

    /// Validate every field and produce the job to run.
    pub fn prepare(&self) -> Result<PreparedJob, ParseError> {
        if self.user_search.is_empty() {
            return Err(ParseError::Payload("userSearch must not be empty".to_string()));
        }

        let image = self.first_image()?;
        let dimensions = self.dimensions()?;

        Ok(PreparedJob {
            image_url: image.image,
            output_id: self.user_search.clone(),
            dimensions,
        })
    }
}

impl PreparedJob {
    /// Decode and validate a raw queue record body in one step.
    pub fn from_body(body: &str) -> Result<Self, ParseError> {
        InboundMessage::from_json(body)?.prepare()
    }
}
