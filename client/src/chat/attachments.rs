//! Staged attachments
//!
//! Audio and image resources waiting to be sent with the next submission.

use crate::chat::models::MediaAsset;
use serde::{Deserialize, Serialize};

/// Where a staged image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSource {
    /// Picked from the photo library
    Library,
    /// Captured with the camera
    Camera,
}

/// Names one attachment slot, for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentKind {
    /// The recorded audio clip
    Audio,
    /// The library image
    Image,
    /// The camera image
    Camera,
}

impl From<ImageSource> for AttachmentKind {
    fn from(source: ImageSource) -> Self {
        match source {
            ImageSource::Library => AttachmentKind::Image,
            ImageSource::Camera => AttachmentKind::Camera,
        }
    }
}

/// Attachments staged for the next submission
///
/// Each slot holds at most one resource. A library image and a camera image
/// may both be staged; the camera image wins when the payload is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedAttachments {
    audio: Option<MediaAsset>,
    library_image: Option<MediaAsset>,
    camera_image: Option<MediaAsset>,
}

impl StagedAttachments {
    /// Stage a recorded clip, replacing any previous one
    pub fn set_audio(&mut self, asset: MediaAsset) {
        self.audio = Some(asset);
    }

    /// Stage an image in the slot for its source
    pub fn set_image(&mut self, source: ImageSource, asset: MediaAsset) {
        match source {
            ImageSource::Library => self.library_image = Some(asset),
            ImageSource::Camera => self.camera_image = Some(asset),
        }
    }

    /// Clear one slot, returning what it held
    pub fn remove(&mut self, kind: AttachmentKind) -> Option<MediaAsset> {
        match kind {
            AttachmentKind::Audio => self.audio.take(),
            AttachmentKind::Image => self.library_image.take(),
            AttachmentKind::Camera => self.camera_image.take(),
        }
    }

    /// Staged audio clip
    pub fn audio(&self) -> Option<&MediaAsset> {
        self.audio.as_ref()
    }

    /// Staged image for a source
    pub fn image(&self, source: ImageSource) -> Option<&MediaAsset> {
        match source {
            ImageSource::Library => self.library_image.as_ref(),
            ImageSource::Camera => self.camera_image.as_ref(),
        }
    }

    /// The image that would be sent: camera first, then library
    pub fn surviving_image(&self) -> Option<&MediaAsset> {
        self.camera_image.as_ref().or(self.library_image.as_ref())
    }

    /// True if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.library_image.is_none() && self.camera_image.is_none()
    }

    /// Empty every slot, returning the previous contents
    pub fn take(&mut self) -> StagedAttachments {
        std::mem::take(self)
    }
}
