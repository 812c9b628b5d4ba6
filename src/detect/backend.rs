use anyhow::Result;

use crate::BoundingBox;

/// One raw detection from a backend: a pixel-coordinate box with
/// `x1 < x2`, `y1 < y2` inside the image, a class name drawn from the
/// backend's vocabulary, and a confidence in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_name: String,
    pub confidence: f32,
}

/// Detection backend trait.
///
/// Implementations must be deterministic per model version, must treat
/// the pixel slice as read-only, and must emit class names only from
/// their own `class_names` vocabulary. The vocabulary is queried once at
/// session startup and treated as immutable thereafter.
pub trait DetectorBackend: Send {
    /// Backend identifier, used as the registry key.
    fn name(&self) -> &'static str;

    /// Fixed, ordered class vocabulary this backend can emit.
    fn class_names(&self) -> &[String];

    /// Run detection on a tightly packed RGB8 buffer.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>>;
}
