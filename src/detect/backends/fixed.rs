use anyhow::Result;

use crate::detect::backend::{Detection, DetectorBackend};

/// Backend that replays a preset detection list on every call.
///
/// Stands in for a real model in integration tests and demos where the
/// expected boxes must be known in advance.
pub struct FixedBackend {
    class_names: Vec<String>,
    detections: Vec<Detection>,
}

impl FixedBackend {
    pub fn new(class_names: Vec<String>, detections: Vec<Detection>) -> Self {
        Self {
            class_names,
            detections,
        }
    }
}

impl DetectorBackend for FixedBackend {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn class_names(&self) -> &[String] {
        &self.class_names
    }

    fn detect(&mut self, _pixels: &[u8], _width: u32, _height: u32) -> Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundingBox;

    #[test]
    fn replays_the_preset_list_every_call() -> Result<()> {
        let mut backend = FixedBackend::new(
            vec!["cat".to_string()],
            vec![Detection {
                bbox: BoundingBox::new(1, 2, 3, 4),
                class_name: "cat".to_string(),
                confidence: 0.5,
            }],
        );
        let pixels = vec![0u8; 16 * 16 * 3];
        assert_eq!(backend.detect(&pixels, 16, 16)?.len(), 1);
        assert_eq!(backend.detect(&pixels, 16, 16)?.len(), 1);
        Ok(())
    }
}
