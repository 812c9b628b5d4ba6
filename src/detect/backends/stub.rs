use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::backend::{Detection, DetectorBackend};
use crate::BoundingBox;

/// COCO-style vocabulary subset for the stub.
const STUB_CLASSES: [&str; 10] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "bus",
    "truck",
    "cat",
    "dog",
    "bird",
    "horse",
];

const MAX_STUB_DETECTIONS: usize = 3;
const MIN_IMAGE_SIDE: i32 = 8;

/// Stub backend for wiring and testing. Derives pseudo-detections from a
/// pixel hash, so the same image always proposes the same boxes and a
/// different image usually proposes different ones. No model runs.
pub struct StubBackend {
    class_names: Vec<String>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            class_names: STUB_CLASSES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn class_names(&self) -> &[String] {
        &self.class_names
    }

    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>> {
        let w = width as i32;
        let h = height as i32;
        if w < MIN_IMAGE_SIDE || h < MIN_IMAGE_SIDE {
            return Ok(Vec::new());
        }

        let digest: [u8; 32] = Sha256::digest(pixels).into();
        let count = 1 + (digest[0] as usize) % MAX_STUB_DETECTIONS;

        let mut detections = Vec::with_capacity(count);
        for slot in 0..count {
            let seed = &digest[4 * slot + 1..4 * slot + 5];
            // Center stays in the middle half of the image so the box
            // always has positive extent after clamping.
            let cx = w / 4 + (seed[0] as i32 * w / 2) / 255;
            let cy = h / 4 + (seed[1] as i32 * h / 2) / 255;
            let half_w = (w / 8 + (seed[2] as i32 * w / 8) / 255).max(1);
            let half_h = (h / 8 + (seed[3] as i32 * h / 8) / 255).max(1);

            let bbox = BoundingBox {
                x1: (cx - half_w).max(0),
                y1: (cy - half_h).max(0),
                x2: (cx + half_w).min(w - 1),
                y2: (cy + half_h).min(h - 1),
            };
            let class_index = (seed[0] as usize + slot) % self.class_names.len();
            let confidence = 0.5 + (seed[1] as f32) / 512.0;

            detections.push(Detection {
                bbox,
                class_name: self.class_names[class_index].clone(),
                confidence,
            });
        }

        Ok(detections)
    }
}
