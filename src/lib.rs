//! labelkit
//!
//! In-memory kernel for interactive bounding-box annotation on top of an
//! object-detection backend. A detection run proposes boxes with class
//! labels and confidences; the edit protocol then lets a UI select, move,
//! relabel, create, and delete boxes before exporting the corrected set.
//!
//! # Architecture
//!
//! All coordination passes through one mutable [`AnnotationSession`]:
//!
//! - `session`: the single source of truth for the current image and its
//!   aligned boxes/labels/confidences plus the optional selection.
//! - `ops`: the edit protocol. Each operation reads or mutates the session
//!   and returns a freshly rendered [`EditOutcome`].
//! - `render`: pure projection of session state onto a drawn image.
//! - `detect`: the detection backend seam (trait, stub, registry).
//! - `input`: normalization of accepted image representations into one
//!   RGB8 pixel buffer type.
//! - `config`: defaults, optional JSON config file, env overrides.
//!
//! Event delivery is assumed synchronous and serialized: one operation
//! runs to completion before the next. Sessions are plain owned values;
//! callers that introduce concurrency own the locking.

pub mod config;
pub mod detect;
pub mod input;
pub mod ops;
pub mod render;
pub mod session;

pub use config::AnnotatorConfig;
pub use detect::{BackendRegistry, Detection, DetectorBackend, FixedBackend, StubBackend};
pub use input::{normalize_to_pixel_buffer, ImageInput};
pub use ops::{Annotator, EditOutcome, MoveDirection};
pub use render::Renderer;
pub use session::AnnotationSession;

// -------------------- Bounding Boxes --------------------

/// Axis-aligned rectangle in pixel coordinates.
///
/// Detector output and newly created boxes satisfy `x1 < x2` and
/// `y1 < y2` within the image bounds. User edits are not re-validated:
/// a box may be moved outside the image or given inverted corners, and
/// the session keeps whatever it was given. Only the render pass clamps,
/// and only for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Fixed-size box centered on a `width` x `height` image, clamped so it
    /// never extends outside `[0, width] x [0, height]`.
    pub fn centered(width: u32, height: u32, size: u32) -> Self {
        let w = width as i32;
        let h = height as i32;
        let half = size as i32 / 2;
        Self {
            x1: (w / 2 - half).max(0),
            y1: (h / 2 - half).max(0),
            x2: (w / 2 + half).min(w),
            y2: (h / 2 + half).min(h),
        }
    }

    /// Containment test, inclusive on all four edges.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x1 += dx;
        self.x2 += dx;
        self.y1 += dy;
        self.y2 += dy;
    }

    pub fn to_array(&self) -> [i32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}
