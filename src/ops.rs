use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use image::RgbImage;
use log::{debug, info};
use serde::Serialize;

use crate::config::AnnotatorConfig;
use crate::detect::DetectorBackend;
use crate::input::{normalize_to_pixel_buffer, ImageInput};
use crate::render::Renderer;
use crate::session::AnnotationSession;
use crate::BoundingBox;

/// Literal placeholder label when the backend vocabulary is empty.
const FALLBACK_CLASS: &str = "object";

/// Confidence assigned to user-created boxes; they carry no model score.
const USER_CONFIDENCE: f32 = 1.0;

/// What every operation hands back to the UI layer: the re-rendered
/// image plus the serializable annotation surface, including the echo
/// fields the original widget layout expects (selected label for the
/// class dropdown, selected coordinates for the numeric fields, zeros
/// sentinel when nothing is selected).
#[derive(Clone, Debug, Serialize)]
pub struct EditOutcome {
    #[serde(skip)]
    pub image: Option<RgbImage>,
    pub boxes: Vec<[i32; 4]>,
    pub labels: Vec<String>,
    pub confidences: Vec<f32>,
    pub available_classes: Vec<String>,
    pub selected_label: Option<String>,
    pub selected_coords: [i32; 4],
}

/// Axis-aligned translation commands for the selected box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    fn delta(self, step: i32) -> (i32, i32) {
        match self {
            MoveDirection::Up => (0, -step),
            MoveDirection::Down => (0, step),
            MoveDirection::Left => (-step, 0),
            MoveDirection::Right => (step, 0),
        }
    }
}

impl FromStr for MoveDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(MoveDirection::Up),
            "down" => Ok(MoveDirection::Down),
            "left" => Ok(MoveDirection::Left),
            "right" => Ok(MoveDirection::Right),
            other => Err(anyhow!("unknown direction '{}'", other)),
        }
    }
}

/// The edit protocol: one method per UI event, each running to
/// completion against the owned session and returning a fresh
/// [`EditOutcome`].
///
/// Error policy: preconditions that do not hold (no image, no
/// selection) and invalid inputs (unknown class, non-numeric
/// coordinates) degrade to silent no-ops; only the detection adapter
/// propagates hard failures.
pub struct Annotator {
    session: AnnotationSession,
    renderer: Renderer,
    backend: Arc<Mutex<dyn DetectorBackend>>,
    box_size: u32,
    move_step: i32,
}

impl Annotator {
    /// Queries the backend vocabulary once; the session keeps it for its
    /// whole lifetime.
    pub fn new(backend: Arc<Mutex<dyn DetectorBackend>>, cfg: &AnnotatorConfig) -> Result<Self> {
        let available_classes = {
            let guard = backend
                .lock()
                .map_err(|_| anyhow!("detector backend lock poisoned"))?;
            guard.class_names().to_vec()
        };
        Ok(Self {
            session: AnnotationSession::new(available_classes),
            renderer: Renderer::new(),
            backend,
            box_size: cfg.box_size,
            move_step: cfg.move_step,
        })
    }

    /// Convenience constructor wrapping an owned backend.
    pub fn with_backend<B: DetectorBackend + 'static>(
        backend: B,
        cfg: &AnnotatorConfig,
    ) -> Result<Self> {
        Self::new(Arc::new(Mutex::new(backend)), cfg)
    }

    pub fn session(&self) -> &AnnotationSession {
        &self.session
    }

    /// Re-render the current state without mutating anything.
    pub fn snapshot(&self) -> EditOutcome {
        self.outcome()
    }

    /// Run detection on a new image, replacing the session's image and
    /// annotation set wholesale and clearing the selection.
    ///
    /// Soft-fails to an empty outcome when no image is supplied (the
    /// session keeps its previous state). Adapter and decode errors
    /// propagate to the caller; the session is untouched on failure.
    pub fn run_detection(&mut self, input: Option<&ImageInput>) -> Result<EditOutcome> {
        let Some(input) = input else {
            debug!("run_detection without an image");
            return Ok(self.empty_outcome());
        };

        let image = normalize_to_pixel_buffer(input)?;
        let detections = {
            let mut guard = self
                .backend
                .lock()
                .map_err(|_| anyhow!("detector backend lock poisoned"))?;
            guard.detect(image.as_raw(), image.width(), image.height())?
        };
        info!(
            "detection proposed {} boxes on a {}x{} image",
            detections.len(),
            image.width(),
            image.height()
        );

        self.session.replace_detections(image, detections);
        Ok(self.outcome())
    }

    /// Select the first box in storage order whose extent contains
    /// `(x, y)` inclusively; clear the selection when none does.
    /// Overlapping boxes resolve by insertion order, not z-order or
    /// area: a documented simplification.
    pub fn select_at_point(&mut self, x: i32, y: i32) -> EditOutcome {
        if self.session.image().is_none() || self.session.is_empty() {
            return self.outcome();
        }

        match self.session.boxes().iter().position(|b| b.contains(x, y)) {
            Some(index) => {
                self.session.select(index);
                debug!("selected box {} at ({}, {})", index, x, y);
            }
            None => self.session.clear_selection(),
        }
        self.outcome()
    }

    /// Append a fixed-size box centered on the image (clamped to its
    /// bounds) with confidence 1.0, and select it. Unknown class names
    /// fall back to the first vocabulary entry, or to a placeholder when
    /// the vocabulary is empty. No-op without an image.
    pub fn create_label(&mut self, class_name: &str) -> EditOutcome {
        let Some(image) = self.session.image() else {
            debug!("create_label without an image");
            return self.empty_outcome();
        };
        let (width, height) = image.dimensions();

        let bbox = BoundingBox::centered(width, height, self.box_size);
        let label = if self.session.is_known_class(class_name) {
            class_name.to_string()
        } else {
            self.session
                .available_classes()
                .first()
                .cloned()
                .unwrap_or_else(|| FALLBACK_CLASS.to_string())
        };

        let index = self.session.push_annotation(bbox, label, USER_CONFIDENCE);
        self.session.select(index);
        self.outcome()
    }

    /// Remove the selected entry from all three sequences (later entries
    /// shift down) and clear the selection. No-op without a selection,
    /// so calling it twice in a row deletes exactly once.
    pub fn delete_selected(&mut self) -> EditOutcome {
        if let Some(index) = self.session.selected() {
            self.session.remove(index);
            debug!("deleted box {}", index);
        }
        self.outcome()
    }

    /// Overwrite the selected box's label. No-op unless a box is
    /// selected and the class belongs to the vocabulary; a stale
    /// dropdown state must never corrupt the session.
    pub fn update_selected_class(&mut self, new_class: &str) -> EditOutcome {
        if let Some(index) = self.session.selected() {
            if !self.session.set_label(index, new_class) {
                debug!("rejected class update '{}': not in vocabulary", new_class);
            }
        }
        self.outcome()
    }

    /// Replace the selected box's corners with the parsed field values.
    /// Any field that fails numeric coercion rejects the whole update.
    /// No ordering or bounds validation is applied: `x1 > x2` and
    /// off-image corners are accepted as-is.
    pub fn set_box_coordinates(&mut self, x1: &str, y1: &str, x2: &str, y2: &str) -> EditOutcome {
        if let Some(index) = self.session.selected() {
            match parse_coordinate_fields([x1, y1, x2, y2]) {
                Some(coords) => {
                    self.session.set_box(index, coords.into());
                }
                None => debug!("rejected coordinate update: non-numeric input"),
            }
        }
        self.outcome()
    }

    /// Translate both corners of the selected box along one axis.
    /// `step` defaults to the configured move step. No clamping against
    /// the image: boxes may be moved partially or fully outside.
    pub fn move_selected(&mut self, direction: MoveDirection, step: Option<i32>) -> EditOutcome {
        if let Some(index) = self.session.selected() {
            let (dx, dy) = direction.delta(step.unwrap_or(self.move_step));
            let mut bbox = self.session.boxes()[index];
            bbox.translate(dx, dy);
            self.session.set_box(index, bbox);
        }
        self.outcome()
    }

    /// The "no image" result: empty surface, nothing rendered. The class
    /// vocabulary is still echoed so a UI dropdown never loses its
    /// choices.
    fn empty_outcome(&self) -> EditOutcome {
        EditOutcome {
            image: None,
            boxes: Vec::new(),
            labels: Vec::new(),
            confidences: Vec::new(),
            available_classes: self.session.available_classes().to_vec(),
            selected_label: None,
            selected_coords: [0; 4],
        }
    }

    fn outcome(&self) -> EditOutcome {
        EditOutcome {
            image: self.renderer.render(&self.session),
            boxes: self.session.boxes().iter().map(|b| b.to_array()).collect(),
            labels: self.session.labels().to_vec(),
            confidences: self.session.confidences().to_vec(),
            available_classes: self.session.available_classes().to_vec(),
            selected_label: self.session.selected_label().map(str::to_string),
            selected_coords: self
                .session
                .selected_box()
                .map(|b| b.to_array())
                .unwrap_or([0; 4]),
        }
    }
}

/// Explicit coercion step for the four coordinate text fields. Numeric
/// input (integer or float) truncates toward zero, matching the
/// original's `int()` coercion; anything else fails the whole parse.
fn parse_coordinate_fields(fields: [&str; 4]) -> Option<[i32; 4]> {
    let mut out = [0i32; 4];
    for (slot, field) in out.iter_mut().zip(fields) {
        let value: f64 = field.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        *slot = value.trunc() as i32;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_fields_accept_integers_and_floats() {
        assert_eq!(
            parse_coordinate_fields(["10", " 20 ", "30.9", "-4.2"]),
            Some([10, 20, 30, -4])
        );
    }

    #[test]
    fn coordinate_fields_reject_non_numeric_input() {
        assert_eq!(parse_coordinate_fields(["a", "0", "10", "10"]), None);
        assert_eq!(parse_coordinate_fields(["", "0", "10", "10"]), None);
        assert_eq!(parse_coordinate_fields(["nan", "0", "10", "10"]), None);
    }

    #[test]
    fn directions_map_to_axis_deltas() {
        assert_eq!(MoveDirection::Up.delta(5), (0, -5));
        assert_eq!(MoveDirection::Down.delta(5), (0, 5));
        assert_eq!(MoveDirection::Left.delta(5), (-5, 0));
        assert_eq!(MoveDirection::Right.delta(5), (5, 0));
        assert!("north".parse::<MoveDirection>().is_err());
        assert_eq!("Right".parse::<MoveDirection>().unwrap(), MoveDirection::Right);
    }
}
