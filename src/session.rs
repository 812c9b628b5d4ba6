use image::RgbImage;

use crate::detect::Detection;
use crate::BoundingBox;

/// Single source of truth for the current image and its annotation set.
///
/// The three sequences `boxes`, `labels`, and `confidences` are
/// index-aligned 1:1 and only ever change together, through the methods
/// below. `selected` is either `None` or a valid index into them; any
/// mutation that could invalidate it clears or shifts it here, so the
/// edit protocol never has to re-check.
///
/// A session is created once, empty and without an image. A detection
/// run replaces the image and the whole annotation set; every other
/// operation edits entries in place.
#[derive(Debug)]
pub struct AnnotationSession {
    image: Option<RgbImage>,
    boxes: Vec<BoundingBox>,
    labels: Vec<String>,
    confidences: Vec<f32>,
    selected: Option<usize>,
    available_classes: Vec<String>,
}

impl AnnotationSession {
    /// `available_classes` is the detector's fixed vocabulary, queried
    /// once at startup and immutable for the session's lifetime.
    pub fn new(available_classes: Vec<String>) -> Self {
        Self {
            image: None,
            boxes: Vec::new(),
            labels: Vec::new(),
            confidences: Vec::new(),
            selected: None,
            available_classes,
        }
    }

    pub fn image(&self) -> Option<&RgbImage> {
        self.image.as_ref()
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn confidences(&self) -> &[f32] {
        &self.confidences
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn available_classes(&self) -> &[String] {
        &self.available_classes
    }

    pub fn is_known_class(&self, class_name: &str) -> bool {
        self.available_classes.iter().any(|c| c == class_name)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn selected_box(&self) -> Option<BoundingBox> {
        self.selected.map(|i| self.boxes[i])
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected.map(|i| self.labels[i].as_str())
    }

    /// Wholesale replacement after a detection run: new image, new
    /// annotation set, selection cleared. This is the only path that may
    /// replace the box set as a whole.
    pub fn replace_detections(&mut self, image: RgbImage, detections: Vec<Detection>) {
        self.boxes.clear();
        self.labels.clear();
        self.confidences.clear();
        for detection in detections {
            self.boxes.push(detection.bbox);
            self.labels.push(detection.class_name);
            self.confidences.push(detection.confidence);
        }
        self.image = Some(image);
        self.selected = None;
        self.assert_aligned();
    }

    /// Append a user-created annotation and return its index.
    pub fn push_annotation(&mut self, bbox: BoundingBox, label: String, confidence: f32) -> usize {
        debug_assert!(
            self.available_classes.is_empty() || self.is_known_class(&label),
            "committed label must come from the vocabulary"
        );
        self.boxes.push(bbox);
        self.labels.push(label);
        self.confidences.push(confidence);
        self.assert_aligned();
        self.boxes.len() - 1
    }

    /// Remove one entry from all three sequences. Later entries shift
    /// down by one. A selection pointing at the removed entry is cleared;
    /// a selection past it is shifted so it keeps tracking the same box.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.boxes.len() {
            return false;
        }
        self.boxes.remove(index);
        self.labels.remove(index);
        self.confidences.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        self.assert_aligned();
        true
    }

    pub fn set_box(&mut self, index: usize, bbox: BoundingBox) -> bool {
        match self.boxes.get_mut(index) {
            Some(slot) => {
                *slot = bbox;
                true
            }
            None => false,
        }
    }

    /// Overwrite a label. Rejects (returns false) labels outside the
    /// vocabulary; committed labels always belong to `available_classes`.
    pub fn set_label(&mut self, index: usize, label: &str) -> bool {
        if index >= self.labels.len() || !self.is_known_class(label) {
            return false;
        }
        self.labels[index] = label.to_string();
        true
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.boxes.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn assert_aligned(&self) {
        debug_assert_eq!(self.boxes.len(), self.labels.len());
        debug_assert_eq!(self.boxes.len(), self.confidences.len());
        debug_assert!(self.selected.map_or(true, |i| i < self.boxes.len()));
    }
}
