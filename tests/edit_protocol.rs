//! End-to-end scenarios for the edit protocol, driven through a fixed
//! detection backend so expected boxes are known in advance.

use labelkit::{
    Annotator, AnnotatorConfig, Detection, FixedBackend, ImageInput, MoveDirection,
};

fn detection(bbox: [i32; 4], class_name: &str, confidence: f32) -> Detection {
    Detection {
        bbox: bbox.into(),
        class_name: class_name.to_string(),
        confidence,
    }
}

/// 640x480 image with a cat box and a dog box.
fn cat_dog_annotator() -> Annotator {
    let backend = FixedBackend::new(
        vec!["cat".to_string(), "dog".to_string()],
        vec![
            detection([10, 10, 50, 50], "cat", 0.9),
            detection([100, 100, 150, 150], "dog", 0.8),
        ],
    );
    Annotator::with_backend(backend, &AnnotatorConfig::default()).expect("annotator")
}

fn gray_frame() -> ImageInput {
    ImageInput::Raw {
        pixels: vec![128u8; 640 * 480 * 3],
        width: 640,
        height: 480,
    }
}

fn run_detection(annotator: &mut Annotator) {
    annotator
        .run_detection(Some(&gray_frame()))
        .expect("detection succeeds");
}

fn assert_aligned(annotator: &Annotator) {
    let outcome = annotator.snapshot();
    assert_eq!(outcome.boxes.len(), outcome.labels.len());
    assert_eq!(outcome.boxes.len(), outcome.confidences.len());
}

#[test]
fn detection_populates_the_annotation_surface() {
    let mut annotator = cat_dog_annotator();
    let outcome = annotator
        .run_detection(Some(&gray_frame()))
        .expect("detection succeeds");

    assert_eq!(outcome.boxes, vec![[10, 10, 50, 50], [100, 100, 150, 150]]);
    assert_eq!(outcome.labels, vec!["cat", "dog"]);
    assert_eq!(outcome.confidences, vec![0.9, 0.8]);
    assert_eq!(outcome.available_classes, vec!["cat", "dog"]);
    assert_eq!(outcome.selected_label, None);
    assert_eq!(outcome.selected_coords, [0, 0, 0, 0]);
    assert!(outcome.image.is_some());
}

#[test]
fn detection_without_an_image_soft_fails_and_keeps_state() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);

    let outcome = annotator.run_detection(None).expect("soft failure");
    assert!(outcome.boxes.is_empty());
    assert!(outcome.image.is_none());
    // The dropdown vocabulary survives the soft failure.
    assert_eq!(outcome.available_classes, vec!["cat", "dog"]);

    // The session itself is untouched.
    assert_eq!(annotator.snapshot().boxes.len(), 2);
}

#[test]
fn rerun_replaces_the_box_set_wholesale_and_clears_selection() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);
    annotator.create_label("dog");
    assert_eq!(annotator.snapshot().boxes.len(), 3);

    run_detection(&mut annotator);
    let outcome = annotator.snapshot();
    assert_eq!(outcome.boxes.len(), 2);
    assert_eq!(outcome.selected_label, None);
}

#[test]
fn click_selects_a_box_and_echoes_its_coordinates() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);

    let outcome = annotator.select_at_point(20, 20);
    assert_eq!(outcome.selected_coords, [10, 10, 50, 50]);
    assert_eq!(outcome.selected_label.as_deref(), Some("cat"));
}

#[test]
fn overlapping_boxes_resolve_to_the_first_in_storage_order() {
    let backend = FixedBackend::new(
        vec!["cat".to_string(), "dog".to_string()],
        vec![
            detection([10, 10, 100, 100], "cat", 0.9),
            detection([20, 20, 60, 60], "dog", 0.8),
        ],
    );
    let mut annotator =
        Annotator::with_backend(backend, &AnnotatorConfig::default()).expect("annotator");
    run_detection(&mut annotator);

    let outcome = annotator.select_at_point(30, 30);
    assert_eq!(outcome.selected_label.as_deref(), Some("cat"));
}

#[test]
fn move_selected_translates_by_the_given_step() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);
    annotator.select_at_point(20, 20);

    let outcome = annotator.move_selected(MoveDirection::Right, Some(5));
    assert_eq!(outcome.boxes[0], [15, 10, 55, 50]);
    assert_eq!(outcome.selected_coords, [15, 10, 55, 50]);
}

#[test]
fn moving_past_the_image_edge_is_permitted() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);
    annotator.select_at_point(20, 20);

    let outcome = annotator.move_selected(MoveDirection::Left, Some(50));
    assert_eq!(outcome.boxes[0], [-40, 10, 0, 50]);
    // The render pass clamps for drawing but must still produce an image.
    assert!(outcome.image.is_some());
}

#[test]
fn clicking_empty_space_clears_selection_and_later_edits_are_noops() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);
    annotator.select_at_point(20, 20);

    let outcome = annotator.select_at_point(300, 300);
    assert_eq!(outcome.selected_label, None);
    assert_eq!(outcome.selected_coords, [0, 0, 0, 0]);

    let outcome = annotator.update_selected_class("dog");
    assert_eq!(outcome.labels, vec!["cat", "dog"]);

    let outcome = annotator.move_selected(MoveDirection::Down, None);
    assert_eq!(outcome.boxes[0], [10, 10, 50, 50]);
}

#[test]
fn class_update_applies_only_vocabulary_members() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);
    annotator.select_at_point(20, 20);

    let outcome = annotator.update_selected_class("zebra");
    assert_eq!(outcome.labels[0], "cat");

    let outcome = annotator.update_selected_class("dog");
    assert_eq!(outcome.labels[0], "dog");
    assert_eq!(outcome.selected_label.as_deref(), Some("dog"));
}

#[test]
fn non_numeric_coordinate_input_leaves_the_box_unchanged() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);
    annotator.select_at_point(20, 20);

    let outcome = annotator.set_box_coordinates("a", "0", "10", "10");
    assert_eq!(outcome.boxes[0], [10, 10, 50, 50]);
}

#[test]
fn coordinate_updates_are_not_ordering_validated() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);
    annotator.select_at_point(20, 20);

    // x1 > x2 is accepted as-is; the session stores what it was given.
    let outcome = annotator.set_box_coordinates("60", "10", "20", "80");
    assert_eq!(outcome.boxes[0], [60, 10, 20, 80]);
}

#[test]
fn delete_shifts_later_entries_down_and_clears_selection() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);
    annotator.select_at_point(20, 20);

    let outcome = annotator.delete_selected();
    assert_eq!(outcome.boxes, vec![[100, 100, 150, 150]]);
    assert_eq!(outcome.labels, vec!["dog"]);
    assert_eq!(outcome.selected_label, None);
    assert_eq!(outcome.selected_coords, [0, 0, 0, 0]);

    // Second delete with no selection in between is a no-op.
    let outcome = annotator.delete_selected();
    assert_eq!(outcome.boxes.len(), 1);
}

#[test]
fn create_label_round_trips_through_the_surface() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);

    let outcome = annotator.create_label("dog");
    assert_eq!(outcome.boxes.len(), 3);
    assert_eq!(outcome.labels[2], "dog");
    assert_eq!(outcome.confidences[2], 1.0);
    assert_eq!(outcome.selected_label.as_deref(), Some("dog"));

    let [x1, y1, x2, y2] = outcome.boxes[2];
    assert_eq!([x1, y1, x2, y2], outcome.selected_coords);
    assert!(x1 >= 0 && y1 >= 0 && x2 <= 640 && y2 <= 480);
    assert!(x1 < x2 && y1 < y2);
}

#[test]
fn create_label_with_an_unknown_class_falls_back_to_the_first_entry() {
    let mut annotator = cat_dog_annotator();
    run_detection(&mut annotator);

    let outcome = annotator.create_label("zebra");
    assert_eq!(outcome.labels[2], "cat");
}

#[test]
fn create_label_without_an_image_is_an_empty_result() {
    let mut annotator = cat_dog_annotator();
    let outcome = annotator.create_label("dog");
    assert!(outcome.boxes.is_empty());
    assert!(outcome.image.is_none());
    assert_eq!(outcome.available_classes, vec!["cat", "dog"]);
}

#[test]
fn create_label_with_an_empty_vocabulary_uses_the_placeholder() {
    let backend = FixedBackend::new(Vec::new(), Vec::new());
    let mut annotator =
        Annotator::with_backend(backend, &AnnotatorConfig::default()).expect("annotator");
    run_detection(&mut annotator);

    let outcome = annotator.create_label("anything");
    assert_eq!(outcome.labels, vec!["object"]);
    assert_eq!(outcome.confidences, vec![1.0]);
    assert_eq!(outcome.selected_label.as_deref(), Some("object"));
}

#[test]
fn sequences_stay_aligned_across_every_operation() {
    let mut annotator = cat_dog_annotator();
    assert_aligned(&annotator);

    run_detection(&mut annotator);
    assert_aligned(&annotator);

    annotator.select_at_point(20, 20);
    assert_aligned(&annotator);

    annotator.create_label("dog");
    assert_aligned(&annotator);

    annotator.move_selected(MoveDirection::Up, None);
    assert_aligned(&annotator);

    annotator.set_box_coordinates("1", "2", "3", "4");
    assert_aligned(&annotator);

    annotator.update_selected_class("cat");
    assert_aligned(&annotator);

    annotator.delete_selected();
    assert_aligned(&annotator);

    annotator.delete_selected();
    assert_aligned(&annotator);
}
