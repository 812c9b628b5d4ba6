use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::session::AnnotationSession;
use crate::BoundingBox;

// Box styling: selected boxes pop, everything else stays uniform.
const SELECTED_COLOR: [u8; 3] = [255, 0, 0];
const BOX_COLOR: [u8; 3] = [0, 255, 0];
const SELECTED_THICKNESS: i32 = 3;
const BOX_THICKNESS: i32 = 2;

// Text rendering constants.
const LABEL_FONT_SIZE: f32 = 16.0;
const LABEL_TEXT_HEIGHT: i32 = 18;
const LABEL_CHAR_WIDTH: f32 = 8.5; // average glyph width, rough estimate
const LABEL_TEXT_VERTICAL_PADDING: i32 = 2;

const FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Draws session state onto a copy of the current image: one rectangle
/// per box with a `"<label> <confidence>"` tag above its top-left
/// corner, the selected box highlighted.
pub struct Renderer {
    font: FontRef<'static>,
    scale: PxScale,
}

impl Renderer {
    pub fn new() -> Self {
        let font = FontRef::try_from_slice(FONT_BYTES).expect("embedded label font is valid");
        Self {
            font,
            scale: PxScale::from(LABEL_FONT_SIZE),
        }
    }

    /// Pure projection of the session; never mutates it. `None` when the
    /// session has no image; an unmodified copy when it has no boxes.
    pub fn render(&self, session: &AnnotationSession) -> Option<RgbImage> {
        let image = session.image()?;
        let mut canvas = image.clone();

        for (index, bbox) in session.boxes().iter().enumerate() {
            let selected = session.selected() == Some(index);
            let color = if selected { SELECTED_COLOR } else { BOX_COLOR };
            let thickness = if selected {
                SELECTED_THICKNESS
            } else {
                BOX_THICKNESS
            };

            self.draw_outline(&mut canvas, bbox, color, thickness);
            let tag = format!(
                "{} {:.2}",
                session.labels()[index],
                session.confidences()[index]
            );
            self.draw_tag(&mut canvas, bbox, &tag, color);
        }

        Some(canvas)
    }

    /// Rectangle outline, clamped to the canvas. Boxes that end up
    /// degenerate or fully outside after clamping are skipped; the
    /// session entry itself is left alone.
    fn draw_outline(&self, canvas: &mut RgbImage, bbox: &BoundingBox, color: [u8; 3], thickness: i32) {
        let w = canvas.width() as i32;
        let h = canvas.height() as i32;

        let x_min = bbox.x1.clamp(0, w - 1);
        let y_min = bbox.y1.clamp(0, h - 1);
        let x_max = bbox.x2.clamp(0, w - 1);
        let y_max = bbox.y2.clamp(0, h - 1);
        if x_min >= x_max || y_min >= y_max {
            return;
        }

        for inset in 0..thickness {
            let x_min_t = (x_min + inset).min(w - 1);
            let y_min_t = (y_min + inset).min(h - 1);
            let x_max_t = (x_max - inset).max(0);
            let y_max_t = (y_max - inset).max(0);

            for x in x_min_t..=x_max_t {
                canvas.put_pixel(x as u32, y_min_t as u32, Rgb(color));
                canvas.put_pixel(x as u32, y_max_t as u32, Rgb(color));
            }
            for y in y_min_t..=y_max_t {
                canvas.put_pixel(x_min_t as u32, y as u32, Rgb(color));
                canvas.put_pixel(x_max_t as u32, y as u32, Rgb(color));
            }
        }
    }

    /// Label tag on a filled background above the box's top-left corner,
    /// clamped to the image top and right edge.
    fn draw_tag(&self, canvas: &mut RgbImage, bbox: &BoundingBox, tag: &str, color: [u8; 3]) {
        let w = canvas.width() as i32;
        let text_width = (tag.len() as f32 * LABEL_CHAR_WIDTH) as i32;

        let tag_x = bbox.x1.clamp(0, w - 1);
        let tag_y = (bbox.y1 - LABEL_TEXT_HEIGHT).max(0);

        let max_width = (w - tag_x).max(0);
        let tag_width = text_width.min(max_width) as u32;
        let tag_height = LABEL_TEXT_HEIGHT as u32;
        if tag_width == 0 || tag_height == 0 {
            return;
        }

        let background = Rect::at(tag_x, tag_y).of_size(tag_width, tag_height);
        draw_filled_rect_mut(canvas, background, Rgb(color));
        draw_text_mut(
            canvas,
            Rgb([255u8, 255u8, 255u8]),
            tag_x,
            tag_y + LABEL_TEXT_VERTICAL_PADDING,
            self.scale,
            &self.font,
            tag,
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
