//! Drawing detections and the playback status overlay onto frames.

pub mod font;
mod palette;

pub use palette::{Palette, DEFAULT_PALETTE_SEED, PALETTE_SIZE};

use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::detect::Detection;
use crate::frame::Frame;

pub const BOX_THICKNESS: i32 = 2;
pub const LABEL_SCALE: u32 = 1;
pub const STATUS_SCALE: u32 = 2;
/// Gap between a label baseline and the top of its box.
pub const LABEL_OFFSET: i32 = 10;

pub const STATUS_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const INSTRUCTIONS_TEXT: &str = r#"Press "q" to quit, "+" to speed up, "-" to slow down"#;
/// Baselines of the two status lines, as (x, y).
pub const INSTRUCTIONS_ORIGIN: (i32, i32) = (10, 30);
pub const SPEED_ORIGIN: (i32, i32) = (10, 70);

pub fn speed_text(speed: f64) -> String {
    format!("Current speed: {:.1}x", speed)
}

/// Detections that clear `threshold`, in input order.
pub fn visible(detections: &[Detection], threshold: f32) -> impl Iterator<Item = &Detection> {
    detections.iter().filter(move |d| d.passes(threshold))
}

/// Draws boxes, labels and status lines with a fixed per-class palette.
#[derive(Clone, Debug, Default)]
pub struct Annotator {
    palette: Palette,
}

impl Annotator {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Draw every detection with `confidence >= threshold` and return how many
    /// were drawn. Anything outside the frame is clipped.
    pub fn annotate<F>(
        &self,
        frame: &mut Frame,
        detections: &[Detection],
        threshold: f32,
        class_name: F,
    ) -> usize
    where
        F: Fn(u32) -> String,
    {
        let mut drawn = 0;
        for detection in visible(detections, threshold) {
            let Some((x1, y1, x2, y2)) = clip_box(detection, frame.width(), frame.height()) else {
                continue;
            };
            let color = self.palette.color(detection.class_id);
            let width = (x2 - x1 + 1).max(1);
            let height = (y2 - y1 + 1).max(1);

            let img = frame.image_mut();
            for inset in 0..BOX_THICKNESS {
                let w = width - 2 * inset;
                let h = height - 2 * inset;
                if w <= 0 || h <= 0 {
                    break;
                }
                let rect = Rect::at(x1 + inset, y1 + inset).of_size(w as u32, h as u32);
                draw_hollow_rect_mut(img, rect, color);
            }

            let label = detection.label(&class_name(detection.class_id));
            draw_line(frame, &label, (x1.max(0), y1 - LABEL_OFFSET), color, LABEL_SCALE);
            drawn += 1;
        }

        log::debug!(
            "annotated frame {}: {} of {} detections at threshold {:.2}",
            frame.index(),
            drawn,
            detections.len(),
            threshold
        );
        drawn
    }

    /// Overlay the key help line and the current speed.
    pub fn draw_status(&self, frame: &mut Frame, speed: f64) {
        draw_line(frame, INSTRUCTIONS_TEXT, INSTRUCTIONS_ORIGIN, STATUS_COLOR, STATUS_SCALE);
        draw_line(frame, &speed_text(speed), SPEED_ORIGIN, STATUS_COLOR, STATUS_SCALE);
    }
}

/// Box corners limited to the frame plus the outline margin, or `None` when the
/// box lies entirely outside the frame. Edges beyond the frame stay off-image,
/// so they are clipped rather than drawn along the border.
fn clip_box(detection: &Detection, width: u32, height: u32) -> Option<(i32, i32, i32, i32)> {
    let bbox = detection.bbox;
    let (w, h) = (i64::from(width), i64::from(height));
    let (x1, y1) = (i64::from(bbox.x1), i64::from(bbox.y1));
    let (x2, y2) = (i64::from(bbox.x2).max(x1), i64::from(bbox.y2).max(y1));
    if w == 0 || h == 0 || x2 < 0 || y2 < 0 || x1 >= w || y1 >= h {
        return None;
    }
    let margin = i64::from(BOX_THICKNESS);
    let clamp_x = |v: i64| v.clamp(-margin, w - 1 + margin) as i32;
    let clamp_y = |v: i64| v.clamp(-margin, h - 1 + margin) as i32;
    Some((clamp_x(x1), clamp_y(y1), clamp_x(x2), clamp_y(y2)))
}

/// Draw one line of text whose baseline sits at `origin`; the baseline is
/// pushed down so the text never starts above the top edge.
fn draw_line(frame: &mut Frame, text: &str, origin: (i32, i32), color: Rgb<u8>, scale: u32) {
    let (_, text_height) = font::text_size(text, scale);
    let baseline = origin.1.max(text_height as i32);
    let top = baseline - text_height as i32;
    font::draw_text(frame.image_mut(), text, origin.0, top, color, scale);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BoundingBox;

    const BACKGROUND: [u8; 3] = [0, 0, 0];

    fn names(id: u32) -> String {
        crate::detect::coco_class_name(id).to_string()
    }

    fn detection(x1: i32, y1: i32, class_id: u32, confidence: f32) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x1 + 40, y1 + 30), class_id, confidence)
    }

    fn annotator() -> Annotator {
        Annotator::new(Palette::new(7))
    }

    #[test]
    fn filters_by_confidence_inclusive() {
        let dets = vec![
            detection(20, 40, 2, 0.9),
            detection(100, 40, 2, 0.4),
            detection(180, 40, 2, 0.5),
        ];
        let mut frame = Frame::filled(320, 120, BACKGROUND, 0);
        let drawn = annotator().annotate(&mut frame, &dets, 0.5, names);
        assert_eq!(drawn, 2);

        let kept: Vec<f32> = visible(&dets, 0.5).map(|d| d.confidence).collect();
        assert_eq!(kept, vec![0.9, 0.5]);

        let color = annotator().palette().color(2).0;
        // Box corners of the drawn detections carry the class color.
        assert_eq!(frame.pixel(20, 40), Some(color));
        assert_eq!(frame.pixel(180, 40), Some(color));
        // The 0.4 box is skipped entirely.
        assert_eq!(frame.pixel(100, 70), Some(BACKGROUND));
    }

    #[test]
    fn box_outline_is_two_pixels_thick() {
        let dets = vec![detection(50, 50, 0, 0.8)];
        let mut frame = Frame::filled(200, 200, BACKGROUND, 0);
        annotator().annotate(&mut frame, &dets, 0.5, names);
        let color = annotator().palette().color(0).0;
        assert_eq!(frame.pixel(60, 80), Some(color));
        assert_eq!(frame.pixel(60, 79), Some(color));
        assert_eq!(frame.pixel(60, 78), Some(BACKGROUND));
    }

    #[test]
    fn no_detections_leaves_frame_unchanged() {
        let mut frame = Frame::filled(64, 48, [12, 34, 56], 3);
        let before = frame.as_rgb().to_vec();
        let drawn = annotator().annotate(&mut frame, &[], 0.5, names);
        assert_eq!(drawn, 0);
        assert_eq!(frame.as_rgb(), &before[..]);
    }

    #[test]
    fn boxes_outside_the_frame_are_clipped() {
        let dets = vec![
            Detection::new(BoundingBox::new(-30, -30, 500, 500), 1, 0.9),
            Detection::new(BoundingBox::new(5, 0, 5, 0), 1, 0.9),
        ];
        let mut frame = Frame::filled(32, 32, BACKGROUND, 0);
        assert_eq!(annotator().annotate(&mut frame, &dets, 0.5, names), 2);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let dets = vec![
            Detection::new(BoundingBox::new(-10, -10, i32::MAX, 40), 1, 0.9),
            Detection::new(BoundingBox::new(0, i32::MIN, 10, 10), 1, 0.9),
            Detection::new(BoundingBox::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX), 1, 0.9),
        ];
        let mut frame = Frame::filled(64, 48, BACKGROUND, 0);
        assert_eq!(annotator().annotate(&mut frame, &dets, 0.5, names), 3);

        let color = annotator().palette().color(1).0;
        // Only the bottom edge of the first box lands inside the frame.
        assert_eq!(frame.pixel(0, 20), Some(BACKGROUND));
        assert_eq!(frame.pixel(30, 40), Some(color));
    }

    #[test]
    fn huge_boxes_are_drawn_quickly() {
        let dets = vec![Detection::new(
            BoundingBox::new(-1_000_000_000, -1_000_000_000, 1_000_000_000, 1_000_000_000),
            3,
            0.9,
        )];
        let mut frame = Frame::filled(64, 48, BACKGROUND, 0);
        let start = std::time::Instant::now();
        assert_eq!(annotator().annotate(&mut frame, &dets, 0.5, names), 1);
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
        // Every edge lies outside the frame; only the label at the top shows.
        assert!((10..48).all(|y| (0..64).all(|x| frame.pixel(x, y) == Some(BACKGROUND))));
    }

    #[test]
    fn boxes_entirely_outside_are_skipped() {
        let dets = vec![
            Detection::new(BoundingBox::new(100, 10, 120, 20), 1, 0.9),
            Detection::new(BoundingBox::new(-50, -50, -5, -5), 1, 0.9),
            Detection::new(BoundingBox::new(i32::MIN, 0, i32::MIN + 5, 10), 1, 0.9),
        ];
        let mut frame = Frame::filled(64, 48, BACKGROUND, 0);
        let before = frame.as_rgb().to_vec();
        assert_eq!(annotator().annotate(&mut frame, &dets, 0.5, names), 0);
        assert_eq!(frame.as_rgb(), &before[..]);
    }

    #[test]
    fn same_class_shares_a_color() {
        let a = annotator();
        assert_eq!(a.palette().color(5), a.palette().color(5));
        assert_eq!(a.palette().color(5), Annotator::new(Palette::new(7)).palette().color(5));
    }

    #[test]
    fn status_lines_are_green() {
        let mut frame = Frame::filled(640, 120, BACKGROUND, 0);
        annotator().draw_status(&mut frame, 0.5);
        let green = frame
            .as_rgb()
            .chunks_exact(3)
            .filter(|px| *px == STATUS_COLOR.0)
            .count();
        assert!(green > 0);
        // Nothing is drawn below the second baseline.
        assert!((72..120).all(|y| frame.pixel(12, y) == Some(BACKGROUND)));
        assert_eq!(speed_text(0.5), "Current speed: 0.5x");
        assert_eq!(speed_text(2.0), "Current speed: 2.0x");
    }
}
