use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};

use crate::stroke::{LineCap, StrokeStyle};

/// Distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

// Butt caps stop exactly at the segment ends
fn covered_by_butt_segment(point: Pos2, start: Pos2, end: Pos2, half_width: f32) -> bool {
    let line_vec = end - start;
    let line_len = line_vec.length();
    if line_len == 0.0 {
        return false;
    }
    let point_vec = point - start;
    let along = (point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len;
    if !(0.0..=line_len).contains(&along) {
        return false;
    }
    let across = (point_vec.x * line_vec.y - point_vec.y * line_vec.x).abs() / line_len;
    across <= half_width
}

/// Source-over blend of `src` onto `dst`
pub(crate) fn blend_over(dst: &mut Rgba<u8>, src: Color32) {
    let [sr, sg, sb, sa] = src.to_srgba_unmultiplied();
    match sa {
        0 => {}
        255 => *dst = Rgba([sr, sg, sb, sa]),
        _ => {
            let src_a = f32::from(sa) / 255.0;
            let dst_a = f32::from(dst.0[3]) / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            let mix = |s: u8, d: u8| {
                let value = (f32::from(s) * src_a + f32::from(d) * dst_a * (1.0 - src_a)) / out_a;
                value.round().clamp(0.0, 255.0) as u8
            };
            *dst = Rgba([
                mix(sr, dst.0[0]),
                mix(sg, dst.0[1]),
                mix(sb, dst.0[2]),
                (out_a * 255.0).round() as u8,
            ]);
        }
    }
}

/// Stroke one line segment onto the buffer.
///
/// A pixel is painted when its centre lies within half the stroke width of
/// the segment. Parts of the segment outside the buffer are clipped.
/// Returns whether any pixel was touched.
pub(crate) fn stroke_segment(buffer: &mut RgbaImage, from: Pos2, to: Pos2, style: &StrokeStyle) -> bool {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 || style.width <= 0.0 {
        return false;
    }

    let half_width = style.half_width();
    let min_x = (from.x.min(to.x) - half_width).floor().max(0.0);
    let min_y = (from.y.min(to.y) - half_width).floor().max(0.0);
    let max_x = (from.x.max(to.x) + half_width).ceil().min(width as f32 - 1.0);
    let max_y = (from.y.max(to.y) + half_width).ceil().min(height as f32 - 1.0);
    if min_x > max_x || min_y > max_y {
        return false;
    }

    let mut touched = false;
    for y in min_y as u32..=max_y as u32 {
        for x in min_x as u32..=max_x as u32 {
            let centre = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            let covered = match style.cap {
                LineCap::Round => distance_to_line_segment(centre, from, to) <= half_width,
                LineCap::Butt => covered_by_butt_segment(centre, from, to, half_width),
            };
            if covered {
                blend_over(buffer.get_pixel_mut(x, y), style.color);
                touched = true;
            }
        }
    }
    touched
}
