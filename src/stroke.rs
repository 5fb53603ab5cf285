use egui::{Color32, Pos2};

/// Default colour of a freshly created surface
pub const DEFAULT_STROKE_COLOR: Color32 = Color32::from_rgb(0x00, 0x00, 0x00);
/// Default width of a freshly created surface
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;

/// How the ends of a stroke are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

/// Drawing attributes applied to future strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
    /// Round caps also give round joins between segments
    pub cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR,
            width: DEFAULT_STROKE_WIDTH,
            cap: LineCap::Round,
        }
    }
}

impl StrokeStyle {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }
}

// The stroke currently being drawn
#[derive(Debug, Clone)]
pub struct StrokePath {
    points: Vec<Pos2>,
    style: StrokeStyle,
}

impl StrokePath {
    /// Start a new path at `origin`
    pub fn begin(origin: Pos2, style: StrokeStyle) -> Self {
        Self {
            points: vec![origin],
            style,
        }
    }

    // Append a point, returning the segment it completes
    pub fn line_to(&mut self, point: Pos2) -> Option<(Pos2, Pos2)> {
        let last = self.points.last().copied();
        self.points.push(point);
        last.map(|from| (from, point))
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn last_point(&self) -> Option<Pos2> {
        self.points.last().copied()
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_round() {
        let style = StrokeStyle::default();
        assert_eq!(style.color, Color32::BLACK);
        assert_eq!(style.width, 5.0);
        assert_eq!(style.cap, LineCap::Round);
    }

    #[test]
    fn test_line_to_yields_segments() {
        let mut path = StrokePath::begin(Pos2::new(1.0, 2.0), StrokeStyle::default());
        let first = path.line_to(Pos2::new(3.0, 4.0));
        assert_eq!(first, Some((Pos2::new(1.0, 2.0), Pos2::new(3.0, 4.0))));

        let second = path.line_to(Pos2::new(5.0, 6.0));
        assert_eq!(second, Some((Pos2::new(3.0, 4.0), Pos2::new(5.0, 6.0))));
        assert_eq!(path.points().len(), 3);
        assert_eq!(path.last_point(), Some(Pos2::new(5.0, 6.0)));
    }
}
