use super::style::Color;
use nalgebra::Point3;

/// A camera framing: the sphere the view must contain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl ViewFrame {
    /// Frames the given positions around their centroid, padded by `buffer` Å.
    ///
    /// Returns `None` when there is nothing to frame.
    pub fn enclosing(positions: &[Point3<f64>], buffer: f64) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let sum = positions
            .iter()
            .fold(Point3::origin().coords, |acc, p| acc + p.coords);
        let center = Point3::from(sum / positions.len() as f64);
        let radius = positions
            .iter()
            .map(|p| nalgebra::distance(&center, p))
            .fold(0.0_f64, f64::max);
        Some(Self {
            center,
            radius: radius + buffer.max(0.0),
        })
    }
}

/// Session-wide display state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub background: Color,
    pub view: Option<ViewFrame>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            view: None,
        }
    }
}
