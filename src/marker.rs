//! Magnitude-based marker styling and the circle widgets drawn from it.

use gtk::prelude::*;

const FILL_ALPHA: f64 = 0.6;
const BORDER_WIDTH: f64 = 2.0;
const MIN_DIAMETER: f64 = 8.0;
const LEGEND_DOT_DIAMETER: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnitudeColor {
    Green,
    Orange,
    Red,
}

impl MagnitudeColor {
    fn fill_rgb(self) -> (f64, f64, f64) {
        match self {
            Self::Green => (0.0, 0.5, 0.0),
            Self::Orange => (1.0, 0.65, 0.0),
            Self::Red => (1.0, 0.0, 0.0),
        }
    }

    /// Dark red under a red fill, dark gray otherwise.
    fn border_rgb(self) -> (f64, f64, f64) {
        match self {
            Self::Red => (0.6, 0.0, 0.0),
            _ => (0.2, 0.2, 0.2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub color: MagnitudeColor,
    pub diameter: f64,
}

/// Map a magnitude to marker color and diameter. Total over all reals:
/// negative magnitudes land in the green bucket at the diameter floor.
pub fn style_for(magnitude: f64) -> MarkerStyle {
    let color = if magnitude <= 3.0 {
        MagnitudeColor::Green
    } else if magnitude <= 5.0 {
        MagnitudeColor::Orange
    } else {
        MagnitudeColor::Red
    };
    MarkerStyle {
        color,
        diameter: (magnitude * 5.0).max(MIN_DIAMETER),
    }
}

/// A translucent filled circle with a 2 px border, sized by the style.
pub fn marker_widget(style: MarkerStyle) -> gtk::DrawingArea {
    circle_widget(style.color, style.diameter)
}

/// A fixed-size dot for the legend rows.
pub fn legend_dot(color: MagnitudeColor) -> gtk::DrawingArea {
    circle_widget(color, LEGEND_DOT_DIAMETER)
}

fn circle_widget(color: MagnitudeColor, diameter: f64) -> gtk::DrawingArea {
    let size = diameter.ceil() as i32;
    let area = gtk::DrawingArea::builder()
        .content_width(size)
        .content_height(size)
        .build();

    area.set_draw_func(move |_, cr, width, height| {
        let width = f64::from(width);
        let height = f64::from(height);
        let radius = (width.min(height) - BORDER_WIDTH) / 2.0;
        if radius <= 0.0 {
            return;
        }

        cr.arc(
            width / 2.0,
            height / 2.0,
            radius,
            0.0,
            2.0 * std::f64::consts::PI,
        );

        let (r, g, b) = color.fill_rgb();
        cr.set_source_rgba(r, g, b, FILL_ALPHA);
        let _ = cr.fill_preserve();

        let (r, g, b) = color.border_rgb();
        cr.set_source_rgb(r, g, b);
        cr.set_line_width(BORDER_WIDTH);
        let _ = cr.stroke();
    });

    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_buckets() {
        assert_eq!(style_for(-1.0).color, MagnitudeColor::Green);
        assert_eq!(style_for(3.0).color, MagnitudeColor::Green);
        assert_eq!(style_for(3.1).color, MagnitudeColor::Orange);
        assert_eq!(style_for(5.0).color, MagnitudeColor::Orange);
        assert_eq!(style_for(5.1).color, MagnitudeColor::Red);
        assert_eq!(style_for(9.5).color, MagnitudeColor::Red);
    }

    #[test]
    fn diameter_scales_with_a_floor() {
        assert!((style_for(5.5).diameter - 27.5).abs() < f64::EPSILON);
        assert!((style_for(1.0).diameter - 8.0).abs() < f64::EPSILON);
        assert!((style_for(-2.0).diameter - 8.0).abs() < f64::EPSILON);
        assert!((style_for(0.0).diameter - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn red_markers_get_the_dark_red_border() {
        assert_eq!(style_for(6.0).color.border_rgb(), (0.6, 0.0, 0.0));
        assert_eq!(style_for(2.0).color.border_rgb(), (0.2, 0.2, 0.2));
        assert_eq!(style_for(4.0).color.border_rgb(), (0.2, 0.2, 0.2));
    }
}
