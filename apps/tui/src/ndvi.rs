//! NDVI color ramp.
//!
//! Maps a normalized vegetation index in `[0, 1]` onto a brown-to-green
//! gradient built from three affine segments. The ramp is anchored at
//! dark brown (bare soil), light brown, yellow-green and dark green
//! (dense canopy).

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(color: Rgb) -> Self {
        Self::Rgb(color.r, color.g, color.b)
    }
}

const DARK_BROWN: Rgb = Rgb::new(139, 69, 19);
const LIGHT_BROWN: Rgb = Rgb::new(205, 133, 63);
const YELLOW_GREEN: Rgb = Rgb::new(154, 205, 50);
const DARK_GREEN: Rgb = Rgb::new(34, 139, 34);

/// Maps an NDVI value to its ramp color.
///
/// Values outside `[0, 1]` are clamped before mapping. Segment boundaries
/// belong to the upper segment: 0.3 is the start of the light-brown to
/// yellow-green segment, 0.6 the start of the yellow-green to dark-green
/// segment.
pub fn color_for(value: f64) -> Rgb {
    let value = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    };

    if value < 0.3 {
        blend(DARK_BROWN, LIGHT_BROWN, value / 0.3)
    } else if value < 0.6 {
        blend(LIGHT_BROWN, YELLOW_GREEN, (value - 0.3) / 0.3)
    } else {
        blend(YELLOW_GREEN, DARK_GREEN, (value - 0.6) / 0.4)
    }
}

fn blend(start: Rgb, end: Rgb, t: f64) -> Rgb {
    Rgb::new(
        blend_channel(start.r, end.r, t),
        blend_channel(start.g, end.g, t),
        blend_channel(start.b, end.b, t),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_channel(start: u8, end: u8, t: f64) -> u8 {
    f64::from(end)
        .mul_add(t, f64::from(start) * (1.0 - t))
        .round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_are_exact() {
        assert_eq!(color_for(0.0), Rgb::new(139, 69, 19));
        assert_eq!(color_for(1.0), Rgb::new(34, 139, 34));
    }

    #[test]
    fn boundaries_fall_into_upper_segment() {
        // 0.3 is the middle segment's t = 0, not the first segment's t = 1.
        assert_eq!(color_for(0.3), Rgb::new(205, 133, 63));
        assert_eq!(color_for(0.6), Rgb::new(154, 205, 50));
    }

    #[test]
    fn first_segment_blends_between_browns() {
        assert_eq!(color_for(0.15), Rgb::new(172, 101, 41));
    }

    #[test]
    fn middle_segment_blends_toward_yellow_green() {
        assert_eq!(color_for(0.45), Rgb::new(180, 169, 57));
    }

    #[test]
    fn final_segment_blends_toward_dark_green() {
        assert_eq!(color_for(0.8), Rgb::new(94, 172, 42));
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(color_for(-0.5), color_for(0.0));
        assert_eq!(color_for(1.7), color_for(1.0));
        assert_eq!(color_for(f64::NAN), color_for(0.0));
    }
}
