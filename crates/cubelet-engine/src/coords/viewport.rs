/// Drawable size in physical pixels.
///
/// Used to derive the projection aspect ratio each frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height, or `1.0` for a degenerate (minimized) viewport.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_landscape_viewport() {
        assert_eq!(Viewport::new(800.0, 600.0).aspect(), 800.0 / 600.0);
    }

    #[test]
    fn zero_height_is_invalid_and_square() {
        let v = Viewport::new(800.0, 0.0);
        assert!(!v.is_valid());
        assert_eq!(v.aspect(), 1.0);
    }

    #[test]
    fn non_finite_is_invalid() {
        assert!(!Viewport::new(f32::NAN, 10.0).is_valid());
        assert!(!Viewport::new(f32::INFINITY, 10.0).is_valid());
    }
}
