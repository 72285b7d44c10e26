/// Linear RGBA color.
///
/// Alpha is carried for the clear color only; the cube itself is opaque and
/// uploads `rgb` as a vertex attribute.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    /// Opaque color from linear components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// RGB channels as a vertex attribute.
    #[inline]
    pub const fn to_rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Converts to the clear value wgpu expects.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        let c = self.clamped();
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_is_opaque_pure_red() {
        assert_eq!(Color::RED.to_rgb_array(), [1.0, 0.0, 0.0]);
        assert_eq!(Color::RED.a, 1.0);
    }

    #[test]
    fn to_wgpu_clamps_out_of_range_channels() {
        let c = Color { r: 2.0, g: -1.0, b: 0.5, a: 1.5 }.to_wgpu();
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.5, 1.0));
    }
}
