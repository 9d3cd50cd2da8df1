/// Maps client-space pointer positions onto the backing pixel grid.
///
/// The surface is displayed at `display_size` (CSS pixels, starting at
/// `display_origin`) while its buffer is `backing_size` pixels; the two
/// differ on high-density screens or when the page scales the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub display_origin: [f32; 2],
    pub display_size: [f32; 2],
    pub backing_size: [u32; 2],
}

impl CanvasTransform {
    pub fn new(display_origin: [f32; 2], display_size: [f32; 2], backing_size: [u32; 2]) -> Self {
        Self {
            display_origin,
            display_size,
            backing_size,
        }
    }

    /// Display and backing sizes match, origin at zero.
    pub fn identity(width: u32, height: u32) -> Self {
        Self::new([0.0, 0.0], [width as f32, height as f32], [width, height])
    }

    pub fn screen_to_canvas(&self, screen_pos: [f32; 2]) -> [f32; 2] {
        [
            Self::axis(screen_pos[0], self.display_origin[0], self.display_size[0], self.backing_size[0]),
            Self::axis(screen_pos[1], self.display_origin[1], self.display_size[1], self.backing_size[1]),
        ]
    }

    pub fn canvas_to_screen(&self, canvas_pos: [f32; 2]) -> [f32; 2] {
        let scale = |i: usize| {
            if self.backing_size[i] == 0 {
                0.0
            } else {
                self.display_size[i] / self.backing_size[i] as f32
            }
        };
        [
            canvas_pos[0] * scale(0) + self.display_origin[0],
            canvas_pos[1] * scale(1) + self.display_origin[1],
        ]
    }

    fn axis(client: f32, origin: f32, display: f32, backing: u32) -> f32 {
        if display <= 0.0 {
            return 0.0;
        }
        let backing = backing as f32;
        (backing * (client - origin) / display).clamp(0.0, backing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_maps_one_to_one() {
        let t = CanvasTransform::identity(400, 300);
        assert_eq!(t.screen_to_canvas([12.5, 40.0]), [12.5, 40.0]);
    }

    #[test]
    fn scales_for_dense_backing_buffers() {
        // 200x100 CSS box at (50, 20) backed by a 400x200 buffer.
        let t = CanvasTransform::new([50.0, 20.0], [200.0, 100.0], [400, 200]);
        assert_eq!(t.screen_to_canvas([150.0, 70.0]), [200.0, 100.0]);
        assert_eq!(t.canvas_to_screen([200.0, 100.0]), [150.0, 70.0]);
    }

    #[test]
    fn clamps_outside_positions() {
        let t = CanvasTransform::new([10.0, 10.0], [100.0, 100.0], [100, 100]);
        assert_eq!(t.screen_to_canvas([0.0, 500.0]), [0.0, 100.0]);
    }

    #[test]
    fn collapsed_display_maps_to_origin() {
        let t = CanvasTransform::new([0.0, 0.0], [0.0, 0.0], [100, 100]);
        assert_eq!(t.screen_to_canvas([30.0, 30.0]), [0.0, 0.0]);
    }
}
