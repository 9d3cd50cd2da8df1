use image::{Rgba, RgbaImage};
use tiny_skia::{
    Color, ColorU8, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    Transform,
};

use super::image_codec;
use crate::error::DrawingError;

/// The pixel buffer a drawing is composited into. Nothing but pixels is
/// kept: once a stroke lands it cannot be edited or removed individually.
pub struct RasterSurface {
    pixmap: Pixmap,
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, DrawingError> {
    Pixmap::new(width, height).ok_or(DrawingError::SurfaceSize { width, height })
}

fn paint_for(color: Rgba<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

fn polyline(points: &[[f32; 2]], closed: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first[0], first[1]);
    for p in rest {
        pb.line_to(p[0], p[1]);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, DrawingError> {
        Ok(Self {
            pixmap: allocate(width, height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Unpremultiplied copy of the buffer, row-major RGBA.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| match self.pixmap.pixel(x, y) {
            Some(px) => {
                let c = px.demultiply();
                Rgba([c.red(), c.green(), c.blue(), c.alpha()])
            }
            None => Rgba([0, 0, 0, 0]),
        })
    }

    fn stroke(&mut self, path: Option<Path>, width: f32, color: Rgba<u8>) {
        let Some(path) = path else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
    }

    pub fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba<u8>) {
        self.stroke(polyline(&[from, to], false), width, color);
    }

    /// Strokes connected segments through `points` as one path.
    pub fn stroke_polyline(&mut self, points: &[[f32; 2]], width: f32, color: Rgba<u8>) {
        self.stroke(polyline(points, false), width, color);
    }

    /// Strokes the rectangle with corners `a` and `b`, in any order.
    pub fn stroke_rect(&mut self, a: [f32; 2], b: [f32; 2], width: f32, color: Rgba<u8>) {
        let (x0, x1) = (a[0].min(b[0]), a[0].max(b[0]));
        let (y0, y1) = (a[1].min(b[1]), a[1].max(b[1]));
        let corners = [[x0, y0], [x1, y0], [x1, y1], [x0, y1]];
        self.stroke(polyline(&corners, true), width, color);
    }

    pub fn stroke_circle(&mut self, center: [f32; 2], radius: f32, width: f32, color: Rgba<u8>) {
        self.stroke(PathBuilder::from_circle(center[0], center[1], radius), width, color);
    }

    /// Fills `color` through a coverage mask the size of the surface.
    pub fn fill_mask(&mut self, mask: &Mask, color: Rgba<u8>) {
        let Some(rect) = Rect::from_xywh(0.0, 0.0, self.width() as f32, self.height() as f32) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint_for(color), Transform::identity(), Some(mask));
    }

    /// Composites `img` with its top-left corner at the surface origin.
    pub fn draw_image(&mut self, img: &RgbaImage) -> Result<(), DrawingError> {
        let mut layer = allocate(img.width(), img.height())?;
        for (dst, src) in layer.pixels_mut().iter_mut().zip(img.pixels()) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Reallocates the buffer, copying the old contents back anchored at
    /// the origin. Growing pads with transparency, shrinking crops.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), DrawingError> {
        if (width, height) == self.dimensions() {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.pixmap, allocate(width, height)?);
        self.pixmap.draw_pixmap(
            0,
            0,
            previous.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    pub fn load_encoded(&mut self, encoded: &str) -> Result<(), DrawingError> {
        let img = image_codec::decode(encoded)?;
        self.draw_image(&img)
    }

    pub fn encode(&self) -> Result<String, DrawingError> {
        image_codec::encode_data_url(&self.to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn surface(w: u32, h: u32) -> RasterSurface {
        RasterSurface::new(w, h).unwrap()
    }

    fn painted(img: &RgbaImage, x: u32, y: u32) -> bool {
        img.get_pixel(x, y)[3] > 0
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(matches!(
            RasterSurface::new(0, 10),
            Err(DrawingError::SurfaceSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn saved_rectangle_has_edges_and_empty_center() {
        let mut s = surface(100, 100);
        s.stroke_rect([50.0, 40.0], [10.0, 10.0], 5.0, BLACK);
        let img = image_codec::decode(&s.encode().unwrap()).unwrap();
        for (x, y) in [(30, 10), (30, 40), (10, 25), (50, 25), (10, 10), (50, 40)] {
            assert!(painted(&img, x, y), "edge pixel ({x}, {y})");
        }
        assert!(!painted(&img, 30, 25));
        assert!(!painted(&img, 80, 80));
    }

    #[test]
    fn saved_circle_ring_sits_at_the_radius() {
        let mut s = surface(300, 300);
        s.stroke_circle([100.0, 100.0], 50.0, 5.0, BLACK);
        let img = image_codec::decode(&s.encode().unwrap()).unwrap();
        assert!(painted(&img, 100, 50));
        assert!(painted(&img, 150, 100));
        assert!(painted(&img, 49, 100));
        assert!(painted(&img, 100, 149));
        assert!(!painted(&img, 100, 100));
        assert!(!painted(&img, 100, 60));
        assert!(!painted(&img, 100, 160));
    }

    #[test]
    fn round_caps_extend_past_the_endpoints() {
        let mut s = surface(60, 20);
        s.stroke_line([10.0, 10.0], [50.0, 10.0], 8.0, BLACK);
        let img = s.to_image();
        assert!(painted(&img, 7, 10));
        assert!(painted(&img, 52, 10));
        assert!(!painted(&img, 6, 6));
    }

    #[test]
    fn resize_keeps_existing_pixels() {
        let mut s = surface(100, 100);
        s.stroke_line([10.0, 10.0], [60.0, 10.0], 4.0, BLACK);

        s.resize(200, 150).unwrap();
        assert_eq!(s.dimensions(), (200, 150));
        let img = s.to_image();
        assert!(painted(&img, 30, 10));
        assert!(!painted(&img, 150, 10));

        s.resize(40, 40).unwrap();
        let img = s.to_image();
        assert!(painted(&img, 30, 10));
        assert!(!painted(&img, 30, 30));

        assert!(s.resize(0, 40).is_err());
        assert_eq!(s.dimensions(), (40, 40));
    }

    #[test]
    fn clear_wipes_everything() {
        let mut s = surface(20, 20);
        s.stroke_line([0.0, 0.0], [20.0, 20.0], 3.0, BLACK);
        s.clear();
        assert!(s.to_image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn encoded_surface_loads_into_another() {
        let mut s = surface(60, 60);
        s.stroke_circle([30.0, 30.0], 10.0, 2.0, BLACK);
        let encoded = s.encode().unwrap();

        let mut other = surface(80, 80);
        other.load_encoded(&encoded).unwrap();
        let img = other.to_image();
        assert_eq!(img.get_pixel(30, 20), s.to_image().get_pixel(30, 20));
        assert!(!painted(&img, 70, 70));
    }
}
