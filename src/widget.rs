use std::collections::VecDeque;

use image::Rgba;

use crate::canvas::{CanvasTransform, RasterSurface};
use crate::drawing::{DEFAULT_STROKE_WIDTH, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, Tool};
use crate::error::DrawingError;
use crate::palette;
use crate::state::{InputState, SurfaceState, TextPrompt};
use crate::text_renderer::TextRenderer;

/// Freehand and shape drawing on a raster surface for one note.
///
/// Created when drawing starts and dropped when it ends; only what
/// [`DrawingWidget::save`] returns outlives it.
pub struct DrawingWidget {
    pub(crate) surface: RasterSurface,
    pub(crate) transform: CanvasTransform,
    pub(crate) input: InputState,
    pub(crate) typing: Option<TextPrompt>,
    pub(crate) readiness: SurfaceState,

    pub(crate) current_tool: Tool,
    pub(crate) current_color: Rgba<u8>,
    pub(crate) stroke_width: u32,

    pub(crate) text_renderer: Option<TextRenderer>,
}

impl DrawingWidget {
    /// Mounts a widget whose buffer matches `transform.backing_size`, which
    /// must not be zero in either direction.
    ///
    /// With an `initial` image the surface stays in the loading state until
    /// [`DrawingWidget::finish_loading`] runs; pointer input received in the
    /// meantime is queued and replayed on top of the loaded image.
    pub fn new(transform: CanvasTransform, initial: Option<String>) -> Result<Self, DrawingError> {
        let [width, height] = transform.backing_size;
        let readiness = match initial {
            Some(source) if !source.is_empty() => SurfaceState::Loading {
                source,
                queued: VecDeque::new(),
            },
            _ => SurfaceState::Ready,
        };

        Ok(Self {
            surface: RasterSurface::new(width, height)?,
            transform,
            input: InputState::new(),
            typing: None,
            readiness,
            current_tool: Tool::Pen,
            current_color: Rgba([0, 0, 0, 255]),
            stroke_width: DEFAULT_STROKE_WIDTH,
            text_renderer: None,
        })
    }

    pub fn with_text_renderer(mut self, text_renderer: Option<TextRenderer>) -> Self {
        self.text_renderer = text_renderer;
        self
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.readiness, SurfaceState::Ready)
    }

    /// Paints the initial image at the origin and replays queued input.
    ///
    /// A decode failure is returned after the widget has become ready with
    /// whatever the queued input drew, so the caller may keep drawing.
    pub fn finish_loading(&mut self) -> Result<(), DrawingError> {
        let SurfaceState::Loading { source, queued } =
            std::mem::replace(&mut self.readiness, SurfaceState::Ready)
        else {
            return Ok(());
        };

        let loaded = self.surface.load_encoded(&source);
        match &loaded {
            Ok(()) => log::debug!("Initial drawing loaded, replaying {} queued events", queued.len()),
            Err(e) => log::warn!("Failed to decode initial drawing: {}", e),
        }
        for event in queued {
            self.input(event);
        }
        loaded
    }

    pub fn tool(&self) -> Tool {
        self.current_tool
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.current_tool = tool;
    }

    pub fn color(&self) -> Rgba<u8> {
        self.current_color
    }

    /// Picks a swatch from the drawing palette. Unknown indices are ignored.
    pub fn select_color(&mut self, index: usize) -> bool {
        match palette::drawing_color(index) {
            Some(color) => {
                self.current_color = color;
                true
            }
            None => false,
        }
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    pub fn transform(&self) -> &CanvasTransform {
        &self.transform
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn pending_text(&self) -> Option<&TextPrompt> {
        self.typing.as_ref()
    }

    /// Follows a layout change. The buffer takes the new backing size and
    /// keeps what was already drawn.
    pub fn resize(&mut self, transform: CanvasTransform) {
        let [width, height] = transform.backing_size;
        if let Err(e) = self.surface.resize(width, height) {
            log::warn!("Ignoring canvas resize: {}", e);
            return;
        }
        log::info!(
            "Drawing surface resized to {}x{} (display {}x{})",
            width,
            height,
            transform.display_size[0],
            transform.display_size[1]
        );
        self.transform = transform;
    }

    /// Wipes the surface to transparent. A pending initial image is dropped
    /// along with anything queued behind it.
    pub fn clear(&mut self) {
        if !self.is_ready() {
            self.readiness = SurfaceState::Ready;
        }
        self.surface.clear();
    }

    /// Flattens the surface into one encoded image for the note.
    ///
    /// A still pending initial image is loaded first. If it cannot be
    /// decoded that error is returned instead of an image that would
    /// silently replace the note's drawing; the widget is ready afterwards,
    /// so saving again stores what is on the surface.
    pub fn save(&mut self) -> Result<String, DrawingError> {
        if !self.is_ready() {
            self.finish_loading()?;
        }
        self.surface.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::image_codec;
    use crate::state::PointerEvent;

    const BROKEN_IMAGE: &str = "data:image/png;base64,AAAA";

    fn widget(w: u32, h: u32) -> DrawingWidget {
        DrawingWidget::new(CanvasTransform::identity(w, h), None).unwrap()
    }

    fn painted(widget: &DrawingWidget, x: u32, y: u32) -> bool {
        widget.surface().to_image().get_pixel(x, y)[3] > 0
    }

    #[test]
    fn defaults() {
        let w = widget(10, 10);
        assert!(w.is_ready());
        assert_eq!(w.tool(), Tool::Pen);
        assert_eq!(w.color(), Rgba([0, 0, 0, 255]));
        assert_eq!(w.stroke_width(), 5);
    }

    #[test]
    fn stroke_width_is_clamped() {
        let mut w = widget(10, 10);
        w.set_stroke_width(0);
        assert_eq!(w.stroke_width(), 1);
        w.set_stroke_width(99);
        assert_eq!(w.stroke_width(), 20);
    }

    #[test]
    fn color_selection_uses_the_drawing_palette() {
        let mut w = widget(10, 10);
        assert!(w.select_color(2));
        assert_eq!(w.color(), Rgba([255, 0, 0, 255]));
        assert!(!w.select_color(42));
        assert_eq!(w.color(), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn blank_save_is_a_valid_image() {
        let mut w = widget(64, 48);
        let encoded = w.save().unwrap();
        let img = image_codec::decode(&encoded).unwrap();
        assert_eq!(img.dimensions(), (64, 48));
        assert!(img.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn input_before_load_is_replayed_over_the_image() {
        let mut source = widget(100, 100);
        source.input(PointerEvent::Down([10.0, 80.0]));
        source.input(PointerEvent::Move([90.0, 80.0]));
        source.input(PointerEvent::Up);
        let saved = source.save().unwrap();

        let mut w = DrawingWidget::new(CanvasTransform::identity(100, 100), Some(saved)).unwrap();
        assert!(!w.is_ready());
        assert!(w.input(PointerEvent::Down([10.0, 20.0])));
        w.input(PointerEvent::Move([90.0, 20.0]));
        w.input(PointerEvent::Up);
        assert!(!painted(&w, 50, 20));

        w.finish_loading().unwrap();
        assert!(w.is_ready());
        assert!(painted(&w, 50, 80));
        assert!(painted(&w, 50, 20));
    }

    #[test]
    fn undecodable_initial_image_leaves_a_usable_surface() {
        let mut w = DrawingWidget::new(CanvasTransform::identity(50, 50), Some(BROKEN_IMAGE.into())).unwrap();
        w.input(PointerEvent::Down([5.0, 5.0]));
        w.input(PointerEvent::Move([45.0, 5.0]));
        assert!(w.finish_loading().is_err());
        assert!(w.is_ready());
        assert!(painted(&w, 25, 5));
    }

    #[test]
    fn save_reports_an_undecodable_initial_image() {
        let mut w = DrawingWidget::new(CanvasTransform::identity(30, 30), Some(BROKEN_IMAGE.into())).unwrap();
        assert!(matches!(w.save(), Err(DrawingError::Base64(_) | DrawingError::Image(_))));
        assert!(w.is_ready());
        assert!(w.save().is_ok());
    }

    #[test]
    fn zero_sized_mount_is_rejected() {
        let err = DrawingWidget::new(CanvasTransform::identity(0, 0), None).err();
        assert!(matches!(err, Some(DrawingError::SurfaceSize { .. })));
    }

    #[test]
    fn save_while_loading_keeps_the_initial_image() {
        let mut source = widget(40, 40);
        source.select_tool(Tool::Rectangle);
        source.input(PointerEvent::Down([5.0, 5.0]));
        source.input(PointerEvent::Move([35.0, 35.0]));
        source.input(PointerEvent::Up);
        let saved = source.save().unwrap();

        let mut w = DrawingWidget::new(CanvasTransform::identity(40, 40), Some(saved.clone())).unwrap();
        assert_eq!(w.save().unwrap(), saved);
    }

    #[test]
    fn clear_drops_a_pending_image() {
        let mut source = widget(20, 20);
        source.input(PointerEvent::Down([0.0, 10.0]));
        source.input(PointerEvent::Move([20.0, 10.0]));
        let saved = source.save().unwrap();

        let mut w = DrawingWidget::new(CanvasTransform::identity(20, 20), Some(saved)).unwrap();
        w.clear();
        assert!(w.is_ready());
        w.finish_loading().unwrap();
        assert!(w.surface().to_image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn resize_keeps_drawing_and_updates_mapping() {
        let mut w = widget(100, 100);
        w.input(PointerEvent::Down([10.0, 10.0]));
        w.input(PointerEvent::Move([60.0, 10.0]));
        w.input(PointerEvent::Up);

        w.resize(CanvasTransform::identity(160, 120));
        assert_eq!(w.surface().dimensions(), (160, 120));
        assert!(painted(&w, 30, 10));

        w.input(PointerEvent::Down([150.0, 110.0]));
        w.input(PointerEvent::Move([150.0, 100.0]));
        assert!(painted(&w, 150, 105));

        w.resize(CanvasTransform::identity(0, 0));
        assert_eq!(w.surface().dimensions(), (160, 120));
    }
}
