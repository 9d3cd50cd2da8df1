//! Browser bindings. The page owns layout and DOM events and forwards
//! them here; notes come back as JSON and the canvas as RGBA bytes.

use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::canvas::CanvasTransform;
use crate::config::Config;
use crate::drawing::Tool;
use crate::note::{Note, NoteId};
use crate::state::PointerEvent;
use crate::storage::LocalStorage;
use crate::text_renderer::TextRenderer;
use crate::widget::DrawingWidget;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct NotedApp {
    inner: App<LocalStorage>,
}

#[wasm_bindgen]
impl NotedApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<NotedApp, JsValue> {
        let storage = LocalStorage::open().map_err(js_error)?;
        Ok(Self {
            inner: App::new(Config::default(), storage),
        })
    }

    /// Replaces the bundled text tool font.
    pub fn set_font(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        let renderer = TextRenderer::from_bytes(bytes).map_err(js_error)?;
        self.inner.set_text_renderer(renderer);
        Ok(())
    }

    pub fn notes_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.store().notes()).map_err(js_error)
    }

    pub fn active_note_id(&self) -> Option<String> {
        self.inner.store().active().map(|n| n.id.to_string())
    }

    /// `"list"`, `"editing"` or `"drawing"`.
    pub fn view_mode(&self) -> String {
        format!("{:?}", self.inner.store().mode()).to_lowercase()
    }

    pub fn create_note(&mut self) -> String {
        self.inner.create_note().to_string()
    }

    pub fn background_double_click(&mut self) -> String {
        self.inner.background_double_click().to_string()
    }

    pub fn update_note(&mut self, json: &str) -> Result<(), JsValue> {
        let note: Note = serde_json::from_str(json).map_err(js_error)?;
        self.inner.update_note(note).map_err(js_error)
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        self.inner.delete_note(&NoteId::from(id))
    }

    pub fn select_note(&mut self, id: &str) -> Result<(), JsValue> {
        self.inner.select_note(&NoteId::from(id)).map_err(js_error)
    }

    pub fn close_note(&mut self) {
        self.inner.close_note();
    }

    pub fn next_color(&mut self, id: &str) -> Result<String, JsValue> {
        self.inner
            .next_color(&NoteId::from(id))
            .map(str::to_string)
            .map_err(js_error)
    }

    /// Opens the canvas for a note. `left`/`top`/`width`/`height` are the
    /// element's client rect; the backing buffer is sized in device pixels.
    #[allow(clippy::too_many_arguments)]
    pub fn open_drawing(
        &mut self,
        id: &str,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        backing_width: u32,
        backing_height: u32,
    ) -> Result<(), JsValue> {
        let transform = CanvasTransform::new([left, top], [width, height], [backing_width, backing_height]);
        self.inner
            .open_drawing(&NoteId::from(id), transform)
            .map(|_| ())
            .map_err(js_error)
    }

    /// Paints the note's previous drawing. Call once after `open_drawing`,
    /// from a later task so the page can show the canvas first.
    pub fn finish_loading(&mut self) -> Result<(), JsValue> {
        self.canvas()?.finish_loading().map_err(js_error)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn resize_canvas(
        &mut self,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        backing_width: u32,
        backing_height: u32,
    ) -> Result<(), JsValue> {
        let transform = CanvasTransform::new([left, top], [width, height], [backing_width, backing_height]);
        self.canvas()?.resize(transform);
        Ok(())
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<bool, JsValue> {
        Ok(self.canvas()?.input(PointerEvent::Down([x, y])))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<bool, JsValue> {
        Ok(self.canvas()?.input(PointerEvent::Move([x, y])))
    }

    pub fn pointer_up(&mut self) -> Result<bool, JsValue> {
        Ok(self.canvas()?.input(PointerEvent::Up))
    }

    pub fn pointer_leave(&mut self) -> Result<bool, JsValue> {
        Ok(self.canvas()?.input(PointerEvent::Leave))
    }

    pub fn key_input(&mut self, key: &str) -> Result<bool, JsValue> {
        let canvas = self.canvas()?;
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(canvas.key_input(ch)),
            _ if key == "Backspace" => Ok(canvas.backspace()),
            _ => Ok(false),
        }
    }

    pub fn select_tool(&mut self, name: &str) -> Result<(), JsValue> {
        let tool = Tool::from_name(name).ok_or_else(|| js_error(format!("unknown tool {name}")))?;
        self.canvas()?.select_tool(tool);
        Ok(())
    }

    pub fn select_color(&mut self, index: usize) -> Result<bool, JsValue> {
        Ok(self.canvas()?.select_color(index))
    }

    pub fn set_stroke_width(&mut self, width: u32) -> Result<(), JsValue> {
        self.canvas()?.set_stroke_width(width);
        Ok(())
    }

    /// True while the text tool waits for input.
    pub fn text_prompt_open(&self) -> bool {
        self.inner.canvas().is_some_and(|c| c.pending_text().is_some())
    }

    /// Confirms the text prompt with `text`; an empty string draws nothing.
    pub fn submit_text(&mut self, text: &str) -> Result<bool, JsValue> {
        let canvas = self.canvas()?;
        canvas.type_text(text);
        Ok(canvas.confirm_text())
    }

    pub fn cancel_text(&mut self) -> Result<(), JsValue> {
        self.canvas()?.cancel_text();
        Ok(())
    }

    pub fn clear_canvas(&mut self) -> Result<(), JsValue> {
        self.canvas()?.clear();
        Ok(())
    }

    pub fn surface_width(&self) -> u32 {
        self.inner.canvas().map_or(0, |c| c.surface().width())
    }

    pub fn surface_height(&self) -> u32 {
        self.inner.canvas().map_or(0, |c| c.surface().height())
    }

    /// Current canvas pixels, ready for `new ImageData(...)`.
    pub fn surface_rgba(&self) -> js_sys::Uint8ClampedArray {
        match self.inner.canvas() {
            Some(canvas) => js_sys::Uint8ClampedArray::from(canvas.surface().to_image().as_raw().as_slice()),
            None => js_sys::Uint8ClampedArray::new_with_length(0),
        }
    }

    pub fn save_drawing(&mut self) -> Result<(), JsValue> {
        self.inner.save_drawing().map_err(js_error)
    }

    pub fn cancel_drawing(&mut self) {
        self.inner.cancel_drawing();
    }
}

impl NotedApp {
    fn canvas(&mut self) -> Result<&mut DrawingWidget, JsValue> {
        self.inner.canvas_mut().ok_or_else(|| js_error("no drawing is open"))
    }
}
