use crate::canvas::CanvasTransform;
use crate::config::Config;
use crate::error::{AppError, NoteError};
use crate::note::{Note, NoteId};
use crate::storage::Storage;
use crate::store::{NoteStore, ViewMode};
use crate::text_renderer::TextRenderer;
use crate::widget::DrawingWidget;

/// Installs the platform logger. Safe to call more than once.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_err() {
                log::debug!("Logger already initialized");
            }
        } else {
            let _ = env_logger::try_init();
        }
    }
}

/// A mounted canvas and the note it was opened for.
struct OpenCanvas {
    note: NoteId,
    widget: DrawingWidget,
}

/// Ties the note store to the drawing canvas of the active note.
///
/// The canvas only lives while the store is drawing that same note. Once
/// the store moves on (another note made active, editing resumed, the
/// note deleted) the canvas is discarded and its strokes are lost.
pub struct App<S: Storage> {
    store: NoteStore<S>,
    canvas: Option<OpenCanvas>,
    text_renderer: Option<TextRenderer>,
    config: Config,
}

impl<S: Storage> App<S> {
    pub fn new(config: Config, storage: S) -> Self {
        let store = NoteStore::open(storage, config.storage_key.clone());
        let text_renderer = Self::load_font(&config);
        Self {
            store,
            canvas: None,
            text_renderer,
            config,
        }
    }

    /// The configured font, falling back to the bundled one.
    fn load_font(config: &Config) -> Option<TextRenderer> {
        if let Some(renderer) = Self::configured_font(config) {
            return Some(renderer);
        }
        match TextRenderer::bundled() {
            Ok(renderer) => Some(renderer),
            Err(e) => {
                log::error!("Bundled font is unusable, text tool disabled: {}", e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn configured_font(config: &Config) -> Option<TextRenderer> {
        let path = config.font_path.as_ref()?;
        match TextRenderer::load(path) {
            Ok(renderer) => {
                log::info!("Loaded text tool font from {}", path.display());
                Some(renderer)
            }
            Err(e) => {
                log::warn!("Falling back to the bundled font: {:#}", e);
                None
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn configured_font(_config: &Config) -> Option<TextRenderer> {
        None
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    /// Direct store access. A canvas left behind by the change is dropped
    /// on the next canvas access.
    pub fn store_mut(&mut self) -> &mut NoteStore<S> {
        &mut self.store
    }

    /// Replaces the text tool font, including on an open canvas.
    pub fn set_text_renderer(&mut self, text_renderer: TextRenderer) {
        if let Some(open) = &mut self.canvas {
            open.widget.text_renderer = Some(text_renderer.clone());
        }
        self.text_renderer = Some(text_renderer);
    }

    pub fn create_note(&mut self) -> NoteId {
        let id = self.store.create().id.clone();
        self.release_stale_canvas();
        id
    }

    /// A double click on the empty board creates a note.
    pub fn background_double_click(&mut self) -> NoteId {
        self.create_note()
    }

    pub fn update_note(&mut self, note: Note) -> Result<(), NoteError> {
        let result = self.store.update(note);
        self.release_stale_canvas();
        result
    }

    pub fn select_note(&mut self, id: &NoteId) -> Result<(), NoteError> {
        let result = self.store.select(id).map(|_| ());
        self.release_stale_canvas();
        result
    }

    pub fn close_note(&mut self) {
        self.store.close();
        self.release_stale_canvas();
    }

    pub fn next_color(&mut self, id: &NoteId) -> Result<&'static str, NoteError> {
        let result = self.store.next_color(id);
        self.release_stale_canvas();
        result
    }

    pub fn delete_note(&mut self, id: &NoteId) -> bool {
        let removed = self.store.delete(id);
        self.release_stale_canvas();
        removed
    }

    /// Enters drawing mode for `id`, mounting a canvas preloaded with the
    /// note's current drawing.
    pub fn open_drawing(&mut self, id: &NoteId, transform: CanvasTransform) -> Result<&mut DrawingWidget, AppError> {
        let initial = self.store.get(id).ok_or_else(|| NoteError::NotFound(id.clone()))?.drawing.clone();
        let mut widget = DrawingWidget::new(transform, initial)?.with_text_renderer(self.text_renderer.clone());
        widget.set_stroke_width(self.config.default_stroke_width);
        self.store.begin_drawing(id)?;

        let open = self.canvas.insert(OpenCanvas {
            note: id.clone(),
            widget,
        });
        Ok(&mut open.widget)
    }

    pub fn canvas(&self) -> Option<&DrawingWidget> {
        self.canvas
            .as_ref()
            .filter(|open| self.is_current(open))
            .map(|open| &open.widget)
    }

    pub fn canvas_mut(&mut self) -> Option<&mut DrawingWidget> {
        self.release_stale_canvas();
        self.canvas.as_mut().map(|open| &mut open.widget)
    }

    /// Flattens the canvas into the note it was opened for and closes it.
    pub fn save_drawing(&mut self) -> Result<(), AppError> {
        self.release_stale_canvas();
        let open = self.canvas.as_mut().ok_or(AppError::NotDrawing)?;
        let image = open.widget.save()?;
        self.store.attach_drawing(image)?;
        self.canvas = None;
        Ok(())
    }

    /// Discards the canvas without touching the note.
    pub fn cancel_drawing(&mut self) {
        self.canvas = None;
        self.store.cancel_drawing();
    }

    fn is_current(&self, open: &OpenCanvas) -> bool {
        self.store.mode() == ViewMode::Drawing && self.store.active().is_some_and(|n| n.id == open.note)
    }

    fn release_stale_canvas(&mut self) {
        let stale = self.canvas.as_ref().is_some_and(|open| !self.is_current(open));
        if stale {
            if let Some(open) = self.canvas.take() {
                log::info!("Discarding canvas of note {}: no longer being drawn", open.note);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl App<crate::storage::FileStorage> {
    /// Loads the user's config and opens file storage in the data directory.
    pub fn open_default() -> anyhow::Result<Self> {
        let config = Config::load();
        let dir = config.resolved_data_dir()?;
        let storage = crate::storage::FileStorage::open(dir)?;
        Ok(Self::new(config, storage))
    }
}
