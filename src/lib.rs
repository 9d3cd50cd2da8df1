mod app;
pub mod canvas;
mod config;
mod drawing;
mod error;
mod event_handler;
mod note;
pub mod palette;
mod persistence;
mod state;
mod storage;
mod store;
mod text_renderer;
mod widget;
#[cfg(target_arch = "wasm32")]
mod web;

// Re-export the main public interface
pub use app::{App, init_logging};
pub use canvas::{CanvasTransform, RasterSurface};
pub use config::Config;
pub use drawing::{DrawingElement, Tool};
pub use error::{AppError, DrawingError, NoteError, StorageError};
pub use note::{Note, NoteId};
pub use persistence::{decode_notes, encode_notes};
pub use state::{PointerEvent, TextPrompt};
pub use storage::{MemoryStorage, Storage};
pub use store::{NoteStore, ViewMode};
pub use text_renderer::{TEXT_SIZE, TextRenderer};
pub use widget::DrawingWidget;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use web::NotedApp;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn start() {
    init_logging();
}
