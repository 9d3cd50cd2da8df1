use crate::error::{NoteError, StorageError};
use crate::note::{Note, NoteId};
use crate::palette;
use crate::persistence;
use crate::storage::Storage;

pub const DEFAULT_STORAGE_KEY: &str = "notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Editing,
    Drawing,
}

/// Ordered note collection mirrored to a [`Storage`] entry.
///
/// Every method that changes the collection writes the whole list back
/// before returning. A failed write is logged, the in-memory change is
/// kept, and the store stays dirty until [`NoteStore::flush`] succeeds.
pub struct NoteStore<S: Storage> {
    notes: Vec<Note>,
    active: Option<NoteId>,
    drawing: bool,
    storage: S,
    key: String,
    dirty: bool,
}

impl<S: Storage> NoteStore<S> {
    /// Rehydrates the collection stored under `key`. Unreadable or
    /// unparsable content yields an empty collection.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let notes = match storage.get_item(&key) {
            Ok(Some(text)) => match persistence::decode_notes(&text) {
                Ok(notes) => notes,
                Err(e) => {
                    log::error!("Failed to parse saved notes: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::error!("Failed to read saved notes: {}", e);
                Vec::new()
            }
        };
        log::info!("Loaded {} notes from '{}'", notes.len(), key);

        Self {
            notes,
            active: None,
            drawing: false,
            storage,
            key,
            dirty: false,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn active(&self) -> Option<&Note> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    pub fn mode(&self) -> ViewMode {
        match (&self.active, self.drawing) {
            (None, _) => ViewMode::List,
            (Some(_), false) => ViewMode::Editing,
            (Some(_), true) => ViewMode::Drawing,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Appends a fresh note and opens it for editing.
    pub fn create(&mut self) -> &Note {
        let note = Note::new();
        log::debug!("Created note {}", note.id);
        self.active = Some(note.id.clone());
        self.drawing = false;
        self.notes.push(note);
        self.persist();
        &self.notes[self.notes.len() - 1]
    }

    /// Replaces the note with the same id and makes it active. Drawing
    /// mode only survives an update of the note being drawn.
    pub fn update(&mut self, note: Note) -> Result<(), NoteError> {
        let slot = self
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| NoteError::NotFound(note.id.clone()))?;
        if self.active.as_ref() != Some(&note.id) {
            self.drawing = false;
        }
        self.active = Some(note.id.clone());
        *slot = note;
        self.persist();
        Ok(())
    }

    /// Removes a note. Returns whether anything was removed.
    pub fn delete(&mut self, id: &NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| &n.id != id);
        if self.notes.len() == before {
            return false;
        }
        if self.active.as_ref() == Some(id) {
            self.active = None;
            self.drawing = false;
        }
        self.persist();
        true
    }

    /// Stores `image` as the active note's drawing and leaves drawing mode.
    pub fn attach_drawing(&mut self, image: String) -> Result<(), NoteError> {
        let mut note = self.active().cloned().ok_or(NoteError::NoActiveNote)?;
        note.drawing = Some(image);
        self.update(note)?;
        self.drawing = false;
        Ok(())
    }

    pub fn select(&mut self, id: &NoteId) -> Result<&Note, NoteError> {
        let index = self.index_of(id)?;
        self.active = Some(id.clone());
        self.drawing = false;
        Ok(&self.notes[index])
    }

    pub fn close(&mut self) {
        self.active = None;
        self.drawing = false;
    }

    pub fn begin_drawing(&mut self, id: &NoteId) -> Result<&Note, NoteError> {
        let index = self.index_of(id)?;
        self.active = Some(id.clone());
        self.drawing = true;
        Ok(&self.notes[index])
    }

    /// Leaves drawing mode without touching the note; editing resumes.
    pub fn cancel_drawing(&mut self) {
        self.drawing = false;
    }

    /// Moves a note to the palette color after its current one.
    pub fn next_color(&mut self, id: &NoteId) -> Result<&'static str, NoteError> {
        let mut note = self.get(id).cloned().ok_or_else(|| NoteError::NotFound(id.clone()))?;
        let color = palette::next_note_color(&note.color);
        note.color = color.to_string();
        self.update(note)?;
        Ok(color)
    }

    /// Writes the collection, clearing the dirty flag on success.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let text = persistence::encode_notes(&self.notes)?;
        self.storage.set_item(&self.key, &text)?;
        self.dirty = false;
        Ok(())
    }

    fn persist(&mut self) {
        self.dirty = true;
        if let Err(e) = self.flush() {
            log::error!("Failed to save notes to '{}': {}", self.key, e);
        }
    }

    fn index_of(&self, id: &NoteId) -> Result<usize, NoteError> {
        self.notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.clone()))
    }
}
