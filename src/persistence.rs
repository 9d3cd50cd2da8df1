use std::collections::HashSet;

use serde_json::Value;

use crate::note::Note;
use crate::palette;

pub fn encode_notes(notes: &[Note]) -> Result<String, serde_json::Error> {
    serde_json::to_string(notes)
}

/// Decodes a stored collection. The document itself must be a JSON array;
/// records that fail validation are dropped one by one so a single bad
/// entry does not cost the rest of the collection. An empty `drawing`
/// reads as no drawing.
pub fn decode_notes(text: &str) -> Result<Vec<Note>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(text)?;
    let mut seen = HashSet::new();
    let mut notes = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let mut note = match serde_json::from_value::<Note>(record) {
            Ok(note) => note,
            Err(e) => {
                log::warn!("Dropping stored note #{}: {}", index, e);
                continue;
            }
        };
        if note.drawing.as_deref() == Some("") {
            note.drawing = None;
        }
        if let Err(reason) = validate(&note) {
            log::warn!("Dropping stored note {}: {}", note.id, reason);
            continue;
        }
        if !seen.insert(note.id.clone()) {
            log::warn!("Dropping stored note {}: duplicate id", note.id);
            continue;
        }
        notes.push(note);
    }

    Ok(notes)
}

fn validate(note: &Note) -> Result<(), &'static str> {
    if note.id.as_str().is_empty() {
        return Err("empty id");
    }
    if !palette::is_hex_color(&note.color) {
        return Err("color is not #RRGGBB");
    }
    Ok(())
}
