use image::Rgba;
use rand::Rng;

/// Background colors a note can take. Order matters for `next_note_color`.
pub const NOTE_COLORS: [&str; 8] = [
    "#00BFA6", // teal glow
    "#9F75FF", // soft violet
    "#F67280", // blush coral
    "#FFCB05", // electric yellow
    "#45A29E", // cool aqua
    "#FF8C42", // saffron neon
    "#5CDB95", // calm mint
    "#836FFF", // iris vibe
];

/// Swatches offered by the drawing toolbar, black first.
pub const DRAWING_COLORS: [&str; 8] = [
    "#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
];

pub fn random_note_color() -> &'static str {
    let mut rng = rand::rng();
    NOTE_COLORS[rng.random_range(0..NOTE_COLORS.len())]
}

/// The palette entry after `current`, wrapping around. Colors outside the
/// palette restart from the first entry.
pub fn next_note_color(current: &str) -> &'static str {
    match NOTE_COLORS
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current))
    {
        Some(i) => NOTE_COLORS[(i + 1) % NOTE_COLORS.len()],
        None => NOTE_COLORS[0],
    }
}

pub fn is_hex_color(value: &str) -> bool {
    parse_hex_color(value).is_some()
}

/// Parses `#RRGGBB` into an opaque pixel.
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

pub fn drawing_color(index: usize) -> Option<Rgba<u8>> {
    DRAWING_COLORS.get(index).and_then(|c| parse_hex_color(c))
}
