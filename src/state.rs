use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInputState {
    Idle,
    Drawing,
    /// Waiting for the text prompt to be confirmed or cancelled.
    Typing,
}

/// Pointer or touch input, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down([f32; 2]),
    Move([f32; 2]),
    Up,
    /// The pointer left the surface; finishes a stroke like `Up`.
    Leave,
}

pub struct InputState {
    pub state: UserInputState,
    pub drag_start: Option<[f32; 2]>,
    pub last_pos: [f32; 2],
}

impl InputState {
    pub fn new() -> Self {
        Self {
            state: UserInputState::Idle,
            drag_start: None,
            last_pos: [0.0; 2],
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TextPrompt {
    pub buffer: String,
    pub pos_canvas: [f32; 2],
}

pub enum SurfaceState {
    /// An initial image has not been painted yet; input is held back.
    Loading {
        source: String,
        queued: VecDeque<PointerEvent>,
    },
    Ready,
}
