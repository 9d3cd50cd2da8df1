use crate::drawing::{DrawingElement, Tool, distance};
use crate::state::{PointerEvent, SurfaceState, TextPrompt};
use crate::state::UserInputState::{Drawing, Idle, Typing};
use crate::text_renderer::TEXT_SIZE;
use crate::widget::DrawingWidget;

impl DrawingWidget {
    /// Feeds one pointer or touch event. Returns whether it was consumed.
    pub fn input(&mut self, event: PointerEvent) -> bool {
        if let SurfaceState::Loading { queued, .. } = &mut self.readiness {
            queued.push_back(event);
            return true;
        }

        match event {
            PointerEvent::Down(client) => {
                if self.input.state == Typing {
                    return false;
                }
                let canvas_pos = self.transform.screen_to_canvas(client);
                self.input.state = Drawing;
                self.input.drag_start = Some(canvas_pos);
                self.input.last_pos = canvas_pos;
                true
            }
            PointerEvent::Move(client) => {
                if self.input.state != Drawing {
                    return false;
                }
                let canvas_pos = self.transform.screen_to_canvas(client);
                if self.current_tool == Tool::Pen {
                    DrawingElement::Segment {
                        start: self.input.last_pos,
                        end: canvas_pos,
                        color: self.current_color,
                        width: self.stroke_width as f32,
                    }
                    .paint(&mut self.surface);
                }
                self.input.last_pos = canvas_pos;
                true
            }
            PointerEvent::Up | PointerEvent::Leave => match self.input.state {
                Drawing => {
                    self.input.state = Idle;
                    self.finish_drawing();
                    true
                }
                _ => false,
            },
        }
    }

    /// Commits the shape spanned by the drag. Pen strokes are already on
    /// the surface; the text tool opens a prompt instead.
    pub fn finish_drawing(&mut self) {
        let Some(start) = self.input.drag_start.take() else {
            return;
        };
        let end = self.input.last_pos;
        let color = self.current_color;
        let width = self.stroke_width as f32;

        let element = match self.current_tool {
            Tool::Pen => None,
            Tool::Rectangle => Some(DrawingElement::Rectangle {
                corner: start,
                opposite: end,
                color,
                width,
            }),
            Tool::Circle => Some(DrawingElement::Circle {
                center: start,
                radius: distance(start, end),
                color,
                width,
            }),
            Tool::Arrow => Some(DrawingElement::Arrow { start, end, color, width }),
            Tool::Text => {
                self.input.state = Typing;
                self.typing = Some(TextPrompt {
                    buffer: String::new(),
                    pos_canvas: start,
                });
                None
            }
        };

        if let Some(element) = element {
            element.paint(&mut self.surface);
        }
    }

    /// Keyboard input: characters go to an open text prompt, otherwise
    /// digits switch tools.
    pub fn key_input(&mut self, ch: char) -> bool {
        if let Some(prompt) = &mut self.typing {
            if ch.is_control() {
                return false;
            }
            prompt.buffer.push(ch);
            return true;
        }
        match Tool::from_shortcut(ch) {
            Some(tool) => {
                self.current_tool = tool;
                true
            }
            None => false,
        }
    }

    pub fn type_text(&mut self, text: &str) {
        if let Some(prompt) = &mut self.typing {
            prompt.buffer.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn backspace(&mut self) -> bool {
        match &mut self.typing {
            Some(prompt) => prompt.buffer.pop().is_some(),
            None => false,
        }
    }

    /// Closes the prompt, rendering its text if there is any. Returns
    /// whether text reached the surface.
    pub fn confirm_text(&mut self) -> bool {
        let Some(prompt) = self.typing.take() else {
            return false;
        };
        self.input.state = Idle;
        if prompt.buffer.is_empty() {
            return false;
        }
        match &self.text_renderer {
            Some(renderer) => {
                renderer.draw(
                    &mut self.surface,
                    &prompt.buffer,
                    prompt.pos_canvas,
                    TEXT_SIZE,
                    self.current_color,
                );
                true
            }
            None => {
                log::warn!("No font loaded, dropping text {:?}", prompt.buffer);
                false
            }
        }
    }

    pub fn cancel_text(&mut self) {
        if self.typing.take().is_some() {
            self.input.state = Idle;
        }
    }
}
