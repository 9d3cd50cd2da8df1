use image::Rgba;

use crate::canvas::RasterSurface;

pub const ARROW_HEAD_LENGTH: f32 = 15.0;
pub const ARROW_HEAD_ANGLE: f32 = std::f32::consts::PI / 6.0;
pub const MIN_STROKE_WIDTH: u32 = 1;
pub const MAX_STROKE_WIDTH: u32 = 20;
pub const DEFAULT_STROKE_WIDTH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pen,
    Rectangle,
    Circle,
    Arrow,
    Text,
}

impl Tool {
    pub const ALL: [Tool; 5] = [Tool::Pen, Tool::Rectangle, Tool::Circle, Tool::Arrow, Tool::Text];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Arrow => "arrow",
            Tool::Text => "text",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Toolbar keys `1`..`5`.
    pub fn from_shortcut(key: char) -> Option<Tool> {
        let index = key.to_digit(10)?.checked_sub(1)? as usize;
        Tool::ALL.get(index).copied()
    }
}

/// A shape ready to be composited. Only lives for the duration of a commit.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingElement {
    Segment {
        start: [f32; 2],
        end: [f32; 2],
        color: Rgba<u8>,
        width: f32,
    },
    Rectangle {
        corner: [f32; 2],
        opposite: [f32; 2],
        color: Rgba<u8>,
        width: f32,
    },
    Circle {
        center: [f32; 2],
        radius: f32,
        color: Rgba<u8>,
        width: f32,
    },
    Arrow {
        start: [f32; 2],
        end: [f32; 2],
        color: Rgba<u8>,
        width: f32,
    },
}

impl DrawingElement {
    pub fn paint(&self, surface: &mut RasterSurface) {
        match *self {
            DrawingElement::Segment { start, end, color, width } => {
                surface.stroke_line(start, end, width, color);
            }
            DrawingElement::Rectangle { corner, opposite, color, width } => {
                surface.stroke_rect(corner, opposite, width, color);
            }
            DrawingElement::Circle { center, radius, color, width } => {
                surface.stroke_circle(center, radius, width, color);
            }
            DrawingElement::Arrow { start, end, color, width } => {
                surface.stroke_line(start, end, width, color);
                let [left, right] = arrow_head(start, end);
                surface.stroke_polyline(&[left, end, right], width, color);
            }
        }
    }
}

/// Outer points of the two head segments drawn back from `end`.
pub fn arrow_head(start: [f32; 2], end: [f32; 2]) -> [[f32; 2]; 2] {
    let angle = (end[1] - start[1]).atan2(end[0] - start[0]);
    let wing = |offset: f32| {
        [
            end[0] - ARROW_HEAD_LENGTH * (angle + offset).cos(),
            end[1] - ARROW_HEAD_LENGTH * (angle + offset).sin(),
        ]
    };
    [wing(-ARROW_HEAD_ANGLE), wing(ARROW_HEAD_ANGLE)]
}

pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt()
}
