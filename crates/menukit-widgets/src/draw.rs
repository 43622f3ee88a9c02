#![forbid(unsafe_code)]

//! Draw contract.
//!
//! The core never touches pixels. Each frame it emits an ordered display
//! list of [`DrawCommand`]s, each with an absolute target and a clip
//! rectangle, into a [`Renderer`] supplied by the host.

use menukit_core::geometry::{Point, Rect};

use crate::Rgba;

/// One drawing primitive. Coordinates are absolute surface pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// Filled rectangle.
    Fill { rect: Rect, clip: Rect, color: Rgba },
    /// Rectangle border of `width` pixels, drawn inside `rect`.
    Outline {
        rect: Rect,
        clip: Rect,
        color: Rgba,
        width: i32,
    },
    /// Text with its top-left at `origin`.
    Text {
        origin: Point,
        clip: Rect,
        text: String,
        color: Rgba,
    },
    /// Filled triangle.
    Triangle {
        points: [Point; 3],
        clip: Rect,
        color: Rgba,
    },
}

impl DrawCommand {
    /// Clip rectangle of the command.
    pub fn clip(&self) -> Rect {
        match self {
            Self::Fill { clip, .. }
            | Self::Outline { clip, .. }
            | Self::Text { clip, .. }
            | Self::Triangle { clip, .. } => *clip,
        }
    }

    /// Whether the command can produce any visible pixel.
    pub fn is_visible(&self) -> bool {
        let clip = self.clip();
        match self {
            Self::Fill { rect, .. } | Self::Outline { rect, .. } => {
                rect.intersection_opt(&clip).is_some()
            }
            Self::Text { .. } | Self::Triangle { .. } => !clip.is_empty(),
        }
    }
}

/// Drawing collaborator.
pub trait Renderer {
    fn draw(&mut self, command: &DrawCommand);
}

/// Records commands, for headless hosts and tests.
impl Renderer for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(command.clone());
    }
}

/// Forward only commands that can be seen.
pub(crate) fn emit(out: &mut dyn Renderer, command: DrawCommand) {
    if command.is_visible() {
        out.draw(&command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_records_commands() {
        let mut out: Vec<DrawCommand> = Vec::new();
        let cmd = DrawCommand::Fill {
            rect: Rect::new(0, 0, 10, 10),
            clip: Rect::new(0, 0, 100, 100),
            color: Rgba::BLACK,
        };
        out.draw(&cmd);
        assert_eq!(out, vec![cmd]);
    }

    #[test]
    fn fully_clipped_commands_are_dropped() {
        let mut out: Vec<DrawCommand> = Vec::new();
        emit(
            &mut out,
            DrawCommand::Fill {
                rect: Rect::new(200, 200, 10, 10),
                clip: Rect::new(0, 0, 100, 100),
                color: Rgba::BLACK,
            },
        );
        emit(
            &mut out,
            DrawCommand::Text {
                origin: Point::new(0, 0),
                clip: Rect::default(),
                text: "hidden".into(),
                color: Rgba::BLACK,
            },
        );
        assert!(out.is_empty());
    }
}
