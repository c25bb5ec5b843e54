//! Tools: user-selected editing modes that create and own actions.

mod line;
mod selection;

pub use line::{HoveredVertex, LineTool};
pub use selection::SelectionTool;

use crate::actions::{ActionError, Outcome};
use crate::document::Document;
use crate::geometry::Point;
use crate::input::Modifiers;
use crate::render::Renderer;

/// Closed set of tool variants, dispatched exhaustively.
#[derive(Debug)]
pub enum Tool {
    Line(LineTool),
    Selection(SelectionTool),
}

impl Tool {
    /// Status text for the mode itself.
    pub fn title(&self) -> &'static str {
        match self {
            Tool::Line(_) => "Draw/edit lines",
            Tool::Selection(_) => "Select",
        }
    }

    /// Status text of the action in progress, if any.
    pub fn action_title(&self) -> Option<&'static str> {
        match self {
            Tool::Line(t) => t.action_title(),
            Tool::Selection(t) => Some(t.action_title()),
        }
    }

    pub fn pointer_move(
        &mut self,
        pos: Point,
        modifiers: Modifiers,
        document: &Document,
        renderer: &mut dyn Renderer,
    ) {
        match self {
            Tool::Line(t) => t.pointer_move(pos, modifiers, document, renderer),
            Tool::Selection(t) => t.pointer_move(pos, renderer),
        }
    }

    pub fn pointer_down(
        &mut self,
        pos: Point,
        modifiers: Modifiers,
        document: &Document,
        renderer: &mut dyn Renderer,
    ) {
        match self {
            Tool::Line(t) => t.pointer_down(pos, modifiers, document, renderer),
            Tool::Selection(_) => {}
        }
    }

    pub fn pointer_up(
        &mut self,
        pos: Point,
        modifiers: Modifiers,
        renderer: &mut dyn Renderer,
    ) -> Outcome {
        match self {
            Tool::Line(t) => t.pointer_up(pos, modifiers, renderer),
            Tool::Selection(t) => t.pointer_up(),
        }
    }

    pub fn key_down(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        document: &Document,
        renderer: &mut dyn Renderer,
    ) -> Outcome {
        match self {
            Tool::Line(t) => t.key_down(key, modifiers, document, renderer),
            Tool::Selection(t) => t.key_down(key),
        }
    }

    /// Commit the active action's preview, if any.
    pub fn commit(
        &mut self,
        document: &mut Document,
        renderer: &mut dyn Renderer,
    ) -> Result<(), ActionError> {
        match self {
            Tool::Line(t) => t.commit(document, renderer),
            Tool::Selection(t) => {
                t.discard(renderer);
                Ok(())
            }
        }
    }

    /// Discard all transient state: active action preview and hover marker.
    pub fn cancel(&mut self, renderer: &mut dyn Renderer) {
        match self {
            Tool::Line(t) => t.cancel(renderer),
            Tool::Selection(t) => t.discard(renderer),
        }
    }
}
