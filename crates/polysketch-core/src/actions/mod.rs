//! Actions: one in-progress, uncommitted edit.
//!
//! An action owns its preview geometry and nothing else. It is created by a
//! tool, fed pointer/key input until it reports [`Outcome::Done`] or
//! [`Outcome::Cancel`], then has exactly one of `commit`/`cancel` called
//! before being dropped.

mod add;
mod edit;
mod select;

pub use add::AddAction;
pub use edit::EditAction;
pub use select::SelectionDrag;

use crate::document::Document;
use crate::geometry::Point;
use crate::input::Modifiers;
use crate::render::{PrimKey, Renderer};
use thiserror::Error;

/// What an action wants the lifecycle to do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The edit is still in progress.
    Continue,
    /// Commit the preview into the document.
    Done,
    /// Discard the preview.
    Cancel,
}

/// A commit that cannot be applied without corrupting the store. The caller
/// must fall back to the cancel path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("edit target {0:?} is no longer in the document")]
    TargetMissing(String),
    #[error("preview holds no geometry to commit")]
    EmptyPreview,
}

/// One straight preview segment and the renderer key it is drawn under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment {
    pub key: PrimKey,
    pub from: Point,
    pub to: Point,
}

/// Closed set of action variants, dispatched exhaustively.
#[derive(Debug)]
pub enum Action {
    Add(AddAction),
    Edit(EditAction),
    Select(SelectionDrag),
}

impl Action {
    /// Short status text describing the edit.
    pub fn title(&self) -> &'static str {
        match self {
            Action::Add(_) => "Add line",
            Action::Edit(_) => "Edit line",
            Action::Select(_) => "Select",
        }
    }

    pub fn pointer_move(&mut self, pos: Point, _modifiers: Modifiers, renderer: &mut dyn Renderer) {
        match self {
            Action::Add(a) => a.pointer_move(pos, renderer),
            Action::Edit(a) => a.pointer_move(pos, renderer),
            Action::Select(a) => a.pointer_move(pos, renderer),
        }
    }

    pub fn pointer_down(&mut self, pos: Point, _modifiers: Modifiers, renderer: &mut dyn Renderer) {
        match self {
            Action::Add(a) => a.pointer_down(pos, renderer),
            Action::Edit(_) | Action::Select(_) => {}
        }
    }

    pub fn pointer_up(
        &mut self,
        pos: Point,
        _modifiers: Modifiers,
        renderer: &mut dyn Renderer,
    ) -> Outcome {
        match self {
            Action::Add(a) => a.pointer_up(pos, renderer),
            Action::Edit(a) => a.pointer_up(),
            Action::Select(a) => a.pointer_up(),
        }
    }

    pub fn key_down(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        renderer: &mut dyn Renderer,
    ) -> Outcome {
        match self {
            Action::Add(a) => a.key_down(key, modifiers, renderer),
            Action::Edit(a) => a.key_down(key, modifiers, renderer),
            Action::Select(a) => a.key_down(key),
        }
    }

    /// Fold the preview into the document. Called exactly once, after
    /// [`Outcome::Done`].
    pub fn commit(
        &mut self,
        document: &mut Document,
        renderer: &mut dyn Renderer,
    ) -> Result<(), ActionError> {
        match self {
            Action::Add(a) => a.commit(document, renderer),
            Action::Edit(a) => a.commit(document, renderer),
            Action::Select(a) => {
                a.discard(renderer);
                Ok(())
            }
        }
    }

    /// Discard the preview with no document mutation. Called exactly once,
    /// after [`Outcome::Cancel`].
    pub fn cancel(&mut self, renderer: &mut dyn Renderer) {
        match self {
            Action::Add(a) => a.cancel(renderer),
            Action::Edit(a) => a.cancel(renderer),
            Action::Select(a) => a.discard(renderer),
        }
    }
}
