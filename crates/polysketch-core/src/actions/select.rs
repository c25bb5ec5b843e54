//! Dragging a selection marquee.

use super::Outcome;
use crate::document::new_shape_id;
use crate::geometry::Point;
use crate::render::{PrimKey, Renderer, StyleTag};

const RECT_KEY: PrimKey = 0;

/// A rubber-band rectangle between the drag anchor and the pointer.
///
/// Purely presentational: it never touches the document, and its preview is
/// discarded whichever way the drag ends.
#[derive(Debug)]
pub struct SelectionDrag {
    group: String,
    anchor: Point,
}

impl SelectionDrag {
    pub fn new(anchor: Point, renderer: &mut dyn Renderer) -> Self {
        let drag = Self {
            group: new_shape_id(),
            anchor,
        };
        renderer.upsert_rect(&drag.group, RECT_KEY, anchor, 1, 1, StyleTag::Selection);
        drag
    }

    /// Stretch the rectangle to the pointer. The extent is clamped to at
    /// least 2 per axis so the box never collapses, and on a negative delta
    /// the origin follows the pointer side.
    pub fn pointer_move(&mut self, pos: Point, renderer: &mut dyn Renderer) {
        let size = (pos - self.anchor).with_min_magnitude(2);
        let (x, width) = if size.x < 0 {
            (pos.x, -size.x)
        } else {
            (self.anchor.x, size.x)
        };
        let (y, height) = if size.y < 0 {
            (pos.y, -size.y)
        } else {
            (self.anchor.y, size.y)
        };
        renderer.upsert_rect(
            &self.group,
            RECT_KEY,
            Point::new(x, y),
            width,
            height,
            StyleTag::Selection,
        );
    }

    pub fn pointer_up(&mut self) -> Outcome {
        Outcome::Done
    }

    /// Any keystroke abandons the marquee.
    pub fn key_down(&mut self, _key: &str) -> Outcome {
        Outcome::Cancel
    }

    /// Drop the rectangle; used by both commit and cancel.
    pub fn discard(&mut self, renderer: &mut dyn Renderer) {
        renderer.remove_group(&self.group);
    }
}
