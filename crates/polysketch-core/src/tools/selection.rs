//! The implicit selection tool: a marquee drag with no document effect.

use crate::actions::{Outcome, SelectionDrag};
use crate::geometry::Point;
use crate::render::Renderer;

/// Started by the dispatcher when a primary-button drag begins with no tool
/// active; lives exactly as long as its drag.
#[derive(Debug)]
pub struct SelectionTool {
    drag: SelectionDrag,
}

impl SelectionTool {
    pub fn new(anchor: Point, renderer: &mut dyn Renderer) -> Self {
        Self {
            drag: SelectionDrag::new(anchor, renderer),
        }
    }

    pub fn action_title(&self) -> &'static str {
        "Select"
    }

    pub fn pointer_move(&mut self, pos: Point, renderer: &mut dyn Renderer) {
        self.drag.pointer_move(pos, renderer);
    }

    pub fn pointer_up(&mut self) -> Outcome {
        self.drag.pointer_up()
    }

    pub fn key_down(&mut self, key: &str) -> Outcome {
        self.drag.key_down(key)
    }

    pub fn discard(&mut self, renderer: &mut dyn Renderer) {
        self.drag.discard(renderer);
    }
}
