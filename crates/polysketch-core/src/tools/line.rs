//! The line tool: draws new multilines and edits existing vertices.

use crate::actions::{Action, ActionError, AddAction, EditAction, Outcome};
use crate::document::{Document, Shape, ShapeKind};
use crate::geometry::Point;
use crate::input::Modifiers;
use crate::render::{MarkerKind, PrimKey, Renderer};

/// Renderer group holding the single vertex-hover marker.
const HOVER_GROUP: &str = "vertex-hover";
const HOVER_KEY: PrimKey = 0;

/// A document vertex currently under the pointer, eligible for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoveredVertex {
    pub shape_id: String,
    pub index: usize,
    /// First or last vertex of its shape.
    pub endpoint: bool,
    pub pos: Point,
}

/// Draw/edit mode for multilines.
///
/// With no action running, pointer moves hit-test document vertices by
/// exact position equality; a hit is remembered here and shown as a marker
/// so the next click grabs that vertex instead of starting a new line.
#[derive(Debug, Default)]
pub struct LineTool {
    action: Option<Action>,
    hover: Option<HoveredVertex>,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action_title(&self) -> Option<&'static str> {
        self.action.as_ref().map(Action::title)
    }

    fn clear_hover(&mut self, renderer: &mut dyn Renderer) {
        if self.hover.take().is_some() {
            renderer.remove_group(HOVER_GROUP);
        }
    }

    pub fn pointer_move(
        &mut self,
        pos: Point,
        modifiers: Modifiers,
        document: &Document,
        renderer: &mut dyn Renderer,
    ) {
        if let Some(action) = self.action.as_mut() {
            action.pointer_move(pos, modifiers, renderer);
            return;
        }
        for shape in document.iter(Some(ShapeKind::Multiline)) {
            let Some(line) = shape.as_multiline() else {
                continue;
            };
            for (index, &point) in line.points.iter().enumerate() {
                if point != pos {
                    continue;
                }
                let endpoint = index == 0 || index == line.points.len() - 1;
                let kind = if endpoint {
                    MarkerKind::Endpoint
                } else {
                    MarkerKind::Interior
                };
                renderer.upsert_marker(HOVER_GROUP, HOVER_KEY, pos, kind);
                self.hover = Some(HoveredVertex {
                    shape_id: line.id.clone(),
                    index,
                    endpoint,
                    pos,
                });
                return;
            }
        }
        self.clear_hover(renderer);
    }

    pub fn pointer_down(
        &mut self,
        pos: Point,
        modifiers: Modifiers,
        document: &Document,
        renderer: &mut dyn Renderer,
    ) {
        if let Some(action) = self.action.as_mut() {
            action.pointer_down(pos, modifiers, renderer);
        } else if let Some(hover) = self.hover.take() {
            renderer.remove_group(HOVER_GROUP);
            match document.get(&hover.shape_id).and_then(Shape::as_multiline) {
                Some(line) => {
                    log::debug!("grab vertex {} of {}", hover.index, hover.shape_id);
                    self.action = Some(Action::Edit(EditAction::new(line, pos)));
                }
                None => log::debug!("hovered shape {} vanished", hover.shape_id),
            }
        } else {
            self.action = Some(Action::Add(AddAction::new(pos, renderer)));
        }
    }

    pub fn pointer_up(
        &mut self,
        pos: Point,
        modifiers: Modifiers,
        renderer: &mut dyn Renderer,
    ) -> Outcome {
        match self.action.as_mut() {
            Some(action) => action.pointer_up(pos, modifiers, renderer),
            None => Outcome::Continue,
        }
    }

    pub fn key_down(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        document: &Document,
        renderer: &mut dyn Renderer,
    ) -> Outcome {
        if let Some(action) = self.action.as_mut() {
            return action.key_down(key, modifiers, renderer);
        }
        if key == "Delete" {
            // single-keystroke vertex delete: grab the hovered vertex, then
            // hand the same keystroke to the fresh edit action
            if let Some(pos) = self.hover.as_ref().map(|h| h.pos) {
                self.pointer_down(pos, modifiers, document, renderer);
                if let Some(action) = self.action.as_mut() {
                    return action.key_down(key, modifiers, renderer);
                }
            }
        }
        Outcome::Continue
    }

    pub fn commit(
        &mut self,
        document: &mut Document,
        renderer: &mut dyn Renderer,
    ) -> Result<(), ActionError> {
        self.clear_hover(renderer);
        match self.action.as_mut() {
            Some(action) => action.commit(document, renderer),
            None => Ok(()),
        }
    }

    pub fn cancel(&mut self, renderer: &mut dyn Renderer) {
        self.clear_hover(renderer);
        if let Some(action) = self.action.as_mut() {
            action.cancel(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Layer, Multiline};
    use crate::render::{render_multiline, MemoryRenderer, Primitive};

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn mods() -> Modifiers {
        Modifiers::default()
    }

    fn doc_with_line(renderer: &mut MemoryRenderer) -> Document {
        let shape = Multiline::new(
            "m",
            Layer::Draw,
            false,
            vec![p(0, 0), p(50, 0), p(50, 50)],
        );
        render_multiline(renderer, &shape);
        let mut doc = Document::new();
        doc.add(Shape::Multiline(shape));
        doc
    }

    #[test]
    fn test_hover_marker_tracks_vertices() {
        let mut r = MemoryRenderer::new();
        let doc = doc_with_line(&mut r);
        let mut tool = LineTool::new();

        // interior vertex
        tool.pointer_move(p(50, 0), mods(), &doc, &mut r);
        assert_eq!(
            r.get(HOVER_GROUP, HOVER_KEY),
            Some(&Primitive::Marker {
                at: p(50, 0),
                kind: MarkerKind::Interior
            })
        );
        assert!(!tool.hover.as_ref().unwrap().endpoint);

        // endpoint
        tool.pointer_move(p(50, 50), mods(), &doc, &mut r);
        assert!(tool.hover.as_ref().unwrap().endpoint);

        // miss clears marker and hover
        tool.pointer_move(p(1, 1), mods(), &doc, &mut r);
        assert!(tool.hover.is_none());
        assert_eq!(r.group_len(HOVER_GROUP), 0);
    }

    #[test]
    fn test_down_on_hover_starts_edit() {
        let mut r = MemoryRenderer::new();
        let doc = doc_with_line(&mut r);
        let mut tool = LineTool::new();

        tool.pointer_move(p(50, 0), mods(), &doc, &mut r);
        tool.pointer_down(p(50, 0), mods(), &doc, &mut r);

        assert!(matches!(tool.action, Some(Action::Edit(_))));
        assert!(tool.hover.is_none());
        assert_eq!(r.group_len(HOVER_GROUP), 0);
    }

    #[test]
    fn test_down_on_empty_canvas_starts_add() {
        let mut r = MemoryRenderer::new();
        let doc = Document::new();
        let mut tool = LineTool::new();

        tool.pointer_down(p(10, 10), mods(), &doc, &mut r);
        assert!(matches!(tool.action, Some(Action::Add(_))));
        assert_eq!(tool.action_title(), Some("Add line"));
    }

    #[test]
    fn test_delete_hotkey_deletes_hovered_vertex() {
        let mut r = MemoryRenderer::new();
        let mut doc = doc_with_line(&mut r);
        let mut tool = LineTool::new();

        tool.pointer_move(p(50, 0), mods(), &doc, &mut r);
        let outcome = tool.key_down("Delete", mods(), &doc, &mut r);
        assert_eq!(outcome, Outcome::Done);

        tool.commit(&mut doc, &mut r).unwrap();
        let m = doc.get("m").and_then(Shape::as_multiline).unwrap();
        assert_eq!(m.points, vec![p(0, 0), p(50, 50)]);
    }

    #[test]
    fn test_delete_without_hover_is_ignored() {
        let mut r = MemoryRenderer::new();
        let doc = doc_with_line(&mut r);
        let mut tool = LineTool::new();

        assert_eq!(tool.key_down("Delete", mods(), &doc, &mut r), Outcome::Continue);
        assert!(tool.action.is_none());
    }

    #[test]
    fn test_cancel_clears_hover_marker() {
        let mut r = MemoryRenderer::new();
        let doc = doc_with_line(&mut r);
        let mut tool = LineTool::new();

        tool.pointer_move(p(0, 0), mods(), &doc, &mut r);
        assert_eq!(r.group_len(HOVER_GROUP), 1);

        tool.cancel(&mut r);
        assert_eq!(r.group_len(HOVER_GROUP), 0);
    }
}
