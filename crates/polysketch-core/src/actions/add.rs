//! Drawing a new multiline, segment by segment.

use super::{ActionError, Outcome, Segment};
use crate::document::{new_shape_id, Document, Layer, Multiline, Shape};
use crate::geometry::Point;
use crate::input::Modifiers;
use crate::render::{render_multiline, PrimKey, Renderer, StyleTag};

/// In-progress drawing of a new line.
///
/// The trailing segment is always the temporary one tracking the pointer;
/// everything before it has been fixed by a click. The preview group id
/// becomes the committed shape's document id.
#[derive(Debug)]
pub struct AddAction {
    group: String,
    segments: Vec<Segment>,
    next_key: PrimKey,
    closed: bool,
}

impl AddAction {
    /// Begin drawing at `pos` with a zero-length temporary segment.
    pub fn new(pos: Point, renderer: &mut dyn Renderer) -> Self {
        let mut action = Self {
            group: new_shape_id(),
            segments: Vec::new(),
            next_key: 0,
            closed: false,
        };
        action.push_segment(pos, pos, StyleTag::Temporary, renderer);
        action
    }

    fn push_segment(&mut self, from: Point, to: Point, style: StyleTag, renderer: &mut dyn Renderer) {
        let key = self.next_key;
        self.next_key += 1;
        renderer.upsert_line(&self.group, key, from, to, style);
        self.segments.push(Segment { key, from, to });
    }

    fn promote_last(&self, renderer: &mut dyn Renderer) {
        if let Some(last) = self.segments.last() {
            renderer.upsert_line(&self.group, last.key, last.from, last.to, StyleTag::Final);
        }
    }

    /// Retarget the free end of the temporary segment.
    pub fn pointer_move(&mut self, pos: Point, renderer: &mut dyn Renderer) {
        if let Some(last) = self.segments.last_mut() {
            last.to = pos;
            renderer.upsert_line(&self.group, last.key, last.from, last.to, StyleTag::Temporary);
        }
    }

    /// Fix the current segment and chain a new temporary one from its end.
    pub fn pointer_down(&mut self, pos: Point, renderer: &mut dyn Renderer) {
        match self.segments.last().copied() {
            Some(last) => {
                self.promote_last(renderer);
                self.push_segment(last.to, pos, StyleTag::Temporary, renderer);
            }
            None => self.push_segment(pos, pos, StyleTag::Temporary, renderer),
        }
    }

    /// A release after a real drag fixes the segment; a plain click leaves
    /// the temporary segment in place for reuse, so click-without-drag does
    /// not pile up zero-length segments.
    pub fn pointer_up(&mut self, pos: Point, renderer: &mut dyn Renderer) -> Outcome {
        if let Some(last) = self.segments.last().copied() {
            if (last.to - last.from).length() > 1.0 {
                self.promote_last(renderer);
                self.push_segment(pos, pos, StyleTag::Temporary, renderer);
            }
        }
        Outcome::Continue
    }

    pub fn key_down(&mut self, key: &str, modifiers: Modifiers, renderer: &mut dyn Renderer) -> Outcome {
        match key {
            "Enter" => {
                // a still-unstretched trailing segment is dropped
                if let Some(last) = self.segments.last().copied() {
                    if (last.to - last.from).length() < 1.0 {
                        renderer.remove(&self.group, last.key);
                        self.segments.pop();
                    }
                }
                self.promote_last(renderer);
                if modifiers.shift {
                    if let [first, .., last] = self.segments[..] {
                        self.push_segment(last.to, first.from, StyleTag::Final, renderer);
                        self.closed = true;
                    }
                }
                if self.segments.is_empty() {
                    Outcome::Cancel
                } else {
                    Outcome::Done
                }
            }
            "Escape" => Outcome::Cancel,
            _ => Outcome::Continue,
        }
    }

    /// Vertex sequence of the drawn preview: every segment start, plus the
    /// last segment's end unless the shape was closed (the closing segment
    /// already loops back to the first vertex).
    fn points(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.segments.iter().map(|s| s.from).collect();
        if !self.closed {
            if let Some(last) = self.segments.last() {
                points.push(last.to);
            }
        }
        points
    }

    pub fn commit(
        &mut self,
        document: &mut Document,
        renderer: &mut dyn Renderer,
    ) -> Result<(), ActionError> {
        let points = self.points();
        if points.is_empty() {
            return Err(ActionError::EmptyPreview);
        }
        let shape = Multiline::new(self.group.clone(), Layer::Draw, self.closed, points);
        render_multiline(renderer, &shape);
        document.add(Shape::Multiline(shape));
        Ok(())
    }

    pub fn cancel(&mut self, renderer: &mut dyn Renderer) {
        renderer.remove_group(&self.group);
        self.segments.clear();
    }
}
