//! Editing one vertex of an existing multiline.

use super::{ActionError, Outcome, Segment};
use crate::document::{Document, Multiline};
use crate::geometry::Point;
use crate::input::Modifiers;
use crate::render::{render_multiline, PrimKey, Renderer, StyleTag};

/// A grabbed vertex of a committed shape being dragged or deleted.
///
/// The segment list is rebuilt from the shape's vertices (including the
/// explicit closing segment of a closed shape, so it can be edited like any
/// other). The grabbed vertex bounds up to two segments: the earliest one
/// starting there (outgoing) and the earliest distinct one ending there
/// (incoming). When several vertices coincide the lowest segment index
/// wins, keeping the binding deterministic.
#[derive(Debug)]
pub struct EditAction {
    shape_id: String,
    closed: bool,
    grab: Point,
    segments: Vec<Segment>,
    outgoing: Option<usize>,
    incoming: Option<usize>,
}

impl EditAction {
    /// Bind the vertex of `shape` sitting at `grab`.
    pub fn new(shape: &Multiline, grab: Point) -> Self {
        let segments: Vec<Segment> = shape
            .segments()
            .into_iter()
            .enumerate()
            .map(|(i, (from, to))| Segment {
                key: i as PrimKey,
                from,
                to,
            })
            .collect();

        let mut outgoing = None;
        let mut incoming = None;
        for (i, seg) in segments.iter().enumerate() {
            if outgoing.is_none() && seg.from == grab {
                outgoing = Some(i);
            } else if incoming.is_none() && seg.to == grab {
                incoming = Some(i);
            }
        }

        Self {
            shape_id: shape.id.clone(),
            closed: shape.closed,
            grab,
            segments,
            outgoing,
            incoming,
        }
    }

    fn upsert(&self, index: usize, renderer: &mut dyn Renderer) {
        let seg = self.segments[index];
        renderer.upsert_line(&self.shape_id, seg.key, seg.from, seg.to, StyleTag::Final);
    }

    /// Drag both bound endpoints to `pos`.
    pub fn pointer_move(&mut self, pos: Point, renderer: &mut dyn Renderer) {
        if let Some(i) = self.outgoing {
            self.segments[i].from = pos;
            self.upsert(i, renderer);
        }
        if let Some(i) = self.incoming {
            self.segments[i].to = pos;
            self.upsert(i, renderer);
        }
    }

    pub fn pointer_up(&mut self) -> Outcome {
        Outcome::Done
    }

    pub fn key_down(&mut self, key: &str, modifiers: Modifiers, renderer: &mut dyn Renderer) -> Outcome {
        match key {
            "Enter" => Outcome::Done,
            "Escape" => Outcome::Cancel,
            "Delete" => {
                if modifiers.shift {
                    self.delete_shape(renderer)
                } else {
                    self.delete_vertex(renderer)
                }
                Outcome::Done
            }
            _ => Outcome::Continue,
        }
    }

    /// Empty the preview entirely; commit will then delete the shape.
    fn delete_shape(&mut self, renderer: &mut dyn Renderer) {
        renderer.remove_group(&self.shape_id);
        self.segments.clear();
        self.outgoing = None;
        self.incoming = None;
    }

    /// Remove the grabbed vertex. With both segments bound they merge into
    /// one (the incoming segment takes over the outgoing segment's far
    /// end); with one bound it is simply dropped.
    fn delete_vertex(&mut self, renderer: &mut dyn Renderer) {
        match (self.outgoing, self.incoming) {
            (Some(out), Some(inc)) => {
                self.segments[inc].to = self.segments[out].to;
                self.upsert(inc, renderer);
                renderer.remove(&self.shape_id, self.segments[out].key);
                self.segments.remove(out);
                self.outgoing = None;
                if inc > out {
                    self.incoming = Some(inc - 1);
                }
            }
            (Some(out), None) => {
                renderer.remove(&self.shape_id, self.segments[out].key);
                self.segments.remove(out);
                self.outgoing = None;
            }
            (None, Some(inc)) => {
                renderer.remove(&self.shape_id, self.segments[inc].key);
                self.segments.remove(inc);
                self.incoming = None;
            }
            (None, None) => {}
        }
    }

    /// Vertex sequence re-derived from the surviving segments.
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
            // edited down to nothing: the shape leaves the document
            document.remove(&self.shape_id);
            renderer.remove_group(&self.shape_id);
            return Ok(());
        }
        let shape = document
            .get_mut(&self.shape_id)
            .and_then(|s| s.as_multiline_mut())
            .ok_or_else(|| ActionError::TargetMissing(self.shape_id.clone()))?;
        shape.points = points;
        render_multiline(renderer, shape);
        Ok(())
    }

    /// Put both bound endpoints back where they were grabbed.
    pub fn cancel(&mut self, renderer: &mut dyn Renderer) {
        if let Some(i) = self.outgoing {
            self.segments[i].from = self.grab;
            self.upsert(i, renderer);
        }
        if let Some(i) = self.incoming {
            self.segments[i].to = self.grab;
            self.upsert(i, renderer);
        }
    }
}
