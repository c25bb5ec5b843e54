//! Document store: the ordered collection of persisted shapes.

use crate::format::{self, FormatError};
use crate::geometry::Point;
use crate::storage::PersistenceSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Logical grouping a shape belongs to. Informational only; layers do not
/// affect editing semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Electric,
    Stamp,
    Draw,
    Notes,
}

impl Layer {
    /// The name used in the text serialization format.
    pub fn name(self) -> &'static str {
        match self {
            Layer::Electric => "Electric",
            Layer::Stamp => "Stamp",
            Layer::Draw => "Draw",
            Layer::Notes => "Notes",
        }
    }

    /// Inverse of [`Layer::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Electric" => Some(Layer::Electric),
            "Stamp" => Some(Layer::Stamp),
            "Draw" => Some(Layer::Draw),
            "Notes" => Some(Layer::Notes),
            _ => None,
        }
    }
}

fn default_width() -> i32 {
    Multiline::DEFAULT_WIDTH
}

/// A poly-line of straight segments, optionally closed into a loop.
///
/// `points` holds each vertex exactly once; a closed shape's final segment
/// back to the first vertex is implied, never stored. A multiline in the
/// document always has at least one point; an edit that would leave none
/// deletes the shape instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiline {
    pub id: String,
    pub layer: Layer,
    pub closed: bool,
    #[serde(default = "default_width")]
    pub width: i32,
    pub points: Vec<Point>,
}

impl Multiline {
    pub const DEFAULT_WIDTH: i32 = 2;

    /// Create a multiline with the default stroke width.
    pub fn new(id: impl Into<String>, layer: Layer, closed: bool, points: Vec<Point>) -> Self {
        Self {
            id: id.into(),
            layer,
            closed,
            width: Self::DEFAULT_WIDTH,
            points,
        }
    }

    /// Successive vertex pairs, including the implied closing pair for a
    /// closed shape.
    pub fn segments(&self) -> Vec<(Point, Point)> {
        let mut segs: Vec<(Point, Point)> =
            self.points.windows(2).map(|w| (w[0], w[1])).collect();
        if self.closed {
            if let [first, .., last] = self.points[..] {
                segs.push((last, first));
            }
        }
        segs
    }
}

/// Generate a fresh shape id.
pub fn new_shape_id() -> String {
    Uuid::new_v4().to_string()
}

/// Discriminant used to filter document iteration by shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Multiline,
}

/// Enum wrapper for all persisted shape types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Multiline(Multiline),
}

impl Shape {
    pub fn id(&self) -> &str {
        match self {
            Shape::Multiline(m) => &m.id,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Multiline(_) => ShapeKind::Multiline,
        }
    }

    pub fn as_multiline(&self) -> Option<&Multiline> {
        match self {
            Shape::Multiline(m) => Some(m),
        }
    }

    pub fn as_multiline_mut(&mut self) -> Option<&mut Multiline> {
        match self {
            Shape::Multiline(m) => Some(m),
        }
    }
}

/// The ordered, mutable collection of all shapes in a drawing.
///
/// Insertion order is paint order. Every mutation serializes the document
/// and hands the text to the attached persistence sink, so the collaborator
/// always holds a current snapshot.
#[derive(Default, Serialize, Deserialize)]
pub struct Document {
    shapes: Vec<Shape>,
    #[serde(skip)]
    sink: Option<Box<dyn PersistenceSink>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("shapes", &self.shapes)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Document {
    /// Create an empty document with no persistence sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the persistence collaborator notified after each mutation.
    pub fn set_sink(&mut self, sink: Box<dyn PersistenceSink>) {
        self.sink = Some(sink);
    }

    /// Append a shape. The new shape paints above all existing ones.
    pub fn add(&mut self, shape: Shape) {
        log::debug!("document: add shape {}", shape.id());
        self.shapes.push(shape);
        self.notify();
    }

    /// Look up a shape by id.
    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Look up a shape by id, mutably.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Iterate shapes in insertion order, optionally restricted to a kind.
    pub fn iter(&self, kind: Option<ShapeKind>) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(move |s| kind.is_none_or(|k| s.kind() == k))
    }

    /// Remove the first shape whose id matches. Removing an unknown id is a
    /// tolerated no-op and does not notify the sink.
    pub fn remove(&mut self, id: &str) -> Option<Shape> {
        let idx = self.shapes.iter().position(|s| s.id() == id)?;
        let shape = self.shapes.remove(idx);
        log::debug!("document: remove shape {id}");
        self.notify();
        Some(shape)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn notify(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.document_changed(&format::serialize(&self.shapes));
        }
    }

    /// Serialize to the line-oriented text format.
    pub fn to_text(&self) -> String {
        format::serialize(&self.shapes)
    }

    /// Parse a document from the text format. A malformed input yields an
    /// error and no document; the store is never partially filled.
    pub fn from_text(text: &str) -> Result<Self, FormatError> {
        let shapes = format::parse(text)?
            .into_iter()
            .map(Shape::Multiline)
            .collect();
        Ok(Self {
            shapes,
            sink: None,
        })
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySink;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn line(id: &str, points: &[(i32, i32)]) -> Shape {
        Shape::Multiline(Multiline::new(
            id,
            Layer::Draw,
            false,
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        ))
    }

    #[test]
    fn test_add_get_remove() {
        let mut doc = Document::new();
        doc.add(line("a", &[(0, 0), (10, 0)]));
        doc.add(line("b", &[(5, 5)]));

        assert_eq!(doc.len(), 2);
        assert!(doc.get("a").is_some());
        assert!(doc.get("missing").is_none());

        assert!(doc.remove("a").is_some());
        assert!(doc.remove("a").is_none()); // double delete is a no-op
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut doc = Document::new();
        for id in ["one", "two", "three"] {
            doc.add(line(id, &[(0, 0)]));
        }
        doc.remove("two");

        let ids: Vec<&str> = doc.iter(None).map(Shape::id).collect();
        assert_eq!(ids, ["one", "three"]);

        let filtered: Vec<&str> = doc
            .iter(Some(ShapeKind::Multiline))
            .map(Shape::id)
            .collect();
        assert_eq!(filtered, ["one", "three"]);
    }

    #[test]
    fn test_mutations_notify_sink() {
        #[derive(Default)]
        struct Counter(Rc<RefCell<usize>>);
        impl PersistenceSink for Counter {
            fn document_changed(&mut self, _serialized: &str) {
                *self.0.borrow_mut() += 1;
            }
        }

        let count = Rc::new(RefCell::new(0));
        let mut doc = Document::new();
        doc.set_sink(Box::new(Counter(count.clone())));

        doc.add(line("a", &[(0, 0)]));
        doc.remove("a");
        doc.remove("a"); // miss: no notification
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_sink_receives_current_snapshot() {
        let sink = MemorySink::shared();
        let mut doc = Document::new();
        doc.set_sink(Box::new(MemorySink::clone(&sink)));

        doc.add(line("a", &[(1, 2), (3, 4)]));
        assert_eq!(sink.last(), Some(doc.to_text()));
    }

    #[test]
    fn test_segments_closed() {
        let m = Multiline::new(
            "m",
            Layer::Draw,
            true,
            vec![Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)],
        );
        let segs = m.segments();
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[2], (Point::new(10, 10), Point::new(0, 0)));
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = Document::new();
        doc.add(line("a", &[(0, 0), (-7, 3)]));

        let json = doc.to_json().unwrap();
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.get("a"), doc.get("a"));
    }
}
