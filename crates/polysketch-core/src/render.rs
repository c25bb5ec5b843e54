//! Renderer boundary: imperative, retained vector primitives.
//!
//! The core never reasons about pixels. It asks the renderer to keep a set
//! of primitives alive, grouped under a string id (a shape's group is its
//! document id, transient previews get their own groups), and addresses
//! individual primitives within a group by a small key.

use crate::document::Multiline;
use crate::geometry::Point;
use std::collections::BTreeMap;

/// Key of one primitive within its group.
pub type PrimKey = u32;

/// How a primitive should be styled; the renderer decides what that means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    /// In-progress preview geometry.
    Temporary,
    /// Committed document geometry.
    Final,
    /// The selection marquee.
    Selection,
}

/// Kind of a hover marker over a document vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// First or last vertex of an open shape.
    Endpoint,
    /// Any other vertex.
    Interior,
}

/// Retained-primitive renderer the core drives.
///
/// `upsert_*` creates the primitive on first use of a `(group, key)` pair
/// and updates it afterwards. Removing an absent primitive or group is a
/// no-op.
pub trait Renderer {
    fn upsert_line(&mut self, group: &str, key: PrimKey, from: Point, to: Point, style: StyleTag);
    fn upsert_rect(
        &mut self,
        group: &str,
        key: PrimKey,
        origin: Point,
        width: i32,
        height: i32,
        style: StyleTag,
    );
    fn upsert_marker(&mut self, group: &str, key: PrimKey, at: Point, kind: MarkerKind);
    fn remove(&mut self, group: &str, key: PrimKey);
    fn remove_group(&mut self, group: &str);
}

/// Re-emit a committed shape's group from scratch: segments keyed `0..n`
/// in `Final` style. Keeping committed groups normalized lets a later edit
/// address each segment by its index.
pub fn render_multiline(renderer: &mut dyn Renderer, shape: &Multiline) {
    renderer.remove_group(&shape.id);
    for (i, (from, to)) in shape.segments().into_iter().enumerate() {
        renderer.upsert_line(&shape.id, i as PrimKey, from, to, StyleTag::Final);
    }
}

/// One retained primitive, as kept by [`MemoryRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        style: StyleTag,
    },
    Rect {
        origin: Point,
        width: i32,
        height: i32,
        style: StyleTag,
    },
    Marker {
        at: Point,
        kind: MarkerKind,
    },
}

/// In-memory renderer for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    prims: BTreeMap<(String, PrimKey), Primitive>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitive at `(group, key)`, if retained.
    pub fn get(&self, group: &str, key: PrimKey) -> Option<&Primitive> {
        self.prims.get(&(group.to_string(), key))
    }

    /// Number of primitives retained under a group.
    pub fn group_len(&self, group: &str) -> usize {
        self.group(group).count()
    }

    /// Primitives of one group in key order.
    pub fn group(&self, group: &str) -> impl Iterator<Item = (PrimKey, &Primitive)> {
        self.prims
            .iter()
            .filter(move |((g, _), _)| g == group)
            .map(|((_, k), p)| (*k, p))
    }

    /// Total number of retained primitives.
    pub fn len(&self) -> usize {
        self.prims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }
}

impl Renderer for MemoryRenderer {
    fn upsert_line(&mut self, group: &str, key: PrimKey, from: Point, to: Point, style: StyleTag) {
        self.prims
            .insert((group.to_string(), key), Primitive::Line { from, to, style });
    }

    fn upsert_rect(
        &mut self,
        group: &str,
        key: PrimKey,
        origin: Point,
        width: i32,
        height: i32,
        style: StyleTag,
    ) {
        self.prims.insert(
            (group.to_string(), key),
            Primitive::Rect {
                origin,
                width,
                height,
                style,
            },
        );
    }

    fn upsert_marker(&mut self, group: &str, key: PrimKey, at: Point, kind: MarkerKind) {
        self.prims
            .insert((group.to_string(), key), Primitive::Marker { at, kind });
    }

    fn remove(&mut self, group: &str, key: PrimKey) {
        self.prims.remove(&(group.to_string(), key));
    }

    fn remove_group(&mut self, group: &str) {
        self.prims.retain(|(g, _), _| g != group);
    }
}
