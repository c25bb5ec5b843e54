//! SVG backend for the polysketch renderer boundary.
//!
//! Retains the primitives the core drives and serializes the whole scene to
//! a standalone SVG document on demand. Group order is paint order, matching
//! the document's insertion order.

use polysketch_core::geometry::Point;
use polysketch_core::render::{MarkerKind, PrimKey, Primitive, Renderer, StyleTag};
use std::collections::BTreeMap;
use std::fmt::Write;

const DEFAULT_SHEET_WIDTH: i32 = 8000;
const DEFAULT_SHEET_HEIGHT: i32 = 6000;

const TEMP_STROKE: &str = "yellow";
const FINAL_STROKE: &str = "green";
const SELECTION_FILL: &str = "rgba(0,255,255,0.25)";
const SELECTION_STROKE: &str = "rgba(0,255,255,0.5)";
const MARKER_STROKE: &str = "orange";
const MARKER_FILL: &str = "rgba(128,128,255,0.5)";

/// One retained group of primitives, keyed like an SVG container element.
#[derive(Debug)]
struct Group {
    id: String,
    prims: BTreeMap<PrimKey, Primitive>,
}

/// Renderer that accumulates the scene and emits it as SVG text.
#[derive(Debug)]
pub struct SvgRenderer {
    width: i32,
    height: i32,
    groups: Vec<Group>,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::with_size(DEFAULT_SHEET_WIDTH, DEFAULT_SHEET_HEIGHT)
    }

    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            groups: Vec::new(),
        }
    }

    fn group_mut(&mut self, id: &str) -> &mut Group {
        if let Some(idx) = self.groups.iter().position(|g| g.id == id) {
            return &mut self.groups[idx];
        }
        self.groups.push(Group {
            id: id.to_string(),
            prims: BTreeMap::new(),
        });
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    /// Number of primitives currently retained.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.prims.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the retained scene as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            self.width, self.height
        );
        for group in &self.groups {
            if group.prims.is_empty() {
                continue;
            }
            let _ = writeln!(out, r#"<g id="{}">"#, escape(&group.id));
            for prim in group.prims.values() {
                write_primitive(&mut out, prim);
            }
            let _ = writeln!(out, "</g>");
        }
        out.push_str("</svg>\n");
        out
    }
}

fn write_primitive(out: &mut String, prim: &Primitive) {
    match *prim {
        Primitive::Line { from, to, style } => {
            let stroke = match style {
                StyleTag::Temporary => TEMP_STROKE,
                StyleTag::Final => FINAL_STROKE,
                StyleTag::Selection => SELECTION_STROKE,
            };
            let _ = writeln!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="2"/>"#,
                from.x, from.y, to.x, to.y
            );
        }
        Primitive::Rect {
            origin,
            width,
            height,
            style,
        } => match style {
            StyleTag::Selection => {
                let _ = writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{width}" height="{height}" rx="2" ry="2" fill="{SELECTION_FILL}" stroke="{SELECTION_STROKE}" stroke-dasharray="4 2"/>"#,
                    origin.x, origin.y
                );
            }
            StyleTag::Temporary | StyleTag::Final => {
                let stroke = if style == StyleTag::Temporary {
                    TEMP_STROKE
                } else {
                    FINAL_STROKE
                };
                let _ = writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{width}" height="{height}" fill="none" stroke="{stroke}" stroke-width="2"/>"#,
                    origin.x, origin.y
                );
            }
        },
        Primitive::Marker { at, kind } => match kind {
            MarkerKind::Endpoint => {
                let corner = at - Point::new(10, 10);
                let _ = writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="20" height="20" rx="3" stroke="{MARKER_STROKE}" stroke-width="4" fill="{MARKER_FILL}"/>"#,
                    corner.x, corner.y
                );
            }
            MarkerKind::Interior => {
                let _ = writeln!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="10" stroke="{MARKER_STROKE}" stroke-width="4" fill="{MARKER_FILL}"/>"#,
                    at.x, at.y
                );
            }
        },
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Renderer for SvgRenderer {
    fn upsert_line(&mut self, group: &str, key: PrimKey, from: Point, to: Point, style: StyleTag) {
        self.group_mut(group)
            .prims
            .insert(key, Primitive::Line { from, to, style });
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
        self.group_mut(group).prims.insert(
            key,
            Primitive::Rect {
                origin,
                width,
                height,
                style,
            },
        );
    }

    fn upsert_marker(&mut self, group: &str, key: PrimKey, at: Point, kind: MarkerKind) {
        self.group_mut(group)
            .prims
            .insert(key, Primitive::Marker { at, kind });
    }

    fn remove(&mut self, group: &str, key: PrimKey) {
        if let Some(g) = self.groups.iter_mut().find(|g| g.id == group) {
            g.prims.remove(&key);
        }
    }

    fn remove_group(&mut self, group: &str) {
        self.groups.retain(|g| g.id != group);
    }
}
