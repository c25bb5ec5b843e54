//! Line-oriented text serialization of the document.
//!
//! One block per shape, fields in fixed order, tabs for nesting:
//!
//! ```text
//! multiline:
//! \tid:<id>
//! \tlayer:<LayerName>
//! \tclosed:1        (omitted when false)
//! \t- <x>,<y>
//! ```
//!
//! Serialize → parse → serialize is byte-for-byte idempotent. Parsing is
//! strict: the first malformed line aborts with an error naming it, and a
//! failed parse never yields a partial document.

use crate::document::{Layer, Multiline, Shape};
use crate::geometry::Point;
use std::collections::HashSet;
use thiserror::Error;

/// A structured parse failure, identifying the offending line (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("line {line}: expected a shape block, found {text:?}")]
    UnexpectedContent { line: usize, text: String },
    #[error("line {line}: unknown field {field:?}")]
    UnknownField { line: usize, field: String },
    #[error("line {line}: malformed point {text:?}")]
    MalformedPoint { line: usize, text: String },
    #[error("line {line}: unknown layer {name:?}")]
    UnknownLayer { line: usize, name: String },
    #[error("line {line}: malformed closed flag {value:?}")]
    MalformedFlag { line: usize, value: String },
    #[error("shape block at line {line} is missing its {field} field")]
    MissingField { line: usize, field: &'static str },
    #[error("shape block at line {line} has no points")]
    EmptyShape { line: usize },
    #[error("line {line}: duplicate shape id {id:?}")]
    DuplicateId { line: usize, id: String },
}

/// Serialize shapes to the text format, in document order.
pub fn serialize(shapes: &[Shape]) -> String {
    let mut out = String::new();
    for shape in shapes {
        let Shape::Multiline(m) = shape;
        out.push_str("multiline:\n");
        out.push_str(&format!("\tid:{}\n", m.id));
        out.push_str(&format!("\tlayer:{}\n", m.layer.name()));
        if m.closed {
            out.push_str("\tclosed:1\n");
        }
        for p in &m.points {
            out.push_str(&format!("\t- {p}\n"));
        }
    }
    out
}

/// Partially assembled shape block during parsing.
struct Block {
    header_line: usize,
    id: Option<(String, usize)>,
    layer: Option<Layer>,
    closed: bool,
    points: Vec<Point>,
}

impl Block {
    fn new(header_line: usize) -> Self {
        Self {
            header_line,
            id: None,
            layer: None,
            closed: false,
            points: Vec::new(),
        }
    }

    fn finish(self, seen: &mut HashSet<String>) -> Result<Multiline, FormatError> {
        let (id, id_line) = self.id.ok_or(FormatError::MissingField {
            line: self.header_line,
            field: "id",
        })?;
        if !seen.insert(id.clone()) {
            return Err(FormatError::DuplicateId { line: id_line, id });
        }
        let layer = self.layer.ok_or(FormatError::MissingField {
            line: self.header_line,
            field: "layer",
        })?;
        if self.points.is_empty() {
            return Err(FormatError::EmptyShape {
                line: self.header_line,
            });
        }
        Ok(Multiline::new(id, layer, self.closed, self.points))
    }
}

fn parse_point(text: &str, line: usize) -> Result<Point, FormatError> {
    let malformed = || FormatError::MalformedPoint {
        line,
        text: text.to_string(),
    };
    let (x, y) = text.split_once(',').ok_or_else(malformed)?;
    Ok(Point::new(
        x.parse().map_err(|_| malformed())?,
        y.parse().map_err(|_| malformed())?,
    ))
}

/// Parse the text format back into shapes.
pub fn parse(text: &str) -> Result<Vec<Multiline>, FormatError> {
    let mut shapes = Vec::new();
    let mut seen = HashSet::new();
    let mut block: Option<Block> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.is_empty() {
            continue;
        }
        if raw == "multiline:" {
            if let Some(done) = block.take() {
                shapes.push(done.finish(&mut seen)?);
            }
            block = Some(Block::new(line));
            continue;
        }
        let Some(field) = raw.strip_prefix('\t') else {
            return Err(FormatError::UnexpectedContent {
                line,
                text: raw.to_string(),
            });
        };
        let Some(block) = block.as_mut() else {
            return Err(FormatError::UnexpectedContent {
                line,
                text: raw.to_string(),
            });
        };
        if let Some(point) = field.strip_prefix("- ") {
            block.points.push(parse_point(point, line)?);
        } else if let Some((name, value)) = field.split_once(':') {
            match name {
                "id" => block.id = Some((value.to_string(), line)),
                "layer" => {
                    block.layer = Some(Layer::from_name(value).ok_or_else(|| {
                        FormatError::UnknownLayer {
                            line,
                            name: value.to_string(),
                        }
                    })?)
                }
                "closed" => {
                    block.closed = match value {
                        "1" => true,
                        "0" => false,
                        _ => {
                            return Err(FormatError::MalformedFlag {
                                line,
                                value: value.to_string(),
                            });
                        }
                    }
                }
                _ => {
                    return Err(FormatError::UnknownField {
                        line,
                        field: name.to_string(),
                    });
                }
            }
        } else {
            return Err(FormatError::UnknownField {
                line,
                field: field.to_string(),
            });
        }
    }
    if let Some(done) = block.take() {
        shapes.push(done.finish(&mut seen)?);
    }
    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Shape> {
        vec![
            Shape::Multiline(Multiline::new(
                "a1",
                Layer::Draw,
                false,
                vec![Point::new(0, 0), Point::new(50, 0)],
            )),
            Shape::Multiline(Multiline::new(
                "b2",
                Layer::Electric,
                true,
                vec![Point::new(-3, 7), Point::new(40, -12), Point::new(8, 8)],
            )),
        ]
    }

    #[test]
    fn test_serialize_layout() {
        let text = serialize(&sample());
        assert_eq!(
            text,
            "multiline:\n\tid:a1\n\tlayer:Draw\n\t- 0,0\n\t- 50,0\n\
             multiline:\n\tid:b2\n\tlayer:Electric\n\tclosed:1\n\t- -3,7\n\t- 40,-12\n\t- 8,8\n"
        );
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let text = serialize(&sample());
        let parsed: Vec<Shape> = parse(&text).unwrap().into_iter().map(Shape::Multiline).collect();
        assert_eq!(serialize(&parsed), text);
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("\n\n").unwrap(), vec![]);
    }

    #[test]
    fn test_parse_unknown_field() {
        let err = parse("multiline:\n\tid:x\n\tcolor:red\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::UnknownField {
                line: 3,
                field: "color".into()
            }
        );
    }

    #[test]
    fn test_parse_malformed_point() {
        let err = parse("multiline:\n\tid:x\n\tlayer:Draw\n\t- 1,two\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::MalformedPoint {
                line: 4,
                text: "1,two".into()
            }
        );
    }

    #[test]
    fn test_parse_duplicate_id() {
        let text = "multiline:\n\tid:x\n\tlayer:Draw\n\t- 1,1\n\
                    multiline:\n\tid:x\n\tlayer:Draw\n\t- 2,2\n";
        let err = parse(text).unwrap_err();
        assert_eq!(err, FormatError::DuplicateId { line: 6, id: "x".into() });
    }

    #[test]
    fn test_parse_unknown_layer() {
        let err = parse("multiline:\n\tid:x\n\tlayer:Sketch\n\t- 1,1\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::UnknownLayer {
                line: 3,
                name: "Sketch".into()
            }
        );
    }

    #[test]
    fn test_parse_content_outside_block() {
        let err = parse("\tid:x\n").unwrap_err();
        assert!(matches!(err, FormatError::UnexpectedContent { line: 1, .. }));

        let err = parse("rectangle:\n").unwrap_err();
        assert!(matches!(err, FormatError::UnexpectedContent { line: 1, .. }));
    }

    #[test]
    fn test_parse_missing_fields_and_points() {
        let err = parse("multiline:\n\tlayer:Draw\n\t- 1,1\n").unwrap_err();
        assert_eq!(err, FormatError::MissingField { line: 1, field: "id" });

        let err = parse("multiline:\n\tid:x\n\tlayer:Draw\n").unwrap_err();
        assert_eq!(err, FormatError::EmptyShape { line: 1 });
    }

    #[test]
    fn test_parse_closed_flag() {
        let shapes = parse("multiline:\n\tid:x\n\tlayer:Draw\n\tclosed:0\n\t- 1,1\n").unwrap();
        assert!(!shapes[0].closed);

        let err = parse("multiline:\n\tid:x\n\tlayer:Draw\n\tclosed:yes\n\t- 1,1\n").unwrap_err();
        assert_eq!(
            err,
            FormatError::MalformedFlag {
                line: 4,
                value: "yes".into()
            }
        );
    }
}
