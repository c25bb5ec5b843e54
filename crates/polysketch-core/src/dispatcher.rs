//! Top-level event dispatcher: routes normalized input to the active tool
//! and drives the action lifecycle.

use crate::actions::Outcome;
use crate::document::Document;
use crate::geometry::{snap_to_grid, Point};
use crate::input::{Buttons, InputEvent, Modifiers};
use crate::render::Renderer;
use crate::tools::{LineTool, SelectionTool, Tool};
use serde::{Deserialize, Serialize};

/// Grid snapping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub enabled: bool,
    /// Grid cell size in document units. Must be positive.
    pub cell_size: i32,
}

impl GridConfig {
    pub const DEFAULT_CELL_SIZE: i32 = 20;

    /// Snapping disabled; raw positions pass through.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cell_size: Self::DEFAULT_CELL_SIZE,
        }
    }
}

/// Receives user-facing state changes as plain text. All methods default to
/// no-ops so embedders implement only what they surface.
pub trait StatusSink {
    fn pointer_moved(&mut self, _pos: Point) {}
    fn tool_changed(&mut self, _title: &str) {}
    fn action_changed(&mut self, _title: &str) {}
}

/// Status sink that ignores everything.
#[derive(Debug, Default)]
pub struct NullStatus;

impl StatusSink for NullStatus {}

/// Owns the document, the active tool and the effective pointer position,
/// and feeds them from the normalized event stream.
///
/// Strictly single-threaded: each event is processed to completion,
/// including document mutation and persistence notification, before the
/// next one is accepted.
pub struct Dispatcher<R: Renderer> {
    document: Document,
    renderer: R,
    status: Box<dyn StatusSink>,
    tool: Option<Tool>,
    /// Last effective (possibly snapped) pointer position; pointer down/up
    /// are delivered here, not at the raw event position.
    pointer: Point,
    grid: GridConfig,
    action_title: Option<&'static str>,
}

impl<R: Renderer> Dispatcher<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_document(Document::new(), renderer)
    }

    pub fn with_document(document: Document, renderer: R) -> Self {
        Self {
            document,
            renderer,
            status: Box::new(NullStatus),
            tool: None,
            pointer: Point::ZERO,
            grid: GridConfig::default(),
            action_title: None,
        }
    }

    pub fn set_status(&mut self, status: Box<dyn StatusSink>) {
        self.status = status;
    }

    pub fn set_grid(&mut self, grid: GridConfig) {
        assert!(grid.cell_size > 0, "grid cell size must be positive");
        self.grid = grid;
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn tool_title(&self) -> Option<&'static str> {
        self.tool.as_ref().map(Tool::title)
    }

    /// Route one normalized event.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove {
                pos,
                buttons,
                modifiers,
            } => self.on_pointer_move(pos, buttons, modifiers),
            InputEvent::PointerDown { pos, modifiers } => self.on_pointer_down(pos, modifiers),
            InputEvent::PointerUp { pos, modifiers } => self.on_pointer_up(pos, modifiers),
            InputEvent::KeyDown { key, modifiers } => self.on_key_down(&key, modifiers),
        }
    }

    /// The new effective position for a raw move, or `None` when the move
    /// stays inside the current grid cell (hysteresis) or does not change
    /// the position at all.
    fn effective_move(&self, raw: Point) -> Option<Point> {
        let effective = if self.grid.enabled {
            // re-snap only once the raw pointer nears another cell
            if 2 * (raw - self.pointer).abs_max() < self.grid.cell_size {
                return None;
            }
            snap_to_grid(raw, self.grid.cell_size)
        } else {
            raw
        };
        (effective != self.pointer).then_some(effective)
    }

    pub fn on_pointer_move(&mut self, raw: Point, buttons: Buttons, modifiers: Modifiers) {
        if self.tool.is_none() && buttons.primary() {
            // a drag over empty space becomes a selection marquee
            log::debug!("starting selection tool at {raw}");
            let tool = Tool::Selection(SelectionTool::new(raw, &mut self.renderer));
            self.status.tool_changed(tool.title());
            self.tool = Some(tool);
            self.sync_action_title();
            return;
        }
        if let Some(pos) = self.effective_move(raw) {
            self.pointer = pos;
            self.status.pointer_moved(pos);
            if let Some(tool) = self.tool.as_mut() {
                tool.pointer_move(pos, modifiers, &self.document, &mut self.renderer);
            }
            self.sync_action_title();
        }
    }

    pub fn on_pointer_down(&mut self, _raw: Point, modifiers: Modifiers) {
        if let Some(tool) = self.tool.as_mut() {
            tool.pointer_down(self.pointer, modifiers, &self.document, &mut self.renderer);
            self.sync_action_title();
        }
    }

    pub fn on_pointer_up(&mut self, _raw: Point, modifiers: Modifiers) {
        if let Some(tool) = self.tool.as_mut() {
            let outcome = tool.pointer_up(self.pointer, modifiers, &mut self.renderer);
            self.finish(outcome);
        }
    }

    pub fn on_key_down(&mut self, key: &str, modifiers: Modifiers) {
        if let Some(tool) = self.tool.as_mut() {
            let outcome = tool.key_down(key, modifiers, &self.document, &mut self.renderer);
            self.finish(outcome);
            return;
        }
        // document-level hotkeys
        match key {
            "l" => self.start_line_tool(),
            "s" => log::info!("document dump:\n{}", self.document.to_text()),
            _ => {}
        }
    }

    /// Activate the line tool, cancelling whatever tool was active.
    pub fn start_line_tool(&mut self) {
        self.start_tool(Tool::Line(LineTool::new()));
    }

    fn start_tool(&mut self, tool: Tool) {
        if let Some(mut old) = self.tool.take() {
            old.cancel(&mut self.renderer);
        }
        log::debug!("tool changed: {}", tool.title());
        self.status.tool_changed(tool.title());
        self.tool = Some(tool);
        self.sync_action_title();
    }

    fn finish(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Continue => self.sync_action_title(),
            Outcome::Done => {
                if let Some(mut tool) = self.tool.take() {
                    if let Err(err) = tool.commit(&mut self.document, &mut self.renderer) {
                        log::warn!("commit failed, cancelling edit: {err}");
                        tool.cancel(&mut self.renderer);
                    }
                    self.notify_tool_cleared();
                }
            }
            Outcome::Cancel => {
                if let Some(mut tool) = self.tool.take() {
                    tool.cancel(&mut self.renderer);
                    self.notify_tool_cleared();
                }
            }
        }
    }

    fn notify_tool_cleared(&mut self) {
        self.status.tool_changed("");
        if self.action_title.take().is_some() {
            self.status.action_changed("");
        }
    }

    fn sync_action_title(&mut self) {
        let title = self.tool.as_ref().and_then(Tool::action_title);
        if title != self.action_title {
            self.action_title = title;
            self.status.action_changed(title.unwrap_or(""));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Shape;
    use crate::render::MemoryRenderer;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn mods() -> Modifiers {
        Modifiers::default()
    }

    fn dispatcher() -> Dispatcher<MemoryRenderer> {
        Dispatcher::new(MemoryRenderer::new())
    }

    fn dispatcher_no_snap() -> Dispatcher<MemoryRenderer> {
        let mut d = dispatcher();
        d.set_grid(GridConfig::disabled());
        d
    }

    /// Records every status notification as a tagged string.
    #[derive(Clone, Default)]
    struct RecordingStatus(Rc<RefCell<Vec<String>>>);

    impl RecordingStatus {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    impl StatusSink for RecordingStatus {
        fn pointer_moved(&mut self, pos: Point) {
            self.0.borrow_mut().push(format!("pointer:{pos}"));
        }
        fn tool_changed(&mut self, title: &str) {
            self.0.borrow_mut().push(format!("tool:{title}"));
        }
        fn action_changed(&mut self, title: &str) {
            self.0.borrow_mut().push(format!("action:{title}"));
        }
    }

    fn draw_line(d: &mut Dispatcher<MemoryRenderer>, points: &[Point]) {
        d.on_key_down("l", mods());
        for &pt in points {
            d.on_pointer_move(pt, Buttons::NONE, mods());
            d.on_pointer_down(pt, mods());
            d.on_pointer_up(pt, mods());
        }
        d.on_key_down("Enter", mods());
    }

    #[test]
    fn test_draw_line_end_to_end() {
        let mut d = dispatcher_no_snap();
        draw_line(&mut d, &[p(0, 0), p(50, 0)]);

        assert_eq!(d.document().len(), 1);
        let m = d
            .document()
            .iter(None)
            .next()
            .and_then(Shape::as_multiline)
            .unwrap();
        assert_eq!(m.points, vec![p(0, 0), p(50, 0)]);
        assert!(!m.closed);
        assert!(d.tool_title().is_none());
    }

    #[test]
    fn test_snap_hysteresis_forwards_only_cell_changes() {
        let status = RecordingStatus::default();
        let mut d = dispatcher();
        d.set_status(Box::new(status.clone()));

        // both moves snap back to the current cell origin: nothing forwarded
        d.on_pointer_move(p(10, 10), Buttons::NONE, mods());
        d.on_pointer_move(p(10, 10), Buttons::NONE, mods());
        assert_eq!(status.take(), Vec::<String>::new());

        // crossing the half-cell threshold re-snaps and forwards
        d.on_pointer_move(p(29, 10), Buttons::NONE, mods());
        assert_eq!(status.take(), vec!["pointer:20,0"]);
        assert_eq!(d.pointer(), p(20, 0));

        // jitter within the new cell stays silent
        d.on_pointer_move(p(24, 3), Buttons::NONE, mods());
        assert_eq!(status.take(), Vec::<String>::new());
    }

    #[test]
    fn test_pointer_down_uses_last_effective_position() {
        let mut d = dispatcher();
        d.on_key_down("l", mods());

        d.on_pointer_move(p(29, 10), Buttons::NONE, mods());
        d.on_pointer_down(p(33, 7), mods()); // raw position is ignored
        d.on_pointer_up(p(33, 7), mods());
        d.on_pointer_move(p(69, 1), Buttons::NONE, mods());
        d.on_pointer_down(p(69, 1), mods());
        d.on_key_down("Enter", mods());

        let m = d
            .document()
            .iter(None)
            .next()
            .and_then(Shape::as_multiline)
            .unwrap();
        assert_eq!(m.points, vec![p(20, 0), p(60, 0)]);
    }

    #[test]
    fn test_selection_tool_starts_implicitly_and_leaves_no_trace() {
        let mut d = dispatcher_no_snap();

        d.on_pointer_move(p(10, 10), Buttons::PRIMARY, mods());
        assert_eq!(d.tool_title(), Some("Select"));

        d.on_pointer_move(p(40, 30), Buttons::PRIMARY, mods());
        assert!(!d.renderer().is_empty());

        d.on_pointer_up(p(40, 30), mods());
        assert!(d.tool_title().is_none());
        assert!(d.renderer().is_empty());
        assert!(d.document().is_empty());
    }

    #[test]
    fn test_escape_discards_whole_preview() {
        let mut d = dispatcher_no_snap();
        d.on_key_down("l", mods());
        for pt in [p(0, 0), p(30, 0), p(30, 30)] {
            d.on_pointer_move(pt, Buttons::NONE, mods());
            d.on_pointer_down(pt, mods());
            d.on_pointer_up(pt, mods());
        }
        assert!(!d.renderer().is_empty());

        d.on_key_down("Escape", mods());
        assert!(d.document().is_empty());
        assert!(d.renderer().is_empty());
        assert!(d.tool_title().is_none());
    }

    #[test]
    fn test_starting_line_tool_cancels_active_tool() {
        let mut d = dispatcher_no_snap();
        d.on_key_down("l", mods());
        d.on_pointer_move(p(5, 5), Buttons::NONE, mods());
        d.on_pointer_down(p(5, 5), mods());
        assert!(!d.renderer().is_empty());

        d.start_line_tool();
        assert!(d.renderer().is_empty());
        assert!(d.document().is_empty());
        assert_eq!(d.tool_title(), Some("Draw/edit lines"));
    }

    #[test]
    fn test_hover_then_edit_vertex_through_dispatcher() {
        let mut d = dispatcher_no_snap();
        draw_line(&mut d, &[p(0, 0), p(50, 0), p(50, 50)]);

        // grab the interior vertex and drag it
        d.on_key_down("l", mods());
        d.on_pointer_move(p(50, 0), Buttons::NONE, mods());
        d.on_pointer_down(p(50, 0), mods());
        d.on_pointer_move(p(60, 10), Buttons::NONE, mods());
        d.on_pointer_up(p(60, 10), mods());

        let m = d
            .document()
            .iter(None)
            .next()
            .and_then(Shape::as_multiline)
            .unwrap();
        assert_eq!(m.points, vec![p(0, 0), p(60, 10), p(50, 50)]);
        assert!(d.tool_title().is_none());
    }

    #[test]
    fn test_commit_failure_falls_back_to_cancel() {
        let mut d = dispatcher_no_snap();
        draw_line(&mut d, &[p(0, 0), p(50, 0)]);
        let id = d.document().iter(None).next().unwrap().id().to_string();

        d.on_key_down("l", mods());
        d.on_pointer_move(p(0, 0), Buttons::NONE, mods());
        d.on_pointer_down(p(0, 0), mods());
        d.on_pointer_move(p(5, 5), Buttons::NONE, mods());

        // the edit target vanishes mid-action
        d.document_mut().remove(&id);
        d.on_key_down("Enter", mods());

        assert!(d.document().is_empty());
        assert!(d.tool_title().is_none());
    }

    #[test]
    fn test_status_notifications_follow_lifecycle() {
        let status = RecordingStatus::default();
        let mut d = dispatcher_no_snap();
        d.set_status(Box::new(status.clone()));

        d.on_key_down("l", mods());
        assert_eq!(status.take(), vec!["tool:Draw/edit lines"]);

        d.on_pointer_move(p(5, 5), Buttons::NONE, mods());
        d.on_pointer_down(p(5, 5), mods());
        assert_eq!(status.take(), vec!["pointer:5,5", "action:Add line"]);

        d.on_pointer_move(p(25, 5), Buttons::NONE, mods());
        d.on_pointer_down(p(25, 5), mods());
        d.on_key_down("Enter", mods());
        let events = status.take();
        assert!(events.contains(&"tool:".to_string()));
        assert!(events.contains(&"action:".to_string()));
    }

    #[test]
    fn test_events_route_through_handle() {
        let mut d = dispatcher_no_snap();
        d.handle(InputEvent::KeyDown {
            key: "l".into(),
            modifiers: mods(),
        });
        d.handle(InputEvent::PointerMove {
            pos: p(1, 1),
            buttons: Buttons::NONE,
            modifiers: mods(),
        });
        d.handle(InputEvent::PointerDown {
            pos: p(1, 1),
            modifiers: mods(),
        });
        d.handle(InputEvent::PointerUp {
            pos: p(1, 1),
            modifiers: mods(),
        });
        d.handle(InputEvent::KeyDown {
            key: "Escape".into(),
            modifiers: mods(),
        });
        assert!(d.document().is_empty());
        assert!(d.tool_title().is_none());
    }
}
