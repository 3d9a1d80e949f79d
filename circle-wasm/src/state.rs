use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use circle_core::{CircleAnalysis, Point};

/// Per-stroke lifecycle. Transitions are driven purely by discrete input
/// events: pointer-down moves to `Drawing`, pointer-up/leave to either
/// `Analyzed` or back to `Idle` when the stroke was too short.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Drawing,
    Analyzed,
}

/// Global application state shared across the WASM callbacks behind an
/// `Rc<RefCell<_>>`; the forgotten event closures keep it alive.
#[derive(Clone)]
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub phase: Phase,
    /// Points of the current stroke, in arrival order.
    pub stroke: Vec<Point>,
    /// Result for the last completed stroke, if any.
    pub analysis: Option<CircleAnalysis>,
    /// Counted once per stroke end, valid or not. Not persisted.
    pub attempts: u32,
    /// Highest score seen on this device; mirrored to localStorage.
    pub best_score: u32,
}
