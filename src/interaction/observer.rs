use super::{DragState, GestureFrame, Selection};

/// Receives the outcome of gestures on one surface.
pub trait SelectionHandler {
    /// A drag resolved to two distinct instants.
    fn on_select(&mut self, selection: Selection);
    /// The user asked for the full range back (double click).
    fn on_reset(&mut self);
}

/// Adapts a pair of closures to [`SelectionHandler`].
pub struct SelectionCallbacks<S, R>
where
    S: FnMut(Selection),
    R: FnMut(),
{
    on_select: S,
    on_reset: R,
}

impl<S, R> SelectionCallbacks<S, R>
where
    S: FnMut(Selection),
    R: FnMut(),
{
    pub fn new(on_select: S, on_reset: R) -> Self {
        Self {
            on_select,
            on_reset,
        }
    }
}

impl<S, R> SelectionHandler for SelectionCallbacks<S, R>
where
    S: FnMut(Selection),
    R: FnMut(),
{
    fn on_select(&mut self, selection: Selection) {
        (self.on_select)(selection);
    }

    fn on_reset(&mut self) {
        (self.on_reset)();
    }
}

/// Event stream exposed to gesture observers.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent<'a> {
    Pressed { frame: &'a GestureFrame },
    PointerMoved { frame: &'a GestureFrame },
    Released {
        frame: &'a GestureFrame,
        selection: Option<Selection>,
    },
    DoubleClicked,
    PointerLeft,
    Cancelled,
}

/// Hook interface for logic that rides along with a surface's gestures.
///
/// Observers see every event, including ones the controller ignores, plus
/// the drag state after the controller handled it.
pub trait GestureObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &GestureEvent<'_>, drag: &DragState);
}
