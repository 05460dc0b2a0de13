//! Editing-session resources and the single-active-editor coordinator.
//!
//! At most one text node edits at a time. Nodes created through
//! [`TextNode::shared`](super::TextNode::shared) register with an
//! [`EditingCoordinator`]; entering editing on one forces the previous
//! editor out first.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, warn};

/// Identifies a node registered with a coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Something the coordinator can force out of editing.
pub trait EditSession {
    /// Leave editing because another node took over.
    fn force_exit(&mut self);
}

/// Tracks which node, if any, is editing.
#[derive(Default)]
pub struct EditingCoordinator {
    next_id: Cell<u64>,
    active: RefCell<Option<(NodeId, Weak<RefCell<dyn EditSession>>)>>,
}

impl fmt::Debug for EditingCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditingCoordinator")
            .field("active", &self.active())
            .finish_non_exhaustive()
    }
}

impl EditingCoordinator {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Allocate an id for a new node.
    pub fn register(&self) -> NodeId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        NodeId(id)
    }

    /// Make `id` the active editor, forcing the previous one to exit.
    ///
    /// The previous editor is exited after this call releases its own
    /// state, so its exit path may call [`Self::clear_active`] freely.
    pub fn request_editing(&self, id: NodeId, handle: Weak<RefCell<dyn EditSession>>) {
        let previous = self.active.replace(Some((id, handle)));
        let Some((previous_id, previous)) = previous else {
            return;
        };
        if previous_id == id {
            return;
        }
        let Some(previous) = previous.upgrade() else {
            return;
        };
        match previous.try_borrow_mut() {
            Ok(mut node) => {
                debug!(from = %previous_id, to = %id, "forcing previous editor to exit");
                node.force_exit();
            }
            Err(_) => warn!(node = %previous_id, "previous editor is busy; cannot force exit"),
        }
    }

    /// Clear the active editor if it is `id`.
    pub fn clear_active(&self, id: NodeId) {
        let mut active = self.active.borrow_mut();
        if active.as_ref().is_some_and(|(current, _)| *current == id) {
            *active = None;
        }
    }

    /// The active editor's id.
    #[must_use]
    pub fn active(&self) -> Option<NodeId> {
        self.active.borrow().as_ref().map(|(id, _)| *id)
    }

    #[must_use]
    pub fn is_active(&self, id: NodeId) -> bool {
        self.active() == Some(id)
    }
}

/// Caret visibility toggle driven by host ticks.
#[derive(Clone, Debug)]
pub struct BlinkTimer {
    interval: Duration,
    elapsed: Duration,
    visible: bool,
}

impl BlinkTimer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            visible: true,
        }
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Show the caret and restart the period.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.visible = true;
    }

    /// Advance by `dt`. Returns whether visibility changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.interval.is_zero() {
            return false;
        }
        let before = self.visible;
        self.elapsed += dt;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.visible = !self.visible;
        }
        self.visible != before
    }
}

/// An in-progress IME composition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Composition {
    /// Offset where the composed text starts.
    pub start: usize,
    /// Graphemes of composed text currently in the document.
    pub len: usize,
}

/// Off-screen text input target for one editing session.
#[derive(Clone, Debug, Default)]
pub struct InputProxy {
    focused: bool,
    composition: Option<Composition>,
}

impl InputProxy {
    /// A focused proxy.
    #[must_use]
    pub fn focused() -> Self {
        Self {
            focused: true,
            composition: None,
        }
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Restore focus. Returns whether anything changed.
    pub fn focus(&mut self) -> bool {
        !std::mem::replace(&mut self.focused, true)
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    #[must_use]
    pub fn composition(&self) -> Option<Composition> {
        self.composition
    }

    pub fn set_composition(&mut self, composition: Option<Composition>) {
        self.composition = composition;
    }
}

/// Resources that exist only while a node is editing.
#[derive(Clone, Debug)]
pub struct EditingSession {
    pub proxy: InputProxy,
    pub blink: BlinkTimer,
    /// A press started a drag selection.
    pub dragging: bool,
    /// Horizontal position kept across vertical caret moves.
    pub goal_x: Option<f32>,
}

impl EditingSession {
    #[must_use]
    pub fn new(blink_interval: Duration) -> Self {
        Self {
            proxy: InputProxy::focused(),
            blink: BlinkTimer::new(blink_interval),
            dragging: false,
            goal_x: None,
        }
    }
}
