//! Event dispatch for tilekit
//!
//! Events are plain values that belong to a kind hierarchy (for example
//! `KeyPressed` is a `Key` event which is an `Input` event). Handlers are
//! registered against a kind and receive every event of that kind or of any
//! of its sub-kinds, in registration order.
//!
//! Handlers receive a mutable context `C` next to the event, which is how
//! they reach game state without the queue owning it.

mod queue;

pub use queue::{EventQueue, Handler, DEFAULT_HISTORY_LENGTH};

/// A kind in an event hierarchy
pub trait EventKind: Copy + Eq + std::fmt::Debug {
    /// The kind directly above this one, `None` for a root kind
    fn parent(self) -> Option<Self>;

    /// Whether `self` is `ancestor` or one of its descendants
    fn is_a(self, ancestor: Self) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

/// An event that can travel through an [`EventQueue`]
pub trait Event {
    type Kind: EventKind;

    /// Tick at which the event was raised
    fn tick(&self) -> u64;

    /// The most specific kind of this event
    fn kind(&self) -> Self::Kind;

    /// Whether a handler canceled this event; later handlers are skipped
    fn is_canceled(&self) -> bool {
        false
    }

    /// Whether this event is of `kind` or one of its sub-kinds
    fn is_kind(&self, kind: Self::Kind) -> bool {
        self.kind().is_a(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Kind {
        Root,
        Middle,
        Leaf,
        Other,
    }

    impl EventKind for Kind {
        fn parent(self) -> Option<Self> {
            match self {
                Kind::Root => None,
                Kind::Middle | Kind::Other => Some(Kind::Root),
                Kind::Leaf => Some(Kind::Middle),
            }
        }
    }

    #[test]
    fn test_is_a_walks_ancestors() {
        assert!(Kind::Leaf.is_a(Kind::Leaf));
        assert!(Kind::Leaf.is_a(Kind::Middle));
        assert!(Kind::Leaf.is_a(Kind::Root));
        assert!(!Kind::Leaf.is_a(Kind::Other));
        assert!(!Kind::Root.is_a(Kind::Leaf));
    }
}
