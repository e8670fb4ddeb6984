//! GUI events

use tilekit_events::{Event, EventKind};

use super::ComponentKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuiKind {
    Gui,
    Focused,
    Unfocused,
}

impl EventKind for GuiKind {
    fn parent(self) -> Option<Self> {
        match self {
            GuiKind::Gui => None,
            GuiKind::Focused | GuiKind::Unfocused => Some(GuiKind::Gui),
        }
    }
}

/// A component gained or lost the focus
#[derive(Clone, Debug, PartialEq)]
pub struct GuiEvent {
    pub tick: u64,
    pub component: ComponentKey,
    pub focused: bool,
    canceled: bool,
}

impl GuiEvent {
    pub fn new(tick: u64, component: ComponentKey, focused: bool) -> Self {
        Self {
            tick,
            component,
            focused,
            canceled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.canceled = true;
    }
}

impl Event for GuiEvent {
    type Kind = GuiKind;

    fn tick(&self) -> u64 {
        self.tick
    }

    fn kind(&self) -> GuiKind {
        if self.focused {
            GuiKind::Focused
        } else {
            GuiKind::Unfocused
        }
    }

    fn is_canceled(&self) -> bool {
        self.canceled
    }
}
