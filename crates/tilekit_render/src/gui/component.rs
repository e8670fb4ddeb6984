//! GUI components

use tilekit_input::Key;
use tilekit_math::{Rect, Vec2};

use super::{ComponentKey, GuiBorder, GuiFont};

/// How a container places its children
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layout {
    /// Children keep their own positions
    Absolute,
    /// Children are stacked top to bottom, `padding` apart
    List { padding: f32 },
}

impl Layout {
    /// Space left to a child placed at `child_position`
    pub fn child_max_size(&self, layout_bounds: Vec2, child_position: Vec2) -> Vec2 {
        match self {
            Layout::Absolute => layout_bounds - child_position,
            Layout::List { padding } => layout_bounds - child_position - Vec2::splat(2.0 * padding),
        }
    }
}

/// What a component shows
#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    /// Static text, truncated with `...` when too long
    Label { text: String, font: GuiFont },
    /// First frame of a sprite set animation, stretched over the component
    Image { sprite_set: String, animation: usize },
    /// Editable text showing its tail when too long
    TextField { text: String, font: GuiFont },
    Container {
        layout: Layout,
        layout_bounds: Vec2,
        children: Vec<ComponentKey>,
    },
}

/// A rectangle of the GUI, positioned from its parent's lower-left corner
#[derive(Clone, Debug, PartialEq)]
pub struct GuiComponent {
    pub bounds: Rect,
    /// Size limit set by the parent layout
    pub max_size: Vec2,
    pub border: Option<GuiBorder>,
    pub visible: bool,
    pub allow_focus: bool,
    pub focused: bool,
    notified_focus: bool,
    pub widget: Widget,
}

impl GuiComponent {
    pub fn new(bounds: Rect, widget: Widget) -> Self {
        Self {
            bounds,
            max_size: bounds.bounds,
            border: None,
            visible: true,
            allow_focus: false,
            focused: false,
            notified_focus: false,
            widget,
        }
    }

    pub fn label(bounds: Rect, text: impl Into<String>, font: GuiFont) -> Self {
        Self::new(bounds, Widget::Label { text: text.into(), font })
    }

    pub fn image(bounds: Rect, sprite_set: impl Into<String>, animation: usize) -> Self {
        Self::new(
            bounds,
            Widget::Image {
                sprite_set: sprite_set.into(),
                animation,
            },
        )
    }

    /// Text fields accept the focus by default
    pub fn text_field(bounds: Rect, text: impl Into<String>, font: GuiFont) -> Self {
        Self::new(bounds, Widget::TextField { text: text.into(), font }).with_focus(true)
    }

    pub fn container(bounds: Rect, layout: Layout) -> Self {
        Self::new(
            bounds,
            Widget::Container {
                layout,
                layout_bounds: bounds.bounds,
                children: Vec::new(),
            },
        )
    }

    pub fn with_max_size(mut self, max_size: Vec2) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_border(mut self, border: GuiBorder) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_focus(mut self, allow_focus: bool) -> Self {
        self.allow_focus = allow_focus;
        self
    }

    /// Bounds clamped to the maximum size
    pub fn rendered_bounds(&self) -> Rect {
        self.bounds.clamped(self.max_size)
    }

    pub fn is_container(&self) -> bool {
        matches!(self.widget, Widget::Container { .. })
    }

    pub fn children(&self) -> &[ComponentKey] {
        match &self.widget {
            Widget::Container { children, .. } => children,
            _ => &[],
        }
    }

    /// Text of a label or text field
    pub fn text(&self) -> Option<&str> {
        match &self.widget {
            Widget::Label { text, .. } | Widget::TextField { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        match &mut self.widget {
            Widget::Label { text, .. } | Widget::TextField { text, .. } => {
                *text = value.into();
                true
            }
            _ => false,
        }
    }

    /// Edit a text field: backspace erases, printable keys append
    ///
    /// Returns whether the text changed.
    pub fn input_key(&mut self, key: Key) -> bool {
        let Widget::TextField { text, .. } = &mut self.widget else {
            return false;
        };
        if key == Key::Backspace {
            return text.pop().is_some();
        }
        match key.to_char() {
            Some(c) => {
                text.push(c);
                true
            }
            None => false,
        }
    }

    /// Record the current focus state, returning it if it changed since last call
    pub(crate) fn take_focus_change(&mut self) -> Option<bool> {
        if !self.allow_focus {
            self.focused = false;
        }
        if self.notified_focus == self.focused {
            return None;
        }
        self.notified_focus = self.focused;
        Some(self.focused)
    }
}

/// Label text shown in room for `shown` characters
pub fn truncate_label(text: &str, shown: usize) -> String {
    let length = text.chars().count();
    if shown >= length {
        return text.to_string();
    }
    if shown < 3 {
        return ".".repeat(shown);
    }
    let mut truncated: String = text.chars().take(shown - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Last `shown` characters of a text field
pub fn text_tail(text: &str, shown: usize) -> &str {
    let length = text.chars().count();
    if shown >= length {
        return text;
    }
    match text.char_indices().nth(length - shown) {
        Some((start, _)) => &text[start..],
        None => "",
    }
}
