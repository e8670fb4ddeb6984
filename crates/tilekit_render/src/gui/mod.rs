//! Immediate GUI toolkit drawn with sprite quads
//!
//! Components live in a slot map owned by the [`GuiManager`]; containers
//! refer to their children by key. GUI units are pixels of the viewport
//! with the origin at the lower-left corner of the screen.

mod component;
mod events;
mod style;

pub use component::{text_tail, truncate_label, GuiComponent, Layout, Widget};
pub use events::{GuiEvent, GuiKind};
pub use style::{GuiBorder, GuiFont};

use slotmap::SlotMap;
use tilekit_input::{InputAction, InputEvent, Key, MouseButton};
use tilekit_math::{Projection, Vec2};

use crate::{DrawCommand, DrawLayer, RenderError, ResourceManager};

slotmap::new_key_type! {
    /// Handle to a GUI component
    pub struct ComponentKey;
}

/// Screen position in `[-1, 1]` to the local units of `projection`
pub fn transform_gui(pointer: Vec2, projection: &Projection) -> Vec2 {
    let m = projection.matrix;
    let local = projection.inverse_transform(pointer);
    Vec2::new(local.x - m[3][0] / m[0][0], local.y - m[3][1] / m[1][1])
}

/// Root of the GUI: owns every component, renders them and tracks focus
#[derive(Debug)]
pub struct GuiManager {
    components: SlotMap<ComponentKey, GuiComponent>,
    root: ComponentKey,
    viewport: Vec2,
    projection: Projection,
}

impl GuiManager {
    /// GUI covering a screen of `2 × viewport` units
    pub fn new(viewport: Vec2) -> Self {
        let projection = Projection::new()
            .orthographic(viewport.x, -viewport.x, -viewport.y, viewport.y)
            .translate(Vec2::new(-1.0, -1.0));
        let mut components = SlotMap::with_key();
        let root = components.insert(GuiComponent::container(
            tilekit_math::Rect::new(Vec2::ZERO, viewport * 2.0),
            Layout::Absolute,
        ));
        Self {
            components,
            root,
            viewport,
            projection,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn root(&self) -> ComponentKey {
        self.root
    }

    pub fn get(&self, key: ComponentKey) -> Option<&GuiComponent> {
        self.components.get(key)
    }

    pub fn get_mut(&mut self, key: ComponentKey) -> Option<&mut GuiComponent> {
        self.components.get_mut(key)
    }

    /// Add a component at the top level
    pub fn add(&mut self, component: GuiComponent) -> ComponentKey {
        let key = self.components.insert(component);
        if let Some(Widget::Container { children, .. }) = self.components.get_mut(self.root).map(|c| &mut c.widget) {
            children.push(key);
        }
        self.update_layout(self.root);
        key
    }

    /// Add a component inside a container
    pub fn add_child(&mut self, parent: ComponentKey, component: GuiComponent) -> Result<ComponentKey, RenderError> {
        let parent_component = self.components.get(parent).ok_or(RenderError::UnknownComponent)?;
        if !parent_component.is_container() {
            return Err(RenderError::NotAContainer);
        }
        let key = self.components.insert(component);
        if let Some(Widget::Container { children, .. }) = self.components.get_mut(parent).map(|c| &mut c.widget) {
            children.push(key);
        }
        self.update_layout(self.root);
        Ok(key)
    }

    /// Remove every component but the root
    pub fn clear(&mut self) {
        let root = self.root;
        self.components.retain(|key, _| key == root);
        if let Some(Widget::Container { children, .. }) = self.components.get_mut(root).map(|c| &mut c.widget) {
            children.clear();
        }
    }

    /// Number of components, the root included
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn update_layout(&mut self, key: ComponentKey) {
        let Some(component) = self.components.get_mut(key) else {
            return;
        };
        let clamped = component.rendered_bounds().bounds;
        let Widget::Container {
            layout,
            layout_bounds,
            children,
        } = &mut component.widget
        else {
            return;
        };
        *layout_bounds = clamped;
        let layout = *layout;
        let children = children.clone();

        for child in children {
            if let Some(component) = self.components.get_mut(child) {
                component.max_size = layout.child_max_size(clamped, component.bounds.position);
            }
            self.update_layout(child);
        }
    }

    /// Draw commands for the whole GUI
    pub fn render(&mut self, resources: &ResourceManager) -> Result<Vec<DrawCommand>, RenderError> {
        self.update_layout(self.root);
        let mut commands = Vec::new();
        self.render_component(self.root, resources, self.projection, &mut commands)?;
        Ok(commands)
    }

    fn render_component(
        &self,
        key: ComponentKey,
        resources: &ResourceManager,
        projection: Projection,
        commands: &mut Vec<DrawCommand>,
    ) -> Result<(), RenderError> {
        let Some(component) = self.components.get(key) else {
            return Ok(());
        };
        if !component.visible {
            return Ok(());
        }
        let bounds = component.rendered_bounds();

        if let Some(border) = &component.border {
            commands.extend(border.commands(bounds, resources, projection)?);
        }

        match &component.widget {
            Widget::Label { text, font } => {
                let shown = truncate_label(text, font.fitting(bounds.bounds.x));
                commands.extend(font.text_commands(&shown, bounds.position, resources, projection)?);
            }
            Widget::TextField { text, font } => {
                let shown = text_tail(text, font.fitting(bounds.bounds.x));
                commands.extend(font.text_commands(shown, bounds.position, resources, projection)?);
            }
            Widget::Image { sprite_set, animation } => {
                let (_, texture) = resources.sprite_set(sprite_set)?.get_texture(*animation, 0)?;
                let placement = Projection::new().scale(bounds.bounds).translate(bounds.center());
                commands.push(DrawCommand::quad(DrawLayer::Gui, texture, placement, projection));
            }
            Widget::Container {
                layout,
                layout_bounds,
                children,
            } => {
                let inner = Projection::new()
                    .translate(component.bounds.position)
                    .dot(&projection.matrix);
                for (child, child_projection) in self.placed_children(*layout, *layout_bounds, children, inner) {
                    self.render_component(child, resources, child_projection, commands)?;
                }
            }
        }
        Ok(())
    }

    /// Children of a container with the projection each one is drawn with
    fn placed_children(
        &self,
        layout: Layout,
        layout_bounds: Vec2,
        children: &[ComponentKey],
        inner: Projection,
    ) -> Vec<(ComponentKey, Projection)> {
        match layout {
            Layout::Absolute => children.iter().map(|child| (*child, inner)).collect(),
            Layout::List { padding } => {
                let mut offset = Projection::new().translate(Vec2::new(padding, layout_bounds.y));
                let mut placed = Vec::new();
                for child in children {
                    let Some(component) = self.components.get(*child) else {
                        continue;
                    };
                    if !component.visible {
                        continue;
                    }
                    offset = offset.translate(Vec2::new(0.0, -component.bounds.bounds.y - padding));
                    placed.push((*child, offset.dot(&inner.matrix)));
                }
                placed
            }
        }
    }

    /// Report focus changes since the last call
    pub fn fire_events(&mut self, tick: u64, mut sink: impl FnMut(GuiEvent)) {
        self.fire_component_events(self.root, tick, &mut sink);
    }

    fn fire_component_events(&mut self, key: ComponentKey, tick: u64, sink: &mut dyn FnMut(GuiEvent)) {
        let Some(component) = self.components.get_mut(key) else {
            return;
        };
        if let Some(focused) = component.take_focus_change() {
            log::debug!("GUI component {:?} focused: {}", key, focused);
            sink(GuiEvent::new(tick, key, focused));
        }
        let children = component.children().to_vec();
        for child in children {
            self.fire_component_events(child, tick, sink);
        }
    }

    /// Focus the component under `pointer`, returning whether one took it
    pub fn give_focus(&mut self, pointer: Vec2) -> bool {
        self.give_component_focus(self.root, pointer, self.projection)
    }

    fn give_component_focus(&mut self, key: ComponentKey, pointer: Vec2, projection: Projection) -> bool {
        let Some(component) = self.components.get(key) else {
            return false;
        };

        if let Widget::Container {
            layout,
            layout_bounds,
            children,
        } = &component.widget
        {
            let inner = Projection::new()
                .translate(component.bounds.position)
                .dot(&projection.matrix);
            let placed = self.placed_children(*layout, *layout_bounds, children, inner);

            self.reset_component_focus(key);
            for (child, child_projection) in placed {
                if self.give_component_focus(child, pointer, child_projection) {
                    return true;
                }
            }
        }

        let Some(component) = self.components.get_mut(key) else {
            return false;
        };
        if !component.allow_focus {
            return false;
        }
        let local = transform_gui(pointer, &projection);
        component.focused = component.rendered_bounds().inner_point(local);
        component.focused
    }

    /// Drop the focus everywhere
    pub fn reset_focus(&mut self) {
        self.reset_component_focus(self.root);
    }

    fn reset_component_focus(&mut self, key: ComponentKey) {
        let Some(component) = self.components.get_mut(key) else {
            return;
        };
        component.focused = false;
        let children = component.children().to_vec();
        for child in children {
            self.reset_component_focus(child);
        }
    }

    /// The focused component, searched depth first
    pub fn focused(&self) -> Option<ComponentKey> {
        self.find_focused(self.root)
    }

    fn find_focused(&self, key: ComponentKey) -> Option<ComponentKey> {
        let component = self.components.get(key)?;
        if component.focused {
            return Some(key);
        }
        component.children().iter().find_map(|child| self.find_focused(*child))
    }

    /// Send a key to the focused component, returning whether its text changed
    pub fn type_key(&mut self, key: Key) -> bool {
        match self.focused().and_then(|focused| self.components.get_mut(focused)) {
            Some(component) => component.input_key(key),
            None => false,
        }
    }

    /// Left clicks move the focus to the clicked component
    pub fn handle_click(&mut self, event: &InputEvent) -> bool {
        match event.action {
            InputAction::MouseButtonClicked {
                button: MouseButton::Left,
                position,
            } => self.give_focus(position),
            _ => false,
        }
    }
}
