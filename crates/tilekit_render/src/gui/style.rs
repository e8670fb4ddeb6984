//! Fonts and borders

use tilekit_math::{Projection, Rect, Vec2};

use crate::{DrawCommand, DrawLayer, RenderError, ResourceManager};

/// A bitmap font: animation `k` of the sprite set draws character `k` of the char map
#[derive(Clone, Debug, PartialEq)]
pub struct GuiFont {
    pub sprite_set: String,
    char_map: Vec<char>,
    /// Advance and glyph width
    pub width: f32,
    pub height: f32,
}

impl GuiFont {
    pub fn new(sprite_set: impl Into<String>, char_map: &str, width: f32, height: f32) -> Self {
        Self {
            sprite_set: sprite_set.into(),
            char_map: char_map.chars().collect(),
            width,
            height,
        }
    }

    /// Animation drawing `c`; characters missing from the map use the first glyph
    pub fn animation_for(&self, c: char) -> usize {
        self.char_map.iter().position(|m| *m == c).unwrap_or(0)
    }

    /// How many characters fit in `width`
    pub fn fitting(&self, width: f32) -> usize {
        if self.width <= 0.0 {
            return 0;
        }
        (width / self.width).floor().max(0.0) as usize
    }

    /// One quad per character, starting at `origin`
    pub(crate) fn text_commands(
        &self,
        text: &str,
        origin: Vec2,
        resources: &ResourceManager,
        projection: Projection,
    ) -> Result<Vec<DrawCommand>, RenderError> {
        let sprite_set = resources.sprite_set(&self.sprite_set)?;
        let mut commands = Vec::new();
        for (k, c) in text.chars().enumerate() {
            let (_, texture) = sprite_set.get_texture(self.animation_for(c), 0)?;
            let position = Projection::new()
                .scale(Vec2::new(self.width, self.height))
                .translate(Vec2::new(
                    origin.x + k as f32 * self.width + self.width / 2.0,
                    origin.y + self.height / 2.0,
                ));
            commands.push(DrawCommand::quad(DrawLayer::Gui, texture, position, projection));
        }
        Ok(commands)
    }
}

/// Nine-slice border drawn from a sprite set
///
/// Animations 0 to 3 are the corners (lower-left, upper-left, lower-right,
/// upper-right), 4 and 5 the left and right sides, 6 and 7 the bottom and
/// top sides, and 8 the fill.
#[derive(Clone, Debug, PartialEq)]
pub struct GuiBorder {
    pub sprite_set: String,
    pub outline_thickness: f32,
}

impl GuiBorder {
    pub fn new(sprite_set: impl Into<String>, outline_thickness: f32) -> Self {
        Self {
            sprite_set: sprite_set.into(),
            outline_thickness,
        }
    }

    pub(crate) fn commands(
        &self,
        bounds: Rect,
        resources: &ResourceManager,
        projection: Projection,
    ) -> Result<Vec<DrawCommand>, RenderError> {
        let sprite_set = resources.sprite_set(&self.sprite_set)?;
        let thickness = self.outline_thickness;
        let position = bounds.position;
        let size = bounds.bounds;
        let mut commands = Vec::with_capacity(9);
        let mut push = |animation: usize, placement: Projection| -> Result<(), RenderError> {
            let (_, texture) = sprite_set.get_texture(animation, 0)?;
            commands.push(DrawCommand::quad(DrawLayer::Gui, texture, placement, projection));
            Ok(())
        };

        for i in 0..2 {
            for j in 0..2 {
                let placement = Projection::new()
                    .scale(Vec2::new(thickness, thickness))
                    .translate(Vec2::new(
                        position.x + i as f32 * size.x,
                        position.y + j as f32 * size.y,
                    ));
                push(i * 2 + j, placement)?;
            }
        }

        for i in 0..2 {
            let placement = Projection::new()
                .scale(Vec2::new(thickness, size.y - thickness))
                .translate(Vec2::new(position.x + i as f32 * size.x, position.y + size.y / 2.0));
            push(4 + i, placement)?;
        }

        for j in 0..2 {
            let placement = Projection::new()
                .scale(Vec2::new(size.x + thickness, thickness))
                .translate(Vec2::new(position.x + size.x / 2.0, position.y + j as f32 * size.y));
            push(6 + j, placement)?;
        }

        push(8, Projection::new().scale(size).translate(bounds.center()))?;
        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_for() {
        let font = GuiFont::new("font", "?abc", 8.0, 8.0);
        assert_eq!(font.animation_for('b'), 2);
        assert_eq!(font.animation_for('z'), 0);
    }

    #[test]
    fn test_fitting() {
        let font = GuiFont::new("font", "", 8.0, 8.0);
        assert_eq!(font.fitting(33.0), 4);
        assert_eq!(font.fitting(7.9), 0);
        assert_eq!(GuiFont::new("font", "", 0.0, 8.0).fitting(10.0), 0);
    }
}
