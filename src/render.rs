//! Renderer-facing scene snapshot
//!
//! Drawing happens elsewhere. This module turns a session into a flat list of
//! shapes with their appearance, plus the HUD flags a shell needs.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Game, PhysicsWorld, Shape};

/// Canvas clear color
pub const BACKGROUND: u32 = 0xfaf8ef;
/// Ground and side walls
pub const WALL_COLOR: u32 = 0xe0e0e0;
pub const WARNING_LINE_COLOR: u32 = 0xff0000;
pub const PIECE_STROKE: Stroke = Stroke {
    color: 0x555555,
    width: 2.0,
};

/// How a shape's interior is painted
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Fill {
    Solid(u32),
    /// Texture path; `fallback` is used if the texture failed to load
    Texture { asset: &'static str, fallback: u32 },
}

impl Fill {
    /// Color to paint when textures are unavailable
    pub fn solid_color(&self) -> u32 {
        match *self {
            Fill::Solid(color) => color,
            Fill::Texture { fallback, .. } => fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: u32,
    pub width: f32,
}

/// One body to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawItem {
    pub shape: Shape,
    pub pos: Vec2,
    pub fill: Fill,
    pub stroke: Option<Stroke>,
}

impl DrawItem {
    fn scaled(mut self, scale: f32) -> Self {
        self.pos *= scale;
        self.shape = match self.shape {
            Shape::Circle { radius } => Shape::Circle {
                radius: radius * scale,
            },
            Shape::Rect { half_extents } => Shape::Rect {
                half_extents: half_extents * scale,
            },
        };
        if let Some(stroke) = self.stroke.as_mut() {
            stroke.width *= scale;
        }
        self
    }
}

/// HUD state derived from the rules layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudView {
    pub score: u64,
    pub warning_visible: bool,
    pub game_over_visible: bool,
    pub paused: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub background: u32,
    /// Field size in the scene's units
    pub size: Vec2,
    pub items: Vec<DrawItem>,
    pub hud: HudView,
}

impl Scene {
    /// Capture the current session
    pub fn capture<W: PhysicsWorld>(game: &Game<W>) -> Self {
        let items = game
            .world
            .bodies()
            .into_iter()
            .map(|body| {
                let tier = game.state.pieces.get(&body.id).and_then(|p| p.tier());
                let (fill, stroke) = if let Some(tier) = tier {
                    let fill = Fill::Texture {
                        asset: tier.asset,
                        fallback: tier.color,
                    };
                    (fill, Some(PIECE_STROKE))
                } else if body.id == game.boundaries.warning_line {
                    (Fill::Solid(WARNING_LINE_COLOR), None)
                } else {
                    (Fill::Solid(WALL_COLOR), None)
                };
                DrawItem {
                    shape: body.shape,
                    pos: body.pos,
                    fill,
                    stroke,
                }
            })
            .collect();

        Self {
            background: BACKGROUND,
            size: Vec2::new(game.tuning.field_width, game.tuning.field_height),
            items,
            hud: HudView {
                score: game.state.score,
                warning_visible: game.state.warning_active(),
                game_over_visible: game.state.is_ended(),
                paused: game.state.phase == crate::sim::GamePhase::Paused,
            },
        }
    }

    /// Scale geometry for high-DPI surfaces
    pub fn scaled(self, device_pixel_ratio: f32) -> Self {
        if device_pixel_ratio == 1.0 || device_pixel_ratio <= 0.0 {
            return self;
        }
        Self {
            size: self.size * device_pixel_ratio,
            items: self
                .items
                .into_iter()
                .map(|item| item.scaled(device_pixel_ratio))
                .collect(),
            ..self
        }
    }
}
