use glam::Vec2;
use serde::{Deserialize, Serialize};
use crate::Rect;

/**
 * Named collection of shapes attached to a tile.
 * Usually collision geometry or editor annotations.
 */
#[derive(Clone, PartialEq, Default, Debug, Serialize, Deserialize)]
pub struct ObjectGroup {
    pub name: String,
    pub objects: Vec<MapObject>,
}

impl ObjectGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }
}

/// A single placed shape within an [`ObjectGroup`].
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    /// Shape origin in pixels, relative to the tile's top-left corner.
    pub position: Vec2,
    pub shape: ObjectShape,
}

impl MapObject {

    pub fn new(id: u32, position: Vec2, shape: ObjectShape) -> Self {
        Self {
            id,
            name: String::new(),
            position,
            shape,
        }
    }

    /// Axis-aligned bounds of the shape in tile space.
    pub fn bounds(&self) -> Rect {
        match &self.shape {
            ObjectShape::Rect { size } | ObjectShape::Ellipse { size } => Rect {
                origin: self.position,
                size: *size,
            },
            ObjectShape::Point => Rect {
                origin: self.position,
                size: Vec2::ZERO,
            },
            ObjectShape::Polygon { points } | ObjectShape::Polyline { points } => {
                let mut bounds = Rect::from_points(points);
                bounds.origin += self.position;
                bounds
            }
        }
    }
}

/// Geometry of a [`MapObject`].
/// Polygon and polyline points are relative to the object's position.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum ObjectShape {
    Rect { size: Vec2 },
    Ellipse { size: Vec2 },
    Point,
    Polygon { points: Vec<Vec2> },
    Polyline { points: Vec<Vec2> },
}
