use serde::{Deserialize, Serialize};
use crate::TileId;

/**
 * Terrain ids of a tile's four corners packed into a single word.
 *
 * One byte per corner, most significant byte first:
 * top-left, top-right, bottom-left, bottom-right.
 * The byte 0xFF marks an unassigned corner and is surfaced as -1,
 * leaving 0..=254 as valid terrain ids.
 */
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct TerrainCorners(u32);

impl TerrainCorners {

    /// All four corners unassigned.
    pub const NONE: Self = Self(0xFFFF_FFFF);

    /// Packs four corner terrain ids.
    /// Ids are masked to their low byte, so -1 packs as "unassigned".
    pub fn new(top_left: i32, top_right: i32, bottom_left: i32, bottom_right: i32) -> Self {
        Self(
            (top_left as u32 & 0xFF) << 24
                | (top_right as u32 & 0xFF) << 16
                | (bottom_left as u32 & 0xFF) << 8
                | (bottom_right as u32 & 0xFF),
        )
    }

    /// Packs the same terrain id into all four corners.
    pub fn uniform(terrain_id: i32) -> Self {
        Self::new(terrain_id, terrain_id, terrain_id, terrain_id)
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Packed representation, as stored in map files.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Terrain id at a corner, or -1 if unassigned.
    /// Corners are numbered 0 = top-left, 1 = top-right,
    /// 2 = bottom-left, 3 = bottom-right.
    pub fn corner(self, corner: usize) -> i32 {
        debug_assert!(corner < 4);
        let terrain_id = self.0 >> (3 - corner) * 8 & 0xFF;
        match terrain_id {
            0xFF => -1,
            _ => terrain_id as i32,
        }
    }

    /// Terrain ids of all corners, top-left first.
    pub fn corners(self) -> [i32; 4] {
        [self.corner(0), self.corner(1), self.corner(2), self.corner(3)]
    }

    /// Copy of self with a single corner's terrain id replaced.
    pub fn with_corner(self, corner: usize, terrain_id: i32) -> Self {
        debug_assert!(corner < 4);
        let shift = (3 - corner) * 8;
        let mask = 0xFF << shift;
        let insert = (terrain_id as u32) << shift;
        Self(self.0 & !mask | insert & mask)
    }
}

impl Default for TerrainCorners {
    fn default() -> Self {
        Self::NONE
    }
}

/// Terrain type registered with a tileset.
/// Its position in the tileset's list is its terrain id.
#[derive(Clone, PartialEq, Default, Debug, Serialize, Deserialize)]
pub struct TerrainType {
    pub name: String,
    /// Tile showcasing this terrain in pickers, if any.
    pub image_tile: Option<TileId>,
}

impl TerrainType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_tile: None,
        }
    }
}
