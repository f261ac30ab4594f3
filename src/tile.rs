use glam::UVec2;
use image::RgbaImage;
use crate::{
    Frame, ObjectGroup, Properties, SharedTileset, TerrainCorners, TerrainType, TileAnimation,
    Tileset, WeakTileset,
};

/// Id of a tile, local to its tileset.
pub type TileId = u32;

/// Loading state of a tile image resolved by an external loader.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug)]
pub enum LoadingStatus {
    Loading,
    #[default]
    Ready,
    Error,
}

impl LoadingStatus {

    pub fn is_loading(&self) -> bool {
        match self {
            LoadingStatus::Loading => true,
            _ => false,
        }
    }

    pub fn is_ready(&self) -> bool {
        match self {
            LoadingStatus::Ready => true,
            _ => false,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            LoadingStatus::Error => true,
            _ => false,
        }
    }
}

/**
 * A single tile of a [`Tileset`].
 *
 * Carries the tile's identity, its image binding, per-corner terrain,
 * selection probability, custom properties, an optional group of collision
 * shapes and an optional animation. The reference back to the owning
 * tileset is a [`WeakTileset`], so a tile never keeps its tileset alive.
 *
 * Operations that resolve other tiles or terrain types borrow the owning
 * tileset from the caller instead of going through the back-reference,
 * which keeps them usable while the caller already holds the tileset
 * borrowed.
 */
#[derive(Debug)]
pub struct Tile {
    id: TileId,
    tileset: WeakTileset,
    image: Option<RgbaImage>,
    image_source: Option<String>,
    image_status: LoadingStatus,
    class: String,
    terrain: TerrainCorners,
    probability: f32,
    properties: Properties,
    object_group: Option<ObjectGroup>,
    animation: TileAnimation,
}

impl Tile {

    pub fn new(id: TileId, tileset: WeakTileset) -> Self {
        Self {
            id,
            tileset,
            image: None,
            image_source: None,
            image_status: LoadingStatus::Ready,
            class: String::new(),
            terrain: TerrainCorners::NONE,
            probability: 1.0,
            properties: Properties::default(),
            object_group: None,
            animation: TileAnimation::default(),
        }
    }

    pub fn with_image(image: RgbaImage, id: TileId, tileset: WeakTileset) -> Self {
        let mut tile = Self::new(id, tileset);
        tile.set_image(Some(image));
        tile
    }

    /// Id of this tile within its tileset.
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Only the owning tileset renumbers tiles.
    pub(crate) fn set_id(&mut self, id: TileId) {
        self.id = id;
    }

    /// Back-reference to the owning tileset.
    pub fn tileset(&self) -> &WeakTileset {
        &self.tileset
    }

    /// Owning tileset as a keep-alive handle, if it is still around.
    pub fn shared_tileset(&self) -> Option<SharedTileset> {
        self.tileset.upgrade()
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Binds or clears the tile's pixel data. The image status becomes
    /// ready on a bind and error on a clear, matching what an external
    /// decoder reports when it resolves [`image_source`](Self::image_source).
    pub fn set_image(&mut self, image: Option<RgbaImage>) {
        self.image_status = match image {
            Some(_) => LoadingStatus::Ready,
            None => LoadingStatus::Error,
        };
        self.image = image;
    }

    /// Location of the external image this tile displays, if any.
    pub fn image_source(&self) -> Option<&str> {
        self.image_source.as_deref()
    }

    pub fn set_image_source(&mut self, image_source: Option<String>) {
        self.image_source = image_source;
    }

    pub fn image_status(&self) -> LoadingStatus {
        self.image_status
    }

    pub fn set_image_status(&mut self, image_status: LoadingStatus) {
        if image_status.is_error() && !self.image_status.is_error() {
            log::warn!(
                "Image '{}' of tile {} failed to load",
                self.image_source().unwrap_or(""),
                self.id,
            );
        }
        self.image_status = image_status;
    }

    /// Width of the tile's image in pixels, or 0 without pixel data.
    pub fn width(&self) -> u32 {
        self.image.as_ref().map_or(0, |image| image.width())
    }

    /// Height of the tile's image in pixels, or 0 without pixel data.
    pub fn height(&self) -> u32 {
        self.image.as_ref().map_or(0, |image| image.height())
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width(), self.height())
    }

    /// Semantic category of this tile. Empty means unclassified.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn set_class(&mut self, class: impl Into<String>) {
        self.class = class.into();
    }

    /// Packed terrain ids of the tile's four corners.
    pub fn terrain(&self) -> TerrainCorners {
        self.terrain
    }

    pub fn set_terrain(&mut self, terrain: TerrainCorners) {
        self.terrain = terrain;
    }

    /// Terrain id at one corner, or -1 if unassigned.
    pub fn corner_terrain_id(&self, corner: usize) -> i32 {
        self.terrain.corner(corner)
    }

    pub fn set_corner_terrain_id(&mut self, corner: usize, terrain_id: i32) {
        self.terrain = self.terrain.with_corner(corner, terrain_id);
    }

    /// Resolves the terrain type at one corner against the owning tileset.
    pub fn terrain_at_corner<'a>(
        &self,
        tileset: &'a Tileset,
        corner: usize,
    ) -> Option<&'a TerrainType> {
        tileset.terrain_type(self.terrain.corner(corner))
    }

    /// Relative weight of this tile in random selection.
    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn set_probability(&mut self, probability: f32) {
        self.probability = probability;
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Collision shapes attached to this tile, if any.
    pub fn object_group(&self) -> Option<&ObjectGroup> {
        self.object_group.as_ref()
    }

    /// Takes exclusive ownership of the group, dropping any previous one.
    pub fn set_object_group(&mut self, object_group: Option<ObjectGroup>) {
        self.object_group = object_group;
    }

    /// Installs a group and hands back the previous one, so undo stacks
    /// can restore it later without rebuilding it.
    pub fn swap_object_group(&mut self, object_group: Option<ObjectGroup>) -> Option<ObjectGroup> {
        std::mem::replace(&mut self.object_group, object_group)
    }

    /// Animation frames of this tile. Empty when not animated.
    pub fn frames(&self) -> &[Frame] {
        self.animation.frames()
    }

    /// Replaces the animation frames and rewinds playback.
    pub fn set_frames(&mut self, frames: Vec<Frame>) {
        self.animation.set_frames(frames);
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_animated()
    }

    pub fn animation(&self) -> &TileAnimation {
        &self.animation
    }

    pub fn current_frame_index(&self) -> usize {
        self.animation.current_frame_index()
    }

    /// Id of the tile to display right now. The tile's own id unless an
    /// animation frame overrides it.
    pub fn current_frame_tile_id(&self) -> TileId {
        self.animation.current_frame_tile_id().unwrap_or(self.id)
    }

    /// Tile to display right now, resolved against the owning tileset.
    /// The tile itself when not animated. None when an animation frame
    /// references an id the tileset no longer contains.
    pub fn current_frame_tile<'a>(&'a self, tileset: &'a Tileset) -> Option<&'a Tile> {
        match self.animation.current_frame_tile_id() {
            Some(tile_id) => tileset.tile(tile_id),
            None => Some(self),
        }
    }

    /// See [`TileAnimation::reset`].
    pub fn reset_animation(&mut self) -> bool {
        self.animation.reset()
    }

    /// See [`TileAnimation::advance`].
    pub fn advance_animation(&mut self, elapsed_ms: u32) -> bool {
        self.animation.advance(elapsed_ms)
    }

    /// Deep copy of this tile bound to another tileset under a new id.
    /// Animation playback state carries over. The object group and the
    /// properties are copied by value, never shared.
    pub fn clone_to(&self, tileset: &SharedTileset, id: TileId) -> Tile {
        Tile {
            id,
            tileset: tileset.weak(),
            image: self.image.clone(),
            image_source: self.image_source.clone(),
            image_status: self.image_status,
            class: self.class.clone(),
            terrain: self.terrain,
            probability: self.probability,
            properties: self.properties.clone(),
            object_group: self.object_group.clone(),
            animation: self.animation.clone(),
        }
    }
}
