use std::cell::{Ref, RefMut, RefCell};
use std::rc::{Rc, Weak};
use derive_more::*;
use image::RgbaImage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::{IntMap, Properties, RandomPicker, TerrainType, Tile, TileId};

/**
 * A collection of [`Tile`]s plus the terrain types their corners reference.
 *
 * Holds only what single-tile operations need from their owning side:
 * id-keyed storage, renumbering, terrain type resolution and weighted
 * random selection. Tiles are created through [`SharedTileset`], which
 * binds their back-references.
 */
#[derive(Default, Debug)]
pub struct Tileset {
    pub name: String,
    pub class: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_offset: Option<TileOffset>,
    pub properties: Properties,
    terrain_types: Vec<TerrainType>,
    tiles: IntMap<TileId, Tile>,
    next_tile_id: TileId,
}

impl Tileset {

    pub fn new(name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            name: name.into(),
            tile_width,
            tile_height,
            ..Default::default()
        }
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// Tiles in unspecified order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Id the next created tile will get.
    pub fn next_tile_id(&self) -> TileId {
        self.next_tile_id
    }

    pub fn remove_tile(&mut self, id: TileId) -> Option<Tile> {
        self.tiles.remove(&id)
    }

    /// Moves a tile to a different id, rewriting the id the tile itself
    /// reports. This is the only path that changes a tile's id after
    /// creation.
    pub fn renumber_tile(&mut self, old_id: TileId, new_id: TileId) -> Result<(), TilesetError> {
        if old_id == new_id {
            return Ok(());
        }
        if self.tiles.contains_key(&new_id) {
            log::warn!("Cannot renumber tile {old_id}: id {new_id} is already taken");
            return Err(TilesetError::TileIdTaken { tile_id: new_id });
        }
        let Some(mut tile) = self.tiles.remove(&old_id) else {
            return Err(TilesetError::NoSuchTile { tile_id: old_id });
        };
        tile.set_id(new_id);
        self.tiles.insert(new_id, tile);
        self.next_tile_id = self.next_tile_id.max(new_id + 1);
        Ok(())
    }

    /// Registers a terrain type and returns its terrain id.
    /// At most 255 types fit, since corner encoding reserves 255 for
    /// "unassigned".
    pub fn add_terrain_type(&mut self, terrain_type: TerrainType) -> Result<i32, TilesetError> {
        if self.terrain_types.len() >= 255 {
            return Err(TilesetError::TerrainLimitReached);
        }
        self.terrain_types.push(terrain_type);
        Ok(self.terrain_types.len() as i32 - 1)
    }

    pub fn terrain_types(&self) -> &[TerrainType] {
        &self.terrain_types
    }

    /// Terrain type for a terrain id as stored in corner encodings.
    /// None for -1 and for ids never registered.
    pub fn terrain_type(&self, terrain_id: i32) -> Option<&TerrainType> {
        if terrain_id < 0 {
            return None;
        }
        self.terrain_types.get(terrain_id as usize)
    }

    /// Selects a tile at random, weighted by each tile's probability.
    pub fn random_tile(&self, rng: &mut impl Rng) -> Option<&Tile> {
        let mut picker = RandomPicker::new();
        for tile in self.tiles.values() {
            picker.add(tile.probability(), tile);
        }
        picker.pick(rng).copied()
    }
}

/// Rendering offset applied to every tile of a tileset, in pixels.
#[derive(Copy, Clone, Eq, PartialEq, Default, Debug, Serialize, Deserialize)]
pub struct TileOffset { pub x: i32, pub y: i32 }

/**
 * Keep-alive handle to a [`Tileset`].
 *
 * The owning side of the tileset/tile relationship. Tiles store
 * [`WeakTileset`] back-references, so dropping the last of these handles
 * drops the tileset no matter how many tiles still point at it.
 * Tile creation goes through this handle so back-references get bound.
 */
#[derive(Clone, Default, Debug)]
pub struct SharedTileset(Rc<RefCell<Tileset>>);

impl SharedTileset {

    pub fn new(tileset: Tileset) -> Self {
        Self(Rc::new(RefCell::new(tileset)))
    }

    pub fn borrow(&self) -> Ref<'_, Tileset> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Tileset> {
        self.0.borrow_mut()
    }

    /// Non-owning handle for back-references.
    pub fn weak(&self) -> WeakTileset {
        WeakTileset(Rc::downgrade(&self.0))
    }

    /// Whether two handles refer to the same tileset.
    pub fn ptr_eq(&self, other: &SharedTileset) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Creates a tile under the next free id and returns that id.
    pub fn add_tile(&self, image: Option<RgbaImage>) -> TileId {
        let mut tileset = self.0.borrow_mut();
        let id = tileset.next_tile_id;
        tileset.next_tile_id += 1;
        let tile = match image {
            Some(image) => Tile::with_image(image, id, self.weak()),
            None => Tile::new(id, self.weak()),
        };
        tileset.tiles.insert(id, tile);
        id
    }

    /// Adopts a tile already bound to this tileset, e.g. a copy made with
    /// [`Tile::clone_to`]. The tile is dropped when its id is taken.
    pub fn insert_tile(&self, tile: Tile) -> Result<TileId, TilesetError> {
        debug_assert!(tile.shared_tileset().map_or(false, |shared| shared.ptr_eq(self)));
        let mut tileset = self.0.borrow_mut();
        let id = tile.id();
        if tileset.tiles.contains_key(&id) {
            return Err(TilesetError::TileIdTaken { tile_id: id });
        }
        tileset.tiles.insert(id, tile);
        tileset.next_tile_id = tileset.next_tile_id.max(id + 1);
        Ok(id)
    }
}

/// Non-owning reference to a [`Tileset`], held by its tiles.
#[derive(Clone, Default, Debug)]
pub struct WeakTileset(Weak<RefCell<Tileset>>);

impl WeakTileset {
    /// Owning handle, if the tileset is still alive.
    pub fn upgrade(&self) -> Option<SharedTileset> {
        self.0.upgrade().map(SharedTileset)
    }
}

#[derive(Error, Debug, Display, Clone, Eq, PartialEq)]
pub enum TilesetError {
    #[display(fmt="No tile with id {tile_id}")]
    NoSuchTile { tile_id: TileId },
    #[display(fmt="Tile id {tile_id} is already taken")]
    TileIdTaken { tile_id: TileId },
    #[display(fmt="Terrain type limit of 255 reached")]
    TerrainLimitReached,
}

#[cfg(test)]
mod test {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use crate::*;

    fn tileset() -> SharedTileset {
        SharedTileset::new(Tileset::new("terrain", 16, 16))
    }

    #[test]
    fn test_add_and_lookup() {
        let shared = tileset();
        let first = shared.add_tile(None);
        let second = shared.add_tile(None);
        assert_eq!(0, first);
        assert_eq!(1, second);

        let tileset = shared.borrow();
        assert_eq!(2, tileset.tile_count());
        assert_eq!(Some(second), tileset.tile(second).map(|tile| tile.id()));
        assert!(tileset.tile(99).is_none());
    }

    #[test]
    fn test_back_reference() {
        let shared = tileset();
        let id = shared.add_tile(None);
        let tileset = shared.borrow();
        let tile = tileset.tile(id).unwrap();
        assert!(tile.shared_tileset().unwrap().ptr_eq(&shared));
    }

    #[test]
    fn test_back_reference_does_not_keep_alive() {
        let shared = tileset();
        let id = shared.add_tile(None);
        let tile = shared.borrow_mut().remove_tile(id).unwrap();
        drop(shared);
        assert!(tile.shared_tileset().is_none());
    }

    #[test]
    fn test_renumber() {
        let shared = tileset();
        let id = shared.add_tile(None);
        {
            let mut tileset = shared.borrow_mut();
            tileset.renumber_tile(id, 10).unwrap();
            assert!(tileset.tile(id).is_none());
            assert_eq!(Some(10), tileset.tile(10).map(|tile| tile.id()));
        }
        // Renumbering moves the fresh id watermark past the new id.
        assert_eq!(11, shared.add_tile(None));
    }

    #[test]
    fn test_renumber_failures() {
        let shared = tileset();
        let first = shared.add_tile(None);
        let second = shared.add_tile(None);
        let mut tileset = shared.borrow_mut();

        let expected = Err(TilesetError::TileIdTaken { tile_id: second });
        let actual = tileset.renumber_tile(first, second);
        assert_eq!(expected, actual);

        let expected = Err(TilesetError::NoSuchTile { tile_id: 42 });
        let actual = tileset.renumber_tile(42, 43);
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_clone_to_other_tileset() {
        let source = tileset();
        let target = SharedTileset::new(Tileset::new("copy", 16, 16));
        let source_id = source.add_tile(None);
        {
            let mut tileset = source.borrow_mut();
            let tile = tileset.tile_mut(source_id).unwrap();
            tile.set_class("water");
            tile.set_terrain(TerrainCorners::new(0, 0, 1, 1));
            tile.set_probability(0.25);
            tile.set_frames(vec![Frame::new(0, 100), Frame::new(1, 50)]);
            tile.advance_animation(120);
            let mut group = ObjectGroup::new("collision");
            group.objects.push(MapObject::new(1, Vec2::ZERO, ObjectShape::Point));
            tile.set_object_group(Some(group));
            tile.properties_mut().insert("wet".into(), PropertyValue::Bool(true));
        }

        let source_tileset = source.borrow();
        let original = source_tileset.tile(source_id).unwrap();
        let clone = original.clone_to(&target, 5);

        assert_eq!(5, clone.id());
        assert_eq!(original.class(), clone.class());
        assert_eq!(original.terrain(), clone.terrain());
        assert_eq!(original.probability(), clone.probability());
        assert_eq!(original.frames(), clone.frames());
        assert_eq!(original.animation(), clone.animation());
        assert_eq!(original.properties(), clone.properties());
        assert!(clone.shared_tileset().unwrap().ptr_eq(&target));

        // Equal in value, but never the same group.
        let original_group = original.object_group().unwrap();
        let clone_group = clone.object_group().unwrap();
        assert_eq!(original_group, clone_group);
        assert!(!std::ptr::eq(original_group, clone_group));

        assert_eq!(Ok(5), target.insert_tile(clone));
        assert_eq!(6, target.add_tile(None));
    }

    #[test]
    fn test_insert_tile_id_taken() {
        let shared = tileset();
        let id = shared.add_tile(None);
        let clone = shared.borrow().tile(id).unwrap().clone_to(&shared, id);

        let expected = Err(TilesetError::TileIdTaken { tile_id: id });
        let actual = shared.insert_tile(clone);
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_terrain_resolution() {
        let shared = tileset();
        let id = shared.add_tile(None);
        {
            let mut tileset = shared.borrow_mut();
            assert_eq!(Ok(0), tileset.add_terrain_type(TerrainType::new("grass")));
            assert_eq!(Ok(1), tileset.add_terrain_type(TerrainType::new("water")));
            tileset.tile_mut(id).unwrap().set_corner_terrain_id(0, 1);
        }

        let tileset = shared.borrow();
        let tile = tileset.tile(id).unwrap();
        let corner_terrain = tile.terrain_at_corner(&tileset, 0).unwrap();
        assert_eq!("water", corner_terrain.name);
        assert!(tile.terrain_at_corner(&tileset, 1).is_none());
    }

    #[test]
    fn test_terrain_type_limit() {
        let mut tileset = Tileset::new("big", 16, 16);
        for index in 0..255 {
            tileset.add_terrain_type(TerrainType::new(format!("terrain_{index}"))).unwrap();
        }
        let expected = Err(TilesetError::TerrainLimitReached);
        let actual = tileset.add_terrain_type(TerrainType::new("overflow"));
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_random_tile_respects_probability() {
        let mut rng = SmallRng::seed_from_u64(11);
        assert!(Tileset::default().random_tile(&mut rng).is_none());

        let shared = tileset();
        let common = shared.add_tile(None);
        let rare = shared.add_tile(None);
        shared.borrow_mut().tile_mut(rare).unwrap().set_probability(0.0);

        let tileset = shared.borrow();
        for _ in 0..50 {
            let tile = tileset.random_tile(&mut rng).unwrap();
            assert_eq!(common, tile.id());
        }
    }

    #[test]
    fn test_current_frame_tile() {
        let shared = tileset();
        let base = shared.add_tile(None);
        let alt = shared.add_tile(None);
        shared.borrow_mut().tile_mut(base).unwrap().set_frames(vec![Frame::new(alt, 100)]);

        {
            let tileset = shared.borrow();
            let tile = tileset.tile(base).unwrap();
            let frame_tile = tile.current_frame_tile(&tileset).unwrap();
            assert_eq!(alt, frame_tile.id());

            // A tile without animation resolves to itself.
            let alt_tile = tileset.tile(alt).unwrap();
            let same = alt_tile.current_frame_tile(&tileset).unwrap();
            assert!(std::ptr::eq(alt_tile, same));
        }

        // Frames referencing a removed tile no longer resolve.
        shared.borrow_mut().remove_tile(alt);
        let tileset = shared.borrow();
        let tile = tileset.tile(base).unwrap();
        assert!(tile.current_frame_tile(&tileset).is_none());
    }
}
