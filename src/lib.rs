mod util;
mod properties;
mod terrain;
mod animation;
mod object_group;
mod picker;
mod tile;
mod tileset;

pub use util::*;
pub use properties::*;
pub use terrain::*;
pub use animation::*;
pub use object_group::*;
pub use picker::*;
pub use tile::*;
pub use tileset::*;
