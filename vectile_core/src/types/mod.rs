mod bbox;
mod blob;
mod tile_coord;

pub use bbox::*;
pub use blob::*;
pub use tile_coord::*;
