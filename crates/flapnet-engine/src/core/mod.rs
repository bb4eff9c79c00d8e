pub use self::{actor::*, geometry::*, obstacle::*, playfield::*, seed::*};

pub(crate) mod actor;
pub(crate) mod geometry;
pub(crate) mod obstacle;
pub(crate) mod playfield;
pub(crate) mod seed;
