pub use self::{direction::*, grid::*, slide::*};

pub(crate) mod direction;
pub(crate) mod grid;
pub(crate) mod slide;
