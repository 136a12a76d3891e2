mod codec;
mod item;
mod key;
mod map;
mod path;

pub use {codec::*, item::*, key::*, map::*, path::*};
