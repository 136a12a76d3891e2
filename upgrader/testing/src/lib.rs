mod builder;
mod halt;
mod suite;
mod tracing;

pub use {builder::*, halt::*, suite::*, tracing::*};
