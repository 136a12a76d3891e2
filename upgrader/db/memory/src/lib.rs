mod db;
mod error;

pub use {db::*, error::*};
