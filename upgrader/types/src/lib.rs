mod block;
mod buffer;
mod db;
mod error;
mod prefix;
mod result;
mod serializers;
mod storage;
mod time;
mod upgrade;
mod utils;

pub use {
    block::*, buffer::*, db::*, error::*, prefix::*, result::*, serializers::*, storage::*,
    time::*, upgrade::*, utils::*,
};

// ---------------------------------- testing ----------------------------------

mod testing;

pub use testing::*;

