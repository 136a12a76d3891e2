mod app;
mod db;
mod error;
mod handler;
mod keeper;
mod state;

pub use {app::*, db::*, error::*, handler::*, keeper::*, state::*};
