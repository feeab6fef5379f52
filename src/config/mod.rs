//! 应用配置

mod loader;
mod structs;

pub use structs::*;
