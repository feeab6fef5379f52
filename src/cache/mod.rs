//! 对象缓存抽象，后端可插拔

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache};
