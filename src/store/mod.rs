pub mod kv;
pub mod repository;

pub use kv::*;
pub use repository::*;
