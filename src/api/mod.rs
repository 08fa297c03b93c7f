pub mod geosystem;

pub use geosystem::{GeometryStore, HttpStore, MemoryStore};
