//! Storage backends for saved sessions.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::{SessionStore, decode_sessions};
