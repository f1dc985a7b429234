//! Downstream handlers that write records out

#[cfg(feature = "console")]
pub mod console;
pub mod json;
pub mod memory;

#[cfg(feature = "console")]
pub use console::ConsoleAppender;
pub use json::JsonAppender;
pub use memory::MemoryAppender;
