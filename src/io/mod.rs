//! I/O layer: PNG decoding/encoding through the `image` crate and the
//! child-process plumbing that talks to UCI engines.
pub mod engine;
pub use engine::{EngineCommand, EngineProcess, LineEvent, ShutdownReport};

pub mod png;
