//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling
//! - `paths` - Path argument expansion and validation

pub mod io;
pub mod paths;
