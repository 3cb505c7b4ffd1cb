//! Book Blitz (workspace facade crate).
//!
//! Re-exports the engine crates under one name so callers can write
//! `book_blitz::{core, runtime, types}` while the implementation lives in `crates/`.

pub use book_blitz_core as core;
pub use book_blitz_runtime as runtime;
pub use book_blitz_types as types;
