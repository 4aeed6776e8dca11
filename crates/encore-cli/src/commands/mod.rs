//! CLI command implementations.
//!
//! Each command works on an already opened database; `main` closes it
//! afterwards so changes are written back.

pub mod players;
pub mod score;
pub mod songs;
pub mod top;
