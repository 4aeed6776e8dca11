//! # encore-core
//!
//! Persistent player, song and hiscore database for the Encore karaoke game.
//!
//! This crate provides:
//! - [`Database`]: a facade that owns the three collections below and keeps
//!   them in a single XML file
//! - [`Players`]: known players and the current player
//! - [`Hiscore`]: recorded scores per song, player and track
//! - [`SongItems`]: song metadata keyed by id

pub mod database;
pub mod error;
pub mod hiscore;
pub mod players;
pub mod songs;
pub mod xml;

pub use database::Database;
pub use error::{Error, ErrorKind, Result};
pub use hiscore::{Hiscore, HiscoreItem, MAX_SCORE};
pub use players::{DEFAULT_TRACK, PlayerItem, Players};
pub use songs::{Song, SongItem, SongItems};
