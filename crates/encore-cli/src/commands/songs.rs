//! Song listing and registration.

use anyhow::{Context, Result};
use encore_core::{Database, Song};

pub fn list(db: &Database, json: bool) -> Result<()> {
    let songs: Vec<_> = db.songs().iter().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&songs)?);
        return Ok(());
    }

    if songs.is_empty() {
        eprintln!("No songs found");
        return Ok(());
    }
    for song in songs {
        println!("{:>4}  {} - {}", song.id, song.artist, song.title);
    }
    Ok(())
}

pub fn add(db: &mut Database, song: &Song) -> Result<u32> {
    let known = db.songs().lookup(song).is_some();
    let id = db
        .add_song(song)
        .with_context(|| format!("Failed to add song {} - {}", song.artist, song.title))?;
    if known {
        println!("Song {} - {} already known with id {}", song.artist, song.title, id);
    } else {
        println!("Added song {} - {} with id {}", song.artist, song.title, id);
    }
    Ok(id)
}
