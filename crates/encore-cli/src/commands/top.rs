//! Hiscore table output.

use anyhow::{Result, bail};
use encore_core::{Database, Song};
use serde::Serialize;

pub struct TopFilter {
    pub song: Option<Song>,
    pub player: Option<String>,
    pub track: Option<String>,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct TopRow<'a> {
    score: u32,
    player: &'a str,
    artist: &'a str,
    title: &'a str,
    track: &'a str,
}

pub fn run(db: &Database, filter: &TopFilter, json: bool) -> Result<()> {
    let player_id = match filter.player.as_deref() {
        Some(name) => match db.players().lookup(name) {
            Some(id) => Some(id),
            None => bail!("Unknown player '{}'", name),
        },
        None => None,
    };

    let items = db.query_hiscore(
        filter.limit,
        player_id,
        filter.song.as_ref(),
        filter.track.as_deref(),
    )?;

    let rows: Vec<TopRow> = items
        .iter()
        .map(|item| {
            let player = db.players().get(item.player_id);
            let song = db.songs().get(item.song_id);
            TopRow {
                score: item.score,
                player: player.map_or("?", |p| p.name.as_str()),
                artist: song.map_or("?", |s| s.artist.as_str()),
                title: song.map_or("?", |s| s.title.as_str()),
                track: &item.track,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        eprintln!("No hiscores found");
        return Ok(());
    }
    for (rank, row) in rows.iter().enumerate() {
        println!(
            "{:>3}. {:>5}  {:<16} {} - {} [{}]",
            rank + 1,
            row.score,
            row.player,
            row.artist,
            row.title,
            row.track
        );
    }
    Ok(())
}
