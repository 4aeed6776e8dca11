//! Score recording and hiscore checks.

use anyhow::{Context, Result, bail};
use encore_core::{DEFAULT_TRACK, Database, MAX_SCORE, Song};
use tracing::info;

use crate::cli::PlayArgs;
use crate::config::Config;

/// Make the requested player current with the given score and track.
fn prepare(db: &mut Database, config: &Config, args: &PlayArgs) -> Result<()> {
    if args.score > MAX_SCORE {
        bail!("Score {} exceeds the maximum of {}", args.score, MAX_SCORE);
    }
    let Some(name) = args.player.as_deref().or(config.player.as_deref()) else {
        bail!("No player given (use --player or set `player` in the config file)");
    };
    let Some(id) = db.players().lookup(name) else {
        bail!("Unknown player '{}'", name);
    };
    let track = args
        .track
        .as_deref()
        .or(config.track.as_deref())
        .unwrap_or(DEFAULT_TRACK);

    db.set_current_player(id)?;
    db.set_current_score(args.score)?;
    db.set_current_track(track)?;
    Ok(())
}

fn song_of(args: &PlayArgs) -> Song {
    Song::new(args.song.artist.clone(), args.song.title.clone())
}

pub fn record(db: &mut Database, config: &Config, args: &PlayArgs) -> Result<()> {
    prepare(db, config, args)?;
    let song = song_of(args);
    db.add_song(&song)?;

    let reached = db.reached_hiscore(&song);
    db.add_hiscore(&song)
        .with_context(|| format!("Failed to record score for {} - {}", song.artist, song.title))?;

    if reached {
        info!("New hiscore on {} - {}", song.artist, song.title);
        println!("New hiscore: {}", args.score);
    } else {
        println!("Recorded score: {}", args.score);
    }
    Ok(())
}

pub fn check(db: &mut Database, config: &Config, args: &PlayArgs) -> Result<()> {
    prepare(db, config, args)?;
    let song = song_of(args);
    if db.songs().lookup(&song).is_none() {
        bail!("Song {} - {} is not in the database", song.artist, song.title);
    }

    if db.reached_hiscore(&song) {
        println!("{} would be a new hiscore", args.score);
    } else {
        println!("{} is not a new hiscore", args.score);
    }
    Ok(())
}
