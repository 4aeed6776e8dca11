use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Inspect and edit an Encore player and hiscore database")]
pub struct Cli {
    /// Config file (default: <config dir>/encore/config.toml)
    #[arg(short, long, env = "ENCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overrides the config file
    #[arg(short, long, env = "ENCORE_DATABASE")]
    pub database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List players, optionally filtered by name
    Players {
        filter: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Add a player
    AddPlayer {
        name: String,
        #[arg(long)]
        picture: Option<String>,
        #[arg(long)]
        id: Option<u32>,
    },
    /// List songs
    Songs {
        #[arg(long)]
        json: bool,
    },
    /// Add a song
    AddSong {
        #[command(flatten)]
        song: SongArgs,
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Record a score for a player, adding the song if needed
    Record(PlayArgs),
    /// Check whether a score would be a new hiscore without recording it
    Check(PlayArgs),
    /// Show the best scores
    Top {
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        player: Option<String>,
        #[arg(long)]
        track: Option<String>,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Print the database file path
    File,
}

#[derive(Args, Clone)]
pub struct SongArgs {
    #[arg(long, default_value = "")]
    pub artist: String,
    #[arg(long)]
    pub title: String,
}

#[derive(Args, Clone)]
pub struct PlayArgs {
    #[command(flatten)]
    pub song: SongArgs,
    #[arg(long)]
    pub score: u32,
    /// Player name (default: `player` from the config file)
    #[arg(long)]
    pub player: Option<String>,
    /// Track name (default: `track` from the config file, then "vocals")
    #[arg(long)]
    pub track: Option<String>,
}
