mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use encore_core::{Database, Song};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("encore={level}").parse()?)
                .add_directive(format!("encore_core={level}").parse()?),
        )
        .init();

    let config = Config::resolve(cli.config.as_deref())?;
    let db_path = config.database_path(cli.database)?;
    debug!("Using database {}", db_path.display());

    let mut db = Database::open(&db_path);

    match cli.command {
        Command::Players { filter, json } => {
            commands::players::list(&db, filter.as_deref().unwrap_or(""), json)?
        }
        Command::AddPlayer { name, picture, id } => {
            commands::players::add(&mut db, &name, picture.as_deref(), id)?
        }
        Command::Songs { json } => commands::songs::list(&db, json)?,
        Command::AddSong { song, path } => {
            let mut song = Song::new(song.artist, song.title);
            song.path = path;
            commands::songs::add(&mut db, &song)?;
        }
        Command::Record(args) => commands::score::record(&mut db, &config, &args)?,
        Command::Check(args) => commands::score::check(&mut db, &config, &args)?,
        Command::Top {
            artist,
            title,
            player,
            track,
            limit,
            json,
        } => {
            let song = title.map(|title| Song::new(artist.unwrap_or_default(), title));
            let filter = commands::top::TopFilter {
                song,
                player,
                track,
                limit,
            };
            commands::top::run(&db, &filter, json)?
        }
        Command::File => println!("{}", db.file()),
    }

    db.close()?;
    Ok(())
}
