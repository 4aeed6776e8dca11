//! Player listing and registration.

use anyhow::{Context, Result};
use encore_core::Database;

pub fn list(db: &Database, filter: &str, json: bool) -> Result<()> {
    let players = db.players().filter(filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&players)?);
        return Ok(());
    }

    if players.is_empty() {
        eprintln!("No players found");
        return Ok(());
    }
    for player in players {
        match &player.picture {
            Some(picture) => println!("{:>4}  {}  ({})", player.id, player.name, picture),
            None => println!("{:>4}  {}", player.id, player.name),
        }
    }
    Ok(())
}

pub fn add(db: &mut Database, name: &str, picture: Option<&str>, id: Option<u32>) -> Result<()> {
    let id = db
        .add_player(name, picture, id)
        .with_context(|| format!("Failed to add player '{}'", name))?;
    println!("Added player {} with id {}", name, id);
    Ok(())
}
