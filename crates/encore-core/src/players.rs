//! Player registry.
//!
//! Holds every known player plus the player currently at the microphone.
//! The current player's score and track are runtime state written by the
//! game after a song and read back when hiscores are recorded.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::xml::{Element, XmlWriter, write_empty, write_end, write_start};

/// Track used when the game has not reported one.
pub const DEFAULT_TRACK: &str = "vocals";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerItem {
    pub id: u32,
    pub name: String,
    pub picture: Option<String>,
    /// Score reached in the current song (not persisted)
    #[serde(skip)]
    pub score: u32,
    /// Track played in the current song (not persisted)
    #[serde(skip)]
    pub track: String,
}

impl PlayerItem {
    pub fn new(id: u32, name: impl Into<String>, picture: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            picture,
            score: 0,
            track: DEFAULT_TRACK.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Players {
    players: BTreeMap<u32, PlayerItem>,
    current: Option<u32>,
}

impl Players {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player and return its id.
    ///
    /// Without an explicit id the lowest unused one is assigned.
    pub fn add_player(&mut self, name: &str, picture: Option<&str>, id: Option<u32>) -> Result<u32> {
        let id = match id {
            Some(id) if self.players.contains_key(&id) => {
                return Err(Error::Players(format!(
                    "id {} already used by '{}'",
                    id, self.players[&id].name
                )));
            }
            Some(id) => id,
            None => self.assign_id(),
        };

        let picture = picture.filter(|p| !p.is_empty()).map(str::to_string);
        self.players.insert(id, PlayerItem::new(id, name, picture));
        debug!("Added player {} with id {}", name, id);
        Ok(id)
    }

    fn assign_id(&self) -> u32 {
        // keys are sorted, so the first gap is the lowest free id
        let mut next = 0;
        for &id in self.players.keys() {
            if id != next {
                break;
            }
            next += 1;
        }
        next
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.players.values().find(|p| p.name == name).map(|p| p.id)
    }

    pub fn get(&self, id: u32) -> Option<&PlayerItem> {
        self.players.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.players.contains_key(&id)
    }

    pub fn set_current(&mut self, id: u32) -> Result<()> {
        if !self.players.contains_key(&id) {
            return Err(Error::Players(format!("no player with id {}", id)));
        }
        self.current = Some(id);
        Ok(())
    }

    /// Deselect the current player, e.g. between songs.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&PlayerItem> {
        self.current.and_then(|id| self.players.get(&id))
    }

    pub fn current_mut(&mut self) -> Option<&mut PlayerItem> {
        self.current.and_then(|id| self.players.get_mut(&id))
    }

    /// Players whose name contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&PlayerItem> {
        let query = query.to_lowercase();
        self.players
            .values()
            .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerItem> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn load(&mut self, section: &Element) -> Result<()> {
        for node in section.children_named("player") {
            let id = node
                .parse_attr::<u32>("id")?
                .ok_or_else(|| Error::Players("player without id".to_string()))?;
            let name = node
                .attr("name")
                .ok_or_else(|| Error::Players(format!("player {} without name", id)))?;
            let picture = node.attr("picture");
            self.add_player(name, picture, Some(id))?;
        }
        Ok(())
    }

    pub fn save(&self, xml: &mut XmlWriter) -> Result<()> {
        write_start(xml, "players", &[])?;
        for player in self.players.values() {
            let id = player.id.to_string();
            let mut attributes = vec![("id", id.as_str()), ("name", player.name.as_str())];
            if let Some(picture) = &player.picture {
                attributes.push(("picture", picture.as_str()));
            }
            write_empty(xml, "player", &attributes)?;
        }
        write_end(xml, "players")
    }
}
