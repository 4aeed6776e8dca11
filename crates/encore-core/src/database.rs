//! Database facade over players, hiscores and songs.
//!
//! A [`Database`] is bound to one XML file. Opening it tries to load that
//! file and falls back to an empty database when it is missing or broken;
//! dropping it writes the current state back, even if the load had failed.
//!
//! ## Example
//!
//! ```no_run
//! use encore_core::{Database, Song};
//!
//! let mut db = Database::open("database.xml");
//! let alice = db.add_player("Alice", None, None)?;
//! let song = Song::new("Band", "X");
//! db.add_song(&song)?;
//!
//! db.set_current_player(alice)?;
//! db.set_current_score(4200)?;
//! if db.reached_hiscore(&song) {
//!     db.add_hiscore(&song)?;
//! }
//! db.close()?;
//! # Ok::<(), encore_core::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::hiscore::{Hiscore, HiscoreItem};
use crate::players::Players;
use crate::songs::{Song, SongItems};
use crate::xml;

/// Name of the document root element
const ROOT_ELEMENT: &str = "encore";

#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    players: Players,
    hiscores: Hiscore,
    songs: SongItems,
    save_on_drop: bool,
}

impl Database {
    /// Open the database stored at `path`.
    ///
    /// Load failures are logged and leave the database empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let mut db = Self {
            path: path.as_ref().to_path_buf(),
            players: Players::new(),
            hiscores: Hiscore::new(),
            songs: SongItems::new(),
            save_on_drop: true,
        };

        match db.load() {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                info!("No database at {}, starting empty", db.file());
            }
            Err(e) => {
                error!("Failed to load database {}: {}", db.file(), e);
            }
        }
        db
    }

    /// Load the whole database from the file, replacing the current state.
    ///
    /// On error the current state is left untouched.
    pub fn load(&mut self) -> Result<()> {
        let content = fs::read_to_string(&self.path)?;
        let root = xml::parse_document(&content)?;
        if root.name != ROOT_ELEMENT {
            return Err(Error::type_mismatch(format!(
                "expected <{}> root element, found <{}>",
                ROOT_ELEMENT, root.name
            )));
        }

        let mut players = Players::new();
        let mut hiscores = Hiscore::new();
        let mut songs = SongItems::new();

        for section in &root.children {
            if !matches!(section.name.as_str(), "players" | "songs" | "hiscores") {
                debug!("Ignoring unknown section <{}>", section.name);
            }
        }
        // hiscores are checked against the players and songs of the same file
        for section in root.children_named("players") {
            players.load(section)?;
        }
        for section in root.children_named("songs") {
            songs.load(section)?;
        }
        for section in root.children_named("hiscores") {
            hiscores.load(section)?;
        }
        check_references(&hiscores, &players, &songs)?;

        info!(
            "Loaded database {} ({} players, {} songs, {} hiscores)",
            self.file(),
            players.len(),
            songs.len(),
            hiscores.len()
        );
        self.players = players;
        self.hiscores = hiscores;
        self.songs = songs;
        Ok(())
    }

    /// Write the whole database to the file given to [`Database::open`].
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = self.to_document()?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;

        info!(
            "Saved database {} ({} players, {} songs, {} hiscores)",
            self.file(),
            self.players.len(),
            self.songs.len(),
            self.hiscores.len()
        );
        Ok(())
    }

    /// Save and close the database, reporting any save error.
    pub fn close(mut self) -> Result<()> {
        self.save_on_drop = false;
        self.save()
    }

    fn to_document(&self) -> Result<Vec<u8>> {
        let mut writer = xml::new_writer();
        xml::write_declaration(&mut writer)?;
        xml::write_start(&mut writer, ROOT_ELEMENT, &[])?;
        self.players.save(&mut writer)?;
        self.songs.save(&mut writer)?;
        self.hiscores.save(&mut writer)?;
        xml::write_end(&mut writer, ROOT_ELEMENT)?;

        let mut content = writer.into_inner();
        content.push(b'\n');
        Ok(content)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// The file name given to [`Database::open`].
    pub fn file(&self) -> String {
        self.path.display().to_string()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_player(&mut self, name: &str, picture: Option<&str>, id: Option<u32>) -> Result<u32> {
        self.players.add_player(name, picture, id)
    }

    pub fn add_song(&mut self, song: &Song) -> Result<u32> {
        self.songs.add_song(song)
    }

    /// Record the current player's score for `song`.
    ///
    /// Both the song and the current player must be known; otherwise nothing
    /// is stored.
    pub fn add_hiscore(&mut self, song: &Song) -> Result<()> {
        let song_id = self.resolve_song(song)?;
        let player = self.players.current().ok_or(Error::NoCurrentPlayer)?;
        self.hiscores
            .add_hiscore(player.score, player.id, song_id, &player.track)?;
        debug!(
            "Recorded hiscore {} for player {} on song {}",
            player.score, player.id, song_id
        );
        Ok(())
    }

    /// Whether the current player's score is a new hiscore for `song`.
    ///
    /// Returns `false` if the song or the current player is unknown.
    pub fn reached_hiscore(&self, song: &Song) -> bool {
        let (Some(song_id), Some(player)) = (self.songs.lookup(song), self.players.current())
        else {
            return false;
        };
        self.hiscores
            .reached_hiscore(player.score, song_id, player.id, &player.track)
    }

    pub fn query_hiscore(
        &self,
        max: usize,
        player_id: Option<u32>,
        song: Option<&Song>,
        track: Option<&str>,
    ) -> Result<Vec<&HiscoreItem>> {
        let song_id = song.map(|s| self.resolve_song(s)).transpose()?;
        Ok(self.hiscores.query_hiscore(max, player_id, song_id, track))
    }

    pub fn set_current_player(&mut self, id: u32) -> Result<()> {
        self.players.set_current(id)
    }

    pub fn set_current_score(&mut self, score: u32) -> Result<()> {
        let player = self.players.current_mut().ok_or(Error::NoCurrentPlayer)?;
        player.score = score;
        Ok(())
    }

    pub fn set_current_track(&mut self, track: &str) -> Result<()> {
        let player = self.players.current_mut().ok_or(Error::NoCurrentPlayer)?;
        player.track = track.to_string();
        Ok(())
    }

    fn resolve_song(&self, song: &Song) -> Result<u32> {
        self.songs.lookup(song).ok_or_else(|| Error::UnknownSong {
            artist: song.artist.clone(),
            title: song.title.clone(),
        })
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    /// Direct access for callers that manage the current player themselves.
    pub fn players_mut(&mut self) -> &mut Players {
        &mut self.players
    }

    pub fn hiscores(&self) -> &Hiscore {
        &self.hiscores
    }

    pub fn songs(&self) -> &SongItems {
        &self.songs
    }

    /// Direct access for importing song records with fixed ids.
    pub fn songs_mut(&mut self) -> &mut SongItems {
        &mut self.songs
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if !self.save_on_drop {
            return;
        }
        if let Err(e) = self.save() {
            warn!("Failed to save database {}: {}", self.file(), e);
        }
    }
}

/// Every hiscore must point at a player and a song of the same document.
fn check_references(hiscores: &Hiscore, players: &Players, songs: &SongItems) -> Result<()> {
    for item in hiscores.iter() {
        if !players.contains(item.player_id) {
            return Err(Error::Hiscore(format!(
                "hiscore refers to unknown player {}",
                item.player_id
            )));
        }
        if !songs.contains(item.song_id) {
            return Err(Error::Hiscore(format!(
                "hiscore refers to unknown song {}",
                item.song_id
            )));
        }
    }
    Ok(())
}
