//! Song collection keyed by id.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::xml::{Element, XmlWriter, write_empty, write_end, write_start};

/// A playable song as seen by the game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Song {
    pub artist: String,
    pub title: String,
    /// Folder the song was loaded from
    pub path: Option<PathBuf>,
}

impl Song {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Song metadata record stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongItem {
    pub id: u32,
    pub artist: String,
    pub title: String,
    pub path: Option<PathBuf>,
}

impl SongItem {
    /// Songs are identified by artist and title, ignoring case.
    pub fn matches(&self, song: &Song) -> bool {
        same_song(&self.artist, &self.title, &song.artist, &song.title)
    }
}

fn same_song(artist: &str, title: &str, other_artist: &str, other_title: &str) -> bool {
    artist.to_lowercase() == other_artist.to_lowercase()
        && title.to_lowercase() == other_title.to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct SongItems {
    songs: BTreeMap<u32, SongItem>,
}

impl SongItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a song and return its id.
    ///
    /// A song that is already known keeps its id; a missing path is filled
    /// in from `song`.
    pub fn add_song(&mut self, song: &Song) -> Result<u32> {
        if let Some(item) = self.songs.values_mut().find(|item| item.matches(song)) {
            if item.path.is_none() {
                item.path = song.path.clone();
            }
            return Ok(item.id);
        }

        let id = self.assign_id()?;
        self.songs.insert(
            id,
            SongItem {
                id,
                artist: song.artist.clone(),
                title: song.title.clone(),
                path: song.path.clone(),
            },
        );
        debug!("Added song {} - {} with id {}", song.artist, song.title, id);
        Ok(id)
    }

    /// One past the highest id, or the lowest free id once the top is taken.
    fn assign_id(&self) -> Result<u32> {
        let Some(&last) = self.songs.keys().next_back() else {
            return Ok(0);
        };
        if let Some(next) = last.checked_add(1) {
            return Ok(next);
        }

        let mut next = 0u32;
        for &id in self.songs.keys() {
            if id != next {
                return Ok(next);
            }
            next = next
                .checked_add(1)
                .ok_or_else(|| Error::SongItems("no free song id left".to_string()))?;
        }
        Err(Error::SongItems("no free song id left".to_string()))
    }

    /// Insert a record with a fixed id.
    ///
    /// Both the id and the artist/title pair must be unused.
    pub fn add_song_item(&mut self, item: SongItem) -> Result<()> {
        if let Some(existing) = self.songs.get(&item.id) {
            return Err(Error::SongItems(format!(
                "id {} already used by '{} - {}'",
                item.id, existing.artist, existing.title
            )));
        }
        if let Some(existing) = self
            .songs
            .values()
            .find(|e| same_song(&e.artist, &e.title, &item.artist, &item.title))
        {
            return Err(Error::SongItems(format!(
                "song '{} - {}' listed as both id {} and id {}",
                item.artist, item.title, existing.id, item.id
            )));
        }
        self.songs.insert(item.id, item);
        Ok(())
    }

    pub fn lookup(&self, song: &Song) -> Option<u32> {
        self.songs
            .values()
            .find(|item| item.matches(song))
            .map(|item| item.id)
    }

    pub fn get(&self, id: u32) -> Option<&SongItem> {
        self.songs.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.songs.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SongItem> {
        self.songs.values()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn load(&mut self, section: &Element) -> Result<()> {
        for node in section.children_named("song") {
            let id = node
                .parse_attr::<u32>("id")?
                .ok_or_else(|| Error::SongItems("song without id".to_string()))?;
            let title = node
                .attr("title")
                .ok_or_else(|| Error::SongItems(format!("song {} without title", id)))?;
            self.add_song_item(SongItem {
                id,
                artist: node.attr("artist").unwrap_or_default().to_string(),
                title: title.to_string(),
                path: node.attr("path").map(PathBuf::from),
            })?;
        }
        Ok(())
    }

    pub fn save(&self, xml: &mut XmlWriter) -> Result<()> {
        write_start(xml, "songs", &[])?;
        for item in self.songs.values() {
            let id = item.id.to_string();
            let path = item.path.as_ref().map(|p| p.to_string_lossy());
            let mut attributes = vec![
                ("id", id.as_str()),
                ("artist", item.artist.as_str()),
                ("title", item.title.as_str()),
            ];
            if let Some(path) = &path {
                attributes.push(("path", &**path));
            }
            write_empty(xml, "song", &attributes)?;
        }
        write_end(xml, "songs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::xml::parse_document;

    #[test]
    fn test_add_song_reuses_existing_id() {
        let mut songs = SongItems::new();
        let first = songs.add_song(&Song::new("Artist", "Title")).unwrap();
        let again = songs
            .add_song(&Song::new("ARTIST", "title").with_path("/songs/a"))
            .unwrap();
        let other = songs.add_song(&Song::new("Artist", "Other")).unwrap();

        assert_eq!(first, 0);
        assert_eq!(again, first);
        assert_eq!(other, 1);
        assert_eq!(songs.len(), 2);
        assert_eq!(songs.get(first).unwrap().path, Some(PathBuf::from("/songs/a")));
    }

    #[test]
    fn test_add_song_continues_after_highest_id() {
        let mut songs = SongItems::new();
        songs
            .add_song_item(SongItem {
                id: 7,
                artist: String::new(),
                title: "X".to_string(),
                path: None,
            })
            .unwrap();
        assert_eq!(songs.add_song(&Song::new("", "Y")).unwrap(), 8);
        assert_eq!(songs.lookup(&Song::new("", "x")), Some(7));
        assert_eq!(songs.lookup(&Song::new("", "Z")), None);
    }

    #[test]
    fn test_add_song_item_rejects_duplicate_id() {
        let mut songs = SongItems::new();
        songs.add_song(&Song::new("A", "B")).unwrap();
        let err = songs
            .add_song_item(SongItem {
                id: 0,
                artist: "C".to_string(),
                title: "D".to_string(),
                path: None,
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_add_song_after_max_id_fills_gap() {
        let section = parse_document(
            r#"<songs><song id="0" title="A"/><song id="4294967295" title="X"/></songs>"#,
        )
        .unwrap();
        let mut songs = SongItems::new();
        songs.load(&section).unwrap();

        let id = songs.add_song(&Song::new("", "New")).unwrap();
        assert_eq!(id, 1);
        assert_eq!(songs.len(), 3);
        assert_eq!(songs.get(0).unwrap().title, "A");
        assert_eq!(songs.get(u32::MAX).unwrap().title, "X");
        assert_eq!(songs.get(1).unwrap().title, "New");
    }

    #[test]
    fn test_load_section() {
        let section = parse_document(
            r#"<songs>
                 <song id="7" artist="Band" title="X" path="/songs/x"/>
                 <song id="2" title="No Artist"/>
               </songs>"#,
        )
        .unwrap();

        let mut songs = SongItems::new();
        songs.load(&section).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs.get(7).unwrap().path, Some(PathBuf::from("/songs/x")));
        assert_eq!(songs.get(2).unwrap().artist, "");
    }

    #[test]
    fn test_load_rejects_invalid_songs() {
        let cases = [
            (r#"<songs><song title="X"/></songs>"#, ErrorKind::Validation),
            (r#"<songs><song id="1"/></songs>"#, ErrorKind::Validation),
            (r#"<songs><song id="-1" title="X"/></songs>"#, ErrorKind::TypeMismatch),
            (
                r#"<songs><song id="1" artist="Band" title="X"/><song id="2" artist="BAND" title="x"/></songs>"#,
                ErrorKind::Validation,
            ),
        ];
        for (content, kind) in cases {
            let section = parse_document(content).unwrap();
            let err = SongItems::new().load(&section).unwrap_err();
            assert_eq!(err.kind(), kind, "content: {content}");
        }
    }
}
