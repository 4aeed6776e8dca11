//! Hiscore table.
//!
//! Every recorded score is kept. The best score of a (song, player, track)
//! combination is the highest entry for it.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::players::DEFAULT_TRACK;
use crate::xml::{Element, XmlWriter, write_end, write_start, write_text_element};

/// Highest score a single performance can reach.
pub const MAX_SCORE: u32 = 10000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiscoreItem {
    pub score: u32,
    pub player_id: u32,
    pub song_id: u32,
    pub track: String,
}

impl HiscoreItem {
    fn is_for(&self, song_id: u32, player_id: u32, track: &str) -> bool {
        self.song_id == song_id && self.player_id == player_id && self.track == track
    }
}

#[derive(Debug, Clone, Default)]
pub struct Hiscore {
    items: Vec<HiscoreItem>,
}

impl Hiscore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hiscore(&mut self, score: u32, player_id: u32, song_id: u32, track: &str) -> Result<()> {
        if score > MAX_SCORE {
            return Err(Error::Hiscore(format!(
                "score {} exceeds maximum of {}",
                score, MAX_SCORE
            )));
        }
        self.items.push(HiscoreItem {
            score,
            player_id,
            song_id,
            track: track.to_string(),
        });
        Ok(())
    }

    pub fn best(&self, song_id: u32, player_id: u32, track: &str) -> Option<u32> {
        self.items
            .iter()
            .filter(|item| item.is_for(song_id, player_id, track))
            .map(|item| item.score)
            .max()
    }

    /// True if `score` would be a new best for the player on this song and track.
    pub fn reached_hiscore(&self, score: u32, song_id: u32, player_id: u32, track: &str) -> bool {
        match self.best(song_id, player_id, track) {
            Some(best) => score > best,
            None => true,
        }
    }

    /// Entries matching every given filter, best first.
    pub fn query_hiscore(
        &self,
        max: usize,
        player_id: Option<u32>,
        song_id: Option<u32>,
        track: Option<&str>,
    ) -> Vec<&HiscoreItem> {
        let mut result: Vec<&HiscoreItem> = self
            .items
            .iter()
            .filter(|item| player_id.is_none_or(|id| item.player_id == id))
            .filter(|item| song_id.is_none_or(|id| item.song_id == id))
            .filter(|item| track.is_none_or(|t| item.track == t))
            .collect();
        result.sort_by(|a, b| b.score.cmp(&a.score).then(a.player_id.cmp(&b.player_id)));
        result.truncate(max);
        result
    }

    pub fn iter(&self) -> impl Iterator<Item = &HiscoreItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn load(&mut self, section: &Element) -> Result<()> {
        for node in section.children_named("hiscore") {
            let player_id = node
                .parse_attr::<u32>("playerid")?
                .ok_or_else(|| Error::Hiscore("hiscore without playerid".to_string()))?;
            let song_id = node
                .parse_attr::<u32>("songid")?
                .ok_or_else(|| Error::Hiscore("hiscore without songid".to_string()))?;
            let track = node.attr("track").unwrap_or(DEFAULT_TRACK);
            let score = node.text.trim().parse::<u32>().map_err(|_| {
                Error::type_mismatch(format!(
                    "hiscore for song {} has non-numeric score '{}'",
                    song_id, node.text
                ))
            })?;
            self.add_hiscore(score, player_id, song_id, track)?;
        }
        Ok(())
    }

    pub fn save(&self, xml: &mut XmlWriter) -> Result<()> {
        write_start(xml, "hiscores", &[])?;
        for item in &self.items {
            let player_id = item.player_id.to_string();
            let song_id = item.song_id.to_string();
            write_text_element(
                xml,
                "hiscore",
                &[
                    ("playerid", player_id.as_str()),
                    ("songid", song_id.as_str()),
                    ("track", item.track.as_str()),
                ],
                &item.score.to_string(),
            )?;
        }
        write_end(xml, "hiscores")
    }
}
