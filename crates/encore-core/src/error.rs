use strum::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid player data: {0}")]
    Players(String),

    #[error("Invalid hiscore data: {0}")]
    Hiscore(String),

    #[error("Invalid song data: {0}")]
    SongItems(String),

    #[error("Song not in database: {artist} - {title}")]
    UnknownSong { artist: String, title: String },

    #[error("No current player selected")]
    NoCurrentPlayer,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    #[strum(serialize = "io")]
    Io,
    #[strum(serialize = "parse")]
    Parse,
    #[strum(serialize = "type-mismatch")]
    TypeMismatch,
    #[strum(serialize = "validation")]
    Validation,
    #[strum(serialize = "resolution")]
    Resolution,
}

impl Error {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Xml(_) | Error::XmlAttribute(_) | Error::Malformed(_) => ErrorKind::Parse,
            Error::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Error::Players(_) | Error::Hiscore(_) | Error::SongItems(_) => ErrorKind::Validation,
            Error::UnknownSong { .. } | Error::NoCurrentPlayer => ErrorKind::Resolution,
        }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
