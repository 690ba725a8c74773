use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;

/// Which way the border scan was going when it hit something other than a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Edge::Top => write!(f, "top"),
            Edge::Bottom => write!(f, "bottom"),
            Edge::Left => write!(f, "left"),
            Edge::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErr {
    NoPlayer,
    MultiplePlayers(usize),
    NoBoxes,
    BoxesTargets { boxes: usize, targets: usize },
    /// `index` is the column for `Top`/`Bottom` and the row for `Left`/`Right`.
    IncompleteBorder { edge: Edge, index: usize },
}

impl Display for ValidationErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ValidationErr::NoPlayer => write!(f, "No player"),
            ValidationErr::MultiplePlayers(cnt) => write!(f, "{} players, expected one", cnt),
            ValidationErr::NoBoxes => write!(f, "No boxes"),
            ValidationErr::BoxesTargets { boxes, targets } => write!(
                f,
                "Different number of boxes ({}) and targets ({})",
                boxes, targets
            ),
            ValidationErr::IncompleteBorder { edge, index } => {
                let line = match edge {
                    Edge::Top | Edge::Bottom => "column",
                    Edge::Left | Edge::Right => "row",
                };
                write!(
                    f,
                    "Incomplete border - {} {} is open from the {}",
                    line, index, edge
                )
            }
        }
    }
}

impl Error for ValidationErr {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErr {
    UnknownCourse { ch: char, index: usize },
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::UnknownCourse { ch, index } => {
                write!(f, "Unknown course {:?} at position {}", ch, index)
            }
        }
    }
}

impl Error for ParserErr {}

/// Everything that can go wrong while constructing a level.
#[derive(Debug)]
pub enum LoadErr {
    Io { path: PathBuf, err: io::Error },
    Validation(ValidationErr),
    Parse(ParserErr),
}

impl LoadErr {
    pub(crate) fn io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        LoadErr::Io {
            path: path.into(),
            err,
        }
    }
}

impl Display for LoadErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LoadErr::Io { path, err } => write!(f, "Can't read {}: {}", path.display(), err),
            LoadErr::Validation(err) => write!(f, "Invalid level: {}", err),
            LoadErr::Parse(err) => write!(f, "Invalid solution: {}", err),
        }
    }
}

impl Error for LoadErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadErr::Io { err, .. } => Some(err),
            LoadErr::Validation(err) => Some(err),
            LoadErr::Parse(err) => Some(err),
        }
    }
}

impl From<ValidationErr> for LoadErr {
    fn from(err: ValidationErr) -> Self {
        LoadErr::Validation(err)
    }
}

impl From<ParserErr> for LoadErr {
    fn from(err: ParserErr) -> Self {
        LoadErr::Parse(err)
    }
}
