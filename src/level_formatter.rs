use std::fmt::{self, Debug, Display, Formatter};

use crate::config::Format;
use crate::data::{Field, Occupant, BOX, BOX_ON_TARGET, FREE, PLAYER, PLAYER_ON_TARGET, TARGET, WALL};
use crate::level::Level;

#[derive(Clone, Copy)]
pub struct LevelFormatter<'a> {
    level: &'a Level,
    format: Format,
}

impl<'a> LevelFormatter<'a> {
    pub(crate) fn new(level: &'a Level, format: Format) -> Self {
        Self { level, format }
    }

    /// Rows joined by line breaks, then an empty line and the move counters
    /// centered under the grid.
    fn write_plain(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (r, row) in self.level.rows().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for field in row {
                write!(f, "{}", field.occupant().symbol())?;
            }
        }

        let curr_moves = format!("curr: {} moves", self.level.move_count());
        let best_moves = format!("best: {} moves", self.level.solution().len());
        let diff = self.level.width() as isize - best_moves.len() as isize;
        let ident = if diff > 0 { diff as usize / 2 } else { 0 };
        write!(
            f,
            "\n\n{}\n{}\n",
            indent(&curr_moves, ident),
            indent(&best_moves, ident)
        )
    }

    fn write_xsb(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.level.rows() {
            let line: String = row.iter().map(Self::xsb_symbol).collect();
            // don't print trailing empty cells to match the input level strings
            writeln!(f, "{}", line.trim_end_matches(FREE))?;
        }
        Ok(())
    }

    fn xsb_symbol(field: &Field) -> char {
        match (field.kind().is_target(), field.occupant()) {
            (_, Occupant::Wall) => WALL,
            (false, Occupant::Free) => FREE,
            (false, Occupant::Box) => BOX,
            (false, Occupant::Player) => PLAYER,
            (true, Occupant::Target) => TARGET,
            (true, Occupant::Box) => BOX_ON_TARGET,
            (true, Occupant::Player) => PLAYER_ON_TARGET,
            (false, Occupant::Target) => unreachable!("Empty target on {:?}", field.kind()),
            (true, Occupant::Free) => unreachable!("Free cell on {:?}", field.kind()),
        }
    }
}

impl<'a> Display for LevelFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.format {
            Format::Plain => self.write_plain(f),
            Format::Xsb => self.write_xsb(f),
        }
    }
}

impl<'a> Debug for LevelFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Prepends `n` spaces to every line.
pub fn indent(text: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    text.split('\n')
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}
