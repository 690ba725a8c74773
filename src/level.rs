use std::fmt::{self, Debug, Display, Formatter};
use std::io;
use std::path::Path;

use log::{debug, error, info, warn};

use crate::config::Format;
use crate::data::{Course, Field, FieldKind, Occupant, Pos};
use crate::errors::LoadErr;
use crate::fs;
use crate::level_formatter::LevelFormatter;
use crate::moves::{Move, Moves};
use crate::parser;
use crate::vec2d::Vec2d;

/// A level being played: the grid, where the player stands, what happened so far
/// and the known solution.
///
/// Once constructed the grid always satisfies the level invariants (one player,
/// as many boxes as targets, closed border) and none of the operations below can fail.
#[derive(Clone)]
pub struct Level {
    grid: Vec2d<Field>,
    player_pos: Pos,
    moves: Moves,
    solution: Vec<Course>,
}

impl Level {
    pub fn load<M: AsRef<Path>, S: AsRef<Path>>(
        map_path: M,
        solution_path: S,
    ) -> Result<Level, LoadErr> {
        let map_path = map_path.as_ref();
        let map = fs::read_file(map_path)?;
        // a broken map is reported even when the solution is missing too
        let (grid, player_pos) = parser::parse_map(&map).map_err(|err| {
            warn!("Rejected {}: {}", map_path.display(), err);
            err
        })?;
        let solution = parser::parse_solution(&fs::read_file(solution_path)?)?;
        let level = Level::new(grid, player_pos, solution);
        info!(
            "Loaded {} ({}x{}, {} boxes, solution {} moves)",
            map_path.display(),
            level.width(),
            level.height(),
            level.box_count(),
            level.solution.len()
        );
        Ok(level)
    }

    pub fn parse(map: &str, solution: &str) -> Result<Level, LoadErr> {
        let (grid, player_pos) = parser::parse_map(map)?;
        let solution = parser::parse_solution(solution)?;
        Ok(Level::new(grid, player_pos, solution))
    }

    fn new(grid: Vec2d<Field>, player_pos: Pos, solution: Vec<Course>) -> Level {
        Level {
            grid,
            player_pos,
            moves: Moves::default(),
            solution,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.cols()
    }

    pub fn height(&self) -> usize {
        self.grid.rows()
    }

    pub fn player_position(&self) -> Pos {
        self.player_pos
    }

    pub fn move_count(&self) -> usize {
        self.moves.move_cnt()
    }

    pub fn moves(&self) -> &Moves {
        &self.moves
    }

    pub fn solution(&self) -> &[Course] {
        &self.solution
    }

    pub fn field(&self, pos: Pos) -> Option<&Field> {
        self.grid.get(pos)
    }

    /// Row-major, top left first.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.grid.iter()
    }

    pub(crate) fn rows(&self) -> std::slice::Chunks<'_, Field> {
        self.grid.row_slices()
    }

    pub fn box_count(&self) -> usize {
        self.fields().filter(|f| f.kind().is_box()).count()
    }

    pub fn can_move(&self, course: Course) -> bool {
        let target = self.player_pos + course;
        let to = match self.grid.get(target) {
            Some(to) if to.kind() != FieldKind::Wall => to,
            _ => return false,
        };
        if to.occupant() != Occupant::Box {
            return true;
        }
        match self.grid.get(target + course) {
            Some(behind) => behind.kind() != FieldKind::Wall && behind.occupant() != Occupant::Box,
            None => false,
        }
    }

    pub fn can_move_up(&self) -> bool {
        self.can_move(Course::Up)
    }

    pub fn can_move_right(&self) -> bool {
        self.can_move(Course::Right)
    }

    pub fn can_move_down(&self) -> bool {
        self.can_move(Course::Down)
    }

    pub fn can_move_left(&self) -> bool {
        self.can_move(Course::Left)
    }

    /// Steps the player, pushing a box if there is one. Illegal moves are refused
    /// without touching anything, the return value says whether the move happened.
    pub fn move_player(&mut self, course: Course) -> bool {
        if !self.can_move(course) {
            debug!("Refused {} from {}", course, self.player_pos);
            return false;
        }

        let target = self.player_pos + course;
        let moved_box = self.grid[target].occupant == Occupant::Box;
        if moved_box {
            self.grid[target + course].occupant = Occupant::Box;
        }
        self.grid[target].occupant = Occupant::Player;
        self.grid[self.player_pos].vacate();
        self.player_pos = target;
        self.moves.add(Move::new(course, moved_box));
        true
    }

    pub fn move_up(&mut self) -> bool {
        self.move_player(Course::Up)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_player(Course::Right)
    }

    pub fn move_down(&mut self) -> bool {
        self.move_player(Course::Down)
    }

    pub fn move_left(&mut self) -> bool {
        self.move_player(Course::Left)
    }

    /// Inverts the most recent move and returns it, `None` if there is nothing to undo.
    pub fn undo_last_move(&mut self) -> Option<Move> {
        let mov = self.moves.last()?;
        let from = self.player_pos;
        let behind = from + mov.course;
        let back = from - mov.course;

        // resolve every cell first so a bad record can't leave the grid half restored
        if self.grid.get(back).is_none() || (mov.moved_box && self.grid.get(behind).is_none()) {
            error!(
                "Inconsistent history: can't undo {:?} with player at {} in {}x{} grid",
                mov,
                from,
                self.width(),
                self.height()
            );
            return None;
        }
        self.moves.pop();

        if mov.moved_box && self.grid[behind].occupant == Occupant::Box {
            self.grid[from].occupant = Occupant::Box;
            self.grid[behind].vacate();
        } else {
            self.grid[from].vacate();
        }
        self.grid[back].occupant = Occupant::Player;
        self.player_pos = back;
        Some(mov)
    }

    /// Back to the state right after loading.
    pub fn reset(&mut self) {
        for field in self.grid.iter_mut() {
            field.reset();
            if field.kind().is_player() {
                self.player_pos = field.pos();
            }
        }
        self.moves.clear();
    }

    /// Every target holds a box.
    pub fn is_completed(&self) -> bool {
        self.fields()
            .filter(|f| f.kind().is_target())
            .all(|f| f.occupant() == Occupant::Box)
    }

    /// Writes the moves made so far if they solved the level, overwriting `path`.
    /// Returns whether anything was written.
    pub fn print_solution<P: AsRef<Path>>(&self, path: P) -> io::Result<bool> {
        if !self.is_completed() {
            return Ok(false);
        }
        let path = path.as_ref();
        fs::write_file(path, &self.moves.to_string())?;
        info!(
            "Wrote {} move solution to {}",
            self.move_count(),
            path.display()
        );
        Ok(true)
    }

    pub fn plain(&self) -> LevelFormatter<'_> {
        LevelFormatter::new(self, Format::Plain)
    }

    pub fn xsb(&self) -> LevelFormatter<'_> {
        LevelFormatter::new(self, Format::Xsb)
    }

    pub fn format(&self, format: Format) -> LevelFormatter<'_> {
        LevelFormatter::new(self, format)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plain())
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.xsb())
    }
}
