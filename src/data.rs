use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Sub};

pub const WALL: char = '#';
pub const TARGET: char = '.';
pub const BOX: char = '$';
pub const BOX_ON_TARGET: char = '*';
pub const PLAYER: char = '@';
pub const PLAYER_ON_TARGET: char = '+';
pub const FREE: char = ' ';

/// Column and row of a cell, signed so that stepping off the grid is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub c: i32,
    pub r: i32,
}

impl Pos {
    pub fn new(c: usize, r: usize) -> Pos {
        Pos {
            c: c as i32,
            r: r as i32,
        }
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.c, self.r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Course {
    Up,
    Right,
    Down,
    Left,
}

pub const COURSES: [Course; 4] = [Course::Up, Course::Right, Course::Down, Course::Left];

impl Course {
    /// Column and row delta of a single step.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Course::Up => (0, -1),
            Course::Right => (1, 0),
            Course::Down => (0, 1),
            Course::Left => (-1, 0),
        }
    }

    pub fn opposite(self) -> Course {
        match self {
            Course::Up => Course::Down,
            Course::Right => Course::Left,
            Course::Down => Course::Up,
            Course::Left => Course::Right,
        }
    }

    pub fn from_char(c: char) -> Option<Course> {
        match c {
            'u' => Some(Course::Up),
            'r' => Some(Course::Right),
            'd' => Some(Course::Down),
            'l' => Some(Course::Left),
            _ => None,
        }
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Course::Up => write!(f, "u"),
            Course::Right => write!(f, "r"),
            Course::Down => write!(f, "d"),
            Course::Left => write!(f, "l"),
        }
    }
}

impl Add<Course> for Pos {
    type Output = Pos;

    fn add(self, course: Course) -> Pos {
        let (dc, dr) = course.offset();
        Pos {
            c: self.c + dc,
            r: self.r + dr,
        }
    }
}

impl Sub<Course> for Pos {
    type Output = Pos;

    fn sub(self, course: Course) -> Pos {
        self + course.opposite()
    }
}

/// What a cell held when the level was loaded. Never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Wall,
    Free,
    Box,
    Target,
    BoxOnTarget,
    Player,
    PlayerOnTarget,
}

impl FieldKind {
    pub fn from_symbol(c: char) -> FieldKind {
        match c {
            WALL => FieldKind::Wall,
            TARGET => FieldKind::Target,
            BOX => FieldKind::Box,
            BOX_ON_TARGET => FieldKind::BoxOnTarget,
            PLAYER => FieldKind::Player,
            PLAYER_ON_TARGET => FieldKind::PlayerOnTarget,
            _ => FieldKind::Free,
        }
    }

    pub fn is_target(self) -> bool {
        match self {
            FieldKind::Target | FieldKind::BoxOnTarget | FieldKind::PlayerOnTarget => true,
            FieldKind::Wall | FieldKind::Free | FieldKind::Box | FieldKind::Player => false,
        }
    }

    pub fn is_player(self) -> bool {
        match self {
            FieldKind::Player | FieldKind::PlayerOnTarget => true,
            FieldKind::Wall
            | FieldKind::Free
            | FieldKind::Box
            | FieldKind::Target
            | FieldKind::BoxOnTarget => false,
        }
    }

    pub fn is_box(self) -> bool {
        match self {
            FieldKind::Box | FieldKind::BoxOnTarget => true,
            FieldKind::Wall
            | FieldKind::Free
            | FieldKind::Target
            | FieldKind::Player
            | FieldKind::PlayerOnTarget => false,
        }
    }

    /// Contents implied by the kind alone, i.e. the contents right after loading.
    pub fn initial_occupant(self) -> Occupant {
        match self {
            FieldKind::Wall => Occupant::Wall,
            FieldKind::Free => Occupant::Free,
            FieldKind::Box | FieldKind::BoxOnTarget => Occupant::Box,
            FieldKind::Target => Occupant::Target,
            FieldKind::Player | FieldKind::PlayerOnTarget => Occupant::Player,
        }
    }

    /// What is left behind when a box or the player leaves the cell.
    pub fn vacated(self) -> Occupant {
        if self.is_target() {
            Occupant::Target
        } else {
            Occupant::Free
        }
    }
}

/// Current contents of a cell. `Target` means an empty target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Wall,
    Free,
    Box,
    Target,
    Player,
}

impl Occupant {
    pub fn symbol(self) -> char {
        match self {
            Occupant::Wall => WALL,
            Occupant::Free => FREE,
            Occupant::Box => BOX,
            Occupant::Target => TARGET,
            Occupant::Player => PLAYER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pos: Pos,
    kind: FieldKind,
    pub(crate) occupant: Occupant,
}

impl Field {
    pub(crate) fn new(pos: Pos, kind: FieldKind) -> Self {
        Field {
            pos,
            kind,
            occupant: kind.initial_occupant(),
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn occupant(&self) -> Occupant {
        self.occupant
    }

    pub(crate) fn reset(&mut self) {
        self.occupant = self.kind.initial_occupant();
    }

    pub(crate) fn vacate(&mut self) {
        self.occupant = self.kind.vacated();
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.occupant.symbol())
    }
}
