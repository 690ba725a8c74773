use std::fmt::{self, Debug, Display, Formatter};

use crate::data::Course;

/// Just enough to invert a step: where the player went and whether it pushed a box.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub course: Course,
    pub moved_box: bool,
}

impl Move {
    pub fn new(course: Course, moved_box: bool) -> Self {
        Move { course, moved_box }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.course)
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.moved_box {
            write!(f, "{}", self.course.to_string().to_uppercase())
        } else {
            write!(f, "{}", self.course)
        }
    }
}

/// Move history, oldest first. Displays as the `u`/`r`/`d`/`l` codes of a solution file.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves(Vec<Move>);

impl Moves {
    pub fn move_cnt(&self) -> usize {
        self.0.len()
    }

    pub fn push_cnt(&self) -> usize {
        self.0.iter().filter(|m| m.moved_box).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<Move> {
        self.0.last().cloned()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }

    pub(crate) fn add(&mut self, mov: Move) {
        self.0.push(mov);
    }

    pub(crate) fn pop(&mut self) -> Option<Move> {
        self.0.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a Moves {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mov in self {
            write!(f, "{}", mov)?;
        }
        Ok(())
    }
}

impl Debug for Moves {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for mov in self {
            write!(f, "{:?}", mov)?;
        }
        Ok(())
    }
}
