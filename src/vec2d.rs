use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::data::Pos;

/// Row-major grid stored in a single vector.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Vec2d<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Vec2d<T> {
    /// Pads shorter rows with `fill`.
    pub(crate) fn new(grid: Vec<Vec<T>>, fill: impl Fn(usize, usize) -> T) -> Self {
        let rows = grid.len();
        let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut data = Vec::with_capacity(rows * cols);
        for (r, row) in grid.into_iter().enumerate() {
            let len = row.len();
            data.extend(row);
            for c in len..cols {
                data.push(fill(c, r));
            }
        }
        Vec2d { data, rows, cols }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    fn index_of(&self, pos: Pos) -> Option<usize> {
        if pos.r < 0 || pos.c < 0 {
            return None;
        }
        let (r, c) = (pos.r as usize, pos.c as usize);
        if r >= self.rows || c >= self.cols {
            return None;
        }
        Some(r * self.cols + c)
    }

    pub(crate) fn get(&self, pos: Pos) -> Option<&T> {
        self.index_of(pos).map(move |i| &self.data[i])
    }

    pub(crate) fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
        match self.index_of(pos) {
            Some(i) => Some(&mut self.data[i]),
            None => None,
        }
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub(crate) fn row_slices(&self) -> std::slice::Chunks<'_, T> {
        // chunks(0) panics and an empty grid has no rows anyway
        self.data.chunks(self.cols.max(1))
    }
}

impl<T> Index<Pos> for Vec2d<T> {
    type Output = T;

    fn index(&self, pos: Pos) -> &Self::Output {
        match self.get(pos) {
            Some(cell) => cell,
            None => panic!("{} out of bounds of {}x{} grid", pos, self.cols, self.rows),
        }
    }
}

impl<T> IndexMut<Pos> for Vec2d<T> {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        let (cols, rows) = (self.cols, self.rows);
        match self.get_mut(pos) {
            Some(cell) => cell,
            None => panic!("{} out of bounds of {}x{} grid", pos, cols, rows),
        }
    }
}

impl<T: Display> Display for Vec2d<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.row_slices() {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: Display> Debug for Vec2d<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_and_bounds() {
        let grid = Vec2d::new(vec![vec![1, 2, 3], vec![4]], |_, _| 0);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.to_string(), "123\n400\n");

        assert_eq!(grid.get(Pos::new(0, 1)), Some(&4));
        assert_eq!(grid.get(Pos::new(2, 1)), Some(&0));
        assert_eq!(grid.get(Pos::new(3, 0)), None);
        assert_eq!(grid.get(Pos::new(0, 2)), None);
        assert_eq!(grid.get(Pos { c: -1, r: 0 }), None);
        assert_eq!(grid.get(Pos { c: 0, r: -1 }), None);
    }

    #[test]
    fn mutation() {
        let mut grid = Vec2d::new(vec![vec!['a', 'b'], vec!['c', 'd']], |_, _| ' ');
        grid[Pos::new(1, 0)] = 'x';
        *grid.get_mut(Pos::new(0, 1)).unwrap() = 'y';
        assert!(grid.get_mut(Pos::new(2, 1)).is_none());
        assert_eq!(grid.to_string(), "ax\nyd\n");
    }

    #[test]
    #[should_panic]
    fn index_out_of_bounds() {
        let grid = Vec2d::new(vec![vec![1]], |_, _| 0);
        let _cell = grid[Pos::new(1, 0)];
    }

    #[test]
    fn empty() {
        let grid: Vec2d<u8> = Vec2d::new(Vec::new(), |_, _| 0);
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.cols(), 0);
        assert_eq!(grid.row_slices().count(), 0);
        assert_eq!(grid.get(Pos::new(0, 0)), None);
    }
}
