use std::str::FromStr;

use log::debug;

use crate::data::{Course, Field, FieldKind, Pos};
use crate::errors::{Edge, LoadErr, ParserErr, ValidationErr};
use crate::level::Level;
use crate::vec2d::Vec2d;

impl FromStr for Level {
    type Err = LoadErr;

    /// Parses just the map, the level gets an empty solution.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::parse(s, "")
    }
}

/// Builds and validates the grid, returns it with the player's position.
pub(crate) fn parse_map(map: &str) -> Result<(Vec2d<Field>, Pos), ValidationErr> {
    let rows: Vec<Vec<Field>> = map
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(r, line)| {
            line.chars()
                .enumerate()
                .map(|(c, symbol)| Field::new(Pos::new(c, r), FieldKind::from_symbol(symbol)))
                .collect()
        })
        .collect();
    let grid = Vec2d::new(rows, |c, r| Field::new(Pos::new(c, r), FieldKind::Free));

    let player_pos = validate(&grid)?;
    debug!(
        "Parsed {}x{} map, player at {}",
        grid.cols(),
        grid.rows(),
        player_pos
    );
    Ok((grid, player_pos))
}

/// Line breaks are skipped, anything else must be one of `u`, `r`, `d`, `l`.
pub(crate) fn parse_solution(solution: &str) -> Result<Vec<Course>, ParserErr> {
    solution
        .chars()
        .enumerate()
        .filter(|&(_, ch)| ch != '\r' && ch != '\n')
        .map(|(index, ch)| Course::from_char(ch).ok_or(ParserErr::UnknownCourse { ch, index }))
        .collect()
}

pub(crate) fn validate(grid: &Vec2d<Field>) -> Result<Pos, ValidationErr> {
    let player_pos = find_player(grid)?;
    check_counts(grid)?;
    check_border(grid)?;
    Ok(player_pos)
}

pub(crate) fn find_player(grid: &Vec2d<Field>) -> Result<Pos, ValidationErr> {
    let mut players = grid.iter().filter(|field| field.kind().is_player());
    let player_pos = players.next().ok_or(ValidationErr::NoPlayer)?.pos();
    let others = players.count();
    if others > 0 {
        return Err(ValidationErr::MultiplePlayers(others + 1));
    }
    Ok(player_pos)
}

fn check_counts(grid: &Vec2d<Field>) -> Result<(), ValidationErr> {
    let boxes = grid.iter().filter(|field| field.kind().is_box()).count();
    let targets = grid.iter().filter(|field| field.kind().is_target()).count();
    if boxes == 0 {
        Err(ValidationErr::NoBoxes)
    } else if boxes != targets {
        Err(ValidationErr::BoxesTargets { boxes, targets })
    } else {
        Ok(())
    }
}

/// Scanning inwards from every edge, the first thing that isn't free must be a wall.
fn check_border(grid: &Vec2d<Field>) -> Result<(), ValidationErr> {
    let (cols, rows) = (grid.cols(), grid.rows());
    let kind = |c: usize, r: usize| grid[Pos::new(c, r)].kind();

    for c in 0..cols {
        closed_from(Edge::Top, c, (0..rows).map(|r| kind(c, r)))?;
        closed_from(Edge::Bottom, c, (0..rows).rev().map(|r| kind(c, r)))?;
    }
    for r in 0..rows {
        closed_from(Edge::Left, r, (0..cols).map(|c| kind(c, r)))?;
        closed_from(Edge::Right, r, (0..cols).rev().map(|c| kind(c, r)))?;
    }
    Ok(())
}

fn closed_from(
    edge: Edge,
    index: usize,
    mut scan: impl Iterator<Item = FieldKind>,
) -> Result<(), ValidationErr> {
    match scan.find(|&kind| kind != FieldKind::Free) {
        None | Some(FieldKind::Wall) => Ok(()),
        Some(_) => Err(ValidationErr::IncompleteBorder { edge, index }),
    }
}
