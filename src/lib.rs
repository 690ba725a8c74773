// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]
// Clippy
#![allow(unknown_lints)] // necessary because rustc doesn't know about clippy
#![warn(clippy::all)]

pub mod config;
pub mod data;
pub mod errors;
pub mod level;
pub mod level_formatter;
pub mod levels;
pub mod moves;
pub mod replay;
pub mod session;

mod fs;
mod parser;
mod vec2d;

use crate::errors::LoadErr;
use crate::level::Level;

pub trait LoadLevel {
    fn load_level(&self) -> Result<Level, LoadErr>;
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn bundled_levels() {
        let dir = Path::new("levels");
        for number in 1..=2 {
            let map = dir.join(format!("level{}.txt", number));
            let solution = dir.join(format!("solution{}.txt", number));
            let mut level = (&map, &solution).load_level().unwrap();

            let moves = level.solution().to_vec();
            for course in moves {
                assert!(level.move_player(course), "{}: {} failed", map.display(), course);
            }
            assert!(level.is_completed(), "{} is not solved", map.display());
        }
    }
}
