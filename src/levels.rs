use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::errors::LoadErr;
use crate::level::Level;
use crate::LoadLevel;

/// Where levels come from. Level numbers start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelPack {
    /// One map with its solution.
    Single {
        map: PathBuf,
        solution: PathBuf,
        output: PathBuf,
    },
    /// `levelN.txt` and `solutionN.txt` files, solved levels are written to
    /// `my-solutionN.txt` in `output_dir`.
    Dir { dir: PathBuf, output_dir: PathBuf },
}

impl LevelPack {
    pub fn single<P: Into<PathBuf>>(map: P, solution: P, output: P) -> Self {
        LevelPack::Single {
            map: map.into(),
            solution: solution.into(),
            output: output.into(),
        }
    }

    pub fn dir<P: Into<PathBuf>>(dir: P, output_dir: P) -> Self {
        LevelPack::Dir {
            dir: dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Highest N with a `levelN.txt` in the directory, 0 if it can't be read.
    pub fn max_level(&self) -> usize {
        match self {
            LevelPack::Single { .. } => 1,
            LevelPack::Dir { dir, .. } => match fs::read_dir(dir) {
                Ok(entries) => entries
                    .filter_map(Result::ok)
                    .filter_map(|entry| level_number(&entry.file_name().to_string_lossy()))
                    .max()
                    .unwrap_or(0),
                Err(err) => {
                    warn!("Can't list levels in {}: {}", dir.display(), err);
                    0
                }
            },
        }
    }

    pub fn contains(&self, number: usize) -> bool {
        number >= 1 && number <= self.max_level()
    }

    pub fn map_path(&self, number: usize) -> PathBuf {
        match self {
            LevelPack::Single { map, .. } => map.clone(),
            LevelPack::Dir { dir, .. } => dir.join(format!("level{}.txt", number)),
        }
    }

    pub fn solution_path(&self, number: usize) -> PathBuf {
        match self {
            LevelPack::Single { solution, .. } => solution.clone(),
            LevelPack::Dir { dir, .. } => dir.join(format!("solution{}.txt", number)),
        }
    }

    pub fn solution_output(&self, number: usize) -> PathBuf {
        match self {
            LevelPack::Single { output, .. } => output.clone(),
            LevelPack::Dir { output_dir, .. } => {
                output_dir.join(format!("my-solution{}.txt", number))
            }
        }
    }

    pub fn load(&self, number: usize) -> Result<Level, LoadErr> {
        (self.map_path(number), self.solution_path(number)).load_level()
    }
}

impl<M: AsRef<Path>, S: AsRef<Path>> LoadLevel for (M, S) {
    fn load_level(&self) -> Result<Level, LoadErr> {
        Level::load(&self.0, &self.1)
    }
}

fn level_number(file_name: &str) -> Option<usize> {
    if !file_name.starts_with("level") || !file_name.ends_with(".txt") {
        return None;
    }
    file_name["level".len()..file_name.len() - ".txt".len()]
        .parse()
        .ok()
}
