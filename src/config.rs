use std::fmt::{self, Display, Formatter};

use crate::levels::LevelPack;

/// Milliseconds between replayed moves.
pub const DEFAULT_REPLAY_DELAY: u64 = 100;
pub const REPLAY_DELAY_STEP: u64 = 20;
pub const MIN_REPLAY_DELAY: u64 = REPLAY_DELAY_STEP;
pub const MAX_REPLAY_DELAY: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Current contents only, what the player sees, with a move counter footer.
    Plain,
    /// Standard level format, keeps targets visible under boxes and the player.
    Xsb,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Format::Plain => write!(f, "plain"),
            Format::Xsb => write!(f, "xsb"),
        }
    }
}

pub fn clamp_replay_delay(delay: u64) -> u64 {
    delay.max(MIN_REPLAY_DELAY).min(MAX_REPLAY_DELAY)
}

pub fn faster(delay: u64) -> u64 {
    clamp_replay_delay(delay.saturating_sub(REPLAY_DELAY_STEP))
}

pub fn slower(delay: u64) -> u64 {
    clamp_replay_delay(delay + REPLAY_DELAY_STEP)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub pack: LevelPack,
    /// 1-based
    pub level: usize,
    pub format: Format,
    pub replay: bool,
    pub replay_delay: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_speed_bounds() {
        assert_eq!(faster(DEFAULT_REPLAY_DELAY), 80);
        assert_eq!(slower(DEFAULT_REPLAY_DELAY), 120);
        assert_eq!(faster(MIN_REPLAY_DELAY), MIN_REPLAY_DELAY);
        assert_eq!(faster(30), MIN_REPLAY_DELAY);
        assert_eq!(slower(MAX_REPLAY_DELAY), MAX_REPLAY_DELAY);
        assert_eq!(slower(990), MAX_REPLAY_DELAY);
        assert_eq!(clamp_replay_delay(0), MIN_REPLAY_DELAY);
        assert_eq!(clamp_replay_delay(5000), MAX_REPLAY_DELAY);
    }
}
