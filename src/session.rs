//! A playing session over a level pack.
//!
//! All state changes go through `Session::handle` on a single thread. Keyboard input
//! and replay ticks are both just `Command`s arriving through one channel, so a
//! replayed step and a player's move can never interleave on the level.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use log::{debug, error, info, warn};

use crate::config;
use crate::data::Course;
use crate::errors::LoadErr;
use crate::level::Level;
use crate::levels::LevelPack;
use crate::moves::Move;
use crate::replay::Replay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Course),
    Undo,
    Redo,
    Reset,
    NextLevel,
    PreviousLevel,
    ToggleReplay,
    TogglePause,
    Faster,
    Slower,
    /// Sent by the replay with the given id.
    ReplayTick(u64),
    /// No more input will come.
    InputClosed,
    Quit,
}

impl Command {
    pub fn from_char(c: char) -> Option<Command> {
        if let Some(course) = Course::from_char(c) {
            return Some(Command::Move(course));
        }
        let command = match c {
            'z' => Command::Undo,
            'y' => Command::Redo,
            'x' => Command::Reset,
            'n' => Command::NextLevel,
            'b' => Command::PreviousLevel,
            's' => Command::ToggleReplay,
            'p' => Command::TogglePause,
            '+' => Command::Faster,
            '-' => Command::Slower,
            'q' => Command::Quit,
            _ => return None,
        };
        Some(command)
    }

    /// Every recognized character is a command, whitespace is skipped,
    /// anything else is logged and dropped.
    pub fn parse_line(line: &str) -> Vec<Command> {
        line.chars()
            .filter(|c| !c.is_whitespace())
            .filter_map(|c| {
                let command = Command::from_char(c);
                if command.is_none() {
                    warn!("Unknown command '{}'", c);
                }
                command
            })
            .collect()
    }
}

/// What handling a command did.
#[derive(Debug)]
pub enum Event {
    Moved(Move),
    Blocked(Course),
    Undone(Move),
    Redone(Move),
    Reset,
    /// `saved` is where the solution was written, replays don't write one.
    Completed {
        moves: usize,
        saved: Option<PathBuf>,
    },
    LevelLoaded(usize),
    LoadFailed(usize, LoadErr),
    ReplayStarted,
    ReplayStopped,
    ReplayPaused(bool),
    ReplayDelay(u64),
    Ignored,
    Quit,
}

#[derive(Debug)]
pub struct Session {
    pack: LevelPack,
    number: usize,
    level: Level,
    redo: Vec<Course>,
    replay: Option<Replay>,
    replay_index: usize,
    replay_delay: u64,
    replay_ids: u64,
    commands: Sender<Command>,
}

impl Session {
    /// `commands` is where replay ticks get sent, it should be the channel
    /// feeding `handle`.
    pub fn new(
        pack: LevelPack,
        number: usize,
        replay_delay: u64,
        commands: Sender<Command>,
    ) -> Result<Self, LoadErr> {
        let level = pack.load(number)?;
        Ok(Session {
            pack,
            number,
            level,
            redo: Vec::new(),
            replay: None,
            replay_index: 0,
            replay_delay: config::clamp_replay_delay(replay_delay),
            replay_ids: 0,
            commands,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn max_level(&self) -> usize {
        self.pack.max_level()
    }

    pub fn has_next_level(&self) -> bool {
        self.pack.contains(self.number + 1)
    }

    pub fn is_replaying(&self) -> bool {
        self.replay.is_some()
    }

    pub fn is_replay_paused(&self) -> bool {
        self.replay.as_ref().map_or(false, Replay::is_paused)
    }

    pub fn replay_delay(&self) -> u64 {
        self.replay_delay
    }

    pub fn handle(&mut self, command: Command) -> Event {
        debug!("Handling {:?}", command);
        match command {
            Command::Quit => {
                self.stop_replay();
                Event::Quit
            }
            Command::InputClosed => Event::Ignored,
            Command::ReplayTick(id) => self.replay_step(id),
            Command::ToggleReplay => {
                if self.is_replaying() {
                    self.stop_replay();
                    Event::ReplayStopped
                } else {
                    self.start_replay()
                }
            }
            Command::TogglePause => match self.replay {
                Some(ref replay) => Event::ReplayPaused(replay.toggle_pause()),
                None => Event::Ignored,
            },
            Command::Faster | Command::Slower if !self.is_replaying() => Event::Ignored,
            Command::Faster => self.set_replay_delay(config::faster(self.replay_delay)),
            Command::Slower => self.set_replay_delay(config::slower(self.replay_delay)),
            Command::NextLevel | Command::PreviousLevel if self.is_replaying() => Event::Ignored,
            Command::NextLevel => self.load(self.number + 1),
            Command::PreviousLevel => match self.number.checked_sub(1) {
                Some(number) => self.load(number),
                None => Event::Ignored,
            },
            Command::Reset if self.level.is_completed() => Event::Ignored,
            Command::Reset => {
                self.stop_replay();
                self.level.reset();
                self.redo.clear();
                Event::Reset
            }
            Command::Move(_) | Command::Undo | Command::Redo
                if self.is_replaying() || self.level.is_completed() =>
            {
                Event::Ignored
            }
            Command::Move(course) => match self.step(course) {
                Some(mov) => {
                    self.redo.clear();
                    self.after_move(Event::Moved(mov), true)
                }
                None => Event::Blocked(course),
            },
            Command::Undo => match self.level.undo_last_move() {
                Some(mov) => {
                    self.redo.push(mov.course);
                    Event::Undone(mov)
                }
                None => Event::Ignored,
            },
            Command::Redo => {
                let course = match self.redo.pop() {
                    Some(course) => course,
                    None => return Event::Ignored,
                };
                match self.step(course) {
                    Some(mov) => self.after_move(Event::Redone(mov), true),
                    None => {
                        warn!("Can't redo {}, dropping the redo history", course);
                        self.redo.clear();
                        Event::Blocked(course)
                    }
                }
            }
        }
    }

    fn step(&mut self, course: Course) -> Option<Move> {
        if self.level.move_player(course) {
            self.level.moves().last()
        } else {
            None
        }
    }

    fn after_move(&mut self, event: Event, save: bool) -> Event {
        if self.level.is_completed() {
            self.complete(save)
        } else {
            event
        }
    }

    fn complete(&mut self, save: bool) -> Event {
        self.stop_replay();
        let moves = self.level.move_count();
        info!("Level {} completed in {} moves", self.number, moves);

        let saved = if save {
            let path = self.pack.solution_output(self.number);
            match self.level.print_solution(&path) {
                Ok(true) => Some(path),
                Ok(false) => None,
                Err(err) => {
                    error!("Can't write solution to {}: {}", path.display(), err);
                    None
                }
            }
        } else {
            None
        };
        Event::Completed { moves, saved }
    }

    fn load(&mut self, number: usize) -> Event {
        if !self.pack.contains(number) {
            return Event::Ignored;
        }
        match self.pack.load(number) {
            Ok(level) => {
                self.stop_replay();
                self.level = level;
                self.number = number;
                self.redo.clear();
                Event::LevelLoaded(number)
            }
            Err(err) => {
                warn!("Staying on level {}, can't load level {}: {}", self.number, number, err);
                Event::LoadFailed(number, err)
            }
        }
    }

    fn start_replay(&mut self) -> Event {
        if self.level.solution().is_empty() {
            info!("Level {} has no solution to replay", self.number);
            return Event::Ignored;
        }
        self.level.reset();
        self.redo.clear();
        self.replay_index = 0;
        self.replay_ids += 1;
        self.replay = Some(Replay::spawn(
            self.replay_ids,
            self.replay_delay,
            self.commands.clone(),
        ));
        info!(
            "Replaying {} moves every {} ms",
            self.level.solution().len(),
            self.replay_delay
        );
        Event::ReplayStarted
    }

    fn stop_replay(&mut self) {
        if let Some(replay) = self.replay.take() {
            replay.stop();
            info!("Replay stopped after {} moves", self.replay_index);
        }
    }

    fn set_replay_delay(&mut self, delay: u64) -> Event {
        self.replay_delay = delay;
        if let Some(ref replay) = self.replay {
            replay.set_delay(delay);
        }
        Event::ReplayDelay(delay)
    }

    fn replay_step(&mut self, id: u64) -> Event {
        match self.replay {
            Some(ref replay) if replay.id() == id => {}
            _ => {
                debug!("Stale replay tick {}", id);
                return Event::Ignored;
            }
        }

        let course = match self.level.solution().get(self.replay_index) {
            Some(&course) => course,
            None => {
                self.stop_replay();
                return Event::ReplayStopped;
            }
        };
        self.replay_index += 1;

        match self.step(course) {
            Some(mov) => self.after_move(Event::Moved(mov), false),
            None => {
                warn!(
                    "Replay step {} ({}) is not possible, stopping",
                    self.replay_index, course
                );
                self.stop_replay();
                Event::ReplayStopped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::Path;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    const SIMPLEST: &str = "#####\n#@$.#\n#####\n";

    const TWO_BOXES: &str = r"
######
#    #
#@$ .#
# $ .#
#    #
######
";

    /// level1 and level2 are fine, level3 has no player.
    fn pack_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("sokoban-engine-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("level1.txt"), SIMPLEST).unwrap();
        fs::write(dir.join("solution1.txt"), "r\n").unwrap();
        fs::write(dir.join("level2.txt"), TWO_BOXES).unwrap();
        fs::write(dir.join("solution2.txt"), "rrlldrr").unwrap();
        fs::write(dir.join("level3.txt"), "#####\n# $.#\n#####\n").unwrap();
        fs::write(dir.join("solution3.txt"), "").unwrap();
        dir
    }

    fn session(dir: &Path, number: usize) -> (Session, Receiver<Command>) {
        let (commands, received) = mpsc::channel();
        let pack = LevelPack::dir(dir, dir);
        let session = Session::new(pack, number, 20, commands).unwrap();
        (session, received)
    }

    #[test]
    fn parsing_commands() {
        assert_eq!(
            Command::parse_line("u r\tdl zyx nb sp+-q"),
            vec![
                Command::Move(Course::Up),
                Command::Move(Course::Right),
                Command::Move(Course::Down),
                Command::Move(Course::Left),
                Command::Undo,
                Command::Redo,
                Command::Reset,
                Command::NextLevel,
                Command::PreviousLevel,
                Command::ToggleReplay,
                Command::TogglePause,
                Command::Faster,
                Command::Slower,
                Command::Quit,
            ]
        );
        assert_eq!(Command::parse_line("U?r"), vec![Command::Move(Course::Right)]);
        assert!(Command::parse_line("").is_empty());
    }

    #[test]
    fn moves_undo_redo() {
        let dir = pack_dir("moves");
        let (mut session, _received) = session(&dir, 2);

        match session.handle(Command::Move(Course::Right)) {
            Event::Moved(mov) => assert_eq!(mov, Move::new(Course::Right, true)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(session.handle(Command::Move(Course::Up)), Event::Moved(_)));
        match session.handle(Command::Undo) {
            Event::Undone(mov) => assert_eq!(mov, Move::new(Course::Up, false)),
            other => panic!("unexpected {:?}", other),
        }
        match session.handle(Command::Redo) {
            Event::Redone(mov) => assert_eq!(mov, Move::new(Course::Up, false)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(session.level().moves().to_string(), "ru");

        // a new move forgets what could be redone
        assert!(matches!(session.handle(Command::Undo), Event::Undone(_)));
        assert!(matches!(session.handle(Command::Move(Course::Left)), Event::Moved(_)));
        assert!(matches!(session.handle(Command::Redo), Event::Ignored));
        assert!(matches!(
            session.handle(Command::Move(Course::Left)),
            Event::Blocked(Course::Left)
        ));

        assert!(matches!(session.handle(Command::Reset), Event::Reset));
        assert_eq!(session.level().move_count(), 0);
        assert!(matches!(session.handle(Command::Undo), Event::Ignored));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn completion_saves_the_solution() {
        let dir = pack_dir("complete");
        let (mut session, _received) = session(&dir, 1);
        assert!(session.has_next_level());

        match session.handle(Command::Move(Course::Right)) {
            Event::Completed { moves, saved } => {
                assert_eq!(moves, 1);
                assert_eq!(saved, Some(dir.join("my-solution1.txt")));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(fs::read_to_string(dir.join("my-solution1.txt")).unwrap(), "r");

        // a completed level is frozen
        assert!(matches!(session.handle(Command::Move(Course::Left)), Event::Ignored));
        assert!(matches!(session.handle(Command::Undo), Event::Ignored));
        assert!(matches!(session.handle(Command::Reset), Event::Ignored));
        assert!(session.level().is_completed());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn switching_levels() {
        let dir = pack_dir("levels");
        let (mut session, _received) = session(&dir, 1);
        assert_eq!(session.max_level(), 3);

        assert!(matches!(session.handle(Command::PreviousLevel), Event::Ignored));
        assert!(matches!(session.handle(Command::NextLevel), Event::LevelLoaded(2)));
        assert_eq!(session.number(), 2);
        assert_eq!(session.level().width(), 6);

        session.handle(Command::Move(Course::Right));
        match session.handle(Command::NextLevel) {
            Event::LoadFailed(3, LoadErr::Validation(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        // the current level is kept as it was
        assert_eq!(session.number(), 2);
        assert_eq!(session.level().move_count(), 1);
        assert!(session.has_next_level());

        assert!(matches!(session.handle(Command::PreviousLevel), Event::LevelLoaded(1)));
        assert_eq!(session.number(), 1);
        assert_eq!(session.level().move_count(), 0);

        fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(session.handle(Command::NextLevel), Event::Ignored));
    }

    #[test]
    fn replaying_the_solution() {
        let dir = pack_dir("replay");
        let (mut session, received) = session(&dir, 2);
        session.handle(Command::Move(Course::Down));

        assert!(matches!(session.handle(Command::ToggleReplay), Event::ReplayStarted));
        assert!(session.is_replaying());
        assert_eq!(session.level().move_count(), 0);

        // player input is locked out
        assert!(matches!(session.handle(Command::Move(Course::Up)), Event::Ignored));
        assert!(matches!(session.handle(Command::Undo), Event::Ignored));
        assert!(matches!(session.handle(Command::NextLevel), Event::Ignored));

        let mut steps = 0;
        loop {
            let command = received.recv_timeout(TIMEOUT).unwrap();
            match session.handle(command) {
                Event::Moved(_) => steps += 1,
                Event::Completed { moves, saved } => {
                    assert_eq!(moves, 7);
                    assert_eq!(saved, None);
                    break;
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(steps, 6);
        assert!(!session.is_replaying());
        assert_eq!(session.level().moves().to_string(), "rrlldrr");
        assert!(!dir.join("my-solution2.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn replay_controls() {
        let dir = pack_dir("controls");
        let (mut session, _received) = session(&dir, 2);

        // speed and pause only apply to a running replay
        assert!(matches!(session.handle(Command::TogglePause), Event::Ignored));
        assert!(matches!(session.handle(Command::Slower), Event::Ignored));
        assert!(matches!(session.handle(Command::Faster), Event::Ignored));
        assert_eq!(session.replay_delay(), 20);

        assert!(matches!(session.handle(Command::ToggleReplay), Event::ReplayStarted));
        assert!(matches!(session.handle(Command::Faster), Event::ReplayDelay(20)));
        assert!(matches!(session.handle(Command::Slower), Event::ReplayDelay(40)));
        assert!(matches!(session.handle(Command::TogglePause), Event::ReplayPaused(true)));
        assert!(session.is_replay_paused());
        assert!(matches!(session.handle(Command::TogglePause), Event::ReplayPaused(false)));
        assert!(matches!(session.handle(Command::Slower), Event::ReplayDelay(60)));
        assert_eq!(session.replay_delay(), 60);

        assert!(matches!(session.handle(Command::ToggleReplay), Event::ReplayStopped));
        assert!(!session.is_replaying());
        // ticks from the stopped replay are dropped
        let moves = session.level().move_count();
        assert!(matches!(session.handle(Command::ReplayTick(1)), Event::Ignored));
        assert_eq!(session.level().move_count(), moves);

        // a new replay gets a new id
        assert!(matches!(session.handle(Command::ToggleReplay), Event::ReplayStarted));
        assert_eq!(session.level().move_count(), 0);
        assert!(matches!(session.handle(Command::ReplayTick(1)), Event::Ignored));
        assert!(matches!(session.handle(Command::ReplayTick(2)), Event::Moved(_)));
        assert_eq!(session.level().move_count(), 1);

        assert!(matches!(session.handle(Command::Reset), Event::Reset));
        assert!(!session.is_replaying());
        assert!(matches!(session.handle(Command::Quit), Event::Quit));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn replay_stops_on_a_bad_step() {
        let dir = pack_dir("bad-step");
        fs::write(dir.join("solution1.txt"), "lr").unwrap();
        let (mut session, _received) = session(&dir, 1);

        assert!(matches!(session.handle(Command::ToggleReplay), Event::ReplayStarted));
        assert!(matches!(session.handle(Command::ReplayTick(1)), Event::ReplayStopped));
        assert!(!session.is_replaying());
        assert_eq!(session.level().move_count(), 0);

        // a solution that ends before the level is solved
        fs::write(dir.join("solution1.txt"), "r").unwrap();
        fs::write(dir.join("level1.txt"), "######\n#@$ .#\n######\n").unwrap();
        assert!(matches!(session.handle(Command::NextLevel), Event::LevelLoaded(2)));
        assert!(matches!(session.handle(Command::PreviousLevel), Event::LevelLoaded(1)));
        assert!(matches!(session.handle(Command::ToggleReplay), Event::ReplayStarted));
        assert!(matches!(session.handle(Command::ReplayTick(2)), Event::Moved(_)));
        assert!(matches!(session.handle(Command::ReplayTick(2)), Event::ReplayStopped));
        assert!(!session.level().is_completed());

        fs::remove_dir_all(&dir).unwrap();
    }
}
