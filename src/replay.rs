//! Timed replay of a solution.
//!
//! The worker never touches the level. It only posts `Command::ReplayTick` into the
//! same channel the rest of the input goes through, the owner of the level decides
//! what a tick does. Stopping is done by dropping the handle, which closes the stop
//! channel and wakes the worker up immediately.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error};

use crate::session::Command;

#[derive(Debug)]
pub struct Replay {
    id: u64,
    paused: Arc<AtomicBool>,
    delay: Arc<AtomicU64>,
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl Replay {
    /// `delay` is in milliseconds.
    pub fn spawn(id: u64, delay: u64, commands: Sender<Command>) -> Self {
        let paused = Arc::new(AtomicBool::new(false));
        let delay = Arc::new(AtomicU64::new(delay));
        let (stop, stopped) = mpsc::channel();

        let worker = {
            let paused = Arc::clone(&paused);
            let delay = Arc::clone(&delay);
            thread::spawn(move || run(id, &paused, &delay, &stopped, &commands))
        };

        Replay {
            id,
            paused,
            delay,
            stop: Some(stop),
            worker: Some(worker),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Returns whether the replay is paused now.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn delay(&self) -> u64 {
        self.delay.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, delay: u64) {
        self.delay.store(delay, Ordering::SeqCst);
    }

    /// Blocks until the worker has exited, no ticks are sent after this returns.
    pub fn stop(self) {}
}

impl Drop for Replay {
    fn drop(&mut self) {
        self.stop.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Replay {} worker panicked", self.id);
            }
        }
    }
}

fn run(
    id: u64,
    paused: &AtomicBool,
    delay: &AtomicU64,
    stopped: &Receiver<()>,
    commands: &Sender<Command>,
) {
    debug!("Replay {} started", id);
    loop {
        let wait = Duration::from_millis(delay.load(Ordering::SeqCst));
        match stopped.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        if paused.load(Ordering::SeqCst) {
            continue;
        }
        if commands.send(Command::ReplayTick(id)).is_err() {
            break;
        }
    }
    debug!("Replay {} stopped", id);
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn ticks_carry_the_id() {
        let (commands, received) = mpsc::channel();
        let replay = Replay::spawn(7, 20, commands);
        for _ in 0..3 {
            assert_eq!(received.recv_timeout(TIMEOUT), Ok(Command::ReplayTick(7)));
        }
        replay.stop();
    }

    #[test]
    fn no_ticks_after_stop() {
        let (commands, received) = mpsc::channel();
        let replay = Replay::spawn(1, 20, commands);
        assert_eq!(received.recv_timeout(TIMEOUT), Ok(Command::ReplayTick(1)));
        replay.stop();

        // the worker held the only sender, once it's gone the channel just drains
        for command in received.try_iter() {
            assert_eq!(command, Command::ReplayTick(1));
        }
        assert!(received.recv().is_err());
    }

    #[test]
    fn pausing() {
        let (commands, received) = mpsc::channel();
        let replay = Replay::spawn(2, 20, commands);
        assert!(!replay.is_paused());
        assert!(replay.toggle_pause());
        assert!(replay.is_paused());

        // let a tick that was already on its way arrive
        thread::sleep(Duration::from_millis(100));
        received.try_iter().count();
        assert_eq!(
            received.recv_timeout(Duration::from_millis(200)),
            Err(RecvTimeoutError::Timeout)
        );

        assert!(!replay.toggle_pause());
        assert_eq!(received.recv_timeout(TIMEOUT), Ok(Command::ReplayTick(2)));
    }

    #[test]
    fn changing_speed() {
        let (commands, received) = mpsc::channel();
        let replay = Replay::spawn(3, 1000, commands);
        replay.set_delay(20);
        assert_eq!(replay.delay(), 20);
        // the first wait still uses the old delay
        assert_eq!(received.recv_timeout(TIMEOUT), Ok(Command::ReplayTick(3)));
        drop(replay);
    }
}
