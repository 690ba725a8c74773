use std::io::{self, BufRead};
use std::process;
use std::sync::mpsc::{self, Sender};
use std::thread;

use clap::{value_t, App, AppSettings, Arg, ArgGroup, ArgMatches};
use log::{debug, warn};

use sokoban_engine::config::{self, Config, Format};
use sokoban_engine::levels::LevelPack;
use sokoban_engine::session::{Command, Event, Session};

fn main() {
    env_logger::init();

    let matches = App::new("sokoban-engine")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Box pushing puzzle played over stdin: u r d l move, z undo, y redo, x reset, n/b next/previous level, s replay, p pause, +/- replay speed, q quit")
        .setting(AppSettings::ColoredHelp)
        .arg(
            Arg::with_name("map")
                .requires("solution")
                .help("level map file"),
        )
        .arg(Arg::with_name("solution").help("solution of the level"))
        .arg(
            Arg::with_name("dir")
                .short("d")
                .long("dir")
                .takes_value(true)
                .value_name("DIR")
                .help("directory with levelN.txt and solutionN.txt files"),
        )
        .group(
            ArgGroup::with_name("levels")
                .args(&["map", "dir"])
                .required(true),
        )
        .arg(
            Arg::with_name("level")
                .short("l")
                .long("level")
                .takes_value(true)
                .value_name("N")
                .requires("dir")
                .help("level to start with (default 1)"),
        )
        .arg(
            Arg::with_name("replay")
                .short("r")
                .long("replay")
                .help("replay the solution right away"),
        )
        .arg(
            Arg::with_name("speed")
                .short("s")
                .long("speed")
                .takes_value(true)
                .value_name("MS")
                .help("delay between replayed moves"),
        )
        .arg(
            Arg::with_name("xsb")
                .short("x")
                .long("xsb")
                .help("print levels in XSB format"),
        )
        .arg(
            Arg::with_name("out")
                .short("o")
                .long("out")
                .takes_value(true)
                .value_name("FILE")
                .conflicts_with("dir")
                .help("where to write your solution (default my-solution.txt)"),
        )
        .arg(
            Arg::with_name("out-dir")
                .long("out-dir")
                .takes_value(true)
                .value_name("DIR")
                .requires("dir")
                .help("where to write my-solutionN.txt files (default .)"),
        )
        .get_matches();

    let config = parse_config(&matches);
    debug!("{:?}", config);

    let (sender, commands) = mpsc::channel();
    let mut session = Session::new(
        config.pack.clone(),
        config.level,
        config.replay_delay,
        sender.clone(),
    )
    .unwrap_or_else(|err| {
        eprintln!("Can't load level {}: {}", config.level, err);
        process::exit(1);
    });
    spawn_input(sender);

    draw(&session, config.format);
    if config.replay {
        let event = session.handle(Command::ToggleReplay);
        show(&session, &event, config.format);
    }

    // without input a paused replay can never continue
    let mut input_open = true;
    while input_open || (session.is_replaying() && !session.is_replay_paused()) {
        let command = match commands.recv() {
            Ok(command) => command,
            Err(_) => break,
        };
        if command == Command::InputClosed {
            input_open = false;
            continue;
        }

        let event = session.handle(command);
        show(&session, &event, config.format);
        match event {
            Event::Quit => break,
            Event::Completed { .. } => {
                if !session.has_next_level() {
                    println!("All levels completed");
                    break;
                }
                let event = session.handle(Command::NextLevel);
                show(&session, &event, config.format);
                if let Event::LoadFailed(..) = event {
                    break;
                }
            }
            _ => {}
        }
    }
}

fn parse_config(matches: &ArgMatches<'_>) -> Config {
    let pack = match matches.value_of("dir") {
        Some(dir) => LevelPack::dir(dir, matches.value_of("out-dir").unwrap_or(".")),
        None => LevelPack::single(
            matches.value_of("map").unwrap_or_default(),
            matches.value_of("solution").unwrap_or_default(),
            matches.value_of("out").unwrap_or("my-solution.txt"),
        ),
    };
    let level = if matches.is_present("level") {
        value_t!(matches, "level", usize).unwrap_or_else(|e| e.exit())
    } else {
        1
    };
    let replay_delay = if matches.is_present("speed") {
        value_t!(matches, "speed", u64).unwrap_or_else(|e| e.exit())
    } else {
        config::DEFAULT_REPLAY_DELAY
    };
    let format = if matches.is_present("xsb") {
        Format::Xsb
    } else {
        Format::Plain
    };

    Config {
        pack,
        level,
        format,
        replay: matches.is_present("replay"),
        replay_delay: config::clamp_replay_delay(replay_delay),
    }
}

/// Reads commands from stdin until it's closed.
fn spawn_input(commands: Sender<Command>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("Can't read input: {}", err);
                    break;
                }
            };
            for command in Command::parse_line(&line) {
                if commands.send(command).is_err() {
                    return;
                }
            }
        }
        // the session may already be gone
        let _ = commands.send(Command::InputClosed);
    });
}

fn draw(session: &Session, format: Format) {
    let level = session.level();
    println!("Level {}/{}", session.number(), session.max_level());
    print!("{}", level.format(format));
    if format == Format::Xsb {
        println!(
            "Moves: {} Pushes: {}",
            level.move_count(),
            level.moves().push_cnt()
        );
    }
    println!();
}

fn show(session: &Session, event: &Event, format: Format) {
    match event {
        Event::Moved(_)
        | Event::Undone(_)
        | Event::Redone(_)
        | Event::Reset
        | Event::LevelLoaded(_) => draw(session, format),
        Event::ReplayStarted => {
            println!("Replaying {} moves", session.level().solution().len());
            draw(session, format);
        }
        Event::Completed { moves, saved } => {
            draw(session, format);
            println!("Level {} completed in {} moves", session.number(), moves);
            if let Some(path) = saved {
                println!("Solution written to {}", path.display());
            }
        }
        Event::LoadFailed(number, err) => eprintln!("Can't load level {}: {}", number, err),
        Event::Blocked(course) => debug!("Can't move {}", course),
        Event::ReplayStopped => println!("Replay stopped"),
        Event::ReplayPaused(true) => println!("Replay paused"),
        Event::ReplayPaused(false) => println!("Replay resumed"),
        Event::ReplayDelay(delay) => println!("Replay delay {} ms", delay),
        Event::Ignored | Event::Quit => {}
    }
}
