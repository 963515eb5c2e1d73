//! # INVADERS Headless Runner
//!
//! Runs the full task set without a window: a scripted player drives the
//! ship while frames go to a recording (or null) backend.
//!
//! ```bash
//! invaders_headless --seconds 5 --seed 42
//! invaders_headless --config invaders.toml --null
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use invaders::core::GameStatus;
use invaders::rendering::{NullBackend, RecordingBackend};
use invaders::{Game, GameConfig, GameReport, InvadersResult, MoveDirection};

/// Pause between two scripted inputs.
const INPUT_STEP: Duration = Duration::from_millis(250);

struct Args {
    seconds: u64,
    config: Option<PathBuf>,
    seed: Option<u64>,
    null_backend: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args { seconds: 3, config: None, seed: None, null_backend: false };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seconds" => args.seconds = number(&arg, iter.next())?,
            "--seed" => args.seed = Some(number(&arg, iter.next())?),
            "--config" => {
                args.config = Some(iter.next().ok_or("--config needs a path")?.into());
            }
            "--null" => args.null_backend = true,
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

fn number(flag: &str, value: Option<String>) -> Result<u64, String> {
    value
        .as_deref()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("{flag} needs a number"))
}

fn run(args: &Args) -> InvadersResult<GameReport> {
    let mut config = GameConfig::load(args.config.as_deref())?;
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }

    let mut game = Game::new(config)?;
    if args.null_backend {
        game.start(NullBackend::default())?;
    } else {
        game.start(RecordingBackend::default())?;
    }

    let input = game.input();
    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    let script = [MoveDirection::Left, MoveDirection::Right, MoveDirection::Right, MoveDirection::Left];
    for direction in script.iter().cycle() {
        if Instant::now() >= deadline || !game.is_running() {
            break;
        }
        input.request_move(*direction);
        input.request_fire();
        if game.objects().score().snapshot().status == GameStatus::GameOver {
            input.restart();
        }
        std::thread::sleep(INPUT_STEP);
    }

    input.quit();
    game.shutdown()
}

fn print_report(report: &GameReport) {
    let score = &report.snapshot.score;
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                     INVADERS HEADLESS RUN                        ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  Uptime:        {:>8} ms", report.uptime_ms);
    println!("║  Score:         {:>8}   High: {:>8}", score.current, score.high);
    println!("║  Level:         {:>8}   Lives left: {}", score.level, score.lives_left);
    println!("║  Status:        {:?}", score.status);
    println!("║  Aliens alive:  {:>8}", report.snapshot.aliens.aliens.iter().filter(|a| a.state.active).count());
    println!("╠══════════════════════════════════════════════════════════════════╣");
    for task in &report.tasks {
        println!(
            "║  {:<14} ticks {:>7}   acted {:>7}   late {:>4}",
            task.name, task.ticks, task.acted, task.late_ticks
        );
    }
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!(
        "║  Frames:        {:>8}   late {:>4}   truncated {:>4}   {:.1} cmds/frame",
        report.frames.frames,
        report.frames.late_frames,
        report.frames.truncated_frames,
        report.frames.commands_per_frame()
    );
    println!(
        "║  Queue:         {:>8} submitted   {:>6} dropped ({:.2}%)",
        report.queue.submitted,
        report.queue.dropped,
        report.queue.drop_ratio() * 100.0
    );
    println!("╚══════════════════════════════════════════════════════════════════╝");
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("usage: invaders_headless [--seconds N] [--seed N] [--config PATH] [--null]");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
