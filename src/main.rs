use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use beatmatch::chart::{BeatKind, ChartLoader};
use beatmatch::config::GameConfig;
use beatmatch::game::{GameSession, InputEvent, Judgment, JudgmentOutcome, SessionState, TickEvent};
use beatmatch::traits::{FeedbackSink, MockClock};
use beatmatch::util::init_logging;

/// Load a chart and run a scripted player against it, printing the feedback
/// a presenter would render.
#[derive(Parser)]
#[command(name = "beatmatch", version, about)]
struct Args {
    /// Chart file (CSV rows: timestamp[,kind[,holdDuration]]).
    chart: PathBuf,

    /// Stop after this many completed loops.
    #[arg(long, default_value_t = 3)]
    max_loops: u32,

    /// Scripted player's timing error range in seconds.
    #[arg(long, default_value_t = 0.08)]
    jitter: f64,

    /// RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Also write logs to this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Show debug logs.
    #[arg(short, long)]
    verbose: bool,
}

struct ConsoleFeedback;

impl FeedbackSink for ConsoleFeedback {
    fn on_judgment(&mut self, outcome: &JudgmentOutcome, score: u64) {
        let label = match outcome.judgment {
            Judgment::Perfect => "PERFECT",
            Judgment::Good => "GOOD",
            Judgment::Miss => "MISS",
        };
        println!("{label:<8} +{:<4} score {score}", outcome.score_delta);
    }

    fn on_bonus_changed(&mut self, active: bool) {
        if active {
            println!("== DOUBLE POINTS ==");
        } else {
            println!("== bonus over ==");
        }
    }

    fn on_loop(&mut self, speed_multiplier: f64) {
        println!("-- chart complete, looping at {speed_multiplier:.1}x --");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_dir.as_deref(), args.verbose)?;

    let chart = ChartLoader::load_or_empty(&args.chart);
    println!("{} beats loaded from {}", chart.len(), args.chart.display());

    let config = GameConfig::load();
    let mut session = GameSession::new(chart, &config);
    let mut feedback = ConsoleFeedback;
    let clock = MockClock::new();
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or_else(rand::random));

    session.begin()?;

    while session.state() == SessionState::Playing && session.loops_completed() < args.max_loops {
        let bonus_was_active = session.bonus_active();

        match session.active_chart().head().copied() {
            Some(beat) => {
                let event = match beat.kind {
                    BeatKind::Tap => InputEvent::Tap {
                        time: beat.timestamp + rng.gen_range(-args.jitter..=args.jitter),
                    },
                    BeatKind::Hold { duration } => InputEvent::Hold {
                        duration: (duration + rng.gen_range(-args.jitter..=args.jitter)).max(0.01),
                    },
                };
                clock.set_time(beat.timestamp);

                if let Some(outcome) = session.handle_event(event)? {
                    feedback.on_judgment(&outcome, session.score());
                }
            }
            None => {
                if let Some(TickEvent::Looped { speed_multiplier }) = session.tick(&clock) {
                    feedback.on_loop(speed_multiplier);
                    // Playback restarts with the rescaled chart.
                    clock.reset();
                }
            }
        }

        if session.bonus_active() != bonus_was_active {
            feedback.on_bonus_changed(session.bonus_active());
        }
    }

    match session.state() {
        SessionState::GameOver => println!("game over, final score {}", session.score()),
        _ => println!(
            "stopped after {} loops, score {} at {:.1}x",
            session.loops_completed(),
            session.score(),
            session.speed_multiplier()
        ),
    }

    Ok(())
}
