//! Headless demo day
//!
//! Seeds an account, buys a shield, plays one scripted run against the
//! in-memory stores, then settles the day and prints the standings. Shows
//! every seam a real front end would plug into.

use std::time::{SystemTime, UNIX_EPOCH};

use tap_dash::consts::TICKS_PER_SECOND;
use tap_dash::session::{Driver, FrameSnapshot, NullPresenter, Presenter, Script};
use tap_dash::shop::{self, PowerUp};
use tap_dash::sim::{Command, TickEvent};
use tap_dash::store::{AccountStore, MemoryAccounts, MemoryScores, ScoreLog};
use tap_dash::{EconomyLedger, Tuning};

/// Logs a status line once a second of game time
struct LogPresenter {
    frames: u64,
}

impl Presenter for LogPresenter {
    fn frame(&mut self, snapshot: &FrameSnapshot<'_>, events: &[TickEvent]) {
        self.frames += 1;
        if self.frames % TICKS_PER_SECOND as u64 == 0 {
            log::info!(
                "t={}s score={} obstacles={} pot={} backdrop={}",
                self.frames / TICKS_PER_SECOND as u64,
                snapshot.score,
                snapshot.obstacles.len(),
                snapshot.daily_pot,
                snapshot.backdrop_phase
            );
        }
        for event in events {
            log::debug!("event: {:?}", event);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let tuning = Tuning::default();
    let mut accounts = MemoryAccounts::new();
    let mut scores = MemoryScores::new();
    let mut ledger = EconomyLedger::new();

    let account = accounts.create("demo", tuning.starting_balance)?;
    log::info!("account {:?} ready with balance {}", account.name, account.balance);

    let account = shop::purchase(&mut accounts, "demo", PowerUp::Shield, &tuning)?;
    println!(
        "bought a shield: balance {} credits, {} shield(s) in the bag",
        account.balance, account.shields
    );

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);

    // Scripted play: the first obstacle spawns at tick 91 and reaches the
    // player around tick 220, the second around tick 310. Jumping ~10 ticks
    // early clears any obstacle height. Then a shield, a double jump under
    // its cover, and a last hop; the script running dry stands in for the
    // game-over acknowledgement once a later obstacle connects.
    let mut script = Script::new([
        (210, Command::Jump),
        (300, Command::Jump),
        (360, Command::ActivateShield),
        (390, Command::Jump),
        (391, Command::Jump),
        (470, Command::Jump),
    ]);

    let mut driver = Driver::unpaced(tuning.clone());
    let mut presenter = LogPresenter { frames: 0 };
    let outcome = driver.run_session(
        "demo",
        seed,
        &mut ledger,
        &mut accounts,
        &mut scores,
        &mut script,
        &mut presenter,
    )?;
    println!("run finished: {:?} (seed {})", outcome, seed);

    // A second player enters and bows out, fattening the pot
    accounts.create("rival", tuning.starting_balance)?;
    let mut rival_script = Script::new([(10, Command::EndDay)]);
    let rival_outcome = driver.run_session(
        "rival",
        seed.wrapping_add(1),
        &mut ledger,
        &mut accounts,
        &mut scores,
        &mut rival_script,
        &mut NullPresenter,
    )?;
    println!("rival: {:?}", rival_outcome);

    let report = ledger.settle(&mut accounts)?;
    match &report.winner {
        Some(w) => println!(
            "day settled: {} wins {} credits with {} (house keeps {})",
            w.name, report.payout, w.score, report.operator_cut
        ),
        None => println!("day settled: no winner, house keeps {}", report.operator_cut),
    }

    println!("top scores:");
    for (rank, entry) in scores.top_n(10)?.iter().enumerate() {
        println!("  {}. {:10} {}", rank + 1, entry.name, entry.score);
    }
    for name in ["demo", "rival"] {
        if let Some(acct) = accounts.get(name)? {
            println!("{:10} balance {:4} high score {}", acct.name, acct.balance, acct.high_score);
        }
    }

    Ok(())
}
