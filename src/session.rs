//! Paid play sessions and the frame-paced loop driver
//!
//! A session ties one run to one account: the entry fee is debited and
//! credited to the pot up front, frames advance the simulation and keep the
//! daily-best checkpoint current, and the outcome decides what gets written
//! back. A flagged run writes nothing.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::consts::TICKS_PER_SECOND;
use crate::economy::EconomyLedger;
use crate::sim::{
    backdrop_phase, tick, Command, Obstacle, Particle, Rect, RunPhase, RunState, TickEvent,
};
use crate::store::{Account, AccountStore, ScoreLog, StoreError};
use crate::tuning::Tuning;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Clean run, final score settled and logged
    Score(u32),
    /// Rate guard tripped; nothing was written back
    Cheat,
    /// Player closed out without finishing the run
    EndDay,
    /// The entry fee couldn't be covered; no run happened
    InsufficientFunds,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no account named {0:?}")]
    UnknownAccount(String),
    #[error("balance {balance} can't cover the {fee} entry fee")]
    InsufficientFunds { balance: u64, fee: u64 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where frame commands come from
pub trait CommandSource {
    /// Command for the current frame, polled once per frame
    fn poll(&mut self) -> Option<Command>;

    /// True once no further commands will ever come. Lets the driver
    /// conclude a game-over without an explicit acknowledgement.
    fn finished(&self) -> bool {
        false
    }
}

/// Scripted input: `(frame, command)` pairs in frame order
#[derive(Debug, Default)]
pub struct Script {
    commands: VecDeque<(u64, Command)>,
    frame: u64,
}

impl Script {
    pub fn new(commands: impl IntoIterator<Item = (u64, Command)>) -> Self {
        Self { commands: commands.into_iter().collect(), frame: 0 }
    }
}

impl CommandSource for Script {
    fn poll(&mut self) -> Option<Command> {
        let due = match self.commands.front() {
            Some(&(at, _)) => at <= self.frame,
            None => false,
        };
        self.frame += 1;
        if due {
            self.commands.pop_front().map(|(_, cmd)| cmd)
        } else {
            None
        }
    }

    fn finished(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug)]
pub struct FrameSnapshot<'a> {
    pub phase: RunPhase,
    pub score: u32,
    pub player: Rect,
    pub shield_active: bool,
    pub shield_charges: u32,
    pub obstacles: &'a [Obstacle],
    pub trail: &'a [Vec2],
    pub particles: &'a [Particle],
    pub balance: u64,
    pub daily_pot: u64,
    /// Backdrop variant for the current score
    pub backdrop_phase: u32,
}

/// Sink for per-frame output
pub trait Presenter {
    fn frame(&mut self, snapshot: &FrameSnapshot<'_>, events: &[TickEvent]);
}

/// Discards every frame; for tests and headless runs
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn frame(&mut self, _snapshot: &FrameSnapshot<'_>, _events: &[TickEvent]) {}
}

/// Paces the loop to a fixed tick rate by sleeping off the slack
#[derive(Debug)]
pub struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_rate(TICKS_PER_SECOND)
    }

    /// A rate of zero is clamped to one tick per second.
    pub fn with_rate(ticks_per_second: u32) -> Self {
        let period = Duration::from_secs(1) / ticks_per_second.max(1);
        Self { period, next: Instant::now() + period }
    }

    /// Sleep until the next frame boundary. After a long stall the schedule
    /// resyncs to now instead of bursting to catch up.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next {
            thread::sleep(self.next - now);
            self.next += self.period;
        } else if now - self.next > self.period * 4 {
            self.next = now + self.period;
        } else {
            self.next += self.period;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// One account's active run
#[derive(Debug)]
pub struct Session {
    pub state: RunState,
    /// Working copy of the account; written back when the session ends
    pub account: Account,
}

impl Session {
    /// Debit the entry fee and start a run. The fee reaches the pot only
    /// after the debit has landed in the store.
    pub fn begin(
        name: &str,
        seed: u64,
        tuning: &Tuning,
        accounts: &mut dyn AccountStore,
        ledger: &mut EconomyLedger,
    ) -> Result<Self, SessionError> {
        let Some(mut account) = accounts.get(name)? else {
            return Err(SessionError::UnknownAccount(name.to_string()));
        };
        if account.balance < tuning.play_cost {
            return Err(SessionError::InsufficientFunds {
                balance: account.balance,
                fee: tuning.play_cost,
            });
        }

        account.balance -= tuning.play_cost;
        accounts.update(&account)?;
        ledger.credit_entry(tuning.play_cost);

        log::info!(
            "{} entered with seed {} (balance {}, {} shields)",
            name,
            seed,
            account.balance,
            account.shields
        );
        let state = RunState::new(seed, account.shields);
        Ok(Self { state, account })
    }

    /// Advance one frame and keep the daily-best checkpoint current. A new
    /// best is offered to the ledger the frame it is observed; a later cheat
    /// flag voids the run but not offers already made.
    pub fn frame(&mut self, cmd: Option<Command>, ledger: &mut EconomyLedger) -> Vec<TickEvent> {
        let was_running = self.state.phase == RunPhase::Running;
        let events = tick(&mut self.state, cmd);

        if was_running && !self.state.cheated && self.state.score > self.account.daily_best {
            self.account.daily_best = self.state.score;
            ledger.offer_score(&self.account.name, self.state.score);
        }
        events
    }

    pub fn snapshot<'a>(&'a self, ledger: &EconomyLedger) -> FrameSnapshot<'a> {
        FrameSnapshot {
            phase: self.state.phase,
            score: self.state.score,
            player: self.state.player.bounds(),
            shield_active: self.state.player.shield_active(),
            shield_charges: self.state.shield_charges,
            obstacles: &self.state.track.obstacles,
            trail: &self.state.player.trail,
            particles: &self.state.particles,
            balance: self.account.balance,
            daily_pot: ledger.daily_pot,
            backdrop_phase: backdrop_phase(self.state.score),
        }
    }

    /// Settle a finished run. A flagged run is dropped without a single
    /// store write; a clean one persists the account (unused shields, bests)
    /// and appends to the score log.
    pub fn finish(
        mut self,
        accounts: &mut dyn AccountStore,
        scores: &mut dyn ScoreLog,
    ) -> Result<SessionOutcome, SessionError> {
        if self.state.cheated {
            log::warn!("{} flagged at score {}, run voided", self.account.name, self.state.score);
            return Ok(SessionOutcome::Cheat);
        }

        let score = self.state.score;
        self.account.shields = self.state.shield_charges;
        if score > self.account.high_score {
            self.account.high_score = score;
        }
        accounts.update(&self.account)?;
        scores.append(&self.account.name, score)?;

        log::info!("{} finished at {}", self.account.name, score);
        Ok(SessionOutcome::Score(score))
    }

    /// Close out mid-run. The account is persisted (fee stays spent, daily
    /// best stands) but the unfinished score is neither logged nor counted
    /// toward the all-time best.
    pub fn finish_end_day(
        mut self,
        accounts: &mut dyn AccountStore,
    ) -> Result<SessionOutcome, SessionError> {
        self.account.shields = self.state.shield_charges;
        accounts.update(&self.account)?;
        log::info!("{} ended the day at score {}", self.account.name, self.state.score);
        Ok(SessionOutcome::EndDay)
    }
}

/// Runs whole sessions against a command source and presenter
#[derive(Debug)]
pub struct Driver {
    pub tuning: Tuning,
    /// `None` runs as fast as the CPU allows
    pub clock: Option<FrameClock>,
}

impl Driver {
    /// Real-time driver paced to the tick rate
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning, clock: Some(FrameClock::new()) }
    }

    /// Unpaced driver for tests and batch replays
    pub fn unpaced(tuning: Tuning) -> Self {
        Self { tuning, clock: None }
    }

    /// Run one session start to finish. A covered entry fee is the only
    /// precondition; an uncovered one is a normal outcome, not an error.
    ///
    /// The loop ends on `EndDay` from any phase, or after game over on a
    /// `Jump` acknowledgement (or the source running dry).
    pub fn run_session(
        &mut self,
        name: &str,
        seed: u64,
        ledger: &mut EconomyLedger,
        accounts: &mut dyn AccountStore,
        scores: &mut dyn ScoreLog,
        source: &mut dyn CommandSource,
        presenter: &mut dyn Presenter,
    ) -> Result<SessionOutcome, SessionError> {
        let mut session = match Session::begin(name, seed, &self.tuning, accounts, ledger) {
            Ok(session) => session,
            Err(SessionError::InsufficientFunds { balance, fee }) => {
                log::info!("{} can't cover the {} entry fee (balance {})", name, fee, balance);
                return Ok(SessionOutcome::InsufficientFunds);
            }
            Err(e) => return Err(e),
        };

        loop {
            if let Some(clock) = &mut self.clock {
                clock.wait();
            }
            let cmd = source.poll();

            if cmd == Some(Command::EndDay) {
                return session.finish_end_day(accounts);
            }
            if session.state.phase == RunPhase::GameOver
                && (cmd == Some(Command::Jump) || source.finished())
            {
                return session.finish(accounts, scores);
            }

            let events = session.frame(cmd, ledger);
            presenter.frame(&session.snapshot(ledger), &events);
        }
    }
}
