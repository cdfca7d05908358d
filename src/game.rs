use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardStatus, LevelConfig};
use crate::deducer::{Deducer, StrategyConfig};
use crate::guesser::{GuessPolicy, Guesser};
use crate::isle::{IsleConfig, IsleOutcome, IsleSolver};
use crate::player_view::{GuessLabel, PlayerCounters, PlayerView};
use crate::types::coords_of;
use crate::Coord2;
use crate::Result;

/// Fixed initial-click coordinates. Picks the top-left corner and makes it
/// part of the public contract (see DESIGN.md's open-question resolution).
pub const INITIAL_CLICK: Coord2 = (0, 0);

/// Aggregates everything a batch run needs from configuration: the rule
/// toggles, guess policy, isle caps, and risk threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub strategies: StrategyConfig,
    pub guess: GuessPolicy,
    pub accept: f64,
    pub isle: IsleConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategies: StrategyConfig::default(),
            guess: GuessPolicy::Min,
            accept: 0.2,
            isle: IsleConfig::default(),
        }
    }
}

/// Owns one Board + PlayerView + PlayerCounters and drives them to a
/// terminal status via the deduce -> isle -> guess pipeline, advancing one
/// mutable state machine per call.
pub struct Game {
    board: Board,
    view: PlayerView,
    counters: PlayerCounters,
    config: SolverConfig,
    guesser: Guesser,
    started: bool,
}

impl Game {
    pub fn new(level: LevelConfig, mine_indices: &[usize], config: SolverConfig, seed: u64) -> Result<Self> {
        let board = Board::construct(level, mine_indices)?;
        let view = PlayerView::new(board.size());
        let counters = PlayerCounters::new(level.mines);
        let guesser = Guesser::new(config.guess, config.accept, seed);

        Ok(Self {
            board,
            view,
            counters,
            config,
            guesser,
            started: false,
        })
    }

    pub fn status(&self) -> BoardStatus {
        self.board.status()
    }

    pub fn counters(&self) -> &PlayerCounters {
        &self.counters
    }

    /// Runs the controller loop to completion. Bounded: each iteration
    /// either reveals at least one tile, flags at least one mine, or ends
    /// the game, so it cannot loop forever on a finite board.
    pub fn play(&mut self) -> Result<BoardStatus> {
        let mut outstanding_guess = GuessLabel::None;

        while matches!(self.board.status(), BoardStatus::Playing) {
            // Settled here, before any of this iteration's own actions: the
            // `while` condition just confirmed the board is still `Playing`,
            // so reaching this point means the previous guess (if any)
            // survived.
            self.settle_outstanding_guess(&mut outstanding_guess);

            if !self.started {
                self.started = true;
                self.view.click_through(&mut self.board, INITIAL_CLICK, &mut self.counters);
                self.counters.sure_clicks += 1;
                continue;
            }

            let strategies = self.config.strategies;
            let deduction = Deducer::new(&strategies).run(&self.board, &mut self.view, &mut self.counters)?;

            // Checked immediately after the deducer runs, ahead of consuming
            // `safe`: flagging the last mine can zero the counter with no
            // further safe tiles to click.
            if self.counters.remaining_mines == 0 {
                self.board.mark_won();
                break;
            }

            if !deduction.safe.is_empty() {
                self.click_all(&deduction.safe);
                self.counters.sure_clicks += 1;
                continue;
            }

            if self.config.strategies.isle {
                match IsleSolver::new(&self.config.isle, self.config.accept).solve(&self.board, &mut self.view, &mut self.counters) {
                    IsleOutcome::Safe(safe) => {
                        if !safe.is_empty() {
                            self.click_all(&safe);
                            self.counters.sure_clicks += 1;
                        }
                        if self.counters.remaining_mines == 0 {
                            self.board.mark_won();
                        }
                        continue;
                    }
                    IsleOutcome::Guess { tile, .. } => {
                        let coords = coords_of(tile, self.board.size());
                        self.view.click_through(&mut self.board, coords, &mut self.counters);
                        self.counters.guess_clicks += 1;
                        outstanding_guess = GuessLabel::Isle;
                        self.counters.guess_label = GuessLabel::Isle;
                        continue;
                    }
                    IsleOutcome::NotApplicable | IsleOutcome::NoSolution | IsleOutcome::Defer => {}
                }
            }

            let Some(guess) = self.guesser.pick(&self.board, &self.view, &self.counters) else {
                break;
            };
            self.view.click_through(&mut self.board, guess.coords, &mut self.counters);
            self.counters.guess_clicks += 1;
            outstanding_guess = guess.label;
            self.counters.guess_label = guess.label;
        }

        // Settles whatever guess was outstanding when the loop exited,
        // whether that was a boom, a win, or the guesser running dry.
        self.settle_outstanding_guess(&mut outstanding_guess);

        Ok(self.board.status())
    }

    fn click_all(&mut self, safe: &[usize]) {
        for &tile in safe {
            let coords = coords_of(tile, self.board.size());
            self.view.click_through(&mut self.board, coords, &mut self.counters);
        }
    }

    /// A guess is tallied success once it's known the board didn't go Boom
    /// because of it; failure otherwise (see DESIGN.md's deferred-tally
    /// resolution).
    fn settle_outstanding_guess(&mut self, outstanding: &mut GuessLabel) {
        if *outstanding != GuessLabel::None {
            let success = !matches!(self.board.status(), BoardStatus::Boom);
            self.counters.record_guess_outcome(*outstanding, success);
        }
        *outstanding = GuessLabel::None;
    }
}
