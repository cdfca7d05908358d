//! Whole-game replays of the six end-to-end scenarios, each against a
//! level-1 9x9/10-mine board except where the scenario itself specifies a
//! smaller contrived layout. Indices are row-major, `initX=0, initY=0`.

use minesweeper_solver::{
    Board, BoardStatus, ConstraintView, Deducer, Game, GuessLabel, Guesser, GuessPolicy, IndexSet, IsleConfig, IsleOutcome,
    IsleSolver, LevelConfig, PlayerCounters, PlayerView, SolverConfig, StrategyConfig,
};

fn level(rows: u8, cols: u8, mines: u16) -> LevelConfig {
    LevelConfig { rows, cols, mines }
}

/// Scenario 1: trivial win. The initial flood covers every non-mine tile and
/// rule T flags the rest in a single pass, with no guessing involved.
#[test]
fn scenario_1_trivial_win_never_guesses() {
    let mines = vec![8usize, 17, 26, 35, 44, 53, 62, 71, 80, 79];
    let mut game = Game::new(level(9, 9, 10), &mines, SolverConfig::default(), 1).unwrap();

    let status = game.play().unwrap();
    assert_eq!(status, BoardStatus::Won);
    assert_eq!(game.counters().guess_clicks, 0);
    assert_eq!(game.counters().remaining_mines, 0);
}

/// Scenario 2: forced first guess. Mines cluster around the fixed origin, so
/// the mandatory first click itself detonates.
#[test]
fn scenario_2_forced_first_click_booms() {
    let mines = vec![0usize, 1, 2, 9, 10, 11, 18, 19, 20, 21];
    let mut game = Game::new(level(9, 9, 10), &mines, SolverConfig::default(), 1).unwrap();

    let status = game.play().unwrap();
    assert_eq!(status, BoardStatus::Boom);
    assert_eq!(game.counters().guess_clicks, 0);
}

/// Scenario 3: Rule D. `({a,b,c}, 1)` and `({a,b}, 1)` derive `({c}, 0)`.
#[test]
fn scenario_3_rule_d_derives_a_safe_tile() {
    let strategies = StrategyConfig::default();
    let mut constraints = ConstraintView::new();
    constraints.upsert(IndexSet::from_iter([0, 1, 2]), 1);
    constraints.upsert(IndexSet::from_iter([0, 1]), 1);

    let deducer = Deducer::new(&strategies);
    assert!(deducer.apply_difference(&mut constraints));
    assert_eq!(constraints.get(&IndexSet::from_iter([2])), Some(0));
}

/// Scenario 4: Rule R. `({a,b,c,d}, 2)` and `({b,c,d}, 1)` reduce to `a`
/// being safe.
#[test]
fn scenario_4_rule_r_derives_a_safe_tile() {
    let strategies = StrategyConfig::default();
    let mut constraints = ConstraintView::new();
    constraints.upsert(IndexSet::from_iter([0, 1, 2, 3]), 2);
    constraints.upsert(IndexSet::from_iter([1, 2, 3]), 1);

    let deducer = Deducer::new(&strategies);
    let safe = deducer.apply_reduction(&constraints).unwrap();
    assert_eq!(safe, vec![0]);
}

/// Scenario 5: isle, single solution. A 5x2 board with row 0 fully revealed
/// as the clue border and row 1 an isle of 5 unknown tiles; mines at
/// x={0,2,4} are the only placement of 3 mines consistent with the row-0
/// hints `[1,2,1,2,1]`. The solver must commit it and zero `remainingMines`.
#[test]
fn scenario_5_isle_single_solution_is_committed() {
    let mut board = Board::construct(level(2, 5, 3), &[5, 7, 9]).unwrap();
    let mut view = PlayerView::new((5, 2));
    let mut counters = PlayerCounters::new(3);
    for x in 0..5 {
        view.click_through(&mut board, (x, 0), &mut counters);
    }
    assert!(view.state_at((0, 0)).is_number());

    let config = IsleConfig::default();
    let solver = IsleSolver::new(&config, 0.2);
    let outcome = solver.solve(&board, &mut view, &mut counters);

    match outcome {
        IsleOutcome::Safe(mut safe) => {
            safe.sort_unstable();
            assert_eq!(safe, vec![6, 8]);
            assert_eq!(counters.remaining_mines, 0);
        }
        other => panic!("expected a committed unique solution, got {other:?}"),
    }
}

/// Scenario 6: Guesser min policy. A 5x3 board sandwiches a fully-unknown
/// middle row between two revealed clue rows; mines at row-1 columns 0 and 3
/// reproduce the scenario's two risk groups (`{a,b}` at 0.5, `{c,d,e}` at
/// 0.33 with the centre tile uniquely lowest), and since every board corner
/// lies in a revealed row, corner preference never preempts the policy.
#[test]
fn scenario_6_guesser_min_policy_prefers_the_lower_risk_group() {
    let mut board = Board::construct(level(3, 5, 2), &[5, 8]).unwrap();
    let mut view = PlayerView::new((5, 3));
    let mut counters = PlayerCounters::new(2);
    for x in 0..5 {
        view.click_through(&mut board, (x, 0), &mut counters);
        view.click_through(&mut board, (x, 2), &mut counters);
    }
    for x in 0..5 {
        assert!(view.state_at((x, 1)).is_unknown(), "row 1 must stay unknown");
    }

    let mut guesser = Guesser::new(GuessPolicy::Min, 0.4, 1);
    let guess = guesser.pick(&board, &view, &counters).unwrap();
    assert_eq!(guess.coords, (2, 1));
    assert_eq!(guess.label, GuessLabel::Min);
}
