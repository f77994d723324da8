use rand::SeedableRng;
use rand::rngs::StdRng;
use torus_snake::apple::Apple;
use torus_snake::config::{GameConfig, GrowthTiming, Rgb};
use torus_snake::game::{GameContext, GameLoop, GameState, GameStatus, TickOutcome};
use torus_snake::grid::Cell;
use torus_snake::input::{Direction, GameInput, ScriptedInput};
use torus_snake::renderer::{DrawCommand, RecordingRenderer};
use torus_snake::snake::Snake;

fn context(width: u16, height: u16) -> GameContext {
    GameContext::from_config(&GameConfig {
        width,
        height,
        cell_size: 1,
        tick_rate: 1000,
        ..GameConfig::default()
    })
    .expect("test config should be valid")
}

fn segments(state: &GameState) -> Vec<Cell> {
    state.snake.segments().copied().collect()
}

#[test]
fn eating_from_the_start_position_grows_immediately() {
    let mut state = GameState::new_with_seed(&context(8, 8), 42);
    state.snake = Snake::new(Cell::new(4, 4), Direction::Right);
    state.apple = Some(Apple::new(Cell::new(5, 4), Rgb::RED));

    assert_eq!(state.tick(), TickOutcome::Ate);

    assert_eq!(segments(&state), vec![Cell::new(5, 4), Cell::new(4, 4)]);
    let apple = state.apple.expect("apple should be replaced");
    assert_ne!(apple.position, Cell::new(5, 4));
    assert_ne!(apple.position, Cell::new(4, 4));
}

#[test]
fn head_wraps_from_the_right_edge() {
    let mut state = GameState::new_with_seed(&context(10, 6), 7);
    state.snake = Snake::new(Cell::new(9, 2), Direction::Right);
    state.apple = Some(Apple::new(Cell::new(5, 5), Rgb::RED));

    assert_eq!(state.tick(), TickOutcome::Moved);
    assert_eq!(state.snake.head(), Cell::new(0, 2));
}

#[test]
fn straight_move_without_collision() {
    let mut state = GameState::new_with_seed(&context(10, 10), 8);
    state.snake = Snake::from_segments(
        vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)],
        Direction::Right,
    );
    state.apple = Some(Apple::new(Cell::new(0, 0), Rgb::RED));

    assert_eq!(state.tick(), TickOutcome::Moved);
    assert_eq!(
        segments(&state),
        vec![Cell::new(6, 5), Cell::new(5, 5), Cell::new(4, 5)]
    );
}

#[test]
fn reversal_request_is_ignored_for_a_long_snake() {
    let mut state = GameState::new_with_seed(&context(10, 10), 9);
    state.snake = Snake::from_segments(
        vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)],
        Direction::Right,
    );
    state.apple = Some(Apple::new(Cell::new(0, 0), Rgb::RED));

    state.apply_input(GameInput::Direction(Direction::Left));
    state.tick();

    assert_eq!(state.snake.direction(), Direction::Right);
    assert_eq!(state.snake.pending_direction(), None);
    assert_eq!(state.snake.head(), Cell::new(6, 5));
    assert_eq!(state.snake.len(), 3);
}

#[test]
fn growth_timing_differs_by_exactly_one_tick() {
    let lengths = |growth: GrowthTiming| {
        let ctx = GameContext {
            growth,
            ..context(8, 8)
        };
        let mut state = GameState::new_with_seed(&ctx, 3);
        state.snake = Snake::new(Cell::new(4, 4), Direction::Right);
        state.apple = Some(Apple::new(Cell::new(5, 4), Rgb::RED));

        let mut lengths = Vec::new();
        for _ in 0..2 {
            state.tick();
            lengths.push(state.snake.len());
            // Keep the replacement apple away from the next few moves.
            state.apple = Some(Apple::new(Cell::new(0, 7), Rgb::RED));
        }
        lengths
    };

    assert_eq!(lengths(GrowthTiming::Immediate), vec![2, 2]);
    assert_eq!(lengths(GrowthTiming::Deferred), vec![1, 2]);
}

#[test]
fn long_random_play_keeps_every_invariant() {
    let ctx = context(6, 5);
    let mut state = GameState::new_with_seed(&ctx, 2024);
    let turns = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    for step in 0..2_000_usize {
        if step % 3 == 0 {
            state.apply_input(GameInput::Direction(turns[(step / 3) % turns.len()]));
        }
        let before = state.snake.len();
        let outcome = state.tick();

        let cells = segments(&state);
        assert!(cells.iter().all(|cell| ctx.grid.contains(*cell)));
        let unique: std::collections::HashSet<Cell> = cells.iter().copied().collect();
        assert_eq!(unique.len(), cells.len(), "duplicate cell after tick {step}");

        match outcome {
            TickOutcome::Moved => assert_eq!(state.snake.len(), before),
            TickOutcome::Ate | TickOutcome::BoardFull => {
                assert_eq!(state.snake.len(), before + 1);
            }
            TickOutcome::SelfCollision { .. } => {
                assert_eq!(cells, vec![ctx.grid.center()]);
            }
            TickOutcome::Frozen => assert_eq!(state.status, GameStatus::BoardFull),
        }

        if let Some(apple) = state.apple {
            assert!(!state.snake.occupies(apple.position));
        }
    }
}

#[test]
fn same_seed_replays_the_same_game() {
    let ctx = context(9, 7);
    let script = || {
        ScriptedInput::new(
            [
                Direction::Up,
                Direction::Left,
                Direction::Down,
                Direction::Left,
            ]
            .into_iter()
            .cycle()
            .take(60)
            .map(|direction| vec![GameInput::Direction(direction)]),
        )
    };

    let mut first = GameLoop::new(&ctx, StdRng::seed_from_u64(77));
    let mut second = GameLoop::new(&ctx, StdRng::seed_from_u64(77));
    let first_summary = first
        .run(&mut script(), &mut RecordingRenderer::default())
        .expect("scripted run never fails");
    let second_summary = second
        .run(&mut script(), &mut RecordingRenderer::default())
        .expect("scripted run never fails");

    assert_eq!(first_summary, second_summary);
    assert_eq!(first.state().snake, second.state().snake);
    assert_eq!(first.state().apple, second.state().apple);
}

#[test]
fn quit_stops_before_the_tick_it_arrives_in() {
    let ctx = context(8, 8);
    let mut game = GameLoop::new(&ctx, StdRng::seed_from_u64(1));
    let mut input = ScriptedInput::new([
        vec![],
        vec![GameInput::Direction(Direction::Up), GameInput::Quit],
    ]);
    let mut renderer = RecordingRenderer::default();

    let summary = game
        .run(&mut input, &mut renderer)
        .expect("scripted run never fails");

    assert_eq!(summary.ticks, 1);
    assert_eq!(game.state().tick_count, 1);
    // Initial frame plus one frame for the single tick.
    assert_eq!(renderer.presented, 2);
    let clears = renderer
        .commands
        .iter()
        .filter(|command| matches!(command, DrawCommand::Clear { .. }))
        .count();
    assert_eq!(clears, 2);
}

#[test]
fn prepared_state_runs_through_the_loop() {
    let ctx = context(10, 6);
    let mut state = GameState::new_with_seed(&ctx, 12);
    state.snake = Snake::new(Cell::new(9, 2), Direction::Right);
    state.apple = Some(Apple::new(Cell::new(9, 3), Rgb::RED));
    let mut game = GameLoop::with_state(state);
    let mut input = ScriptedInput::new([vec![GameInput::Direction(Direction::Down)], vec![]]);
    let mut renderer = RecordingRenderer::default();

    let summary = game
        .run(&mut input, &mut renderer)
        .expect("scripted run never fails");

    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.apples_eaten, 1);
    assert_eq!(summary.longest, 2);
    assert_eq!(game.state().snake.direction(), Direction::Down);
    assert!(game.state().snake.occupies(Cell::new(9, 3)));
    assert_eq!(game.state().context(), &ctx);
}
