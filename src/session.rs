use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ConfigError, SessionConfig};
use crate::engine::{GameState, TerminalReason, TickResult};
use crate::grid::{Cell, GridSize};
use crate::input::Heading;
use crate::scheduler::Ticker;
use crate::score::{HighScore, ScoreStore};
use crate::snake::Snake;

/// Lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    /// Before a session; configuration may change.
    Idle,
    Running,
    /// A collision ended the session; waiting for acknowledgment.
    Terminated {
        final_score: u32,
        reason: TerminalReason,
    },
}

/// Outward lifecycle signals. Every method defaults to a no-op.
pub trait SessionObserver {
    fn on_score_change(&mut self, _score: u32) {}

    fn on_high_score_change(&mut self, _high_score: u32) {}

    fn on_game_over(&mut self, _final_score: u32, _reason: TerminalReason) {}
}

/// Read-only view handed to renderers.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub snake: &'a Snake,
    pub food: Cell,
    pub score: u32,
    pub high_score: u32,
    pub config: &'a SessionConfig,
    pub grid: GridSize,
}

/// Owns the game state, its configuration and the tick schedule for one player.
pub struct SessionController<S> {
    config: SessionConfig,
    phase: Phase,
    state: GameState,
    pending: Heading,
    high_score: HighScore<S>,
    ticker: Option<Ticker>,
    rng: StdRng,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<S: ScoreStore> SessionController<S> {
    /// Creates an idle controller with an entropy-seeded food generator.
    pub fn new(grid: GridSize, store: S) -> Self {
        Self::with_rng(grid, store, StdRng::from_entropy())
    }

    /// Creates an idle controller with deterministic food placement.
    pub fn with_seed(grid: GridSize, store: S, seed: u64) -> Self {
        Self::with_rng(grid, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: GridSize, store: S, mut rng: StdRng) -> Self {
        let state = GameState::new(grid, &mut rng);
        Self {
            config: SessionConfig::default(),
            phase: Phase::Idle,
            state,
            pending: Heading::None,
            high_score: HighScore::load(store),
            ticker: None,
            rng,
            observers: Vec::new(),
        }
    }

    /// Registers an observer for score and game-over signals.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score.value()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Heading that the next tick will apply.
    #[must_use]
    pub fn pending_heading(&self) -> Heading {
        self.pending
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replaces the board; only honoured while running. Intended for scripted scenarios.
    ///
    /// # Panics
    ///
    /// Panics when `state` is laid out on a different grid than the controller.
    pub fn set_state(&mut self, state: GameState) {
        assert_eq!(
            state.grid(),
            self.state.grid(),
            "replacement board must use the session grid"
        );
        if self.phase == Phase::Running {
            self.pending = state.snake.heading();
            self.state = state;
        }
    }

    #[must_use]
    pub fn high_score_store(&self) -> &S {
        self.high_score.store()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            snake: &self.state.snake,
            food: self.state.food,
            score: self.state.score,
            high_score: self.high_score.value(),
            config: &self.config,
            grid: self.state.grid(),
        }
    }

    /// Sets the session configuration. Refused unless idle; a refusal keeps the previous values.
    pub fn configure(&mut self, config: SessionConfig) -> Result<(), ConfigError> {
        if self.phase != Phase::Idle {
            warn!("ignoring configuration change outside the idle phase");
            return Err(ConfigError::SessionActive);
        }
        self.config = config;
        debug!("configured {config:?}");
        Ok(())
    }

    /// Validates raw settings before applying them through [`Self::configure`].
    pub fn configure_raw(
        &mut self,
        tick_interval_ms: u64,
        background: &str,
        snake: &str,
    ) -> Result<(), ConfigError> {
        let config =
            SessionConfig::parse(tick_interval_ms, background, snake).inspect_err(|error| {
                warn!("rejected configuration: {error}");
            })?;
        self.configure(config)
    }

    /// Idle -> Running with a fresh one-cell snake at the origin.
    ///
    /// Returns false when not idle.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }

        self.state = GameState::new(self.state.grid(), &mut self.rng);
        self.pending = Heading::None;
        self.phase = Phase::Running;
        self.ticker = Some(Ticker::new(self.config.tick_interval(), Instant::now()));
        info!(
            "session started: speed={} background={} snake={}",
            self.config.speed.label(),
            self.config.colors.background,
            self.config.colors.snake,
        );
        true
    }

    /// Records the heading for the next tick, last request wins.
    ///
    /// Ignored when not running or when it would reverse the snake onto itself.
    pub fn request_heading_change(&mut self, heading: Heading) -> bool {
        if self.phase != Phase::Running || !self.state.snake.heading().accepts(heading) {
            return false;
        }
        self.pending = heading;
        true
    }

    /// Runs one tick when the schedule says one is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<TickResult> {
        let due = self.ticker.as_mut().is_some_and(|ticker| ticker.due(now));
        if due { self.on_tick() } else { None }
    }

    /// Time until the next scheduled tick, or `None` when nothing is scheduled.
    #[must_use]
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.ticker.map(|ticker| ticker.remaining(now))
    }

    /// Advances the running session by one step.
    pub fn on_tick(&mut self) -> Option<TickResult> {
        if self.phase != Phase::Running {
            return None;
        }

        let previous_score = self.state.score;
        let result = self.state.tick(self.pending, &mut self.rng);

        if self.state.score != previous_score {
            let score = self.state.score;
            self.notify(|observer| observer.on_score_change(score));
            if self.high_score.record(score) {
                self.notify(|observer| observer.on_high_score_change(score));
            }
        }

        if let TickResult::Terminal {
            final_score,
            reason,
        } = result
        {
            self.phase = Phase::Terminated {
                final_score,
                reason,
            };
            self.ticker = None;
            info!("game over: score={final_score} reason={reason:?}");
            self.notify(|observer| observer.on_game_over(final_score, reason));
        }

        Some(result)
    }

    /// Terminated -> Idle, clearing everything but the high score.
    ///
    /// Returns false, changing nothing, in any other phase.
    pub fn acknowledge(&mut self) -> bool {
        if !matches!(self.phase, Phase::Terminated { .. }) {
            return false;
        }

        self.state = GameState::new(self.state.grid(), &mut self.rng);
        self.pending = Heading::None;
        self.phase = Phase::Idle;
        self.notify(|observer| observer.on_score_change(0));
        true
    }

    fn notify(&mut self, mut signal: impl FnMut(&mut dyn SessionObserver)) {
        for observer in &mut self.observers {
            signal(observer.as_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    use crate::config::{ConfigError, Speed};
    use crate::engine::{GameState, TerminalReason, TickResult};
    use crate::grid::{Cell, GridSize};
    use crate::input::Heading;
    use crate::score::MemoryScoreStore;
    use crate::snake::Snake;

    use super::{Phase, SessionController, SessionObserver};

    #[derive(Debug, Clone, Eq, PartialEq)]
    enum Signal {
        Score(u32),
        High(u32),
        Over(u32),
    }

    struct Recorder(Rc<RefCell<Vec<Signal>>>);

    impl SessionObserver for Recorder {
        fn on_score_change(&mut self, score: u32) {
            self.0.borrow_mut().push(Signal::Score(score));
        }

        fn on_high_score_change(&mut self, high_score: u32) {
            self.0.borrow_mut().push(Signal::High(high_score));
        }

        fn on_game_over(&mut self, final_score: u32, _reason: TerminalReason) {
            self.0.borrow_mut().push(Signal::Over(final_score));
        }
    }

    fn controller() -> SessionController<MemoryScoreStore> {
        SessionController::with_seed(GridSize::new(20), MemoryScoreStore::default(), 9)
    }

    #[test]
    fn start_places_single_cell_snake_at_origin() {
        let mut session = controller();
        assert!(session.start());

        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.state().snake.len(), 1);
        assert_eq!(session.state().snake.head(), Cell::new(10, 10));
        assert_eq!(session.pending_heading(), Heading::None);
        assert_eq!(session.score(), 0);
        assert!(!session.state().snake.occupies(session.state().food));
        assert!(!session.start());
    }

    #[test]
    fn ticks_before_first_heading_are_idle() {
        let mut session = controller();
        session.start();

        assert_eq!(session.on_tick(), Some(TickResult::Idle));
        assert_eq!(session.state().snake.head(), Cell::new(10, 10));
    }

    #[test]
    fn configure_only_while_idle() {
        let mut session = controller();
        session
            .configure_raw(50, "#101010", "yellow")
            .expect("valid configuration");
        assert_eq!(session.config().speed, Speed::Fast);

        session.start();
        assert_eq!(
            session.configure_raw(150, "black", "lime"),
            Err(ConfigError::SessionActive)
        );
        assert_eq!(session.config().speed, Speed::Fast);
    }

    #[test]
    fn invalid_configuration_keeps_previous_values() {
        let mut session = controller();
        let before = *session.config();

        assert!(session.configure_raw(120, "black", "lime").is_err());
        assert!(session.configure_raw(100, "blackish", "lime").is_err());
        assert_eq!(*session.config(), before);
    }

    #[test]
    fn heading_requests_ignored_outside_running() {
        let mut session = controller();
        assert!(!session.request_heading_change(Heading::Up));
        assert_eq!(session.on_tick(), None);
    }

    #[test]
    fn last_heading_request_wins() {
        let mut session = controller();
        session.start();
        session.set_state(GameState::from_parts(
            GridSize::new(20),
            Snake::from_segments(vec![Cell::new(5, 5)], Heading::Right),
            Cell::new(0, 0),
        ));

        assert!(session.request_heading_change(Heading::Up));
        assert!(session.request_heading_change(Heading::Down));
        session.on_tick();

        assert_eq!(session.state().snake.head(), Cell::new(5, 6));
    }

    #[test]
    fn eating_emits_score_and_high_score_signals() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = controller();
        session.subscribe(Box::new(Recorder(Rc::clone(&log))));
        session.start();
        session.set_state(GameState::from_parts(
            GridSize::new(20),
            Snake::from_segments(vec![Cell::new(5, 5)], Heading::Right),
            Cell::new(6, 5),
        ));

        session.on_tick();
        assert_eq!(*log.borrow(), vec![Signal::Score(1), Signal::High(1)]);
        assert_eq!(session.high_score_store().value(), Some(1));
    }

    #[test]
    fn collision_terminates_and_acknowledge_is_idempotent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = controller();
        session.subscribe(Box::new(Recorder(Rc::clone(&log))));
        session.start();
        session.set_state(GameState::from_parts(
            GridSize::new(20),
            Snake::from_segments(vec![Cell::new(0, 3)], Heading::Left),
            Cell::new(9, 9),
        ));

        let result = session.on_tick();
        assert!(result.is_some_and(TickResult::is_terminal));
        assert_eq!(
            session.phase(),
            Phase::Terminated {
                final_score: 0,
                reason: TerminalReason::WallCollision,
            }
        );
        assert_eq!(session.on_tick(), None);
        assert!(!session.request_heading_change(Heading::Up));

        assert!(session.acknowledge());
        let after_first = (session.phase(), session.state().snake.clone(), session.state().food);
        assert!(!session.acknowledge());
        assert_eq!(
            (session.phase(), session.state().snake.clone(), session.state().food),
            after_first
        );
        assert_eq!(*log.borrow(), vec![Signal::Over(0), Signal::Score(0)]);
    }

    #[test]
    #[should_panic(expected = "session grid")]
    fn replacement_board_must_share_grid() {
        let mut session = controller();
        session.start();
        session.set_state(GameState::from_parts(
            GridSize::new(8),
            Snake::from_segments(vec![Cell::new(1, 1)], Heading::Right),
            Cell::new(5, 5),
        ));
    }

    #[test]
    fn poll_follows_configured_interval() {
        let mut session = controller();
        session.configure_raw(150, "black", "lime").expect("valid");
        session.start();

        let now = Instant::now();
        let wait = session.next_tick_in(now).expect("ticker armed");
        assert!(wait <= Duration::from_millis(150));
        assert_eq!(
            session.poll(now + Duration::from_millis(150)),
            Some(TickResult::Idle)
        );
        assert_eq!(session.poll(now + Duration::from_millis(151)), None);
    }
}
