use rand::Rng;
use rtsim_core::{Screen, TrialResult};
use rtsim_render::{Button, ButtonAction, Scene, buttons_for, hit_test};
use rtsim_timing::Timer;
use rtsim_trial::ReactionTest;

/// Window-independent half of the app: translates raw input into core
/// commands and keeps the per-screen button layout in sync.
pub struct Session<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub test: ReactionTest<T, R>,
    screen: Screen,
    buttons: Vec<Button>,
    cursor: Option<(f32, f32)>,
    pending_response: Option<u64>,
}

impl<T, R> Session<T, R>
where
    T: Timer<Timestamp = u64>,
    R: Rng,
{
    pub fn new(test: ReactionTest<T, R>) -> Self {
        let screen = Screen::from_phase(test.current_phase());
        let config = test.config();
        let buttons = buttons_for(screen, config.arena_width, config.arena_height);
        Self {
            test,
            screen,
            buttons,
            cursor: None,
            pending_response: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn set_cursor(&mut self, cursor: Option<(f32, f32)>) {
        self.cursor = cursor;
    }

    /// Queues a response key press stamped with its arrival time. Presses
    /// outside the simulation screen are dropped; within one tick only the
    /// earliest press is kept.
    pub fn response_signal(&mut self, at: u64) {
        if self.screen == Screen::Simulation {
            self.pending_response.get_or_insert(at);
        }
    }

    /// Left click at the current cursor. Arming is handled here; the caller
    /// only has to act on `Exit`.
    pub fn click(&mut self) -> Option<ButtonAction> {
        let (x, y) = self.cursor?;
        let action = hit_test(&self.buttons, x, y)?;
        match action {
            ButtonAction::Start | ButtonAction::NewTest => {
                self.test.arm();
                self.pending_response = None;
                self.sync_screen();
            }
            ButtonAction::Exit => {}
        }
        Some(action)
    }

    /// One simulation tick: drain input, then time and motion. Returns the
    /// trial result on the tick the trial resolves.
    pub fn tick(&mut self, now: u64) -> Option<TrialResult> {
        if let Some(at) = self.pending_response.take() {
            self.test.respond_at(at);
        }
        self.test.step_at(now);

        let was = self.screen;
        self.sync_screen();
        if was == Screen::Simulation && self.screen == Screen::Result {
            self.test.result()
        } else {
            None
        }
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene {
            screen: self.screen,
            player: self.test.player_rect(),
            opponent: self.test.opponent_rect(),
            outcome: self.test.outcome(),
            buttons: &self.buttons,
            cursor: self.cursor,
        }
    }

    fn sync_screen(&mut self) {
        let screen = Screen::from_phase(self.test.current_phase());
        if screen != self.screen {
            log::debug!("screen {:?} -> {:?}", self.screen, screen);
            self.screen = screen;
            let config = self.test.config();
            self.buttons = buttons_for(screen, config.arena_width, config.arena_height);
        }
    }
}
