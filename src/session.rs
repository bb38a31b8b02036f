//! Host driver
//!
//! A [`Session`] owns one game together with its input router, tick scheduler
//! and deferred-action slot, and serializes everything that can touch the
//! game: key presses, due ticks and the AI reply. The [`Cabinet`] is the hub
//! around it: catalog, identity, and at most one active session.

use crate::catalog::{CATALOG, CatalogEntry, GameId};
use crate::config::GameConfig;
use crate::error::UnknownGame;
use crate::games::{Game, Snapshot};
use crate::identity::IdentitySlot;
use crate::sim::{
    Command, Deferred, InputRouter, InputTiming, KeyOutcome, Lifecycle, MAX_CATCHUP_TICKS, TickScheduler, TickToken,
};

pub struct Session {
    game: Box<dyn Game>,
    router: InputRouter,
    scheduler: TickScheduler,
    deferred: Deferred,
    now_ms: u64,
}

impl Session {
    pub fn new(game: Box<dyn Game>, now_ms: u64) -> Self {
        let router = InputRouter::new(game.key_profile());
        Self {
            game,
            router,
            scheduler: TickScheduler::new(),
            deferred: Deferred::new(),
            now_ms,
        }
    }

    pub fn id(&self) -> GameId {
        self.game.id()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.game.lifecycle()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot()
    }

    /// Idle -> Running and arm the clock. Returns false if the game was not Idle.
    pub fn start(&mut self) -> bool {
        if self.game.lifecycle() != Lifecycle::Idle {
            return false;
        }
        self.game.start();
        self.router.clear();
        if let Some(interval) = self.game.tick_interval_ms() {
            self.scheduler.start(interval, self.now_ms);
        }
        self.settle(self.now_ms);
        log::info!("{} started", self.game.id());
        true
    }

    /// Back to Idle. Pending ticks and the AI reply are cancelled.
    pub fn reset(&mut self) {
        self.scheduler.stop();
        self.deferred.cancel();
        self.router.clear();
        self.game.reset();
    }

    /// Reset then start
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Handle a raw `KeyboardEvent.key`
    pub fn key_down(&mut self, key: &str) -> KeyOutcome {
        match Command::from_key(key) {
            Some(cmd) => self.command(cmd),
            None => KeyOutcome::Ignored,
        }
    }

    /// Handle a decoded command (keyboard or pointer)
    pub fn command(&mut self, cmd: Command) -> KeyOutcome {
        let lifecycle = self.game.lifecycle();
        match cmd {
            Command::Start if lifecycle == Lifecycle::Idle => {
                self.start();
                return consumed(cmd);
            }
            Command::Restart if lifecycle == Lifecycle::GameOver => {
                self.restart();
                return consumed(cmd);
            }
            Command::Start | Command::Restart => return KeyOutcome::Ignored,
            _ if lifecycle != Lifecycle::Running => return KeyOutcome::Ignored,
            _ => {}
        }

        let outcome = self.router.on_command(cmd);
        if matches!(outcome, KeyOutcome::Consumed { .. }) && self.game.input_timing() == InputTiming::Immediate {
            if let Some(cmd) = self.router.take() {
                self.game.handle_input(cmd);
                self.settle(self.now_ms);
            }
        }
        outcome
    }

    /// Move the clock forward and run everything that came due.
    /// Returns how many ticks ran.
    pub fn advance_to(&mut self, now_ms: u64) -> u32 {
        self.now_ms = self.now_ms.max(now_ms);
        let now_ms = self.now_ms;

        let mut ticks = 0;
        while ticks < MAX_CATCHUP_TICKS {
            let budget = (MAX_CATCHUP_TICKS - ticks) as usize;
            let due: Vec<TickToken> = std::iter::from_fn(|| self.scheduler.poll(now_ms)).take(budget).collect();
            if due.is_empty() {
                break;
            }
            // a tick that ends the game or changes the interval kills the rest of the batch
            for token in due {
                if !self.scheduler.is_live(&token) {
                    log::debug!("dropping stale tick due at {}ms", token.due_ms);
                    continue;
                }
                self.tick_once(token.due_ms);
                ticks += 1;
            }
        }
        if ticks >= MAX_CATCHUP_TICKS {
            self.scheduler.resync(now_ms);
        }

        if self.deferred.poll(now_ms).is_some() {
            self.game.run_deferred();
            self.settle(now_ms);
        }
        ticks
    }

    fn tick_once(&mut self, at_ms: u64) {
        if self.game.input_timing() == InputTiming::PerTick {
            if let Some(cmd) = self.router.take() {
                self.game.handle_input(cmd);
            }
        }
        self.game.tick();
        self.settle(at_ms);
    }

    /// Bring the clock, the deferred slot and the router in line with the game
    fn settle(&mut self, at_ms: u64) {
        self.router.guard_reversal(self.game.heading());

        if !self.game.lifecycle().is_running() {
            if self.scheduler.is_running() || self.deferred.is_armed() {
                log::debug!("{} left Running, stopping clock", self.game.id());
            }
            self.scheduler.stop();
            self.deferred.cancel();
            self.router.clear();
            return;
        }

        if let Some(interval) = self.game.tick_interval_ms() {
            self.scheduler.retune(interval, at_ms);
        }
        match self.game.deferred_delay_ms() {
            Some(delay) if !self.deferred.is_armed() => self.deferred.arm(delay, at_ms),
            None if self.deferred.is_armed() => self.deferred.cancel(),
            _ => {}
        }
    }
}

fn consumed(command: Command) -> KeyOutcome {
    KeyOutcome::Consumed {
        command,
        prevent_default: false,
    }
}

/// The hub: catalog, identity and the active game
pub struct Cabinet {
    config: GameConfig,
    identity: IdentitySlot,
    active: Option<Session>,
    now_ms: u64,
}

impl Cabinet {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            identity: IdentitySlot::new(),
            active: None,
            now_ms: 0,
        }
    }

    pub fn catalog(&self) -> &'static [CatalogEntry] {
        &CATALOG
    }

    pub fn identity(&self) -> &IdentitySlot {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut IdentitySlot {
        &mut self.identity
    }

    pub fn active(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut Session> {
        self.active.as_mut()
    }

    /// Open a game. Whatever was open before is reset and dropped first.
    pub fn select(&mut self, id: GameId) -> &mut Session {
        self.close();
        let seed = self.config.seed.unwrap_or_else(rand::random);
        log::info!("selected {} ({})", id.entry().name, id);
        let session = Session::new(id.launch(&self.config, seed), self.now_ms);
        self.active.insert(session)
    }

    pub fn select_by_name(&mut self, id: &str) -> Result<&mut Session, UnknownGame> {
        let id: GameId = id.parse()?;
        Ok(self.select(id))
    }

    /// Leave the game and return to the selection screen
    pub fn back_to_catalog(&mut self) {
        if self.close() {
            log::info!("back to catalog");
        }
    }

    fn close(&mut self) -> bool {
        match self.active.take() {
            Some(mut session) => {
                session.reset();
                true
            }
            None => false,
        }
    }

    pub fn key_down(&mut self, key: &str) -> KeyOutcome {
        match self.active.as_mut() {
            Some(session) => session.key_down(key),
            None => KeyOutcome::Ignored,
        }
    }

    pub fn advance_to(&mut self, now_ms: u64) -> u32 {
        self.now_ms = self.now_ms.max(now_ms);
        match self.active.as_mut() {
            Some(session) => session.advance_to(self.now_ms),
            None => 0,
        }
    }

    /// Snapshot of the active game, tagged with the signed-in player
    pub fn snapshot(&self) -> Option<Snapshot> {
        let mut snapshot = self.active.as_ref()?.snapshot();
        snapshot.player = self.identity.username().map(str::to_string);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::View;
    use crate::games::snake::GridPos;
    use crate::identity::ProfileForm;
    use crate::sim::{Mark, Outcome};

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        }
    }

    fn session(id: GameId) -> Session {
        Session::new(id.launch(&config(), 3), 0)
    }

    fn snake_head(session: &Session) -> GridPos {
        match session.snapshot().view {
            View::Snake(view) => view.body[0],
            other => panic!("wrong view: {other:?}"),
        }
    }

    fn board(session: &Session) -> [Option<Mark>; 9] {
        match session.snapshot().view {
            View::TicTacToe(view) => view.cells,
            other => panic!("wrong view: {other:?}"),
        }
    }

    #[test]
    fn test_keys_ignored_until_started() {
        let mut s = session(GameId::Snake);
        assert_eq!(s.key_down("ArrowUp"), KeyOutcome::Ignored);
        assert_eq!(s.advance_to(10_000), 0);

        assert!(matches!(s.key_down("Enter"), KeyOutcome::Consumed { .. }));
        assert_eq!(s.lifecycle(), Lifecycle::Running);
        assert!(s.key_down("ArrowUp").prevent_default());
        assert_eq!(s.key_down("Enter"), KeyOutcome::Ignored);
    }

    #[test]
    fn test_ticks_follow_interval() {
        let mut s = session(GameId::Tetris);
        s.start();
        assert_eq!(s.advance_to(999), 0);
        assert_eq!(s.advance_to(1000), 1);
        assert_eq!(s.advance_to(2500), 1);
        assert_eq!(s.advance_to(3000), 1);
    }

    #[test]
    fn test_catch_up_is_bounded() {
        let mut s = session(GameId::Tetris);
        s.start();
        assert_eq!(s.advance_to(100_000), MAX_CATCHUP_TICKS);
        assert_eq!(s.advance_to(100_000), 0);
        assert_eq!(s.advance_to(101_000), 1);
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut s = session(GameId::Tetris);
        s.start();
        s.advance_to(1000);
        assert_eq!(s.advance_to(10), 0);
        assert_eq!(s.now_ms(), 1000);
    }

    #[test]
    fn test_snake_applies_latest_key_on_tick() {
        let mut s = session(GameId::Snake);
        s.start();
        s.key_down("ArrowUp");
        s.key_down("ArrowDown");
        assert_eq!(snake_head(&s), GridPos::new(10, 10));

        s.advance_to(150);
        assert_eq!(snake_head(&s), GridPos::new(10, 11));
    }

    #[test]
    fn test_snake_reversal_is_rejected_at_the_router() {
        let mut s = session(GameId::Snake);
        s.start();
        let outcome = s.key_down("ArrowLeft");
        assert!(matches!(outcome, KeyOutcome::Rejected { prevent_default: true }));
        s.advance_to(150);
        assert_eq!(snake_head(&s), GridPos::new(11, 10));

        // once the snake has turned down, left is no longer a reversal
        s.key_down("ArrowDown");
        s.advance_to(300);
        assert!(matches!(s.key_down("ArrowLeft"), KeyOutcome::Consumed { .. }));
    }

    #[test]
    fn test_game_over_stops_the_clock_and_restart_recovers() {
        let mut s = session(GameId::Snake);
        s.start();
        for i in 1..=10 {
            s.advance_to(i * 150);
        }
        assert_eq!(s.lifecycle(), Lifecycle::GameOver);
        assert_eq!(s.snapshot().outcome, Some(Outcome::Collision));
        assert_eq!(s.advance_to(100_000), 0);
        assert_eq!(s.key_down("ArrowUp"), KeyOutcome::Ignored);

        assert!(matches!(s.key_down("r"), KeyOutcome::Consumed { .. }));
        assert_eq!(s.lifecycle(), Lifecycle::Running);
        assert_eq!(snake_head(&s), GridPos::new(10, 10));
        assert_eq!(s.advance_to(100_150), 1);
    }

    #[test]
    fn test_immediate_input_applies_at_key_time() {
        let mut s = session(GameId::Pong);
        s.start();
        let before = s.snapshot();
        s.key_down("ArrowUp");
        assert_ne!(s.snapshot(), before);
        assert_eq!(s.key_down("ArrowLeft"), KeyOutcome::Ignored);
    }

    #[test]
    fn test_ai_replies_after_delay() {
        let mut s = session(GameId::TicTacToe);
        s.start();
        s.key_down("5");
        assert_eq!(board(&s)[4], Some(Mark::X));

        s.advance_to(499);
        assert_eq!(board(&s).iter().flatten().count(), 1);
        s.advance_to(500);
        assert_eq!(board(&s).iter().flatten().count(), 2);
    }

    #[test]
    fn test_reset_cancels_pending_ai_reply() {
        let mut s = session(GameId::TicTacToe);
        s.start();
        s.key_down("1");
        s.reset();
        s.advance_to(5_000);
        assert_eq!(s.lifecycle(), Lifecycle::Idle);
        assert!(board(&s).iter().all(Option::is_none));
    }

    #[test]
    fn test_game_over_drops_the_rest_of_a_catch_up_batch() {
        let mut s = session(GameId::Snake);
        s.start();
        s.advance_to(7 * 150);
        assert_eq!(snake_head(&s), GridPos::new(17, 10));

        // eight ticks are due but the third one runs into the wall
        assert_eq!(s.advance_to(15 * 150), 3);
        assert_eq!(s.lifecycle(), Lifecycle::GameOver);
        assert_eq!(s.snapshot().outcome, Some(Outcome::Collision));
    }

    #[test]
    fn test_reset_drops_pending_ticks() {
        let mut s = session(GameId::Tetris);
        s.start();
        s.reset();
        assert_eq!(s.advance_to(50_000), 0);
        assert_eq!(s.lifecycle(), Lifecycle::Idle);
    }

    #[test]
    fn test_cabinet_select_resets_previous() {
        let mut cabinet = Cabinet::new(config());
        cabinet.select(GameId::Tetris).start();
        cabinet.advance_to(3000);

        let session = cabinet.select(GameId::Pong);
        assert_eq!(session.id(), GameId::Pong);
        assert_eq!(session.lifecycle(), Lifecycle::Idle);

        cabinet.back_to_catalog();
        assert!(cabinet.active().is_none());
        assert!(cabinet.snapshot().is_none());
        assert_eq!(cabinet.key_down("Enter"), KeyOutcome::Ignored);
    }

    #[test]
    fn test_cabinet_select_by_name() {
        let mut cabinet = Cabinet::new(config());
        assert!(cabinet.select_by_name("breakout").is_ok());
        assert_eq!(cabinet.active().map(Session::id), Some(GameId::Breakout));
        assert_eq!(cabinet.select_by_name("chess").err(), Some(UnknownGame("chess".to_string())));
    }

    #[test]
    fn test_unknown_name_keeps_the_running_game() {
        let mut cabinet = Cabinet::new(config());
        cabinet.select(GameId::Tetris).start();
        cabinet.advance_to(1000);

        assert!(cabinet.select_by_name("chess").is_err());
        let session = cabinet.active().expect("still selected");
        assert_eq!(session.id(), GameId::Tetris);
        assert_eq!(session.lifecycle(), Lifecycle::Running);
        assert_eq!(cabinet.advance_to(2000), 1);
    }

    #[test]
    fn test_snapshot_carries_player_name() {
        let mut cabinet = Cabinet::new(config());
        cabinet.select(GameId::Snake);
        assert_eq!(cabinet.snapshot().and_then(|s| s.player), None);

        cabinet.identity_mut().login(&mut ProfileForm::new("ada", "ada@example.com", "pw"));
        assert_eq!(cabinet.snapshot().and_then(|s| s.player), Some("ada".to_string()));
    }

    #[test]
    fn test_fixed_seed_replays_identically() {
        let run = || {
            let mut cabinet = Cabinet::new(config());
            cabinet.select(GameId::Tetris).start();
            cabinet.key_down(" ");
            cabinet.key_down(" ");
            cabinet.advance_to(4000);
            cabinet.snapshot()
        };
        assert_eq!(run(), run());
    }
}
