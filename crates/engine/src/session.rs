//! Game session - one engine, one score accumulator, two timers
//!
//! The session is the explicit owner of everything one board needs. Time is
//! fed in by the host through [`GameSession::tick`], the same way a frame loop
//! advances the game.

use tracing::info;

use crate::cascade::{CascadeEngine, CascadeEvent, EventLog};
use crate::core::{RandomSource, ScoreAccumulator, SimpleRng};
use crate::error::EngineError;
use crate::ports::{AnimationPort, InstantAnimations};
use crate::types::{CascadeState, Pos};

pub struct GameSession<R = SimpleRng, A = InstantAnimations> {
    engine: CascadeEngine<R, A>,
    score: ScoreAccumulator,
    round_elapsed_ms: u32,
    /// Counts down after a `NoMoves` event; reshuffle at zero
    deadlock_timer_ms: Option<u32>,
    game_over: bool,
    events: EventLog,
}

impl<R: RandomSource, A: AnimationPort> GameSession<R, A> {
    pub fn new(engine: CascadeEngine<R, A>) -> Self {
        let config = engine.config();
        let score = ScoreAccumulator::new(config.tile_ratio, config.combo_ratio);
        let mut session = Self {
            engine,
            score,
            round_elapsed_ms: 0,
            deadlock_timer_ms: None,
            game_over: false,
            events: EventLog::default(),
        };
        session.collect_events();
        session
    }

    pub fn engine(&self) -> &CascadeEngine<R, A> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CascadeEngine<R, A> {
        &mut self.engine
    }

    pub fn score(&self) -> u64 {
        self.score.current()
    }

    pub fn high_score(&self) -> u64 {
        self.score.high_score()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Time left in the round; `None` when the round is untimed
    pub fn remaining_ms(&self) -> Option<u32> {
        match self.engine.config().round_duration_ms {
            0 => None,
            round => Some(round.saturating_sub(self.round_elapsed_ms)),
        }
    }

    /// Time left before a deadlocked board is reshuffled
    pub fn deadlock_remaining_ms(&self) -> Option<u32> {
        self.deadlock_timer_ms
    }

    pub fn request_swap(&mut self, a: Pos, b: Pos) -> Result<(Pos, Pos), EngineError> {
        if self.game_over {
            return Err(EngineError::GameOver);
        }
        self.engine.request_swap(a, b)
    }

    /// Advance the session by `elapsed_ms` and step the engine.
    ///
    /// A cascade already running when the round ends still completes and its
    /// points count toward the committed high score.
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<CascadeState, EngineError> {
        if !self.game_over {
            self.advance_round(elapsed_ms);
        }
        if !self.game_over {
            self.advance_deadlock_timer(elapsed_ms)?;
        }

        let state = self.engine.poll(&mut self.score)?;
        self.collect_events();
        if self.game_over {
            self.score.commit_high_score();
        }
        Ok(state)
    }

    /// New board, zero score, fresh timers. The high score is kept.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.engine.reshuffle()?;
        self.score.reset_current();
        self.round_elapsed_ms = 0;
        self.deadlock_timer_ms = None;
        self.game_over = false;
        self.collect_events();
        Ok(())
    }

    /// Engine events seen by the session since the last call, bounded like
    /// [`CascadeEngine::take_events`]
    pub fn take_events(&mut self) -> Vec<CascadeEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn advance_round(&mut self, elapsed_ms: u32) {
        let round = self.engine.config().round_duration_ms;
        if round == 0 {
            return;
        }
        self.round_elapsed_ms = self.round_elapsed_ms.saturating_add(elapsed_ms);
        if self.round_elapsed_ms >= round {
            info!(score = self.score.current(), "round over");
            self.game_over = true;
            self.deadlock_timer_ms = None;
        }
    }

    fn advance_deadlock_timer(&mut self, elapsed_ms: u32) -> Result<(), EngineError> {
        let Some(left) = self.deadlock_timer_ms else {
            return Ok(());
        };
        let left = left.saturating_sub(elapsed_ms);
        // A reshuffle never interrupts a cascade; keep waiting for Idle.
        if left == 0 && !self.engine.is_busy() {
            self.deadlock_timer_ms = None;
            self.engine.reshuffle()?;
        } else {
            self.deadlock_timer_ms = Some(left);
        }
        Ok(())
    }

    fn collect_events(&mut self) {
        let wait = self.engine.config().deadlock_wait_ms;
        for event in self.engine.take_events() {
            match event {
                CascadeEvent::Settled { .. } | CascadeEvent::Reshuffled => {
                    self.deadlock_timer_ms = None
                }
                CascadeEvent::NoMoves if !self.game_over => self.deadlock_timer_ms = Some(wait),
                _ => {}
            }
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_untimed_round_never_ends() {
        let config = EngineConfig {
            round_duration_ms: 0,
            ..EngineConfig::default()
        };
        let engine = CascadeEngine::new(config, SimpleRng::new(3), InstantAnimations::new()).unwrap();
        let mut session = GameSession::new(engine);
        for _ in 0..100 {
            session.tick(1_000).unwrap();
        }
        assert!(!session.is_game_over());
        assert_eq!(session.remaining_ms(), None);
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let config = EngineConfig {
            round_duration_ms: 500,
            ..EngineConfig::default()
        };
        let engine = CascadeEngine::new(config, SimpleRng::new(5), InstantAnimations::new()).unwrap();
        let mut session = GameSession::new(engine);
        session.tick(600).unwrap();
        assert!(session.is_game_over());
        assert_eq!(session.remaining_ms(), Some(0));

        session.restart().unwrap();
        assert!(!session.is_game_over());
        assert_eq!(session.score(), 0);
        assert_eq!(session.remaining_ms(), Some(500));
    }
}
