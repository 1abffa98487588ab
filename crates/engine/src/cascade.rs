//! Cascade engine - the swap/match/clear/drop/refill/reposition state machine
//!
//! The engine is a cooperative state machine. Grid mutations happen
//! synchronously when a phase is entered; the phase then waits on the
//! animation handles it issued (a [`JoinBarrier`]) before the next one starts.
//!
//! ```text
//! Idle -swap-> Swapping -> Matching -+-> Clearing -> Dropping -> Refilling -> Repositioning -+
//!                            ^       |                                                        |
//!                            |       +-> (no match) Idle                                      |
//!                            +----------------------------------------------------------------+
//! ```
//!
//! Hosts drive it either from a frame loop with [`CascadeEngine::poll`] or
//! from async code with [`CascadeEngine::run_until_idle`].

use std::collections::{HashMap, VecDeque};

use tracing::{debug, error, info, trace};

use crate::completion::JoinBarrier;
use crate::config::EngineConfig;
use crate::core::{
    exists_possible_move, find_all_matches, find_possible_move, generate_board, BoardSnapshot,
    DropPlan, GridError, MatchSet, RandomSource, ScoreSink, SimpleRng, TileGrid,
};
use crate::error::EngineError;
use crate::ports::{AnimationPort, AudioPort, InstantAnimations};
use crate::types::{CascadeState, Pos, TileId, TileType};

/// Observable engine events, drained with [`CascadeEngine::take_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeEvent {
    StateChanged {
        from: CascadeState,
        to: CascadeState,
    },
    /// One matching pass; `combo` is 1-based within the cascade
    Matched { tiles: usize, combo: u32 },
    /// An unmatched swap was undone (only with `revert_unmatched_swaps`)
    SwapReverted { a: Pos, b: Pos },
    /// The engine returned to `Idle`; `combo` is the number of passes that matched
    Settled { combo: u32 },
    /// The stable board has no possible move
    NoMoves,
    Reshuffled,
}

/// Events kept for the host before the oldest are dropped
pub const EVENT_LOG_CAPACITY: usize = 256;

/// Bounded event queue. A host that never drains it loses the oldest entries.
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    events: VecDeque<CascadeEvent>,
    dropped: u64,
}

impl EventLog {
    pub(crate) fn push(&mut self, event: CascadeEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
            self.dropped += 1;
            if self.dropped.is_power_of_two() {
                trace!(dropped = self.dropped, "event log full, dropping oldest");
            }
        }
        self.events.push_back(event);
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn drain(&mut self) -> Vec<CascadeEvent> {
        self.events.drain(..).collect()
    }
}

fn internal(err: GridError) -> EngineError {
    error!(%err, "grid rejected a cascade mutation");
    EngineError::Internal(err)
}

pub struct CascadeEngine<R = SimpleRng, A = InstantAnimations> {
    config: EngineConfig,
    grid: TileGrid,
    rng: R,
    animations: A,
    audio: Option<Box<dyn AudioPort>>,
    state: CascadeState,
    combo: u32,
    barrier: JoinBarrier,
    /// Where the view currently shows each tile
    placements: HashMap<TileId, Pos>,
    /// Swap awaiting its first matching pass
    pending_swap: Option<(Pos, Pos)>,
    reverting: bool,
    deadlocked: bool,
    events: EventLog,
}

impl<R: RandomSource, A: AnimationPort> CascadeEngine<R, A> {
    /// Validate `config` and start on a freshly generated board
    pub fn new(config: EngineConfig, mut rng: R, animations: A) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = generate_board(
            config.width,
            config.height,
            config.palette_size,
            &mut rng,
            config.max_generation_attempts,
        )?;
        Ok(Self::from_parts(config, grid, rng, animations))
    }

    /// Start on a caller-built board. Width and height are taken from `grid`.
    ///
    /// The board is used as is: it may already contain matches, which are
    /// resolved by the first cascade.
    pub fn with_grid(
        mut config: EngineConfig,
        grid: TileGrid,
        rng: R,
        animations: A,
    ) -> Result<Self, EngineError> {
        config.width = grid.width();
        config.height = grid.height();
        config.validate()?;
        if let Some(&pos) = grid.destroyed_positions().first() {
            return Err(EngineError::Internal(GridError::Vacant { pos }));
        }
        Ok(Self::from_parts(config, grid, rng, animations))
    }

    fn from_parts(config: EngineConfig, grid: TileGrid, rng: R, animations: A) -> Self {
        let mut engine = Self {
            config,
            grid,
            rng,
            animations,
            audio: None,
            state: CascadeState::Idle,
            combo: 0,
            barrier: JoinBarrier::new(),
            placements: HashMap::new(),
            pending_swap: None,
            reverting: false,
            deadlocked: false,
            events: EventLog::default(),
        };
        engine.present_board();
        engine.check_deadlock();
        engine
    }

    /// Show every tile in its slot (not awaited)
    fn present_board(&mut self) {
        self.placements.clear();
        for (pos, tile) in self.grid.tiles() {
            let _ = self.animations.request_spawn(tile.id, pos, pos);
            self.placements.insert(tile.id, pos);
        }
    }

    pub fn set_audio(&mut self, audio: impl AudioPort + 'static) {
        self.audio = Some(Box::new(audio));
    }

    // ========== Queries ==========

    pub fn state(&self) -> CascadeState {
        self.state
    }

    /// True whenever the engine is not `Idle`
    pub fn is_busy(&self) -> bool {
        !self.state.is_idle()
    }

    /// Matching passes so far in the current (or last) cascade
    pub fn current_combo_index(&self) -> u32 {
        self.combo
    }

    /// `(width, height)`
    pub fn board_size(&self) -> (usize, usize) {
        self.grid.size()
    }

    pub fn tile_at(&self, pos: Pos) -> Result<TileType, EngineError> {
        Ok(self.grid.get(pos)?)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.grid.snapshot()
    }

    /// First possible move, if any
    pub fn hint(&self) -> Option<(Pos, Pos)> {
        find_possible_move(&self.grid)
    }

    /// Set when a settled board has no possible move; cleared by a swap or reshuffle
    pub fn is_deadlocked(&self) -> bool {
        self.deadlocked
    }

    /// Where the view was last told to show `tile`
    pub fn rendered_position(&self, tile: TileId) -> Option<Pos> {
        self.placements.get(&tile).copied()
    }

    /// Animations the current phase is still waiting for
    pub fn outstanding_animations(&self) -> usize {
        self.barrier.outstanding()
    }

    pub fn animations(&self) -> &A {
        &self.animations
    }

    pub fn animations_mut(&mut self) -> &mut A {
        &mut self.animations
    }

    /// Take and clear the events recorded since the last call.
    ///
    /// At most [`EVENT_LOG_CAPACITY`] are kept; older ones are discarded.
    pub fn take_events(&mut self) -> Vec<CascadeEvent> {
        self.events.drain()
    }

    /// Events waiting to be taken
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // ========== Commands ==========

    /// Swap two adjacent cells and start a cascade.
    ///
    /// Returns the new positions of the tiles that were at `a` and `b`.
    /// Rejected (not queued) while a cascade is running.
    pub fn request_swap(&mut self, a: Pos, b: Pos) -> Result<(Pos, Pos), EngineError> {
        if self.is_busy() {
            debug!(%a, %b, state = %self.state, "swap rejected while busy");
            return Err(EngineError::InvalidSwap { state: self.state });
        }
        let moved = self.grid.swap_cells(a, b).map_err(|err| {
            debug!(%a, %b, %err, "swap rejected");
            EngineError::from(err)
        })?;

        self.animate_swap(a, b)?;
        self.combo = 0;
        self.pending_swap = Some((a, b));
        self.reverting = false;
        self.deadlocked = false;
        self.transition(CascadeState::Swapping);
        Ok(moved)
    }

    /// Replace the whole board with a freshly generated one. `Idle` only.
    pub fn reshuffle(&mut self) -> Result<(), EngineError> {
        if self.is_busy() {
            return Err(EngineError::Busy { state: self.state });
        }
        let mut fresh = generate_board(
            self.config.width,
            self.config.height,
            self.config.palette_size,
            &mut self.rng,
            self.config.max_generation_attempts,
        )?;
        fresh.continue_ids_from(&self.grid);

        for (pos, tile) in self.grid.tiles() {
            let _ = self.animations.request_destroy(tile.id, pos);
        }
        self.grid = fresh;
        self.present_board();

        self.combo = 0;
        self.pending_swap = None;
        self.deadlocked = false;
        info!("board reshuffled");
        self.events.push(CascadeEvent::Reshuffled);
        Ok(())
    }

    /// Advance through every phase whose animations have finished.
    ///
    /// Never blocks; call once per frame. Returns the state it stopped in.
    pub fn poll<S: ScoreSink + ?Sized>(&mut self, sink: &mut S) -> Result<CascadeState, EngineError> {
        while self.is_busy() && self.barrier.try_complete() {
            self.advance(sink)?;
        }
        Ok(self.state)
    }

    /// Drive the cascade to `Idle`, awaiting animation handles in between
    pub async fn run_until_idle<S: ScoreSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<(), EngineError> {
        loop {
            if self.poll(sink)?.is_idle() {
                return Ok(());
            }
            self.barrier.wait().await;
        }
    }

    // ========== Phases ==========

    fn transition(&mut self, to: CascadeState) {
        let from = self.state;
        debug!(%from, %to, combo = self.combo, "cascade transition");
        self.state = to;
        self.events.push(CascadeEvent::StateChanged { from, to });
    }

    fn advance<S: ScoreSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), EngineError> {
        match self.state {
            CascadeState::Idle => {}
            CascadeState::Swapping => {
                if self.reverting {
                    self.reverting = false;
                    self.settle();
                } else {
                    self.transition(CascadeState::Matching);
                }
            }
            CascadeState::Matching => {
                let matches = find_all_matches(&self.grid);
                if matches.is_empty() {
                    self.on_empty_pass()?;
                } else {
                    self.score_pass(&matches, sink);
                    self.enter_clearing(&matches)?;
                }
            }
            CascadeState::Clearing => self.enter_dropping()?,
            CascadeState::Dropping => self.enter_refilling()?,
            CascadeState::Refilling => self.enter_repositioning(),
            CascadeState::Repositioning => self.transition(CascadeState::Matching),
        }
        Ok(())
    }

    /// Issue the two move animations for a swap that was just applied
    fn animate_swap(&mut self, a: Pos, b: Pos) -> Result<(), EngineError> {
        // The tile now at `b` came from `a` and vice versa.
        let from_a = self.grid.tile(b).map_err(internal)?;
        let from_b = self.grid.tile(a).map_err(internal)?;
        for (tile, from, to) in [(from_a, a, b), (from_b, b, a)] {
            let handle = self.animations.request_move(tile.id, from, to);
            self.barrier.push(handle);
            self.placements.insert(tile.id, to);
        }
        Ok(())
    }

    fn score_pass<S: ScoreSink + ?Sized>(&mut self, matches: &MatchSet, sink: &mut S) {
        self.combo += 1;
        self.pending_swap = None;
        let tiles = matches.len();
        debug!(tiles, combo = self.combo, "match pass");
        sink.on_match(tiles, self.combo);
        if let Some(audio) = self.audio.as_mut() {
            audio.play_score(self.combo > 1);
        }
        self.events.push(CascadeEvent::Matched {
            tiles,
            combo: self.combo,
        });
    }

    fn on_empty_pass(&mut self) -> Result<(), EngineError> {
        let pending = self.pending_swap.take();
        if let Some((a, b)) = pending {
            debug!(%a, %b, "swap produced no match");
            if self.config.revert_unmatched_swaps {
                self.grid.swap_cells(a, b).map_err(internal)?;
                // Back in place: the tile at `a` now travels from `b`.
                let home_a = self.grid.tile(a).map_err(internal)?;
                let home_b = self.grid.tile(b).map_err(internal)?;
                for (tile, from, to) in [(home_a, b, a), (home_b, a, b)] {
                    let handle = self.animations.request_move(tile.id, from, to);
                    self.barrier.push(handle);
                    self.placements.insert(tile.id, to);
                }
                self.reverting = true;
                self.events.push(CascadeEvent::SwapReverted { a, b });
                self.transition(CascadeState::Swapping);
                return Ok(());
            }
        }
        self.settle();
        Ok(())
    }

    fn settle(&mut self) {
        self.transition(CascadeState::Idle);
        self.events.push(CascadeEvent::Settled { combo: self.combo });
        self.check_deadlock();
    }

    fn check_deadlock(&mut self) {
        if exists_possible_move(&self.grid) {
            return;
        }
        let (width, height) = self.grid.size();
        info!(width, height, "no possible moves left");
        self.deadlocked = true;
        self.events.push(CascadeEvent::NoMoves);
    }

    fn enter_clearing(&mut self, matches: &MatchSet) -> Result<(), EngineError> {
        self.transition(CascadeState::Clearing);
        let removed = self.grid.mark_destroyed(matches.iter()).map_err(internal)?;
        for (pos, tile) in removed {
            let handle = self.animations.request_destroy(tile.id, pos);
            self.barrier.push(handle);
            self.placements.remove(&tile.id);
        }
        Ok(())
    }

    fn enter_dropping(&mut self) -> Result<(), EngineError> {
        self.transition(CascadeState::Dropping);
        let plan = DropPlan::compute(&self.grid);
        let moves = self.grid.apply_drop(&plan).map_err(internal)?;
        for mv in moves {
            // Falls are shown but not awaited.
            let _ = self.animations.request_move(mv.id, mv.from, mv.to);
            self.placements.insert(mv.id, mv.to);
        }
        Ok(())
    }

    fn enter_refilling(&mut self) -> Result<(), EngineError> {
        self.transition(CascadeState::Refilling);
        let top = self.grid.height() as i32;
        let mut column = None;
        let mut stacked = 0;
        for pos in self.grid.destroyed_positions() {
            if column != Some(pos.x) {
                column = Some(pos.x);
                stacked = 0;
            }
            let kind = self.rng.next(self.config.palette_size);
            let id = self.grid.refill(pos, kind).map_err(internal)?;
            let spawn = Pos::new(pos.x, top + stacked);
            stacked += 1;
            let _ = self.animations.request_spawn(id, spawn, pos);
            self.placements.insert(id, spawn);
        }
        Ok(())
    }

    fn enter_repositioning(&mut self) {
        self.transition(CascadeState::Repositioning);
        for (slot, tile) in self.grid.tiles() {
            let shown = self.placements.get(&tile.id).copied();
            if shown == Some(slot) {
                continue;
            }
            let handle = self
                .animations
                .request_move(tile.id, shown.unwrap_or(slot), slot);
            self.barrier.push(handle);
            self.placements.insert(tile.id, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RecordingSink, ScriptedSource};
    use crate::ports::ManualAnimations;

    fn engine_for(rows: &[&[TileType]], script: &[TileType]) -> CascadeEngine<ScriptedSource> {
        let grid = TileGrid::from_rows(rows).unwrap();
        let config = EngineConfig::default().with_palette(4);
        CascadeEngine::with_grid(
            config,
            grid,
            ScriptedSource::new(script.to_vec()),
            InstantAnimations::new(),
        )
        .unwrap()
    }

    const BOARD: &[&[TileType]] = &[
        &[2, 3, 0, 1, 2],
        &[0, 1, 2, 3, 0],
        &[2, 3, 0, 1, 2],
        &[0, 0, 1, 0, 3],
        &[2, 3, 2, 1, 0],
    ];

    #[test]
    fn test_swap_rejected_while_busy() {
        let grid = TileGrid::from_rows(BOARD).unwrap();
        let view = ManualAnimations::new();
        let mut engine = CascadeEngine::with_grid(
            EngineConfig::default().with_palette(4),
            grid,
            ScriptedSource::new(vec![3, 2, 1]),
            view.clone(),
        )
        .unwrap();
        view.complete_all();

        engine.request_swap(Pos::new(2, 1), Pos::new(3, 1)).unwrap();
        assert!(engine.is_busy());
        let before = engine.snapshot();
        assert_eq!(
            engine.request_swap(Pos::new(0, 0), Pos::new(1, 0)),
            Err(EngineError::InvalidSwap {
                state: CascadeState::Swapping
            })
        );
        assert_eq!(engine.snapshot(), before);

        // Nothing moves until the swap animations finish.
        let mut sink = RecordingSink::default();
        assert_eq!(engine.poll(&mut sink).unwrap(), CascadeState::Swapping);
        assert_eq!(engine.outstanding_animations(), 2);
    }

    #[test]
    fn test_unmatched_swap_spends_the_move_by_default() {
        let mut engine = engine_for(BOARD, &[0]);
        let a = Pos::new(0, 0);
        let b = Pos::new(1, 0);
        engine.request_swap(a, b).unwrap();
        let mut sink = RecordingSink::default();
        assert_eq!(engine.poll(&mut sink).unwrap(), CascadeState::Idle);

        assert!(sink.events.is_empty());
        assert_eq!(engine.tile_at(a), Ok(3));
        assert_eq!(engine.tile_at(b), Ok(2));
        assert_eq!(engine.current_combo_index(), 0);
    }

    #[test]
    fn test_out_of_bounds_swap() {
        let mut engine = engine_for(BOARD, &[0]);
        assert_eq!(
            engine.request_swap(Pos::new(4, 4), Pos::new(5, 4)),
            Err(EngineError::OutOfBounds {
                pos: Pos::new(5, 4)
            })
        );
        let far = Pos::new(9, 9);
        assert_eq!(
            engine.request_swap(Pos::new(0, 0), far),
            Err(EngineError::NotAdjacent {
                a: Pos::new(0, 0),
                b: far
            })
        );
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_views_in_sync_after_cascade() {
        let mut engine = engine_for(BOARD, &[3, 2, 1]);
        engine.request_swap(Pos::new(2, 1), Pos::new(3, 1)).unwrap();
        let mut sink = RecordingSink::default();
        engine.poll(&mut sink).unwrap();

        assert!(!engine.is_busy());
        assert!(!sink.events.is_empty());
        for (slot, tile) in engine.grid().tiles() {
            assert_eq!(engine.rendered_position(tile.id), Some(slot));
        }
    }
}
