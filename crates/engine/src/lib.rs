//! Cascade engine - drives swaps through match, clear, drop and refill passes
//!
//! This crate turns the pure board rules of [`tile_cascade_core`] into a
//! running game. It owns no rendering: animations and sounds go out through
//! ports and come back as completion handles.
//!
//! # Module Structure
//!
//! - [`cascade`]: the [`CascadeEngine`] state machine
//! - [`completion`]: completion handles and the per-phase [`JoinBarrier`]
//! - [`ports`]: [`AnimationPort`] / [`AudioPort`] plus headless implementations
//! - [`config`]: [`EngineConfig`], including environment overrides
//! - [`session`]: [`GameSession`], score and timers around one engine
//! - [`error`]: [`EngineError`]
//!
//! # Example
//!
//! ```
//! use tile_cascade_engine::{CascadeEngine, EngineConfig, InstantAnimations};
//! use tile_cascade_engine::core::{ScoreAccumulator, SimpleRng};
//!
//! let config = EngineConfig::default();
//! let mut engine = CascadeEngine::new(config, SimpleRng::new(7), InstantAnimations::new()).unwrap();
//! let mut score = ScoreAccumulator::default();
//!
//! let (a, b) = engine.hint().unwrap();
//! engine.request_swap(a, b).unwrap();
//! engine.poll(&mut score).unwrap();
//!
//! assert!(!engine.is_busy());
//! assert!(score.current() > 0);
//! ```

pub mod cascade;
pub mod completion;
pub mod config;
pub mod error;
pub mod ports;
pub mod session;

pub use tile_cascade_core as core;
pub use tile_cascade_types as types;

pub use cascade::{CascadeEngine, CascadeEvent, EVENT_LOG_CAPACITY};
pub use completion::{completion_pair, Completer, CompletionHandle, JoinBarrier};
pub use config::{ConfigError, EngineConfig};
pub use error::EngineError;
pub use ports::{
    AnimationPort, AnimationRequest, AudioPort, InstantAnimations, ManualAnimations,
    RecordingAudio,
};
pub use session::GameSession;
