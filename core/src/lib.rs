//! `draw-core`: the quiz-meet draw optimizer and bracket composer.
//!
//! This crate holds everything spec.md calls "the core": the stochastic
//! local-search engine over the prelim schedule (board + energy model +
//! initializer + mutator + optimizer) and the deterministic bracket/semis
//! expansion and serialization that turns it into the full meet schedule.
//! Roster parsing, spreadsheet upload, and scoresheet wiring are
//! out-of-scope collaborators and live outside this crate.

pub mod board;
pub mod bracket;
pub mod cell;
pub mod config;
pub mod energy;
pub mod error;
pub mod init;
pub mod mutate;
pub mod optimize;
pub mod serialize;
pub mod token;

pub use board::Board;
pub use bracket::{BracketComposer, BracketKind, BracketRecord, BracketRef, BracketStyle, BracketTable};
pub use cell::QuizCell;
pub use config::DrawConfig;
pub use energy::{EnergyModel, EnergyWeights};
pub use error::{DrawError, DrawResult};
pub use init::Initializer;
pub use mutate::{Move, Mutator};
pub use optimize::{DrawStatistics, Optimizer, TemperatureSchedule};
pub use serialize::{DrawSerializer, QuizRecord, TimeGrid};
pub use token::{Placement, TeamToken};
