//! tutor-signup - scheduling coordinator for a volunteer tutoring program.
//!
//! People sign up for and remove themselves from weekday tutoring sessions
//! (two "EP" slots and an After School slot) held in an external HTTP row
//! store. This crate holds the rules: duplicate and capacity checks, the
//! EP2 auto-enrollment gate, per-day After-School enablement, and the
//! derived roster view.
//!
//! ## Components
//!
//! - [`registry`]: thin client for the row store (fetch-all, insert-one,
//!   delete-one), plus an in-memory stand-in for tests
//! - [`engine`]: the scheduling decisions, generic over the registry and
//!   an injectable confirmation oracle
//!
//! The presentation surface lives outside the library; `main.rs` wires a
//! small CLI around it.

pub mod confirm;
pub mod engine;
pub mod error;
pub mod record;
pub mod registry;

pub use confirm::{Confirmer, ScriptedConfirmer};
pub use engine::{
    EnableOutcome, EngineConfig, RemovalOutcome, SchedulingEngine, SignupOutcome, SignupRequest,
    AUTO_EP2_PROMPT, REMOVAL_PROMPT,
};
pub use error::{EngineError, ParseRecordError, RegistryError, ValidationError};
pub use record::{
    AfterSchoolFlags, RawRow, RegistryRecord, Roster, SessionKind, SignupRecord, Weekday,
};
pub use registry::{HttpRegistry, MemoryRegistry, Registry};
