#![allow(clippy::result_large_err)]
//! sms-core: loader for MSTS sound-management scripts (`.sms`).
//!
//! Turns STF text into an immutable [`SmsFile`] tree of scalability groups,
//! streams, triggers, commands and response curves, and memoizes built
//! models by path.
//!
//! # Public API
//!
//! - [`load()`], [`load_with_provider()`], [`load_str()`] -- build one file
//! - [`SmsCache`] -- path-keyed memo handing out `Arc<SmsFile>`
//! - [`StfError`] -- fatal load error; [`Diagnostic`] -- non-fatal findings
//! - [`Reader`] / [`StfReader`] -- token cursor the builder consumes
//! - model types: [`SoundScript`], [`ScalabilityGroup`], [`Stream`],
//!   [`Trigger`], [`SoundCommand`], [`Curve`], ...

pub mod builder;
pub mod cache;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod load;
pub mod model;
pub mod normalize;
pub mod reader;
pub mod source;
pub mod units;

// ── Convenience re-exports: key types ────────────────────────────────

pub use cache::SmsCache;
pub use diagnostics::{Diagnostic, Severity};
pub use error::StfError;
pub use model::{
    Activation, Curve, CurveControl, CurvePoint, Direction, DistanceTravelledTrigger,
    PlaySounds, RandomTrigger, Range, ScalabilityGroup, SelectionMethod, SmsFile, SoundCommand,
    SoundScript, Stream, Trigger, TriggerKind, TriggerRef, TriggerVariable, VariableEvent,
    VariableTrigger,
};
pub use reader::{Reader, StfReader};
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};
pub use units::Units;

// ── Convenience re-exports: entry points ─────────────────────────────

pub use builder::build_sms;
pub use load::{load, load_str, load_with_provider};
