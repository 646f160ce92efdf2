//! In-memory sound-script model.
//!
//! Produced once by the builder and never mutated afterwards; the playback
//! side only reads it. Variants that share a shape in the file format share
//! a payload struct here.

use serde::Serialize;

use crate::diagnostics::{Diagnostic, Severity};

// ──────────────────────────────────────────────
// File / script
// ──────────────────────────────────────────────

/// One loaded `.sms` file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsFile {
    pub path: String,
    /// The `Tr_SMS` block, absent when the file has none.
    pub script: Option<SoundScript>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SmsFile {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Scalability groups of the script, empty when there is no script.
    pub fn groups(&self) -> &[ScalabilityGroup] {
        match &self.script {
            Some(script) => script.groups.as_slice(),
            None => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoundScript {
    pub groups: Vec<ScalabilityGroup>,
}

impl SoundScript {
    /// Tier to use at a sound detail setting: the first group whose detail
    /// level does not exceed `level`. Content lists richer tiers first.
    pub fn group_for_detail_level(&self, level: i32) -> Option<&ScalabilityGroup> {
        self.groups.iter().find(|g| g.detail_level <= level)
    }
}

// ──────────────────────────────────────────────
// Scalability group
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalabilityGroup {
    pub detail_level: i32,
    pub activation: Option<Activation>,
    pub deactivation: Option<Activation>,
    pub volume: f32,
    pub stereo: bool,
    pub ignore_3d: bool,
    pub streams: Option<Vec<Stream>>,
}

impl ScalabilityGroup {
    pub fn new(detail_level: i32) -> Self {
        ScalabilityGroup {
            detail_level,
            activation: None,
            deactivation: None,
            volume: 1.0,
            stereo: false,
            ignore_3d: false,
            streams: None,
        }
    }
}

/// Camera/distance/track condition. Used for both activation and deactivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activation {
    pub external_cam: bool,
    pub cab_cam: bool,
    pub passenger_cam: bool,
    /// Metres. The default keeps the sound in range.
    pub distance: f32,
    /// -1 matches any track type.
    pub track_type: i32,
}

impl Default for Activation {
    fn default() -> Self {
        Activation {
            external_cam: false,
            cab_cam: false,
            passenger_cam: false,
            distance: 10000.0,
            track_type: -1,
        }
    }
}

// ──────────────────────────────────────────────
// Stream / curves
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stream {
    pub priority: i32,
    pub volume: f32,
    pub volume_curve: Option<Curve>,
    pub frequency_curve: Option<Curve>,
    pub triggers: Vec<Trigger>,
}

impl Stream {
    /// A stream inheriting `volume` from its group.
    pub fn new(volume: f32) -> Self {
        Stream {
            priority: 0,
            volume,
            volume_curve: None,
            frequency_curve: None,
            triggers: Vec::new(),
        }
    }
}

/// Physical quantity indexing a response curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CurveControl {
    #[default]
    None,
    Distance,
    Speed,
    Variable1,
    Variable2,
    Variable3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

/// Sampled response curve. Volume and frequency curves share this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub control: CurveControl,
    pub granularity: f32,
    pub points: Vec<CurvePoint>,
}

impl Default for Curve {
    fn default() -> Self {
        Curve {
            control: CurveControl::None,
            granularity: 1.0,
            points: Vec::new(),
        }
    }
}

// ──────────────────────────────────────────────
// Triggers
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub kind: TriggerKind,
    /// `None` when the trigger block carried no command.
    pub command: Option<SoundCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TriggerKind {
    Initial,
    Discrete { id: i32 },
    Random(RandomTrigger),
    DistanceTravelled(DistanceTravelledTrigger),
    Variable(VariableTrigger),
}

impl TriggerKind {
    pub fn name(&self) -> &'static str {
        match self {
            TriggerKind::Initial => "Initial",
            TriggerKind::Discrete { .. } => "Discrete",
            TriggerKind::Random(_) => "Random",
            TriggerKind::DistanceTravelled(_) => "DistanceTravelled",
            TriggerKind::Variable(_) => "Variable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Range { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RandomTrigger {
    /// Seconds between firings.
    pub delay: Range,
    pub volume: Range,
}

impl Default for RandomTrigger {
    fn default() -> Self {
        RandomTrigger {
            delay: Range::new(80.0, 100.0),
            volume: Range::new(0.9, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceTravelledTrigger {
    /// Metres between firings.
    pub distance: Range,
    pub volume: Range,
}

impl Default for DistanceTravelledTrigger {
    fn default() -> Self {
        DistanceTravelledTrigger {
            distance: Range::new(80.0, 100.0),
            volume: Range::new(0.9, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriggerVariable {
    Speed,
    Distance,
    Variable1,
    Variable2,
    Variable3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Increase,
    Decrease,
}

/// Fires when `variable` passes the threshold in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableEvent {
    pub variable: TriggerVariable,
    pub direction: Direction,
}

impl Default for VariableEvent {
    fn default() -> Self {
        VariableEvent {
            variable: TriggerVariable::Speed,
            direction: Direction::Increase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableTrigger {
    pub event: VariableEvent,
    pub threshold: f32,
}

// ──────────────────────────────────────────────
// Commands
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SelectionMethod {
    Random,
    #[default]
    Sequential,
}

/// File list shared by the play and loop commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaySounds {
    pub files: Vec<String>,
    pub selection: SelectionMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriggerRef {
    pub trigger_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SoundCommand {
    PlayOneShot(PlaySounds),
    StartLoop(PlaySounds),
    StartLoopRelease(PlaySounds),
    ReleaseLoopRelease,
    ReleaseLoopReleaseWithJump,
    EnableTrigger(TriggerRef),
    DisableTrigger(TriggerRef),
    SetStreamVolume { volume: f32 },
}

impl SoundCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCommand::PlayOneShot(_) => "PlayOneShot",
            SoundCommand::StartLoop(_) => "StartLoop",
            SoundCommand::StartLoopRelease(_) => "StartLoopRelease",
            SoundCommand::ReleaseLoopRelease => "ReleaseLoopRelease",
            SoundCommand::ReleaseLoopReleaseWithJump => "ReleaseLoopReleaseWithJump",
            SoundCommand::EnableTrigger(_) => "EnableTrigger",
            SoundCommand::DisableTrigger(_) => "DisableTrigger",
            SoundCommand::SetStreamVolume { .. } => "SetStreamVolume",
        }
    }

    /// File list for the play/loop commands.
    pub fn sounds(&self) -> Option<&PlaySounds> {
        match self {
            SoundCommand::PlayOneShot(s)
            | SoundCommand::StartLoop(s)
            | SoundCommand::StartLoopRelease(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(level: i32) -> ScalabilityGroup {
        ScalabilityGroup::new(level)
    }

    #[test]
    fn detail_level_picks_first_tier_not_above_setting() {
        let script = SoundScript {
            groups: vec![group(5), group(3), group(0)],
        };
        assert_eq!(script.group_for_detail_level(9).unwrap().detail_level, 5);
        assert_eq!(script.group_for_detail_level(4).unwrap().detail_level, 3);
        assert_eq!(script.group_for_detail_level(0).unwrap().detail_level, 0);
        assert!(script.group_for_detail_level(-1).is_none());
    }

    #[test]
    fn activation_defaults() {
        let a = Activation::default();
        assert_eq!(a.distance, 10000.0);
        assert_eq!(a.track_type, -1);
        assert!(!a.external_cam && !a.cab_cam && !a.passenger_cam);
    }

    #[test]
    fn sounds_only_for_play_family() {
        let play = SoundCommand::StartLoop(PlaySounds::default());
        assert!(play.sounds().is_some());
        assert!(SoundCommand::ReleaseLoopRelease.sounds().is_none());
        assert_eq!(
            SoundCommand::SetStreamVolume { volume: 0.5 }.name(),
            "SetStreamVolume"
        );
    }
}
