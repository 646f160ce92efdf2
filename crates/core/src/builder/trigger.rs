//! Trigger collections and the five trigger variants.
//!
//! Every variant reads its own leading fields and then shares one item loop
//! in which the command keywords are always recognized. Random and
//! distance-travelled triggers add their range keywords to that loop.

use once_cell::sync::Lazy;

use super::command::{CommandBuilder, COMMANDS};
use super::{dispatch, fold_keyword, parse_block_body, KeywordTable};
use crate::error::StfError;
use crate::model::{
    Direction, DistanceTravelledTrigger, RandomTrigger, SoundCommand, Trigger, TriggerKind,
    TriggerVariable, VariableEvent, VariableTrigger,
};
use crate::reader::Reader;
use crate::units::Units;

/// A trigger under construction: variant payload plus the command slot.
struct TriggerDraft<K> {
    payload: K,
    command: Option<SoundCommand>,
    commands_seen: u32,
}

impl<K> TriggerDraft<K> {
    fn new(payload: K) -> Self {
        TriggerDraft {
            payload,
            command: None,
            commands_seen: 0,
        }
    }

    /// A later command replaces an earlier one.
    fn attach(&mut self, r: &mut dyn Reader, build: CommandBuilder) -> Result<(), StfError> {
        self.commands_seen += 1;
        if self.commands_seen > 1 {
            r.warn("found multiple play commands");
        }
        self.command = Some(build(r)?);
        Ok(())
    }
}

fn command_builder(keyword: &str) -> Option<CommandBuilder> {
    COMMANDS
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|&(_, build)| build)
}

static NO_EXTRA_KEYWORDS: Lazy<KeywordTable<TriggerDraft<()>>> =
    Lazy::new(KeywordTable::<TriggerDraft<()>>::new);

static RANDOM_KEYWORDS: Lazy<KeywordTable<TriggerDraft<RandomTrigger>>> = Lazy::new(|| {
    KeywordTable::<TriggerDraft<RandomTrigger>>::new()
        .on("delayminmax", |r, d| {
            d.payload.delay = r.read_range(Units::None)?;
            Ok(())
        })
        .on("volumeminmax", |r, d| {
            d.payload.volume = r.read_range(Units::None)?;
            Ok(())
        })
});

static DISTANCE_KEYWORDS: Lazy<KeywordTable<TriggerDraft<DistanceTravelledTrigger>>> =
    Lazy::new(|| {
        KeywordTable::<TriggerDraft<DistanceTravelledTrigger>>::new()
            .on("distminmax", |r, d| {
                d.payload.distance = r.read_range(Units::Distance)?;
                Ok(())
            })
            .on("volumeminmax", |r, d| {
                d.payload.volume = r.read_range(Units::None)?;
                Ok(())
            })
    });

static TRIGGERS_KEYWORDS: Lazy<KeywordTable<Vec<Trigger>>> = Lazy::new(|| {
    fn add_distance_travelled(
        r: &mut dyn Reader,
        triggers: &mut Vec<Trigger>,
    ) -> Result<(), StfError> {
        triggers.push(distance_travelled_trigger(r)?);
        Ok(())
    }
    KeywordTable::<Vec<Trigger>>::new()
        .on("initialtrigger", |r, ts| {
            ts.push(initial_trigger(r)?);
            Ok(())
        })
        .on("discretetrigger", |r, ts| {
            ts.push(discrete_trigger(r)?);
            Ok(())
        })
        .on("randomtrigger", |r, ts| {
            ts.push(random_trigger(r)?);
            Ok(())
        })
        .on("variabletrigger", |r, ts| {
            ts.push(variable_trigger(r)?);
            Ok(())
        })
        .on("disttravelledtrigger", add_distance_travelled)
        .on("distancetravelledtrigger", add_distance_travelled)
});

/// `Triggers ( count ... )`. The declared count is not checked; triggers
/// that ended up without a command are reported as errors but kept.
pub(crate) fn build_triggers(r: &mut dyn Reader) -> Result<Vec<Trigger>, StfError> {
    r.must_match("(")?;
    let _declared = r.read_int(Units::None)?;
    let mut triggers = Vec::new();
    parse_block_body(r, &mut triggers, &TRIGGERS_KEYWORDS)?;

    for trigger in &triggers {
        if trigger.command.is_none() {
            r.error("trigger lacks a sound command");
        }
    }
    Ok(triggers)
}

/// Shared item loop. Assumes the variant's leading fields are consumed.
fn trigger_body<K>(
    r: &mut dyn Reader,
    payload: K,
    extra: &KeywordTable<TriggerDraft<K>>,
) -> Result<(K, Option<SoundCommand>), StfError> {
    let mut draft = TriggerDraft::new(payload);
    while !r.at_end_of_block() {
        let token = r.read_token()?;
        match command_builder(&fold_keyword(&token)) {
            Some(build) => draft.attach(r, build)?,
            None => dispatch(r, &mut draft, extra, &token)?,
        }
    }
    Ok((draft.payload, draft.command))
}

fn initial_trigger(r: &mut dyn Reader) -> Result<Trigger, StfError> {
    r.must_match("(")?;
    let ((), command) = trigger_body(r, (), &NO_EXTRA_KEYWORDS)?;
    Ok(Trigger {
        kind: TriggerKind::Initial,
        command,
    })
}

fn discrete_trigger(r: &mut dyn Reader) -> Result<Trigger, StfError> {
    r.must_match("(")?;
    let id = r.read_int(Units::None)?;
    let ((), command) = trigger_body(r, (), &NO_EXTRA_KEYWORDS)?;
    Ok(Trigger {
        kind: TriggerKind::Discrete { id },
        command,
    })
}

fn random_trigger(r: &mut dyn Reader) -> Result<Trigger, StfError> {
    r.must_match("(")?;
    let (random, command) = trigger_body(r, RandomTrigger::default(), &RANDOM_KEYWORDS)?;
    Ok(Trigger {
        kind: TriggerKind::Random(random),
        command,
    })
}

fn distance_travelled_trigger(r: &mut dyn Reader) -> Result<Trigger, StfError> {
    r.must_match("(")?;
    let (travelled, command) =
        trigger_body(r, DistanceTravelledTrigger::default(), &DISTANCE_KEYWORDS)?;
    Ok(Trigger {
        kind: TriggerKind::DistanceTravelled(travelled),
        command,
    })
}

/// `Variable_Trigger ( Speed_Inc_Past 12.5 <command> )`
fn variable_trigger(r: &mut dyn Reader) -> Result<Trigger, StfError> {
    r.must_match("(")?;
    let name = r.read_token()?;
    let event = match variable_event(&fold_keyword(&name)) {
        Some(event) => event,
        None => {
            r.warn(&format!("unknown variable trigger event {}", name));
            VariableEvent::default()
        }
    };
    let threshold = r.read_float(Units::None)?;
    let ((), command) = trigger_body(r, (), &NO_EXTRA_KEYWORDS)?;
    Ok(Trigger {
        kind: TriggerKind::Variable(VariableTrigger { event, threshold }),
        command,
    })
}

/// `speedincpast`, `variable3decpast`, ... (folded).
fn variable_event(keyword: &str) -> Option<VariableEvent> {
    let (name, direction) = if let Some(name) = keyword.strip_suffix("incpast") {
        (name, Direction::Increase)
    } else if let Some(name) = keyword.strip_suffix("decpast") {
        (name, Direction::Decrease)
    } else {
        return None;
    };
    let variable = match name {
        "speed" => TriggerVariable::Speed,
        "distance" => TriggerVariable::Distance,
        "variable1" => TriggerVariable::Variable1,
        "variable2" => TriggerVariable::Variable2,
        "variable3" => TriggerVariable::Variable3,
        _ => return None,
    };
    Some(VariableEvent {
        variable,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::super::tests::{build_err, build_src};
    use super::*;
    use crate::diagnostics::{Diagnostic, Severity};
    use crate::error::StfError;
    use crate::model::{Range, TriggerRef};

    fn triggers(body: &str) -> (Vec<Trigger>, Vec<Diagnostic>) {
        let src = format!(
            "Tr_SMS ( ScalabiltyGroup ( 0 Streams ( 1 Stream ( Triggers ( {} ) ) ) ) )",
            body
        );
        let (script, diags) = build_src(&src);
        let mut script = script.expect("script");
        let mut streams = script.groups.remove(0).streams.expect("streams");
        (streams.remove(0).triggers, diags)
    }

    #[test]
    fn all_variants_in_order() {
        let (ts, diags) = triggers(
            r#"5
            Initial_Trigger ( StartLoop ( 1 File ( "idle.wav" -1 ) ) )
            Discrete_Trigger ( 9 PlayOneShot ( 1 File ( "horn.wav" -1 ) ) )
            Random_Trigger ( Delay_Min_Max ( 10 20 ) Volume_Min_Max ( 0.5 0.6 ) PlayOneShot ( 0 ) )
            Dist_Travelled_Trigger ( Dist_Min_Max ( 1km 2km ) PlayOneShot ( 0 ) )
            Variable_Trigger ( Speed_Dec_Past 3.5 ReleaseLoopRelease ( ) )"#,
        );
        assert!(diags.is_empty(), "{:?}", diags);
        let names: Vec<&str> = ts.iter().map(|t| t.kind.name()).collect();
        assert_eq!(
            names,
            vec!["Initial", "Discrete", "Random", "DistanceTravelled", "Variable"]
        );
        assert_eq!(ts[1].kind, TriggerKind::Discrete { id: 9 });
        match &ts[2].kind {
            TriggerKind::Random(rt) => {
                assert_eq!(rt.delay, Range::new(10.0, 20.0));
                assert_eq!(rt.volume, Range::new(0.5, 0.6));
            }
            other => panic!("unexpected {:?}", other),
        }
        match &ts[3].kind {
            TriggerKind::DistanceTravelled(dt) => {
                assert_eq!(dt.distance, Range::new(1000.0, 2000.0));
                assert_eq!(dt.volume, Range::new(0.9, 1.0));
            }
            other => panic!("unexpected {:?}", other),
        }
        match &ts[4].kind {
            TriggerKind::Variable(vt) => {
                assert_eq!(vt.event.variable, TriggerVariable::Speed);
                assert_eq!(vt.event.direction, Direction::Decrease);
                assert_eq!(vt.threshold, 3.5);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn random_defaults_when_ranges_absent() {
        let (ts, _) = triggers("1 Random_Trigger ( PlayOneShot ( 0 ) )");
        assert_eq!(ts[0].kind, TriggerKind::Random(RandomTrigger::default()));
    }

    #[test]
    fn long_spelling_of_distance_trigger_accepted() {
        let (ts, _) = triggers("1 DistanceTravelledTrigger ( PlayOneShot ( 0 ) )");
        assert_eq!(ts[0].kind.name(), "DistanceTravelled");
    }

    #[test]
    fn multiple_commands_warn_and_last_wins() {
        let (ts, diags) = triggers(
            "1 Discrete_Trigger ( 3 EnableTrigger ( 1 ) DisableTrigger ( 2 ) SetStreamVolume ( 0.2 ) )",
        );
        assert_eq!(
            ts[0].command,
            Some(SoundCommand::SetStreamVolume { volume: 0.2 })
        );
        let warnings: Vec<&Diagnostic> = diags
            .iter()
            .filter(|d| d.message == "found multiple play commands")
            .collect();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn second_command_replaces_first() {
        let (ts, diags) = triggers("1 Initial_Trigger ( EnableTrigger ( 1 ) DisableTrigger ( 2 ) )");
        assert_eq!(
            ts[0].command,
            Some(SoundCommand::DisableTrigger(TriggerRef { trigger_id: 2 }))
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn back_to_back_play_commands_keep_last_file_list() {
        let (ts, diags) = triggers(
            r#"1 Initial_Trigger ( PlayOneShot ( 1 File ( "a.wav" -1 ) ) PlayOneShot ( 1 File ( "b.wav" -1 ) ) )"#,
        );
        let cmd = ts[0].command.as_ref().expect("command");
        assert!(matches!(cmd, SoundCommand::PlayOneShot(_)));
        assert_eq!(cmd.sounds().unwrap().files, vec!["b.wav"]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "found multiple play commands");
    }

    #[test]
    fn trigger_without_command_is_error_but_kept() {
        let (ts, diags) = triggers(
            "2 Discrete_Trigger ( 4 ) Initial_Trigger ( PlayOneShot ( 0 ) )",
        );
        assert_eq!(ts.len(), 2);
        assert!(ts[0].command.is_none());
        assert!(ts[1].command.is_some());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].message, "trigger lacks a sound command");
    }

    #[test]
    fn unknown_event_warns_and_defaults() {
        let (ts, diags) = triggers("1 Variable_Trigger ( Pressure_Inc_Past 2 PlayOneShot ( 0 ) )");
        match &ts[0].kind {
            TriggerKind::Variable(vt) => {
                assert_eq!(vt.event, VariableEvent::default());
                assert_eq!(vt.threshold, 2.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn unknown_trigger_content_skipped() {
        let (ts, diags) = triggers(
            "1 Initial_Trigger ( Future ( 1 2 ) ( nested ) PlayOneShot ( 0 ) )",
        );
        assert!(ts[0].command.is_some());
        assert!(diags.is_empty());
    }

    #[test]
    fn event_names() {
        assert_eq!(
            variable_event("variable2incpast"),
            Some(VariableEvent {
                variable: TriggerVariable::Variable2,
                direction: Direction::Increase,
            })
        );
        assert_eq!(
            variable_event("distancedecpast").map(|e| e.variable),
            Some(TriggerVariable::Distance)
        );
        assert_eq!(variable_event("speed"), None);
        assert_eq!(variable_event("throttleincpast"), None);
    }

    #[test]
    fn missing_threshold_is_fatal() {
        let err = build_err(
            "Tr_SMS ( ScalabiltyGroup ( 0 Streams ( 1 Stream ( Triggers ( 1 Variable_Trigger ( Speed_Inc_Past PlayOneShot ( 0 ) ) ) ) ) ) )",
        );
        assert!(matches!(err, StfError::InvalidNumber { ref literal, .. } if literal == "PlayOneShot"));
    }
}
