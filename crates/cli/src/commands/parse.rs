use std::path::Path;
use std::process;

use sms_core::{SmsFile, SoundCommand, Trigger, TriggerKind};

use super::report_load_error;
use crate::OutputFormat;

pub(crate) fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) {
    let sms = match sms_core::load(file) {
        Ok(sms) => sms,
        Err(e) => {
            report_load_error(&e, output, quiet);
            process::exit(1);
        }
    };
    log::debug!(
        "{}: {} groups, {} diagnostics",
        sms.path,
        sms.groups().len(),
        sms.diagnostics.len()
    );

    match output {
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&sms)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => print!("{}", summarize(&sms)),
    }
}

/// Indented group/stream/trigger outline.
pub(crate) fn summarize(sms: &SmsFile) -> String {
    let mut out = String::new();
    let Some(script) = &sms.script else {
        out.push_str(&format!("{}: no Tr_SMS block\n", sms.path));
        return out;
    };
    out.push_str(&format!(
        "{}: {} groups, {} warnings, {} errors\n",
        sms.path,
        script.groups.len(),
        sms.warnings().count(),
        sms.errors().count()
    ));
    for group in &script.groups {
        let mut flags = Vec::new();
        if group.stereo {
            flags.push("stereo");
        }
        if group.ignore_3d {
            flags.push("ignore3d");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(", {}", flags.join(", "))
        };
        out.push_str(&format!(
            "group {} (volume {}{})\n",
            group.detail_level, group.volume, flags
        ));
        for (i, stream) in group.streams.iter().flatten().enumerate() {
            out.push_str(&format!(
                "  stream {}: priority {}, volume {}, {} triggers\n",
                i,
                stream.priority,
                stream.volume,
                stream.triggers.len()
            ));
            for trigger in &stream.triggers {
                out.push_str(&format!("    {}\n", describe_trigger(trigger)));
            }
        }
    }
    out
}

fn describe_trigger(trigger: &Trigger) -> String {
    let kind = match &trigger.kind {
        TriggerKind::Initial => "Initial".to_string(),
        TriggerKind::Discrete { id } => format!("Discrete({})", id),
        TriggerKind::Random(r) => format!("Random({}..{}s)", r.delay.min, r.delay.max),
        TriggerKind::DistanceTravelled(d) => {
            format!("DistanceTravelled({}..{}m)", d.distance.min, d.distance.max)
        }
        TriggerKind::Variable(v) => format!(
            "Variable({:?} {:?} {})",
            v.event.variable, v.event.direction, v.threshold
        ),
    };
    let command = match &trigger.command {
        None => "(no command)".to_string(),
        Some(SoundCommand::EnableTrigger(t)) => format!("EnableTrigger {}", t.trigger_id),
        Some(SoundCommand::DisableTrigger(t)) => format!("DisableTrigger {}", t.trigger_id),
        Some(SoundCommand::SetStreamVolume { volume }) => format!("SetStreamVolume {}", volume),
        Some(cmd) => match cmd.sounds() {
            Some(sounds) => format!(
                "{} [{}] {:?}",
                cmd.name(),
                sounds.files.join(", "),
                sounds.selection
            ),
            None => cmd.name().to_string(),
        },
    };
    format!("{} -> {}", kind, command)
}
