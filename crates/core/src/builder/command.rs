//! Sound commands attached to triggers.

use once_cell::sync::Lazy;

use super::{fold_keyword, parse_block_body, KeywordTable};
use crate::error::StfError;
use crate::model::{PlaySounds, SelectionMethod, SoundCommand, TriggerRef};
use crate::reader::Reader;
use crate::units::Units;

/// Largest file count a play command may declare. The list is padded to
/// the declared length, so the count bounds the allocation.
pub(crate) const MAX_DECLARED_FILES: usize = 1024;

pub(crate) type CommandBuilder = fn(&mut dyn Reader) -> Result<SoundCommand, StfError>;

/// Every command keyword with the builder for its block.
pub(crate) const COMMANDS: [(&str, CommandBuilder); 8] = [
    ("playoneshot", play_one_shot),
    ("startloop", start_loop),
    ("startlooprelease", start_loop_release),
    ("releaselooprelease", release_loop_release),
    ("releaseloopreleasewithjump", release_loop_release_with_jump),
    ("enabletrigger", enable_trigger),
    ("disabletrigger", disable_trigger),
    ("setstreamvolume", set_stream_volume),
];

struct PlayDraft {
    declared: usize,
    sounds: PlaySounds,
}

static PLAY_KEYWORDS: Lazy<KeywordTable<PlayDraft>> = Lazy::new(|| {
    KeywordTable::<PlayDraft>::new()
        .on("file", |r, d| {
            if d.sounds.files.len() < d.declared {
                r.must_match("(")?;
                let name = r.read_token()?;
                r.read_int(Units::None)?;
                r.skip_rest_of_block()?;
                d.sounds.files.push(name);
            } else {
                r.warn("file count mismatch");
                r.skip_block()?;
            }
            Ok(())
        })
        .on("selectionmethod", |r, d| {
            r.must_match("(")?;
            let method = r.read_token()?;
            match fold_keyword(&method).as_str() {
                "randomselection" => d.sounds.selection = SelectionMethod::Random,
                "sequentialselection" => d.sounds.selection = SelectionMethod::Sequential,
                _ => r.warn(&format!("unknown selection method {}", method)),
            }
            r.skip_rest_of_block()
        })
});

/// `( count File ( "name" -1 ) ... SelectionMethod ( ... ) )`.
///
/// The file list always has the declared length: extra `File` entries are
/// dropped with a warning, and missing ones are left as empty names. A count
/// above [`MAX_DECLARED_FILES`] is fatal.
fn play_sounds(r: &mut dyn Reader) -> Result<PlaySounds, StfError> {
    r.must_match("(")?;
    let declared = r.read_count(MAX_DECLARED_FILES)?;
    let mut draft = PlayDraft {
        declared,
        sounds: PlaySounds::default(),
    };
    parse_block_body(r, &mut draft, &PLAY_KEYWORDS)?;
    draft.sounds.files.resize(declared, String::new());
    Ok(draft.sounds)
}

fn play_one_shot(r: &mut dyn Reader) -> Result<SoundCommand, StfError> {
    Ok(SoundCommand::PlayOneShot(play_sounds(r)?))
}

fn start_loop(r: &mut dyn Reader) -> Result<SoundCommand, StfError> {
    Ok(SoundCommand::StartLoop(play_sounds(r)?))
}

fn start_loop_release(r: &mut dyn Reader) -> Result<SoundCommand, StfError> {
    Ok(SoundCommand::StartLoopRelease(play_sounds(r)?))
}

fn release_loop_release(r: &mut dyn Reader) -> Result<SoundCommand, StfError> {
    r.skip_block()?;
    Ok(SoundCommand::ReleaseLoopRelease)
}

fn release_loop_release_with_jump(r: &mut dyn Reader) -> Result<SoundCommand, StfError> {
    r.skip_block()?;
    Ok(SoundCommand::ReleaseLoopReleaseWithJump)
}

fn trigger_ref(r: &mut dyn Reader) -> Result<TriggerRef, StfError> {
    let trigger_id = r.read_int_block(Units::None)?;
    Ok(TriggerRef { trigger_id })
}

fn enable_trigger(r: &mut dyn Reader) -> Result<SoundCommand, StfError> {
    Ok(SoundCommand::EnableTrigger(trigger_ref(r)?))
}

fn disable_trigger(r: &mut dyn Reader) -> Result<SoundCommand, StfError> {
    Ok(SoundCommand::DisableTrigger(trigger_ref(r)?))
}

fn set_stream_volume(r: &mut dyn Reader) -> Result<SoundCommand, StfError> {
    let volume = r.read_float_block(Units::None)?;
    Ok(SoundCommand::SetStreamVolume { volume })
}
