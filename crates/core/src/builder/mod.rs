//! Recursive-descent construction of the sound-script model.
//!
//! Every entity block follows the same discipline: `(`, then keyword items
//! until the block closes. Each entity kind has a static keyword table; a
//! keyword missing from the table is ignored and a stray `(` skips the
//! nested block, so content written for newer tools still loads.
//!
//! Keywords are folded before lookup: lower-cased with `-` and `_` removed,
//! which lets `scalability-group`, `ScalabilityGroup` and `Scalability_Group`
//! reach the same handler.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::StfError;
use crate::model::SoundScript;
use crate::reader::Reader;

mod command;
mod curve;
mod group;
mod trigger;

pub(crate) type Handler<T> = fn(&mut dyn Reader, &mut T) -> Result<(), StfError>;

/// Keyword → handler dispatch for one entity kind.
pub(crate) struct KeywordTable<T> {
    handlers: HashMap<&'static str, Handler<T>>,
}

impl<T> KeywordTable<T> {
    pub(crate) fn new() -> Self {
        KeywordTable {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` under an already-folded keyword.
    pub(crate) fn on(mut self, keyword: &'static str, handler: Handler<T>) -> Self {
        debug_assert_eq!(keyword, fold_keyword(keyword), "table keys are folded");
        self.handlers.insert(keyword, handler);
        self
    }

    fn get(&self, keyword: &str) -> Option<Handler<T>> {
        self.handlers.get(keyword).copied()
    }
}

pub(crate) fn fold_keyword(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Handle one item token inside a block.
fn dispatch<T>(
    r: &mut dyn Reader,
    target: &mut T,
    table: &KeywordTable<T>,
    token: &str,
) -> Result<(), StfError> {
    if token == "(" {
        return r.skip_rest_of_block();
    }
    match table.get(&fold_keyword(token)) {
        Some(handler) => handler(r, target),
        None => Ok(()),
    }
}

/// Run the keyword loop of a block whose `(` (and any leading values) has
/// already been consumed. Returns after the closing `)`.
pub(crate) fn parse_block_body<T>(
    r: &mut dyn Reader,
    target: &mut T,
    table: &KeywordTable<T>,
) -> Result<(), StfError> {
    while !r.at_end_of_block() {
        let token = r.read_token()?;
        dispatch(r, target, table, &token)?;
    }
    Ok(())
}

/// `( keyword-items... )`
pub(crate) fn parse_block<T>(
    r: &mut dyn Reader,
    target: &mut T,
    table: &KeywordTable<T>,
) -> Result<(), StfError> {
    r.must_match("(")?;
    parse_block_body(r, target, table)
}

// ──────────────────────────────────────────────
// File and script level
// ──────────────────────────────────────────────

static FILE_KEYWORDS: Lazy<KeywordTable<Option<SoundScript>>> = Lazy::new(|| {
    KeywordTable::<Option<SoundScript>>::new().on("trsms", |r, script| {
        *script = Some(build_script(r)?);
        Ok(())
    })
});

static SCRIPT_KEYWORDS: Lazy<KeywordTable<SoundScript>> = Lazy::new(|| {
    fn add_group(r: &mut dyn Reader, script: &mut SoundScript) -> Result<(), StfError> {
        script.groups.push(group::build_group(r)?);
        Ok(())
    }
    KeywordTable::<SoundScript>::new()
        .on("scalabilitygroup", add_group)
        // misspelling written by the MSTS content tools
        .on("scalabiltygroup", add_group)
});

/// Build the model from a whole file. Returns `None` when the file has no
/// `Tr_SMS` block; the last one wins when there are several.
pub fn build_sms(r: &mut dyn Reader) -> Result<Option<SoundScript>, StfError> {
    let mut script = None;
    while !r.eof() {
        let token = r.read_token()?;
        dispatch(r, &mut script, &FILE_KEYWORDS, &token)?;
    }
    Ok(script)
}

/// `Tr_SMS ( ScalabiltyGroup ( ... ) ... )`, positioned after the keyword.
pub fn build_script(r: &mut dyn Reader) -> Result<SoundScript, StfError> {
    let mut script = SoundScript::default();
    parse_block(r, &mut script, &SCRIPT_KEYWORDS)?;
    Ok(script)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use crate::reader::StfReader;

    /// Helper: lex + build a whole file.
    pub(crate) fn build_src(src: &str) -> (Option<SoundScript>, Vec<Diagnostic>) {
        let mut r = StfReader::from_source(src, "test.sms").expect("lex");
        let script = build_sms(&mut r).expect("build");
        (script, r.into_diagnostics())
    }

    pub(crate) fn build_err(src: &str) -> StfError {
        let mut r = StfReader::from_source(src, "test.sms").expect("lex");
        build_sms(&mut r).expect_err("expected a fatal error")
    }

    #[test]
    fn fold_strips_case_and_separators() {
        assert_eq!(fold_keyword("Scalability-Group"), "scalabilitygroup");
        assert_eq!(fold_keyword("Dist_Travelled_Trigger"), "disttravelledtrigger");
        assert_eq!(fold_keyword("ignore-3d"), "ignore3d");
    }

    #[test]
    fn groups_kept_in_input_order() {
        let src = r#"
SIMISA@@@@@@@@@@JINX0x1t______

Tr_SMS (
    ScalabiltyGroup ( 5 )
    ScalabiltyGroup ( 3 )
    scalability-group ( 0 )
)
"#;
        let (script, diags) = build_src(src);
        let levels: Vec<i32> = script
            .unwrap()
            .groups
            .iter()
            .map(|g| g.detail_level)
            .collect();
        assert_eq!(levels, vec![5, 3, 0]);
        assert!(diags.is_empty());
    }

    #[test]
    fn file_without_script_builds_none() {
        let (script, diags) = build_src("SIMISA@@@@@@@@@@JINX0x1t______\ncomment ( nothing here )\n");
        assert!(script.is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn unknown_blocks_skipped_silently_at_every_level() {
        let src = r#"
Tr_SMS (
    Skip ( ScalabiltyGroup ( 9 ) )
    ( orphan block ( nested ) )
    ScalabiltyGroup ( 1
        FutureThing ( a ( b ) c )
        Volume ( 0.5 )
    )
)
"#;
        let (script, diags) = build_src(src);
        let script = script.unwrap();
        assert_eq!(script.groups.len(), 1);
        assert_eq!(script.groups[0].detail_level, 1);
        assert_eq!(script.groups[0].volume, 0.5);
        assert!(diags.is_empty(), "unknown content is never reported: {:?}", diags);
    }

    #[test]
    fn missing_open_paren_is_fatal() {
        let err = build_err("Tr_SMS ScalabiltyGroup ( 1 ) )");
        assert!(matches!(err, StfError::UnexpectedToken { .. }), "{:?}", err);
    }

    #[test]
    fn unclosed_nested_block_is_fatal() {
        let err = build_err("Tr_SMS ( ScalabiltyGroup ( 1 Stuff ( a b");
        assert!(matches!(err, StfError::UnexpectedEof { .. }), "{:?}", err);
    }
}
