pub(crate) mod check;
pub(crate) mod parse;

use sms_core::StfError;

use crate::OutputFormat;

/// Print a fatal load error to stderr.
pub(crate) fn report_load_error(e: &StfError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", e);
            }
        }
    }
}
