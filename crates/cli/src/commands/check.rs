use std::path::Path;
use std::process;

use sms_core::Severity;

use super::report_load_error;
use crate::OutputFormat;

pub(crate) fn cmd_check(file: &Path, deny_warnings: bool, output: OutputFormat, quiet: bool) {
    let sms = match sms_core::load(file) {
        Ok(sms) => sms,
        Err(e) => {
            report_load_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let warnings = sms.warnings().count();
    let errors = sms.errors().count();
    let failed = errors > 0 || (deny_warnings && warnings > 0);

    match output {
        OutputFormat::Json => {
            let result = serde_json::json!({
                "file": sms.path,
                "ok": !failed,
                "warnings": warnings,
                "errors": errors,
                "diagnostics": sms.diagnostics,
            });
            let pretty = serde_json::to_string_pretty(&result)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            if !quiet {
                for d in &sms.diagnostics {
                    println!("{}", d);
                }
                println!(
                    "{}: {} warnings, {} errors",
                    sms.path, warnings, errors
                );
            } else {
                // quiet still surfaces what made the check fail
                for d in sms
                    .diagnostics
                    .iter()
                    .filter(|d| d.severity == Severity::Error || deny_warnings)
                {
                    println!("{}", d);
                }
            }
        }
    }

    if failed {
        process::exit(1);
    }
}
