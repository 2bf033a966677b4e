//! Single-line text prompt through the platform's dialog tool.
//!
//! There is no native text-entry dialog in the file-dialog toolkit, so the
//! prompt shells out: PowerShell's `InputBox` on Windows, `zenity` or
//! `kdialog` elsewhere.

use crate::utils::command::run_capture;

/// Shows a text prompt and returns the entered line.
///
/// Returns `None` when the user cancels or no prompt tool is available.
pub fn prompt_line(title: &str, message: &str, default: &str) -> Option<String> {
    for (binary, args) in prompt_commands(title, message, default) {
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        match run_capture(binary, &arg_refs) {
            Ok(output) => return output.and_then(|text| normalize_answer(&text)),
            Err(err) => {
                tracing::debug!(tool = binary, error = %err, "prompt tool unavailable");
            }
        }
    }

    tracing::warn!("no text prompt tool found, treating prompt as cancelled");
    None
}

/// Candidate prompt invocations for the current platform, in preference order.
fn prompt_commands(title: &str, message: &str, default: &str) -> Vec<(&'static str, Vec<String>)> {
    if cfg!(windows) {
        let script = format!(
            "Add-Type -AssemblyName Microsoft.VisualBasic; \
             [Microsoft.VisualBasic.Interaction]::InputBox('{}', '{}', '{}')",
            escape_powershell(message),
            escape_powershell(title),
            escape_powershell(default),
        );
        vec![("powershell", vec![
            "-NoProfile".to_string(),
            "-Command".to_string(),
            script,
        ])]
    } else {
        vec![
            ("zenity", vec![
                "--entry".to_string(),
                format!("--title={title}"),
                format!("--text={message}"),
                format!("--entry-text={default}"),
            ]),
            ("kdialog", vec![
                "--title".to_string(),
                title.to_string(),
                "--inputbox".to_string(),
                message.to_string(),
                default.to_string(),
            ]),
        ]
    }
}

/// First line of the tool output; an empty answer counts as cancel.
fn normalize_answer(output: &str) -> Option<String> {
    let line = output.lines().next().unwrap_or("").trim();
    (!line.is_empty()).then(|| line.to_string())
}

fn escape_powershell(text: &str) -> String { text.replace('\'', "''") }
