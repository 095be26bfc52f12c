//! Copying the address to the system clipboard.

use std::io::Write as _;
use std::process::{Command, Stdio};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

/// Clipboard helpers tried in order before falling back to OSC 52.
const COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// Copies `text` with the first available clipboard helper, or asks the
/// terminal to do it through an OSC 52 escape sequence.
pub fn copy(text: &str) -> anyhow::Result<()> {
    for (program, args) in COMMANDS {
        if copy_with(program, args, text) {
            debug!("Copied with {program}");
            return Ok(());
        }
    }

    let mut stdout = std::io::stdout();
    stdout.write_all(osc52(text).as_bytes())?;
    stdout.flush()?;
    debug!("Copied with OSC 52");
    Ok(())
}

fn copy_with(program: &str, args: &[&str], text: &str) -> bool {
    let Ok(mut child) = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    else {
        return false;
    };

    let written = child
        .stdin
        .take()
        .is_some_and(|mut stdin| stdin.write_all(text.as_bytes()).is_ok());
    child.wait().is_ok_and(|status| status.success()) && written
}

/// Terminal escape sequence that sets the clipboard to `text`.
fn osc52(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
