//! albumwall binary.
//!
//! - No arguments or `--desktop`: runs the hotkey-driven desktop app.
//! - Subcommands (e.g. `albumwall album list`): runs CLI commands.

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let run_desktop = args.len() == 1 || args.get(1).is_some_and(|arg| arg == "--desktop");

    let result = if run_desktop { albumwall_lib::run() } else { albumwall_lib::cli::run() };

    if let Err(err) = result {
        eprintln!("albumwall: {err}");
        std::process::exit(1);
    }
}
