use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolve the absolute path to an executable binary.
///
/// Absolute paths are checked as-is. Otherwise the binary is searched for in:
/// 1. Any directory in the `ALBUMWALL_EXTRA_PATHS` env var (platform path
///    separator).
/// 2. The current process `PATH`.
/// 3. A few common install locations for user tools.
///
/// On Windows the `.exe` suffix is tried as well.
///
/// # Errors
///
/// Returns a descriptive reason when the binary is not found or not
/// executable.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, String> {
    if binary.is_empty() {
        return Err("Binary name cannot be empty".to_string());
    }

    let candidate = Path::new(binary);
    if candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(format!("Binary at {} is not executable", candidate.display()))
        };
    }

    let mut search_paths = Vec::new();

    if let Some(extra) = env::var_os("ALBUMWALL_EXTRA_PATHS") {
        search_paths.extend(env::split_paths(&extra));
    }

    if let Some(path_var) = env::var_os("PATH") {
        search_paths.extend(env::split_paths(&path_var));
    }

    #[cfg(unix)]
    search_paths.extend([
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/usr/bin"),
        PathBuf::from("/opt/homebrew/bin"),
    ]);

    if let Some(home) = dirs::home_dir() {
        search_paths.push(home.join(".local/bin"));
    }

    for directory in search_paths {
        if directory.as_os_str().is_empty() {
            continue;
        }

        for name in candidate_names(binary) {
            let candidate_path = directory.join(&name);
            if is_executable(&candidate_path) {
                return Ok(candidate_path);
            }
        }
    }

    Err(format!(
        "Unable to locate executable '{binary}' in known search paths"
    ))
}

/// Runs `binary` with `args` and captures its standard output.
///
/// Returns `Ok(None)` when the program exits unsuccessfully, which dialog
/// tools use to signal that the user cancelled.
///
/// # Errors
///
/// Returns an error if the binary cannot be found or started.
pub fn run_capture(binary: &str, args: &[&str]) -> Result<Option<String>, String> {
    let path = resolve_binary(binary)?;
    let output = Command::new(&path)
        .args(args)
        .output()
        .map_err(|err| format!("failed to run {}: {err}", path.display()))?;

    if !output.status.success() {
        tracing::debug!(binary, status = %output.status, "command exited unsuccessfully");
        return Ok(None);
    }

    Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
}

fn candidate_names(binary: &str) -> Vec<String> {
    if cfg!(windows) && Path::new(binary).extension().is_none() {
        vec![format!("{binary}.exe"), binary.to_string()]
    } else {
        vec![binary.to_string()]
    }
}

fn is_executable(path: &Path) -> bool {
    use std::fs;

    match fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return false;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                metadata.permissions().mode() & 0o111 != 0
            }

            #[cfg(not(unix))]
            {
                true
            }
        }
        Err(_) => false,
    }
}
