use std::thread::{self, JoinHandle};

/// Spawns `task` on a thread named `albumwall-{name}`.
///
/// Returns `None` and logs the failure if the thread could not be created.
pub fn spawn_named_thread<F, T>(name: &str, task: F) -> Option<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let thread_name = format!("albumwall-{name}");

    match thread::Builder::new().name(thread_name.clone()).spawn(task) {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
            None
        }
    }
}
