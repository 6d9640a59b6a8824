//! Platform abstraction layer
//!
//! Handles browser/native differences for logging setup. Storage backends live
//! in `persistence`.

/// Initialise the global logger once per process
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Route `log` to the browser console and panics to `console.error`
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Seed for a new session when settings don't pin one
pub fn entropy_seed() -> u64 {
    rand::random()
}
