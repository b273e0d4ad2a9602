// Console logging for DotMerge Core
//
// Writes to the browser console on wasm32 and to stderr on native targets,
// so the same call sites work in the browser and under `cargo test`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    // The browser console shows its own level marker.
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Verbose trace of a single operation
pub fn debug(scope: &str, msg: &str) {
    emit(Level::Debug, &format!("[dotmerge:{}] {}", scope, msg));
}

/// Lifecycle message (session start, phase changes)
pub fn info(scope: &str, msg: &str) {
    emit(Level::Info, &format!("[dotmerge:{}] {}", scope, msg));
}

/// Rejected command or recoverable misuse
pub fn warn(scope: &str, msg: &str) {
    emit(Level::Warn, &format!("[dotmerge:{}] {}", scope, msg));
}

pub fn error(scope: &str, msg: &str) {
    emit(Level::Error, &format!("[dotmerge:{}] {}", scope, msg));
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let value = JsValue::from_str(line);
    match level {
        Level::Debug => console::debug_1(&value),
        Level::Info => console::info_1(&value),
        Level::Warn => console::warn_1(&value),
        Level::Error => console::error_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(level: Level, line: &str) {
    eprintln!("{:5} {}", level.label(), line);
}
