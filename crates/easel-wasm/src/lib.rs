//! Easel WASM - WebAssembly bindings for the Easel editing session
//!
//! This crate exposes `easel-core`'s [`ImageSession`](easel_core::ImageSession)
//! to JavaScript. The host owns one [`JsImageSession`], forwards pointer and
//! toolbar events to it and paints `pixels()` onto its canvas after every
//! call.
//!
//! # Module Structure
//!
//! - `session` - the `JsImageSession` wrapper and the download side effect
//! - `types` - parsing host strings into core enums, error conversion
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImageSession } from '@easel/wasm';
//!
//! await init();
//!
//! const session = new JsImageSession(undefined);
//! session.attach_surface();
//! session.load_image(new Uint8Array(await file.arrayBuffer()), file.type, file.name);
//! session.rotate_image(90);
//! session.download('png');
//! ```

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

mod session;
mod types;

pub use session::{JsExportedImage, JsImageSession, JsLoadTicket};

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // A logger may already be installed when the module is re-initialized.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Set the console log level: `"off"`, `"error"`, `"warn"`, `"info"`,
/// `"debug"` or `"trace"`. Unknown names are ignored.
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    if let Some(filter) = parse_level(level) {
        log::set_max_level(filter);
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}
