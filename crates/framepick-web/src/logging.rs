/*!
Console logging for the browser.

`initLogging(level)` routes `log` records to `console.*` and installs the
panic hook, so engine warnings and panics show up in devtools.
*/

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

use crate::options::parse_level;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata<'_>) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record<'_>) {
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

/// Install console logging at `level` (`error`, `warn`, `info`, `debug`,
/// `trace` or `off`; unknown names mean `warn`). Safe to call more than once:
/// later calls only change the level.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
  console_error_panic_hook::set_once();

  let filter = parse_level(level).unwrap_or(LevelFilter::Warn);
  if log::set_logger(&LOGGER).is_err() {
    log::debug!("Logger already installed, updating level");
  }
  log::set_max_level(filter);
}
