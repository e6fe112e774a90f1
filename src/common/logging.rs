//! Logger initialisation.

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Logs go to stderr so stdout stays clean for revealed messages.
/// Format: `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`
pub fn init_logger(level: LevelFilter) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .init();
}
