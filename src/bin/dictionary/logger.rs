use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialize the logger. `RUST_LOG` wins when it's set; otherwise each `-v`
/// raises the level by one step from `warn`. Records go to stderr so they
/// don't mix with the menu on stdout. Levels are coloured when stderr is a
/// terminal.
pub fn initialize_logger(verbosity: u8) {
    let default = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let env = Env::default().default_filter_or(default.as_str());

    let mut builder = Builder::from_env(env);

    // Add the module path and line number, and colour the level.
    builder.format(|buf, record| {
        let path = record.module_path().unwrap_or("");
        let line = match record.line() {
            Some(l) => l.to_string(),
            None => "".to_string(),
        };
        let level_style = buf.default_level_style(record.level());

        writeln!(
            buf,
            "[{} {}{}{:#} {}:{}] {}",
            buf.timestamp_seconds(),
            level_style,
            record.level(),
            level_style,
            path,
            line,
            record.args()
        )
    });

    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_formats_with_its_style() {
        initialize_logger(3);

        log::error!("error record");
        log::warn!("warn record");
        log::info!("info record");
        log::debug!("debug record");
        log::trace!("trace record");

        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(log::max_level(), LevelFilter::Trace);
        }
    }
}
