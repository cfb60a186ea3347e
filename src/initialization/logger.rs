//! Logger initialization.
//!
//! Console output goes through `env_logger`, either as colored plain lines or
//! as JSON lines. Each job additionally writes its own text log (see
//! [`crate::job::JobLog`]); that file is not affected by the settings here.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter};

const CRATE_TARGET: &str = "mail_posture";

/// Third-party modules capped below the requested level.
///
/// hickory retries truncated or malformed UDP answers itself and warns about
/// each one; the WHOIS stack logs every HTTP exchange at debug.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    ("hickory_proto", LevelFilter::Error),
    ("hickory_resolver", LevelFilter::Warn),
    ("whois_service", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
];

/// `mail_posture::dns::records` is shown as `dns::records`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(CRATE_TARGET)
        .map(|rest| rest.trim_start_matches("::"))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(target)
}

fn format_plain(level: Level, target: &str, message: &str) -> String {
    let (emoji, colored_level) = match level {
        Level::Error => ("❌", level.to_string().red()),
        Level::Warn => ("⚠️", level.to_string().yellow()),
        Level::Info => ("✔️", level.to_string().green()),
        Level::Debug => ("🔍", level.to_string().blue()),
        Level::Trace => ("🔬", level.to_string().purple()),
    };
    format!(
        "{} {} [{}] {}",
        emoji,
        short_target(target).cyan(),
        colored_level,
        message
    )
}

fn format_json(ts_millis: i64, level: Level, target: &str, message: &str) -> String {
    serde_json::json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": target,
        "msg": message,
    })
    .to_string()
}

/// Initializes the console logger.
///
/// `RUST_LOG` is read first; `level` then overrides the global, crate and
/// [`QUIET_MODULES`] levels, so `--log-level` always wins. `RUST_LOG` entries
/// for any other module still apply (`RUST_LOG=tokio=trace`).
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, ceiling) in QUIET_MODULES {
        builder.filter_module(module, level.min(*ceiling));
    }
    builder.filter_module(CRATE_TARGET, level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    format_json(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    format_plain(record.level(), record.target(), &record.args().to_string())
                )
            });
        }
    }

    // try_init so a second call (tests, embedding) is an error, not a panic
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}
