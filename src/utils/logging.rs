use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Initialize the logger with custom formatting.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(level: LevelFilter) {
    let _ = Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter(None, level)
        // actix is chatty at debug; keep it one notch quieter than ours
        .filter(Some("actix_server"), level.min(LevelFilter::Info))
        .try_init();
}

/// Get log level from string
pub fn get_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_level_is_case_insensitive() {
        assert_eq!(get_log_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(get_log_level("Warn"), LevelFilter::Warn);
        assert_eq!(get_log_level("off"), LevelFilter::Off);
    }

    #[test]
    fn test_get_log_level_falls_back_to_info() {
        assert_eq!(get_log_level("verbose"), LevelFilter::Info);
        assert_eq!(get_log_level(""), LevelFilter::Info);
    }

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        init_logger(LevelFilter::Off);
        init_logger(LevelFilter::Off);
    }
}
