//! File logging for debugging interactive sessions.
//!
//! The crate logs through the `log` facade and emits nothing unless the
//! application installs a logger. With the `logging` feature this module
//! provides a ready-made file logger, for when the display backend owns
//! the terminal.

#[cfg(feature = "logging")]
pub fn init_logger(
    min_level: log::LevelFilter, log_file_name: &std::ffi::OsStr,
) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            // The event loop is single-threaded, so querying the local
            // offset here is safe; fall back to UTC if it is unavailable.
            let now = time::OffsetDateTime::now_local()
                .unwrap_or_else(|_| time::OffsetDateTime::now_utc());

            out.finish(format_args!(
                "{}[{}][{}] {}",
                now.format(&time::macros::format_description!(
                    // The weird "[[[" is because we need to escape a bracket ("[[") to show one "[".
                    // See https://time-rs.github.io/book/api/format-description.html
                    "[[[year]-[month]-[day]][[[hour]:[minute]:[second][subsecond digits:9]]"
                ))
                .unwrap(),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(min_level)
        .chain(fern::log_file(log_file_name)?)
        .apply()?;

    Ok(())
}
