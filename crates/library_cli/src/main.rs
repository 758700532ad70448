//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `library_core` linkage.
//! - Open the catalog configured through `LIBRARY_*` variables and report its size.
//! - Write core log events under `LIBRARY_LOG_DIR` when it is set. Without it
//!   no logger is installed; embedding callers own logging setup.

use library_core::{
    default_log_level, init_logging, LibraryConfig, LibraryContext, LibraryEntities,
    LoggingError,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("library_core version={}", library_core::core_version());

    match report_counts() {
        Ok((authors, books)) => {
            println!("authors={authors} books={books}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn report_counts() -> Result<(u64, u64), Box<dyn std::error::Error>> {
    let config = LibraryConfig::from_env()?;
    start_logging(&config)?;

    let context = LibraryContext::open(&config)?;
    let authors = context.author_entities().count()?;
    let books = context.book_entities().count()?;
    context.close()?;
    Ok((authors, books))
}

/// Returns whether a file logger was started for `config`.
fn start_logging(config: &LibraryConfig) -> Result<bool, LoggingError> {
    match config.log_dir.as_deref() {
        Some(log_dir) => init_logging(default_log_level(), log_dir).map(|()| true),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::start_logging;
    use library_core::{logging_status, LibraryConfig};

    #[test]
    fn logging_follows_configured_directory() {
        let mut config = LibraryConfig::in_memory();
        assert!(!start_logging(&config).unwrap());
        assert!(logging_status().is_none());

        let dir = tempfile::tempdir().unwrap();
        config.log_dir = Some(dir.path().to_str().unwrap().to_string());
        assert!(start_logging(&config).unwrap());

        let (_, active_dir) = logging_status().expect("logger should be active");
        assert_eq!(active_dir, dir.path());
    }
}
