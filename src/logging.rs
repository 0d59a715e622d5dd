/// Diagnostic logging.
///
/// The terminal is owned by the renderer, so log records never go to
/// stderr. When `RUST_LOG` is set they are appended to `deepdrop.log` in
/// the working directory; otherwise logging stays off.

use std::fs::OpenOptions;
use std::io::Write;

use env_logger::{Builder, Target};

const LOG_FILE: &str = "deepdrop.log";

pub fn init() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let file = match OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Could not open {LOG_FILE}: {e}");
            return;
        }
    };
    if let Err(e) = install(Box::new(file)) {
        eprintln!("Could not start logging: {e}");
    }
}

/// Install the global logger writing to `target`. Fails if a logger is
/// already installed.
fn install(target: Box<dyn Write + Send>) -> Result<(), log::SetLoggerError> {
    Builder::from_default_env()
        .target(Target::Pipe(target))
        .format_timestamp_millis()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_reports_an_error() {
        let _ = install(Box::new(std::io::sink()));
        assert!(install(Box::new(std::io::sink())).is_err());
    }
}
