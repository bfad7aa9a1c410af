use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock, RwLockWriteGuard};

type LogFile = Arc<RwLock<Option<File>>>;

/// Hands out writers that mirror every record to stderr and, once
/// [`set_log_file`] has been called, to a file.
#[derive(Clone)]
struct TeeWriter {
    file: LogFile,
}

struct Tee {
    file: LogFile,
}

fn lock(file: &LogFile) -> RwLockWriteGuard<'_, Option<File>> {
    file.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for TeeWriter {
    type Writer = Tee;

    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            file: self.file.clone(),
        }
    }
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = io::stderr().write(buf)?;
        if let Some(file) = lock(&self.file).as_mut() {
            let _ = file.write_all(&buf[..written]);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = lock(&self.file).as_mut() {
            let _ = file.flush();
        }
        Ok(())
    }
}

static WRITER: OnceLock<TeeWriter> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` wins over the `info` default.
pub fn init() {
    let _ = tracing_log::LogTracer::init();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let writer = WRITER
        .get_or_init(|| TeeWriter {
            file: Arc::new(RwLock::new(None)),
        })
        .clone();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .try_init();
}

/// Start (or stop, with `None`) mirroring logs into `log_file`.
pub fn set_log_file(log_file: Option<&Path>) -> io::Result<()> {
    let Some(writer) = WRITER.get() else {
        return Ok(());
    };
    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => None,
    };
    *lock(&writer.file) = file;
    Ok(())
}
