#![cfg(all(test, feature = "logging"))]

// Test-only `log` sink. Records are kept per thread so parallel tests only
// see their own output.

use std::sync::Mutex;
use std::thread::{self, ThreadId};

struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, log::Level, String)>>,
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let entry = (thread::current().id(), record.level(), record.args().to_string());
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }

    fn flush(&self) {}
}

/// Route `log` records into the capture buffer. Safe to call from every test.
pub(crate) fn install() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
}

/// Remove and return the records logged so far by the calling thread.
pub(crate) fn take() -> Vec<(log::Level, String)> {
    let me = thread::current().id();
    let mut records = LOGGER.records.lock().unwrap_or_else(|e| e.into_inner());
    let (mine, rest): (Vec<_>, Vec<_>) = records.drain(..).partition(|(id, _, _)| *id == me);
    *records = rest;
    mine.into_iter().map(|(_, level, msg)| (level, msg)).collect()
}
