//! A `log` backend for tests that records what the current thread logs.

use std::{cell::RefCell, sync::Once};

use log::{Level, LevelFilter, Metadata, Record};

thread_local! {
    static RECORDS: RefCell<Option<Vec<(Level, String)>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with_borrow_mut(|records| {
            if let Some(records) = records {
                records.push((record.level(), record.args().to_string()));
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Runs `f` and returns its result with every record it logged on this thread.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<(Level, String)>) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });

    RECORDS.with_borrow_mut(|records| *records = Some(Vec::new()));
    let out = f();
    let records = RECORDS
        .with_borrow_mut(|records| records.take())
        .unwrap_or_default();
    (out, records)
}
