//! Common test utilities

use std::io::Write;
use std::sync::{Arc, Mutex};

use waypoint::loading::{LoadingStore, ManualClock};

/// Store on a manual clock with the default 5000 ms staleness window
#[allow(dead_code)]
pub fn store_with_clock() -> (LoadingStore, ManualClock) {
    let clock = ManualClock::starting_now();
    let store = LoadingStore::with_clock(Arc::new(clock.clone()), chrono::Duration::milliseconds(5000));
    (store, clock)
}

/// In-memory sink for formatted log output
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records every event at WARN and above
#[allow(dead_code)]
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}
