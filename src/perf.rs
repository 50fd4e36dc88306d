//! Opt-in timing scopes and the render debug log.
//!
//! With `--perf`, every [`Scope`] adds its duration to a per-name tally and
//! [`log_summary`] reports the totals through `tracing` under the `perf`
//! target when the app exits. The render debug log is a separate plain-text
//! file for following frame-by-frame behaviour.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Environment variable naming a render debug log file.
pub const RENDER_DEBUG_LOG_ENV: &str = "HANGEULDOWN_RENDER_DEBUG_LOG";

static ENABLED: AtomicBool = AtomicBool::new(false);
static TALLY: LazyLock<Mutex<BTreeMap<&'static str, ScopeStats>>> =
    LazyLock::new(|| Mutex::new(BTreeMap::new()));
static RENDER_LOG: LazyLock<Mutex<Option<RenderLog>>> = LazyLock::new(|| Mutex::new(None));

/// Accumulated timings for one scope name.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScopeStats {
    pub calls: u64,
    pub total_ms: f64,
    pub max_ms: f64,
}

/// Times the enclosing block; records on drop.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        let mut tally = lock(&TALLY);
        let stats = tally.entry(self.name).or_default();
        stats.calls += 1;
        stats.total_ms += elapsed_ms;
        stats.max_ms = stats.max_ms.max(elapsed_ms);
    }
}

#[derive(Debug)]
struct RenderLog {
    start: Instant,
    writer: BufWriter<File>,
}

// A panic while holding a lock must not take the diagnostics down with it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Snapshot of the timings recorded so far.
pub fn summary() -> BTreeMap<&'static str, ScopeStats> {
    lock(&TALLY).clone()
}

/// Report every recorded scope, slowest total first.
pub fn log_summary() {
    if !is_enabled() {
        return;
    }
    let mut rows: Vec<_> = summary().into_iter().collect();
    rows.sort_by(|a, b| b.1.total_ms.total_cmp(&a.1.total_ms));
    for (name, stats) in rows {
        #[allow(clippy::cast_precision_loss)]
        let mean_ms = stats.total_ms / stats.calls.max(1) as f64;
        tracing::info!(
            target: "perf",
            scope = name,
            calls = stats.calls,
            total_ms = format_args!("{:.3}", stats.total_ms),
            mean_ms = format_args!("{mean_ms:.3}"),
            max_ms = format_args!("{:.3}", stats.max_ms),
            "scope summary"
        );
    }
}

/// Start writing render events to `path`, or stop when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = lock(&RENDER_LOG);
    *log = match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "hangeuldown render debug log start")?;
            writer.flush()?;
            Some(RenderLog {
                start: Instant::now(),
                writer,
            })
        }
        None => None,
    };
    Ok(())
}

/// Append one event line to the render debug log, if it is open.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = lock(&RENDER_LOG);
    let Some(log) = log.as_mut() else {
        return;
    };
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    let _ = writeln!(
        log.writer,
        "[{elapsed_ms:>10.3} ms] {name}: {}",
        detail.as_ref()
    );
    let _ = log.writer.flush();
}
