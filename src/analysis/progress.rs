/*!
 * Cosmetic progress indicator for long blocking calls.
 *
 * The indicator runs on its own thread and advances linearly from 0% to
 * 100% over the estimated duration. It keeps rendering at 100% if the call
 * overruns. A shared stop flag ends the thread, and the thread is always
 * joined before the wrapped call's result is handed back, whether the call
 * succeeded, failed or panicked.
 */

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::warn;

/// Redraw interval of the indicator thread
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

const DEFAULT_LABEL: &str = "Querying LLM";

// Clears the liveness flag when the indicator thread's closure ends
struct AliveFlag(Arc<AtomicBool>);

impl Drop for AliveFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a running progress indicator thread
///
/// Dropping the handle stops and joins the thread.
#[derive(Debug)]
pub struct ProgressIndicator {
    stop: Arc<AtomicBool>,
    alive: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressIndicator {
    /// Start an indicator drawing to stderr
    pub fn start(estimated: Duration, label: &str) -> Self {
        Self::spawn(estimated, label, ProgressDrawTarget::stderr())
    }

    /// Start an indicator that runs the same thread but draws nothing
    pub fn hidden(estimated: Duration) -> Self {
        Self::spawn(estimated, DEFAULT_LABEL, ProgressDrawTarget::hidden())
    }

    fn spawn(estimated: Duration, label: &str, target: ProgressDrawTarget) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let alive = Arc::new(AtomicBool::new(true));

        let thread_stop = Arc::clone(&stop);
        let alive_flag = AliveFlag(Arc::clone(&alive));
        let label = label.to_string();

        let spawned = thread::Builder::new()
            .name("progress-indicator".to_string())
            .spawn(move || {
                let _alive = alive_flag;
                draw_until_stopped(estimated, label, target, &thread_stop);
            });

        // On spawn failure the closure, and with it the liveness flag, is already dropped
        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Could not start progress indicator: {}", e);
                None
            }
        };

        Self { stop, alive, handle }
    }

    /// Flag that stays true while the indicator thread is running
    pub fn liveness(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.alive)
    }

    /// Signal the thread to stop and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                warn!("Progress indicator thread panicked");
            }
        }
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn indicator_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}

fn draw_until_stopped(estimated: Duration, label: String, target: ProgressDrawTarget, stop: &AtomicBool) {
    let bar = ProgressBar::with_draw_target(Some(100), target);
    bar.set_style(indicator_style());
    bar.set_message(label);

    let started = Instant::now();
    while !stop.load(Ordering::Acquire) {
        bar.set_position(progress_percent(started.elapsed(), estimated));
        bar.tick();
        thread::park_timeout(TICK_INTERVAL);
    }

    // Leave the last frame on screen; an overrun shows as a full bar
    bar.abandon();
}

/// Linear progress of `elapsed` against `estimated`, capped at 100
pub fn progress_percent(elapsed: Duration, estimated: Duration) -> u64 {
    if estimated.is_zero() {
        return 100;
    }
    let percent = elapsed.as_secs_f64() / estimated.as_secs_f64() * 100.0;
    (percent as u64).min(100)
}

/// Run a blocking operation while `indicator` renders; the indicator is joined before returning
pub fn with_indicator<T, F>(indicator: ProgressIndicator, operation: F) -> T
where
    F: FnOnce() -> T,
{
    let output = operation();
    indicator.stop();
    output
}

/// Async counterpart of `with_indicator`
pub async fn with_indicator_async<F>(indicator: ProgressIndicator, future: F) -> F::Output
where
    F: Future,
{
    let output = future.await;
    indicator.stop();
    output
}

/// Run a blocking operation with a stderr progress bar sized to `estimated_secs`
pub fn run_with_progress<T, F>(operation: F, estimated_secs: u64) -> T
where
    F: FnOnce() -> T,
{
    let indicator = ProgressIndicator::start(Duration::from_secs(estimated_secs), DEFAULT_LABEL);
    with_indicator(indicator, operation)
}

/// Await a future with a stderr progress bar sized to `estimated_secs`
pub async fn run_with_progress_async<F>(future: F, estimated_secs: u64) -> F::Output
where
    F: Future,
{
    let indicator = ProgressIndicator::start(Duration::from_secs(estimated_secs), DEFAULT_LABEL);
    with_indicator_async(indicator, future).await
}
