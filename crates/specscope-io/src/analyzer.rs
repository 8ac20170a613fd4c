//! Threaded analyzer runtime.
//!
//! An [`Analyzer`] owns three pieces of shared state and one worker thread:
//!
//! - the sample ring, locked for exactly one push or pop at a time
//! - the [`WorkSignal`] the producer raises after adding samples
//! - the display (surface plus both renderers), locked by the worker for one
//!   window at a time and by configuration and clear calls
//!
//! Lock order is display, then ring. The producer only ever takes the ring
//! lock, so it is never held up for the duration of a window.
//!
//! ```text
//! producer ──push──► Mutex<SampleRing> ◄──pop── worker ──draw──► Mutex<Display<S>>
//!     └───notify──► WorkSignal ──wake──────────┘
//! ```

use crate::signal::WorkSignal;
use crate::{Error, Result};
use parking_lot::Mutex;
use specscope_core::{
    DEFAULT_CAPACITY, Display, InitError, Overrun, PixelSurface, Sample, SampleRing, SampleSource,
    SpectrumColors, TransformEngine, Underrun, WaveformColors, test_tone,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Construction parameters for an [`Analyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Samples per window; also the number of waveform columns.
    pub window_size: usize,
    /// Number of spectrum bars.
    pub bars: usize,
    /// Ring capacity in samples. Must be at least `window_size`.
    pub capacity: usize,
    /// How long the worker sleeps between shutdown checks when idle.
    pub wake_timeout: Duration,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            window_size: 256,
            bars: 32,
            capacity: DEFAULT_CAPACITY,
            wake_timeout: Duration::from_millis(100),
        }
    }
}

impl AnalyzerOptions {
    /// Options for the given window and bar count, defaults for the rest.
    pub fn new(window_size: usize, bars: usize) -> Self {
        Self {
            window_size,
            bars,
            ..Self::default()
        }
    }
}

/// Point-in-time copy of the runtime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    /// Samples dropped because the ring was full.
    pub underruns: u64,
    /// Windows abandoned because the ring ran dry.
    pub overruns: u64,
    /// Windows fully processed.
    pub windows: u64,
    /// Samples currently buffered.
    pub buffered: usize,
}

/// Producer-side state shared by the analyzer, its worker and every producer handle.
#[derive(Debug)]
struct Intake {
    ring: Mutex<SampleRing>,
    signal: WorkSignal,
    window_size: usize,
    underruns: AtomicU64,
    overruns: AtomicU64,
    windows: AtomicU64,
    /// Set after the first dropped sample of a burst; cleared by the next accepted one.
    in_underrun: AtomicBool,
}

impl Intake {
    fn push(&self, sample: Sample) -> bool {
        let result = self.ring.lock().push(sample);
        match result {
            Ok(()) => {
                if self.in_underrun.load(Ordering::Relaxed) {
                    self.in_underrun.store(false, Ordering::Relaxed);
                }
                true
            }
            Err(Underrun) => {
                let total = self.underruns.fetch_add(1, Ordering::Relaxed) + 1;
                if !self.in_underrun.swap(true, Ordering::Relaxed) {
                    warn!(total, "sample buffer full, dropping samples");
                }
                false
            }
        }
    }

    fn push_all(&self, samples: impl IntoIterator<Item = Sample>) -> usize {
        samples.into_iter().filter(|&s| self.push(s)).count()
    }

    fn buffered(&self) -> usize {
        self.ring.lock().len()
    }

    fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            underruns: self.underruns.load(Ordering::Relaxed),
            overruns: self.overruns.load(Ordering::Relaxed),
            windows: self.windows.load(Ordering::Relaxed),
            buffered: self.buffered(),
        }
    }
}

/// Pops through the shared ring, taking the lock once per sample.
struct LockedRing<'a>(&'a Mutex<SampleRing>);

impl SampleSource for LockedRing<'_> {
    #[inline]
    fn pop(&mut self) -> std::result::Result<Sample, Overrun> {
        self.0.lock().pop()
    }
}

/// Cloneable `Send` handle for the thread that produces samples.
///
/// Adding samples never blocks beyond a single ring push and never starts
/// processing on its own; call [`trigger_processing`](Self::trigger_processing)
/// once a batch is in.
#[derive(Debug, Clone)]
pub struct SampleProducer {
    intake: Arc<Intake>,
}

impl SampleProducer {
    /// Adds one sample. Returns false if it was dropped (underrun).
    pub fn add_sample(&self, sample: Sample) -> bool {
        self.intake.push(sample)
    }

    /// Adds a batch, returning how many samples were accepted.
    pub fn add_samples(&self, samples: &[Sample]) -> usize {
        self.intake.push_all(samples.iter().copied())
    }

    /// Pushes one window of the test tone and raises the work signal.
    pub fn inject_test_tone(&self, divisor: f64) {
        self.intake.push_all(test_tone(self.intake.window_size, divisor));
        self.intake.signal.notify();
    }

    /// Raises the work signal.
    pub fn trigger_processing(&self) {
        self.intake.signal.notify();
    }

    /// Samples currently buffered.
    pub fn buffered(&self) -> usize {
        self.intake.buffered()
    }
}

/// Background worker: owns the engine, drains whole windows when signaled.
struct Worker<S> {
    engine: TransformEngine,
    intake: Arc<Intake>,
    display: Arc<Mutex<Display<S>>>,
    latest: Arc<Mutex<Vec<u32>>>,
    shutdown: Arc<AtomicBool>,
    wake_timeout: Duration,
}

impl<S: PixelSurface> Worker<S> {
    fn run(mut self) {
        debug!("worker running");
        while !self.shutdown.load(Ordering::Acquire) {
            // A timeout only re-checks the shutdown flag.
            if !self.intake.signal.wait(self.wake_timeout) {
                continue;
            }
            self.drain();
            self.intake.signal.finish();
        }
        debug!("worker exiting");
    }

    fn drain(&mut self) {
        let window_size = self.engine.window_size();
        let mut processed = 0u64;
        while !self.shutdown.load(Ordering::Acquire) && self.intake.buffered() >= window_size {
            let mut display = self.display.lock();
            let mut source = LockedRing(&self.intake.ring);
            match self.engine.process_window(&mut source, &mut *display) {
                Ok(magnitudes) => {
                    self.latest.lock().copy_from_slice(magnitudes);
                    self.intake.windows.fetch_add(1, Ordering::Relaxed);
                    processed += 1;
                }
                Err(Overrun) => {
                    let total = self.intake.overruns.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(total, "sample buffer ran dry mid-window, window abandoned");
                    break;
                }
            }
        }
        debug!(
            windows = processed,
            buffered = self.intake.buffered(),
            "drain complete"
        );
    }
}

/// A running spectrum analyzer drawing onto a surface of type `S`.
///
/// Construction allocates everything and starts exactly one worker thread.
/// Dropping the analyzer (or calling [`shutdown`](Self::shutdown)) stops the
/// worker after the window in progress and joins it.
///
/// # Example
///
/// ```rust
/// use specscope_core::{Framebuffer, SpectrumColors, divisor_for_bar};
/// use specscope_io::Analyzer;
/// use std::time::Duration;
///
/// let analyzer = Analyzer::new(Framebuffer::new(96, 80), 64, 8).unwrap();
/// analyzer
///     .configure_spectrum(0, 8, 81, 64, SpectrumColors { fg: 0xFFFFFF, bg: 0 })
///     .unwrap();
///
/// analyzer.inject_test_tone(divisor_for_bar(5));
/// assert!(analyzer.wait_idle(Duration::from_secs(2)));
///
/// let magnitudes = analyzer.latest_magnitudes();
/// let loudest = (0..8).max_by_key(|&k| magnitudes[k]).unwrap();
/// assert_eq!(loudest, 5);
/// ```
pub struct Analyzer<S> {
    intake: Arc<Intake>,
    display: Arc<Mutex<Display<S>>>,
    latest: Arc<Mutex<Vec<u32>>>,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    window_size: usize,
    bars: usize,
}

impl<S: PixelSurface + Send + 'static> Analyzer<S> {
    /// Starts an analyzer with default ring capacity and wake timeout.
    pub fn new(surface: S, window_size: usize, bars: usize) -> Result<Self> {
        Self::with_options(surface, AnalyzerOptions::new(window_size, bars))
    }

    /// Starts an analyzer with explicit options.
    ///
    /// Any [`InitError`] means no thread was started.
    pub fn with_options(surface: S, options: AnalyzerOptions) -> Result<Self> {
        let AnalyzerOptions {
            window_size,
            bars,
            capacity,
            wake_timeout,
        } = options;

        let ring = SampleRing::try_new(capacity)?;
        let engine = TransformEngine::try_new(window_size, bars)?;
        if window_size > capacity {
            return Err(InitError::WindowExceedsCapacity {
                window_size,
                capacity,
            }
            .into());
        }
        let display = Display::try_new(surface, window_size, bars)?;

        let intake = Arc::new(Intake {
            ring: Mutex::new(ring),
            signal: WorkSignal::new(),
            window_size,
            underruns: AtomicU64::new(0),
            overruns: AtomicU64::new(0),
            windows: AtomicU64::new(0),
            in_underrun: AtomicBool::new(false),
        });
        let display = Arc::new(Mutex::new(display));
        let latest = Arc::new(Mutex::new(vec![0; bars]));
        let shutdown = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            engine,
            intake: Arc::clone(&intake),
            display: Arc::clone(&display),
            latest: Arc::clone(&latest),
            shutdown: Arc::clone(&shutdown),
            wake_timeout,
        };
        let handle = thread::Builder::new()
            .name("specscope-worker".into())
            .spawn(move || worker.run())
            .map_err(Error::Spawn)?;

        info!(window_size, bars, capacity, "analyzer started");

        Ok(Self {
            intake,
            display,
            latest,
            shutdown,
            worker: Some(handle),
            window_size,
            bars,
        })
    }
}

impl<S> Analyzer<S> {
    /// Installs the waveform view. Waits for the window in progress, if any.
    pub fn configure_waveform(
        &self,
        x: i32,
        y: i32,
        height: i32,
        colors: WaveformColors,
    ) -> Result<()>
    where
        S: PixelSurface,
    {
        self.display
            .lock()
            .configure_waveform(x, y, height, colors)?;
        Ok(())
    }

    /// Installs the spectrum view. Waits for the window in progress, if any.
    pub fn configure_spectrum(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        colors: SpectrumColors,
    ) -> Result<()>
    where
        S: PixelSurface,
    {
        self.display
            .lock()
            .configure_spectrum(x, y, width, height, colors)?;
        Ok(())
    }

    /// Repaints the waveform view. No-op when unconfigured.
    pub fn clear_waveform(&self)
    where
        S: PixelSurface,
    {
        self.display.lock().clear_waveform();
    }

    /// Repaints the spectrum view. No-op when unconfigured.
    pub fn clear_spectrum(&self)
    where
        S: PixelSurface,
    {
        self.display.lock().clear_spectrum();
    }

    /// Adds one sample. Returns false if it was dropped (underrun).
    pub fn add_sample(&self, sample: Sample) -> bool {
        self.intake.push(sample)
    }

    /// Adds a batch, returning how many samples were accepted.
    pub fn add_samples(&self, samples: &[Sample]) -> usize {
        self.intake.push_all(samples.iter().copied())
    }

    /// Pushes one window of the test tone and raises the work signal.
    pub fn inject_test_tone(&self, divisor: f64) {
        self.intake.push_all(test_tone(self.window_size, divisor));
        self.intake.signal.notify();
    }

    /// Raises the work signal; the worker drains every full window buffered.
    pub fn trigger_processing(&self) {
        self.intake.signal.notify();
    }

    /// A handle for feeding samples from another thread.
    pub fn producer(&self) -> SampleProducer {
        SampleProducer {
            intake: Arc::clone(&self.intake),
        }
    }

    /// Blocks until no signal is pending and the worker is not draining.
    ///
    /// Returns false if `timeout` elapsed first.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.intake.signal.wait_idle(timeout)
    }

    /// Samples currently buffered.
    pub fn buffered(&self) -> usize {
        self.intake.buffered()
    }

    /// Current counters.
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.intake.snapshot()
    }

    /// Magnitudes of the most recent completed window.
    pub fn latest_magnitudes(&self) -> Vec<u32> {
        self.latest.lock().clone()
    }

    /// Samples per window.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of bars.
    pub fn bars(&self) -> usize {
        self.bars
    }

    /// Returns true until shutdown.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Runs `f` with the surface, between windows.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R
    where
        S: PixelSurface,
    {
        f(self.display.lock().surface())
    }

    /// Runs `f` with the surface mutably, between windows.
    ///
    /// Drawing here bypasses the renderers' diff state; follow up with a
    /// clear of any view that was painted over.
    pub fn with_surface_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R
    where
        S: PixelSurface,
    {
        f(self.display.lock().surface_mut())
    }

    /// Runs `f` with the whole display, including renderer state.
    pub fn with_display<R>(&self, f: impl FnOnce(&Display<S>) -> R) -> R {
        f(&self.display.lock())
    }

    /// Stops the worker after the window in progress and joins it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        self.shutdown.store(true, Ordering::Release);
        self.intake.signal.close();
        if handle.join().is_err() {
            warn!("worker thread panicked");
        }
        let stats = self.intake.snapshot();
        info!(
            windows = stats.windows,
            underruns = stats.underruns,
            overruns = stats.overruns,
            "analyzer stopped"
        );
    }
}

impl<S> Drop for Analyzer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S> std::fmt::Debug for Analyzer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("window_size", &self.window_size)
            .field("bars", &self.bars)
            .field("running", &self.worker.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specscope_core::{CountingSurface, Framebuffer, divisor_for_bar};

    const TIMEOUT: Duration = Duration::from_secs(5);
    const SPEC: SpectrumColors = SpectrumColors { fg: 0xFF, bg: 0 };

    fn fast(window_size: usize, bars: usize) -> AnalyzerOptions {
        AnalyzerOptions {
            wake_timeout: Duration::from_millis(10),
            ..AnalyzerOptions::new(window_size, bars)
        }
    }

    #[test]
    fn window_larger_than_ring_is_rejected() {
        let options = AnalyzerOptions {
            capacity: 32,
            ..AnalyzerOptions::new(64, 8)
        };
        let err = Analyzer::with_options(Framebuffer::new(8, 8), options).unwrap_err();
        assert!(matches!(
            err,
            Error::Init(InitError::WindowExceedsCapacity {
                window_size: 64,
                capacity: 32
            })
        ));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let err = Analyzer::new(Framebuffer::new(8, 8), 0, 8).unwrap_err();
        assert!(matches!(err, Error::Init(InitError::ZeroWindow)));
        let err = Analyzer::new(Framebuffer::new(8, 8), 64, 0).unwrap_err();
        assert!(matches!(err, Error::Init(InitError::ZeroBars)));
        let options = AnalyzerOptions {
            capacity: 0,
            ..AnalyzerOptions::new(64, 8)
        };
        let err = Analyzer::with_options(Framebuffer::new(8, 8), options).unwrap_err();
        assert!(matches!(err, Error::Init(InitError::ZeroCapacity)));
    }

    #[test]
    fn test_tone_lands_on_its_bar() {
        let analyzer = Analyzer::with_options(Framebuffer::new(96, 180), fast(64, 8)).unwrap();
        analyzer.configure_spectrum(0, 100, 81, 64, SPEC).unwrap();

        analyzer.inject_test_tone(divisor_for_bar(2));
        assert!(analyzer.wait_idle(TIMEOUT));

        let magnitudes = analyzer.latest_magnitudes();
        assert_eq!((0..8).max_by_key(|&k| magnitudes[k]), Some(2));
        let stats = analyzer.diagnostics();
        assert_eq!(stats.windows, 1);
        assert_eq!(stats.buffered, 0);
        // Bar 2 saturates: x = 1 + 2 * 10, peak row 100.
        assert_eq!(analyzer.with_surface(|fb| fb.pixel(21, 100)), Some(0xFF));
        assert_eq!(analyzer.with_surface(|fb| fb.pixel(21, 99)), Some(0));
    }

    #[test]
    fn samples_wait_for_trigger() {
        let analyzer = Analyzer::with_options(Framebuffer::new(8, 8), fast(64, 8)).unwrap();
        assert_eq!(analyzer.add_samples(&[0; 64]), 64);

        // Several wake timeouts pass without any processing.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(analyzer.diagnostics().windows, 0);
        assert_eq!(analyzer.buffered(), 64);

        analyzer.trigger_processing();
        assert!(analyzer.wait_idle(TIMEOUT));
        assert_eq!(analyzer.diagnostics().windows, 1);
        assert_eq!(analyzer.buffered(), 0);
    }

    #[test]
    fn partial_window_stays_buffered() {
        let analyzer = Analyzer::with_options(Framebuffer::new(8, 8), fast(64, 8)).unwrap();
        analyzer.add_samples(&[1; 100]);
        analyzer.trigger_processing();
        assert!(analyzer.wait_idle(TIMEOUT));

        let stats = analyzer.diagnostics();
        assert_eq!(stats.windows, 1);
        assert_eq!(stats.buffered, 36);
        assert_eq!(stats.overruns, 0);
    }

    #[test]
    fn full_ring_counts_underruns() {
        let options = AnalyzerOptions {
            capacity: 128,
            ..fast(64, 8)
        };
        let analyzer = Analyzer::with_options(Framebuffer::new(8, 8), options).unwrap();
        assert_eq!(analyzer.add_samples(&[3; 133]), 128);
        assert!(!analyzer.add_sample(3));
        assert_eq!(analyzer.diagnostics().underruns, 6);
        assert_eq!(analyzer.buffered(), 128);
    }

    #[test]
    fn producer_on_another_thread() {
        let analyzer = Analyzer::with_options(Framebuffer::new(8, 8), fast(64, 8)).unwrap();
        let producer = analyzer.producer();
        let feeder = thread::spawn(move || {
            for k in 0..10 {
                producer.inject_test_tone(divisor_for_bar(k % 8));
            }
        });
        feeder.join().unwrap();
        assert!(analyzer.wait_idle(TIMEOUT));

        let stats = analyzer.diagnostics();
        assert_eq!(stats.windows, 10);
        assert_eq!(stats.underruns, 0);
        assert_eq!(stats.buffered, 0);
    }

    #[test]
    fn steady_signal_stops_drawing() {
        let surface = CountingSurface::new(Framebuffer::new(96, 180));
        let analyzer = Analyzer::with_options(surface, fast(64, 8)).unwrap();
        analyzer
            .configure_waveform(0, 0, 64, WaveformColors { fg: 1, mid: 2, bg: 0 })
            .unwrap();
        analyzer.configure_spectrum(0, 100, 81, 64, SPEC).unwrap();

        analyzer.inject_test_tone(divisor_for_bar(1));
        assert!(analyzer.wait_idle(TIMEOUT));
        assert!(analyzer.with_surface(|s| s.counts().total()) > 0);

        analyzer.with_surface_mut(|s| s.reset());
        analyzer.inject_test_tone(divisor_for_bar(1));
        assert!(analyzer.wait_idle(TIMEOUT));
        assert_eq!(analyzer.with_surface(|s| s.counts().total()), 0);
    }

    #[test]
    fn configure_rejects_bad_geometry() {
        let analyzer = Analyzer::new(Framebuffer::new(8, 8), 64, 8).unwrap();
        let err = analyzer.configure_spectrum(0, 0, 10, 64, SPEC).unwrap_err();
        assert!(matches!(err, Error::Geometry(_)));
        assert!(analyzer.with_display(|d| d.spectrum().layout().is_none()));
    }

    #[test]
    fn shutdown_joins_worker() {
        let analyzer = Analyzer::with_options(Framebuffer::new(8, 8), fast(64, 8)).unwrap();
        let producer = analyzer.producer();
        assert!(analyzer.is_running());
        analyzer.shutdown();

        // The handle outlives the analyzer and stays harmless.
        assert!(producer.add_sample(0));
        producer.trigger_processing();
        assert_eq!(producer.buffered(), 1);
    }
}
