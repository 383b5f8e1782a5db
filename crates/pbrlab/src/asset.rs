//! # Shader Hot-Reload
//!
//! [`ShaderWatcher`] watches `shader.wgsl` with `notify` and hands back the
//! new source once the file has been quiet for [`DEBOUNCE_DURATION`].
//! Editors often write a file in several steps (truncate, write, rename), so
//! events are collapsed into a single reload.
//!
//! ```text
//!   notify thread ── Event ──► mpsc ──► poll() ──► Debounce ──► source
//!                                      (main thread, once per frame)
//! ```
//!
//! Compilation happens in [`SceneRenderer::reload_shader`], inside a wgpu
//! validation error scope. A broken shader is logged and the old pipelines
//! keep rendering.
//!
//! [`SceneRenderer::reload_shader`]: crate::render3d::SceneRenderer::reload_shader

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events within this duration of each other collapse into one reload.
pub const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// Tracks the most recent change and reports when it has settled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debounce {
    pending: Option<Instant>,
}

impl Debounce {
    /// Record a change at `now`, restarting the quiet period.
    pub fn touch(&mut self, now: Instant) {
        self.pending = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// `true` once, when the last change is at least [`DEBOUNCE_DURATION`] old.
    pub fn take_ready(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(at) if now.duration_since(at) >= DEBOUNCE_DURATION => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

/// Watches one shader file for changes.
pub struct ShaderWatcher {
    // Kept alive for the background thread; dropping it stops watching.
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<Result<notify::Event, notify::Error>>,
    path: PathBuf,
    debounce: Debounce,
    disconnected: bool,
}

impl ShaderWatcher {
    /// Start watching `path`. Returns `None` (after logging why) when the
    /// file does not exist or the platform watcher cannot be created.
    pub fn new(path: &Path) -> Option<Self> {
        let canonical = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("cannot watch '{}': {e}", path.display());
                return None;
            }
        };

        let (tx, rx) = mpsc::channel();
        let mut watcher = match notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        }) {
            Ok(w) => w,
            Err(e) => {
                log::warn!("failed to create file watcher: {e}; hot-reload disabled");
                return None;
            }
        };
        if let Err(e) = watcher.watch(&canonical, RecursiveMode::NonRecursive) {
            log::warn!("failed to watch '{}': {e}", canonical.display());
            return None;
        }

        log::info!("watching {} for changes", canonical.display());
        Some(Self {
            _watcher: watcher,
            rx,
            path: canonical,
            debounce: Debounce::default(),
            disconnected: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain watcher events. Returns the file's contents once a change has
    /// settled, `None` otherwise.
    pub fn poll(&mut self) -> Option<String> {
        if !self.disconnected {
            loop {
                match self.rx.try_recv() {
                    Ok(Ok(event)) => {
                        // Atomic saves show up as create events.
                        if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                            && event.paths.iter().any(|p| self.matches(p))
                        {
                            self.debounce.touch(Instant::now());
                        }
                    }
                    Ok(Err(e)) => log::warn!("file watcher error: {e}"),
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        log::warn!("file watcher disconnected; hot-reload disabled");
                        self.disconnected = true;
                        break;
                    }
                }
            }
        }

        if !self.debounce.take_ready(Instant::now()) {
            return None;
        }
        match std::fs::read_to_string(&self.path) {
            Ok(source) => Some(source),
            Err(e) => {
                log::warn!("hot-reload failed for shader '{}': {e}", self.path.display());
                None
            }
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.canonicalize().map_or(path == self.path, |p| p == self.path)
    }
}
