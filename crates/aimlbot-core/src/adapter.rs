//! Fallback brain adapter: kernel lifecycle, brain persistence, and
//! save throttling.
//!
//! State machine: UNLOADED -> LOADING -> LOADED, with reset returning
//! synchronously to UNLOADED. The kernel handle is an `Option`; presence of
//! a value IS the loaded flag, so the flag can never desynchronize from the
//! actual engine state. Callers serialize access (one utterance at a time);
//! there is no internal locking.

use crate::error::BrainError;
use crate::identity::{DeviceIdentity, IdentitySource};
use crate::kernel::AimlKernel;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Constructs a fresh, empty kernel. Called once per load cycle.
pub type KernelFactory = Box<dyn Fn() -> Box<dyn AimlKernel> + Send + Sync>;

/// The 11 fixed bot identity predicates applied after every (re)load.
/// `name` and `species` come from the device identity; the rest are static.
pub const BOT_PREDICATE_KEYS: [&str; 11] = [
    "name", "species", "genus", "family", "order", "class", "kingdom", "hometown", "botmaster",
    "master", "age",
];

/// Owns exactly one AIML kernel and its serialized brain file.
pub struct BrainAdapter {
    kernel: Option<Box<dyn AimlKernel>>,
    make_kernel: KernelFactory,
    identity: Box<dyn IdentitySource>,
    aiml_dir: PathBuf,
    brain_path: PathBuf,
    save_loop_threshold: u32,
    /// Query counter driving the periodic save. Starts at 1 and is reset
    /// only by process restart, never by a soft reset.
    line_count: u32,
}

impl BrainAdapter {
    pub fn new(
        aiml_dir: impl Into<PathBuf>,
        brain_path: impl Into<PathBuf>,
        save_loop_threshold: u32,
        make_kernel: KernelFactory,
        identity: Box<dyn IdentitySource>,
    ) -> Self {
        Self {
            kernel: None,
            make_kernel,
            identity,
            aiml_dir: aiml_dir.into(),
            brain_path: brain_path.into(),
            save_loop_threshold: save_loop_threshold.max(1),
            line_count: 1,
        }
    }

    /// True exactly when a kernel with a compiled or deserialized brain is
    /// live and identity predicates have been applied.
    pub fn is_loaded(&self) -> bool {
        self.kernel.is_some()
    }

    /// Fixed path of the serialized brain file.
    pub fn brain_path(&self) -> &Path {
        &self.brain_path
    }

    /// Current query counter value (observability).
    pub fn line_count(&self) -> u32 {
        self.line_count
    }

    /// Current value of a bot predicate on the live kernel, if loaded.
    pub fn bot_predicate(&self, key: &str) -> Option<String> {
        self.kernel.as_ref().and_then(|k| k.bot_predicate(key))
    }

    /// Sets up the kernel: deserializes the brain file if present, otherwise
    /// compiles every source file in the AIML directory and persists the
    /// result. Then applies the 11 identity predicates, substituting the
    /// static default identity if the device lookup fails.
    pub async fn load(&mut self) -> Result<(), BrainError> {
        tracing::info!(target: "aimlbot::brain", "loading brain");
        let mut kernel = (self.make_kernel)();
        if self.brain_path.is_file() {
            kernel.load_brain(&self.brain_path)?;
        } else {
            let mut sources: Vec<PathBuf> = fs::read_dir(&self.aiml_dir)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect();
            sources.sort();
            for path in &sources {
                kernel.learn(path)?;
            }
            kernel.save_brain(&self.brain_path)?;
        }

        let device = match self.identity.fetch().await {
            Ok(device) => device,
            Err(e) => {
                tracing::warn!(
                    target: "aimlbot::brain",
                    "device identity lookup failed, using defaults: {e}"
                );
                DeviceIdentity::fallback()
            }
        };
        apply_bot_predicates(kernel.as_mut(), &device);

        self.kernel = Some(kernel);
        Ok(())
    }

    /// Sends a query to the brain and returns its reply (possibly empty).
    ///
    /// Makes a security copy of the brain once every `save_loop_threshold`
    /// queries.
    pub fn ask(&mut self, utterance: &str) -> Result<String, BrainError> {
        let kernel = self.kernel.as_mut().ok_or(BrainError::NotLoaded)?;
        let response = kernel.respond(utterance)?;
        if self.line_count % self.save_loop_threshold == 0 {
            kernel.save_brain(&self.brain_path)?;
        }
        self.line_count += 1;
        Ok(response)
    }

    /// Deletes the persisted brain file, then clears in-memory state. The
    /// next `ask` cycle must re-derive the brain from the source directory.
    /// A missing brain file is a no-op; other I/O errors propagate.
    pub fn reset_memory(&mut self) -> Result<(), BrainError> {
        tracing::debug!(target: "aimlbot::brain", "deleting brain file");
        match fs::remove_file(&self.brain_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.soft_reset();
        Ok(())
    }

    /// Clears only the in-memory kernel; nothing on disk is touched and the
    /// query counter keeps its value.
    pub fn soft_reset(&mut self) {
        if let Some(mut kernel) = self.kernel.take() {
            kernel.reset();
        }
    }

    /// Persists the current brain unconditionally (if loaded) and tears the
    /// kernel down. A second call is a no-op.
    pub fn shutdown(&mut self) -> Result<(), BrainError> {
        if let Some(kernel) = &self.kernel {
            kernel.save_brain(&self.brain_path)?;
        }
        self.soft_reset();
        Ok(())
    }
}

fn apply_bot_predicates(kernel: &mut dyn AimlKernel, device: &DeviceIdentity) {
    kernel.set_bot_predicate("name", &device.name);
    kernel.set_bot_predicate("species", &device.platform);
    kernel.set_bot_predicate("genus", "Mycroft");
    kernel.set_bot_predicate("family", "virtual personal assistant");
    kernel.set_bot_predicate("order", "artificial intelligence");
    kernel.set_bot_predicate("class", "computer program");
    kernel.set_bot_predicate("kingdom", "machine");
    kernel.set_bot_predicate("hometown", "127.0.0.1");
    kernel.set_bot_predicate("botmaster", "master");
    kernel.set_bot_predicate("master", "the community");
    kernel.set_bot_predicate("age", "2");
}
