//! Reset-memory skill: deletes the persisted brain and clears the kernel.

use aimlbot_core::{AgentSkill, BrainAdapter, TenantContext};
use std::sync::Arc;
use tokio::sync::Mutex;

const SKILL_NAME: &str = "ResetMemory";

/// Spoken confirmation for the reset intent.
const RESET_DIALOG: &str =
    "Memory erased. I will relearn from my original patterns the next time we talk.";

/// Voice-triggered brain reset. Deletes the brain file (a missing file is a
/// no-op) and soft-resets the kernel; the compiled knowledge base is rebuilt
/// from the source directory on the next load.
pub struct ResetMemory {
    adapter: Arc<Mutex<BrainAdapter>>,
}

impl ResetMemory {
    pub fn new(adapter: Arc<Mutex<BrainAdapter>>) -> Self {
        Self { adapter }
    }
}

#[async_trait::async_trait]
impl AgentSkill for ResetMemory {
    fn name(&self) -> &str {
        SKILL_NAME
    }

    async fn execute(
        &self,
        _ctx: &TenantContext,
        _payload: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
        let mut adapter = self.adapter.lock().await;
        adapter.reset_memory()?;
        tracing::info!(target: "aimlbot::skills", "brain memory reset");
        Ok(serde_json::json!({
            "status": "ok",
            "skill": SKILL_NAME,
            "speech": RESET_DIALOG
        }))
    }
}
