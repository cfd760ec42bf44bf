//! AIML fallback skill: routes an utterance no other skill recognized
//! through the fallback brain and reports handled/not-handled.

use aimlbot_core::{AgentSkill, BrainAdapter, TenantContext};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

const SKILL_NAME: &str = "AimlFallback";

#[derive(Debug, Deserialize)]
struct FallbackArgs {
    utterance: String,
}

/// Fallback handler interfacing the AIML brain.
///
/// When disabled by configuration it declines without touching the adapter,
/// so a disabled skill never triggers a brain load.
pub struct AimlFallback {
    adapter: Arc<Mutex<BrainAdapter>>,
    enabled: bool,
}

impl AimlFallback {
    pub fn new(adapter: Arc<Mutex<BrainAdapter>>, enabled: bool) -> Self {
        Self { adapter, enabled }
    }
}

#[async_trait::async_trait]
impl AgentSkill for AimlFallback {
    fn name(&self) -> &str {
        SKILL_NAME
    }

    async fn execute(
        &self,
        _ctx: &TenantContext,
        payload: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
        if !self.enabled {
            return Ok(serde_json::json!({
                "status": "ok",
                "skill": SKILL_NAME,
                "handled": false,
                "reason": "disabled"
            }));
        }

        let payload = payload.ok_or("AimlFallback requires payload: { utterance }")?;
        let args: FallbackArgs = serde_json::from_value(payload)?;

        let mut adapter = self.adapter.lock().await;
        if !adapter.is_loaded() {
            adapter.load().await?;
        }
        let answer = adapter.ask(&args.utterance)?;
        drop(adapter);

        if answer.is_empty() {
            return Ok(serde_json::json!({
                "status": "ok",
                "skill": SKILL_NAME,
                "handled": false
            }));
        }

        // A reply that asks a question expects a follow-up from the user.
        let expect_response = answer.ends_with('?');
        tracing::info!(
            target: "aimlbot::skills",
            expect_response,
            "fallback answered ({} chars)",
            answer.len()
        );
        Ok(serde_json::json!({
            "status": "ok",
            "skill": SKILL_NAME,
            "handled": true,
            "speech": answer,
            "expect_response": expect_response
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimlbot_core::{DeviceIdentity, KernelFactory, MockKernel};
    use std::fs;

    fn test_adapter(tmp: &tempfile::TempDir) -> Arc<Mutex<BrainAdapter>> {
        let aiml_dir = tmp.path().join("aiml");
        fs::create_dir_all(&aiml_dir).unwrap();
        fs::write(
            aiml_dir.join("greetings.aim"),
            "HELLO :: Hi there!\nARE YOU A ROBOT :: Yes, are you?\n",
        )
        .unwrap();
        let factory: KernelFactory =
            Box::new(|| Box::new(MockKernel::new()) as Box<dyn aimlbot_core::AimlKernel>);
        Arc::new(Mutex::new(BrainAdapter::new(
            aiml_dir,
            tmp.path().join("bot_brain.brn"),
            4,
            factory,
            Box::new(DeviceIdentity::fallback()),
        )))
    }

    fn ctx() -> TenantContext {
        TenantContext {
            tenant_id: "test-tenant".into(),
            correlation_id: None,
        }
    }

    #[tokio::test]
    async fn disabled_skill_declines_without_loading() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = test_adapter(&tmp);
        let skill = AimlFallback::new(Arc::clone(&adapter), false);

        let result = skill
            .execute(&ctx(), Some(serde_json::json!({ "utterance": "hello" })))
            .await
            .unwrap();
        assert_eq!(result["handled"], false);
        assert!(!adapter.lock().await.is_loaded());
    }

    #[tokio::test]
    async fn enabled_skill_lazily_loads_and_answers() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = test_adapter(&tmp);
        let skill = AimlFallback::new(Arc::clone(&adapter), true);

        let result = skill
            .execute(&ctx(), Some(serde_json::json!({ "utterance": "hello" })))
            .await
            .unwrap();
        assert_eq!(result["handled"], true);
        assert_eq!(result["speech"], "Hi there!");
        assert_eq!(result["expect_response"], false);
        assert!(adapter.lock().await.is_loaded());
    }

    #[tokio::test]
    async fn question_reply_expects_follow_up() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = test_adapter(&tmp);
        let skill = AimlFallback::new(adapter, true);

        let result = skill
            .execute(
                &ctx(),
                Some(serde_json::json!({ "utterance": "are you a robot" })),
            )
            .await
            .unwrap();
        assert_eq!(result["speech"], "Yes, are you?");
        assert_eq!(result["expect_response"], true);
    }

    #[tokio::test]
    async fn empty_reply_is_not_handled_and_never_spoken() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = test_adapter(&tmp);
        let skill = AimlFallback::new(adapter, true);

        let result = skill
            .execute(
                &ctx(),
                Some(serde_json::json!({ "utterance": "unmatched gibberish" })),
            )
            .await
            .unwrap();
        assert_eq!(result["handled"], false);
        assert!(result.get("speech").is_none());
    }
}
