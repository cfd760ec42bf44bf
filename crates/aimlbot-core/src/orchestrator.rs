//! Goal dispatch: routes host goals to registered skills.

use crate::shared::{Goal, TenantContext};
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct UnknownSkill(String);

impl fmt::Display for UnknownSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown skill: {}", self.0)
    }
}

impl std::error::Error for UnknownSkill {}

/// Trait implemented by all agent capabilities (skills).
#[async_trait::async_trait]
pub trait AgentSkill: Send + Sync {
    /// Unique skill name for routing.
    fn name(&self) -> &str;

    /// Executes the skill with the given context and optional payload.
    async fn execute(
        &self,
        ctx: &TenantContext,
        payload: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>>;
}

/// Registry of agent skills that can be dispatched by name.
pub struct SkillRegistry {
    skills: Vec<Arc<dyn AgentSkill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self { skills: Vec::new() }
    }

    pub fn register(&mut self, skill: Arc<dyn AgentSkill>) {
        self.skills.push(skill);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentSkill>> {
        self.skills.iter().find(|s| s.name() == name).cloned()
    }

    /// Returns the names of all registered skills (for discovery).
    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name().to_string()).collect()
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrator dispatches goals to skills and coordinates execution.
/// The host dispatch model delivers goals to a given skill one at a time.
pub struct Orchestrator {
    registry: Arc<SkillRegistry>,
}

impl Orchestrator {
    pub fn new(registry: Arc<SkillRegistry>) -> Self {
        Self { registry }
    }

    /// Dispatches a goal to the matching skill.
    pub async fn dispatch(
        &self,
        ctx: &TenantContext,
        goal: Goal,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
        match goal {
            Goal::ExecuteSkill { name, payload } => {
                let skill = self
                    .registry
                    .get(&name)
                    .ok_or_else(|| UnknownSkill(name.clone()))?;
                skill.execute(ctx, payload).await
            }
            Goal::Fallback { utterance } => {
                let payload = serde_json::json!({ "utterance": utterance });
                let skill = self
                    .registry
                    .get("AimlFallback")
                    .ok_or_else(|| UnknownSkill("AimlFallback".into()))?;
                skill.execute(ctx, Some(payload)).await
            }
            Goal::ResetMemory => {
                let skill = self
                    .registry
                    .get("ResetMemory")
                    .ok_or_else(|| UnknownSkill("ResetMemory".into()))?;
                skill.execute(ctx, None).await
            }
            Goal::Custom(name) => Err(Box::new(UnknownSkill(name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait::async_trait]
    impl AgentSkill for Echo {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn execute(
            &self,
            _ctx: &TenantContext,
            payload: Option<serde_json::Value>,
        ) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>> {
            Ok(payload.unwrap_or(serde_json::Value::Null))
        }
    }

    fn ctx() -> TenantContext {
        TenantContext {
            tenant_id: "test-tenant".into(),
            correlation_id: None,
        }
    }

    #[tokio::test]
    async fn dispatches_execute_skill_by_name() {
        let mut registry = SkillRegistry::new();
        registry.register(Arc::new(Echo));
        let orchestrator = Orchestrator::new(Arc::new(registry));

        let result = orchestrator
            .dispatch(
                &ctx(),
                Goal::ExecuteSkill {
                    name: "Echo".into(),
                    payload: Some(serde_json::json!({ "k": "v" })),
                },
            )
            .await
            .unwrap();
        assert_eq!(result["k"], "v");
    }

    #[tokio::test]
    async fn unknown_skill_is_an_error() {
        let orchestrator = Orchestrator::new(Arc::new(SkillRegistry::new()));
        let err = orchestrator
            .dispatch(
                &ctx(),
                Goal::ExecuteSkill {
                    name: "Nope".into(),
                    payload: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown skill: Nope");
    }

    #[tokio::test]
    async fn fallback_goal_requires_registered_fallback_skill() {
        let orchestrator = Orchestrator::new(Arc::new(SkillRegistry::new()));
        let err = orchestrator
            .dispatch(
                &ctx(),
                Goal::Fallback {
                    utterance: "hello".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown skill: AimlFallback");
    }
}
