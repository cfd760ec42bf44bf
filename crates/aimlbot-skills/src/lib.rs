//! Trait-based agent capability registry and concrete skills.

pub use aimlbot_core::{AgentSkill, SkillRegistry};

mod aiml_fallback;
mod intent;
mod reset_memory;

pub use aiml_fallback::AimlFallback;
pub use intent::goal_for_utterance;
pub use reset_memory::ResetMemory;
