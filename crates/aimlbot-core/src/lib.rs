//! aimlbot-core: fallback-brain core library (shared types, kernel seam, adapter, dispatch).
//!
//! The AIML matching engine itself is an external collaborator behind the
//! [`AimlKernel`] trait; this crate owns everything around it: brain
//! persistence, bot identity, and the skill dispatch layer the gateway uses.

mod adapter;
mod error;
mod identity;
mod kernel;
mod orchestrator;
mod shared;

// Shared context, goals, and gateway configuration
pub use shared::{CoreConfig, Goal, TenantContext, BRAIN_FILE_NAME};

// Kernel seam + in-tree mock engine
pub use kernel::{AimlKernel, MockKernel};

// Device identity lookup (with static fallback applied by the adapter)
pub use identity::{
    DeviceApi, DeviceIdentity, IdentitySource, DEFAULT_BOT_NAME, DEFAULT_BOT_PLATFORM,
};

// Fallback brain adapter (engine lifecycle + save throttling)
pub use adapter::{BrainAdapter, KernelFactory, BOT_PREDICATE_KEYS};

// Errors
pub use error::{BrainError, IdentityError};

// Orchestrator (skill registry + goal dispatch)
pub use orchestrator::{AgentSkill, Orchestrator, SkillRegistry};
