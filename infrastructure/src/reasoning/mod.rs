//! Reasoning backends
//!
//! [`OpenAiReasoning`] implements the `ReasoningPort` over HTTP.
//! [`build_agents`] wires one backend per role from the configuration.

mod openai;

pub use openai::OpenAiReasoning;

use std::sync::Arc;

use magi_application::{Agents, ReasoningError, ReasoningPort};
use magi_domain::Role;
use tracing::info;

use crate::config::FileConfig;

/// One backend per role, honouring `[agents]` model overrides. All roles
/// share a single connection pool.
pub fn build_agents(config: &FileConfig) -> Result<Agents, ReasoningError> {
    let client = OpenAiReasoning::http_client(&config.reasoning)?;
    let port = |role: Role| -> Arc<dyn ReasoningPort> {
        let model = config.model_for(role);
        info!(role = %role, model, "Reasoning backend configured");
        Arc::new(OpenAiReasoning::new(client.clone(), &config.reasoning, model))
    };
    Ok(Agents::new(
        port(Role::Proposer),
        port(Role::Auditor),
        port(Role::Verifier),
    ))
}
