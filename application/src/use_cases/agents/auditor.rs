//! Auditor: approves or rejects every proposed command before it runs.

use super::review_loop::{ReviewRequest, Verdict, run_review};
use super::AgentEnv;
use crate::ports::reasoning::ReasoningPort;
use crate::use_cases::session_control::Interrupted;
use magi_domain::Role;
use std::sync::Arc;

#[derive(Clone)]
pub struct Auditor {
    reasoning: Arc<dyn ReasoningPort>,
}

impl Auditor {
    pub fn new(reasoning: Arc<dyn ReasoningPort>) -> Self {
        Self { reasoning }
    }

    pub(crate) async fn audit(
        &self,
        env: &AgentEnv<'_>,
        review: &ReviewRequest<'_>,
    ) -> Result<Verdict, Interrupted> {
        run_review(env, Role::Auditor, self.reasoning.as_ref(), review).await
    }
}
