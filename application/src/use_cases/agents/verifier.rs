//! Verifier: re-checks the whole phase before it may end.
//!
//! Runs once per phase-closing command, against the Proposer's complete
//! history for the phase.

use super::review_loop::{ReviewRequest, Verdict, run_review};
use super::AgentEnv;
use crate::ports::reasoning::ReasoningPort;
use crate::use_cases::session_control::Interrupted;
use magi_domain::Role;
use std::sync::Arc;

#[derive(Clone)]
pub struct Verifier {
    reasoning: Arc<dyn ReasoningPort>,
}

impl Verifier {
    pub fn new(reasoning: Arc<dyn ReasoningPort>) -> Self {
        Self { reasoning }
    }

    pub(crate) async fn verify(
        &self,
        env: &AgentEnv<'_>,
        review: &ReviewRequest<'_>,
    ) -> Result<Verdict, Interrupted> {
        run_review(env, Role::Verifier, self.reasoning.as_ref(), review).await
    }
}
