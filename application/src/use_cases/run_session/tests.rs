use super::*;
use crate::use_cases::agents::Agents;
use crate::use_cases::test_support::*;

struct Setup {
    driver: SessionDriver,
    proposer: Arc<ScriptedReasoning>,
    executor: Arc<MockToolExecutor>,
}

fn setup(proposer: Vec<String>, auditor: Vec<String>, verifier: Vec<String>) -> Setup {
    let proposer = ScriptedReasoning::ok(proposer);
    let trace: Trace = Arc::default();
    let executor = MockToolExecutor::new(trace);
    let orchestrator = PhaseOrchestrator::new(
        Agents::new(
            proposer.clone(),
            ScriptedReasoning::ok(auditor),
            ScriptedReasoning::ok(verifier),
        ),
        executor.clone(),
    );
    Setup {
        driver: SessionDriver::new(Arc::new(orchestrator), fast_params()),
        proposer,
        executor,
    }
}

#[tokio::test]
async fn test_start_runs_planning_then_execution() {
    let plan = plan_table(&[("createFile", "")]);
    let in_progress = plan_table(&[("createFile", "in-progress")]);
    let s = setup(
        vec![
            respond("planProposal", &[&plan, "create README"]),
            respond_with_plan("createFile", &["README.md", "# demo"], &in_progress),
            respond("recommendComplete", &["README.md created"]),
        ],
        vec![approve("ok"), approve("ok"), approve("ok")],
        vec![approve("plan ok"), approve("done")],
    );

    let handle = s.driver.start("add a README").await.unwrap();
    assert_eq!(handle.plan(), Some(plan.as_str()));

    let outcome = handle.join().await.unwrap();
    assert_eq!(
        outcome,
        SessionOutcome::Completed {
            plan,
            summary: "README.md created".into(),
        }
    );
    assert_eq!(
        s.executor.executed_tools(),
        vec!["planProposal", "createFile", "recommendComplete"]
    );
}

#[tokio::test]
async fn test_cancel_during_execution_yields_execution_snapshot() {
    let plan = plan_table(&[("createFile", "")]);
    let s = setup(
        vec![respond("planProposal", &[&plan, "overview"])],
        vec![approve("ok")],
        vec![approve("ok")],
    );

    let handle = s.driver.start("r").await.unwrap();
    handle.cancel();

    let SessionOutcome::Cancelled { snapshot, reason } = handle.join().await.unwrap() else {
        panic!("expected cancellation");
    };
    assert_eq!(reason, CancelReason::Requested);
    assert_eq!(snapshot.phase, Phase::Execution);
    assert_eq!(snapshot.plan, plan);
    assert_eq!(s.proposer.calls(), 1, "execution never reached the Proposer");
}

#[tokio::test]
async fn test_planning_abort_finishes_without_execution() {
    let s = setup(vec![], vec![], vec![]);

    // The exhausted script fails every call, so the budget aborts planning.
    let handle = s.driver.start("r").await.unwrap();
    assert!(handle.plan().is_none());
    let SessionOutcome::Cancelled { snapshot, reason } = handle.join().await.unwrap() else {
        panic!("expected cancellation");
    };
    assert!(reason.is_fatal());
    assert_eq!(snapshot.phase, Phase::Planning);
    assert!(s.executor.executed().is_empty());
}

#[tokio::test]
async fn test_resume_execution_snapshot() {
    let plan = plan_table(&[("createFile", "done")]);
    let s = setup(
        vec![respond("recommendComplete", &["all done"])],
        vec![approve("ok")],
        vec![approve("ok")],
    );

    let snapshot = PhaseSnapshot::new(Phase::Execution, "r", plan.clone());
    let outcome = s.driver.resume(snapshot).await.unwrap().join().await.unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Completed {
            plan,
            summary: "all done".into(),
        }
    );
}

#[tokio::test]
async fn test_new_session_cancels_previous_and_starts_fresh() {
    let plan = plan_table(&[("readFile", "")]);
    let s = setup(
        vec![
            respond("planProposal", &[&plan, "first"]),
            respond("planProposal", &[&plan, "second"]),
        ],
        vec![approve("ok"), approve("ok")],
        vec![approve("ok"), approve("ok")],
    );

    let first = s.driver.start("first").await.unwrap();
    let second = s.driver.start("second").await.unwrap();

    assert!(first.control().is_cancelled());
    assert!(!second.control().is_cancelled());
    assert_eq!(second.control().consecutive_failures(), 0);

    s.driver.cancel();
    assert!(second.control().is_cancelled());
}
