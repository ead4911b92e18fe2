use cadenza_core::{
    Bindings, CoreError, EventLog, Interpreter, NodeState, Statement, Workflow,
};
use cadenza_dsl::parse_workflow_yaml;
use cadenza_test_utils::assertions::{assert_binding, assert_node_states, assert_unbound};
use cadenza_test_utils::builders::{act, par, seq, WorkflowBuilder};
use cadenza_test_utils::data_generators::{
    create_parallel_dsl, create_sequence_dsl, create_single_activity_dsl,
};
use cadenza_test_utils::fixtures::load_fixture_workflow;
use cadenza_test_utils::{init_test_tracing, MockActivityDispatcher, RecordingDispatcher};
use std::sync::Arc;
use std::time::Duration;

fn sample_names() -> [&'static str; 5] {
    [
        "sampleActivity1",
        "sampleActivity2",
        "sampleActivity3",
        "sampleActivity4",
        "sampleActivity5",
    ]
}

#[tokio::test]
async fn test_single_activity_workflow() {
    init_test_tracing();
    let dispatcher = Arc::new(RecordingDispatcher::with_sample_results(&["sampleActivity"]));
    let interpreter = Interpreter::new(dispatcher.clone());
    let workflow = parse_workflow_yaml(&create_single_activity_dsl()).unwrap();

    let run = interpreter.run_workflow(&workflow).await;

    assert!(run.is_success());
    assert_binding(&run.bindings, "resultVar", "Result_sampleActivity").unwrap();
    let calls = dispatcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].arguments, vec!["value1", "value2"]);
}

#[tokio::test]
async fn test_sequence_with_missing_activity() {
    let dispatcher = Arc::new(RecordingDispatcher::with_sample_results(&["sampleActivity"]));
    let interpreter = Interpreter::new(dispatcher.clone());
    let workflow =
        parse_workflow_yaml(&create_sequence_dsl(&["sampleActivity", "nonExistentActivity"]))
            .unwrap();

    let run = interpreter.run_workflow(&workflow).await;

    assert_eq!(
        run.result,
        Err(CoreError::ActivityNotFound("nonExistentActivity".to_string()))
    );
    assert_binding(&run.bindings, "resultVar1", "Result_sampleActivity").unwrap();
    assert_unbound(&run.bindings, "resultVar2").unwrap();
}

#[tokio::test]
async fn test_parallel_with_missing_activity_runs_every_branch() {
    let dispatcher = Arc::new(RecordingDispatcher::with_sample_results(&["sampleActivity"]));
    let interpreter = Interpreter::new(dispatcher.clone());
    let workflow =
        parse_workflow_yaml(&create_parallel_dsl(&["sampleActivity", "nonExistentActivity"]))
            .unwrap();

    let run = interpreter.run_workflow(&workflow).await;

    assert_eq!(
        run.result,
        Err(CoreError::ActivityNotFound("nonExistentActivity".to_string()))
    );
    assert_binding(&run.bindings, "resultVar1", "Result_sampleActivity").unwrap();
    assert_eq!(dispatcher.call_count("sampleActivity"), 1);
    assert_eq!(dispatcher.call_count("nonExistentActivity"), 1);
}

#[tokio::test]
async fn test_unbound_argument_never_reaches_dispatcher() {
    let mut mock = MockActivityDispatcher::new();
    mock.expect_dispatch().times(0);
    let interpreter = Interpreter::new(Arc::new(mock));

    let workflow = WorkflowBuilder::with_sample_variables()
        .root(act("sampleActivity", &["var1", "missing"], "out"))
        .build();
    let run = interpreter.run_workflow(&workflow).await;

    assert_eq!(run.result, Err(CoreError::UnboundVariable("missing".to_string())));
    assert_unbound(&run.bindings, "out").unwrap();
}

#[tokio::test]
async fn test_mock_dispatcher_receives_resolved_values() {
    let mut mock = MockActivityDispatcher::new();
    mock.expect_dispatch()
        .withf(|name, arguments| name == "sampleActivity" && *arguments == ["value2", "value1"])
        .times(1)
        .returning(|_, _| Ok("done".to_string()));
    let interpreter = Interpreter::new(Arc::new(mock));

    let workflow = WorkflowBuilder::with_sample_variables()
        .root(act("sampleActivity", &["var2", "var1"], "out"))
        .build();
    let bindings = interpreter.run_workflow(&workflow).await.into_result().unwrap();

    assert_binding(&bindings, "out", "done").unwrap();
}

#[tokio::test]
async fn test_sequence_short_circuits_after_failure() {
    let dispatcher = Arc::new(
        RecordingDispatcher::new()
            .with_echo("step")
            .with_failure("explode", CoreError::activity_failed("explode", "boom")),
    );
    let events = Arc::new(EventLog::new());
    let interpreter = Interpreter::new(dispatcher.clone()).with_event_handler(events.clone());

    let root = seq(vec![
        act("step", &["var1"], "r0"),
        act("explode", &["r0"], "r1"),
        act("step", &["r0"], "r2"),
        par(vec![act("step", &["var1"], "r3")]),
    ]);
    let workflow = WorkflowBuilder::with_sample_variables().root(root).build();
    let run = interpreter.run_workflow(&workflow).await;

    assert_eq!(run.result, Err(CoreError::activity_failed("explode", "boom")));
    assert_eq!(dispatcher.call_names(), vec!["step", "explode"]);
    assert_binding(&run.bindings, "r0", "step(value1)").unwrap();
    for key in ["r1", "r2", "r3"] {
        assert_unbound(&run.bindings, key).unwrap();
    }
    assert_node_states(
        &events,
        &[
            ("root", NodeState::Failed),
            ("root.elements[0]", NodeState::Succeeded),
            ("root.elements[1]", NodeState::Failed),
            ("root.elements[2]", NodeState::NotStarted),
            ("root.elements[3]", NodeState::NotStarted),
            ("root.elements[3].branches[0]", NodeState::NotStarted),
        ],
    )
    .unwrap();
}

#[tokio::test]
async fn test_failed_activity_keeps_previous_result_value() {
    let dispatcher = Arc::new(
        RecordingDispatcher::new()
            .with_failure("explode", CoreError::activity_failed("explode", "boom")),
    );
    let interpreter = Interpreter::new(dispatcher.clone());
    let workflow = WorkflowBuilder::new()
        .variable("out", "old")
        .root(act("explode", &[], "out"))
        .build();

    let run = interpreter.run_workflow(&workflow).await;

    assert_eq!(run.result, Err(CoreError::activity_failed("explode", "boom")));
    assert_eq!(dispatcher.call_names(), vec!["explode"]);
    assert_binding(&run.bindings, "out", "old").unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_parallel_reports_declared_order_not_completion_order() {
    // The second branch fails first in time; the first branch fails later.
    let dispatcher = Arc::new(
        RecordingDispatcher::new()
            .with_failure("slow_fail", CoreError::activity_failed("slow_fail", "late"))
            .with_delay("slow_fail", Duration::from_millis(500))
            .with_failure("fast_fail", CoreError::activity_failed("fast_fail", "early"))
            .with_echo("cleanup")
            .with_delay("cleanup", Duration::from_millis(900)),
    );
    let interpreter = Interpreter::new(dispatcher.clone());
    let bindings = Bindings::new();

    let statement = par(vec![
        Statement::activity::<&str>("slow_fail", &[], "a"),
        Statement::activity::<&str>("fast_fail", &[], "b"),
        Statement::activity::<&str>("cleanup", &[], "c"),
    ]);
    let result = interpreter.execute(&statement, &bindings).await;

    assert_eq!(result, Err(CoreError::activity_failed("slow_fail", "late")));
    assert_binding(&bindings, "c", "cleanup()").unwrap();
    assert_eq!(dispatcher.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_parallel_branches_overlap_in_time() {
    let mut dispatcher = RecordingDispatcher::new();
    for name in ["a", "b", "c"] {
        dispatcher = dispatcher
            .with_echo(name)
            .with_delay(name, Duration::from_secs(1));
    }
    let dispatcher = Arc::new(dispatcher);
    let interpreter = Interpreter::new(dispatcher.clone());

    let started = tokio::time::Instant::now();
    let workflow = parse_workflow_yaml(&create_parallel_dsl(&["a", "b", "c"])).unwrap();
    let bindings = interpreter.run_workflow(&workflow).await.into_result().unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(dispatcher.probe().peak(), 3);
    assert_binding(&bindings, "resultVar3", "c(value1)").unwrap();
}

#[tokio::test]
async fn test_fixture_workflow_join() {
    let dispatcher = Arc::new(
        sample_names()
            .iter()
            .fold(RecordingDispatcher::new(), |d, name| d.with_echo(name)),
    );
    let interpreter = Interpreter::new(dispatcher.clone());
    let workflow =
        load_fixture_workflow(env!("CARGO_MANIFEST_DIR"), "parallel_workflow.yaml").unwrap();

    let bindings = interpreter.run_workflow(&workflow).await.into_result().unwrap();

    assert_binding(&bindings, "result1", "sampleActivity1(value1)").unwrap();
    assert_binding(
        &bindings,
        "result6",
        "sampleActivity1(sampleActivity3(sampleActivity2(sampleActivity1(value1))),\
sampleActivity5(value3,sampleActivity4(sampleActivity1(value1))))",
    )
    .unwrap();
    assert_eq!(dispatcher.calls().len(), 6);
}

#[tokio::test]
async fn test_rerun_is_deterministic() {
    let dispatcher = Arc::new(
        sample_names()
            .iter()
            .fold(RecordingDispatcher::new(), |d, name| d.with_echo(name)),
    );
    let interpreter = Interpreter::new(dispatcher);
    let workflow: Workflow =
        load_fixture_workflow(env!("CARGO_MANIFEST_DIR"), "parallel_workflow.yaml").unwrap();

    let first = interpreter.run_workflow(&workflow).await;
    let second = interpreter.run_workflow(&workflow).await;

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.result, second.result);
    assert_eq!(first.bindings.snapshot(), second.bindings.snapshot());
}

#[tokio::test]
async fn test_cancellation_outranks_earlier_branch_failure() {
    let dispatcher = Arc::new(
        RecordingDispatcher::with_sample_results(&["sampleActivity"]).with_failure(
            "longRunning",
            CoreError::Canceled("workflow canceled".to_string()),
        ),
    );
    let interpreter = Interpreter::new(dispatcher.clone());
    let workflow = WorkflowBuilder::with_sample_variables()
        .root(seq(vec![
            act("sampleActivity", &["var1"], "r1"),
            par(vec![
                act("nonExistentActivity", &["r1"], "r2"),
                act("longRunning", &["r1"], "r3"),
            ]),
        ]))
        .build();

    let error = interpreter.execute_workflow(&workflow).await.unwrap_err();

    // The first declared branch failed with ActivityNotFound; the cancellation still wins.
    assert_eq!(dispatcher.call_count("nonExistentActivity"), 1);
    assert!(error.is_canceled());
    assert_eq!(error, CoreError::Canceled("workflow canceled".to_string()));
}
