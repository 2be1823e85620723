use std::time::Duration;

use xspeculate::{
    run, run_bench, Annotation, BenchConfig, BenchError, BenchOptions, BenchSummary, Branch,
    CancelScope, CancelSignal, CsvSink, Interrupt, Engine, MemorySink, RecordSink, RunMode, RunRecord,
};

mod helpers;
use helpers::{quick_config, with_timeout, zero_oracle_config};

const LIMIT: Duration = Duration::from_secs(30);

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_trace_chooses_b_in_both_modes() {
    let engine = Engine::new(zero_oracle_config()).unwrap();

    let seq = with_timeout("seq", LIMIT, engine.run(1, RunMode::Sequential))
        .await
        .unwrap();
    assert_eq!(seq.oracle_scalar, 0);
    assert_eq!(seq.chosen, Branch::B);
    assert_eq!(seq.branch_a_elapsed, Duration::ZERO);
    assert_eq!(seq.annotation, Annotation::Found(669));

    let spec = with_timeout("spec", LIMIT, engine.run(1, RunMode::Speculative))
        .await
        .unwrap();
    assert_eq!(spec.chosen, Branch::B);
    assert_eq!(spec.annotation, Annotation::Found(669));
    assert!(spec.total_elapsed >= spec.oracle_elapsed);
    assert!(spec.total_elapsed >= spec.branch_b_elapsed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_same_run_id_same_decision_across_modes() {
    let engine = Engine::new(quick_config()).unwrap();
    for run_id in 1..=3 {
        let spec = engine.run(run_id, RunMode::Speculative).await.unwrap();
        let seq = engine.run(run_id, RunMode::Sequential).await.unwrap();
        assert_eq!(spec.oracle_scalar, seq.oracle_scalar);
        assert_eq!(spec.chosen, seq.chosen);
        assert_eq!(spec.chosen, Branch::choose(spec.oracle_scalar, 1000));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_chosen_follows_threshold_only() {
    for (threshold, expected) in [(i64::MIN, Branch::A), (i64::MAX, Branch::B)] {
        let config = BenchConfig {
            threshold,
            ..quick_config()
        };
        let record = run(9, RunMode::Speculative, config).await.unwrap();
        assert_eq!(record.chosen, expected);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_difficulty_zero_succeeds_at_counter_zero() {
    let config = BenchConfig {
        threshold: 0,
        commitment_difficulty: 0,
        ..quick_config()
    };
    let record = run(1, RunMode::Sequential, config).await.unwrap();
    assert_eq!(record.chosen, Branch::A);
    assert_eq!(record.annotation, Annotation::Counter(0));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bound_one_finds_nothing() {
    let config = BenchConfig {
        enumeration_bound: 1,
        ..zero_oracle_config()
    };
    let record = run(1, RunMode::Sequential, config).await.unwrap();
    assert_eq!(record.annotation, Annotation::Found(0));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forced_timeout_is_recorded_not_fatal() {
    let config = BenchConfig {
        threshold: 0,
        commitment_difficulty: 80,
        collect_timeout_ms: 150,
        ..quick_config()
    };
    let engine = Engine::new(config).unwrap();
    let mut sink = MemorySink::new();
    let record = with_timeout(
        "timeout run",
        LIMIT,
        engine.run_and_record(1, RunMode::Speculative, &mut sink),
    )
    .await
    .unwrap();
    assert_eq!(record.annotation, Annotation::Timeout(Branch::A));
    assert_eq!(record.annotation.to_string(), "timeout_waiting_A");
    assert_eq!(record.branch_a_elapsed, Duration::ZERO);
    assert!(record.total_elapsed >= Duration::from_millis(150));
    assert_eq!(sink.records.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_scope_cascades_into_runs() {
    let shutdown = CancelScope::new();
    let config = BenchConfig {
        threshold: 0,
        commitment_difficulty: 80,
        ..quick_config()
    };
    let engine = Engine::new(config).unwrap().with_shutdown(shutdown.clone());
    let pending = tokio::spawn(async move { engine.run(1, RunMode::Speculative).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();
    let record = with_timeout("cancelled run", LIMIT, pending)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.annotation, Annotation::Cancelled(Branch::A));
}

struct FailingSink;

impl RecordSink for FailingSink {
    fn append(&mut self, _record: &RunRecord) -> Result<(), BenchError> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sink_failure_aborts_only_that_run() {
    let engine = Engine::new(zero_oracle_config()).unwrap();
    let err = engine
        .run_and_record(1, RunMode::Speculative, &mut FailingSink)
        .await
        .unwrap_err();
    assert!(matches!(err, BenchError::Io(_)));

    let mut sink = MemorySink::new();
    engine
        .run_and_record(2, RunMode::Speculative, &mut sink)
        .await
        .unwrap();
    assert_eq!(sink.records[0].run_id, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bench_driver_writes_csv_and_summarizes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let engine = Engine::new(zero_oracle_config()).unwrap();
    let mut sink = CsvSink::new(&path);
    let options = BenchOptions {
        runs: 2,
        verbose: false,
    };
    let records = with_timeout("bench", LIMIT, run_bench(&engine, &options, &mut sink))
        .await
        .unwrap();

    let modes: Vec<(RunMode, u32)> = records.iter().map(|r| (r.mode, r.run_id)).collect();
    assert_eq!(
        modes,
        vec![
            (RunMode::Speculative, 1),
            (RunMode::Speculative, 2),
            (RunMode::Sequential, 1),
            (RunMode::Sequential, 2),
        ]
    );

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 5);
    let summary = xspeculate::summarize_csv(&path).unwrap();
    assert_eq!(summary.speculative_runs, 2);
    assert_eq!(summary.sequential_runs, 2);
    assert!(BenchSummary::from_records(&records).is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bench_stops_after_shutdown_without_recording() {
    let shutdown = CancelScope::new();
    let engine = Engine::new(quick_config())
        .unwrap()
        .with_shutdown(shutdown.clone());
    shutdown.cancel();
    let mut sink = MemorySink::new();
    let options = BenchOptions {
        runs: 3,
        verbose: false,
    };
    let err = with_timeout("cancelled bench", LIMIT, run_bench(&engine, &options, &mut sink))
        .await
        .unwrap_err();
    assert!(matches!(err, BenchError::Cancelled));
    assert!(sink.records.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_interrupt_abandons_long_sequential_run() {
    let shutdown = CancelScope::new();
    let config = BenchConfig {
        threshold: 0,
        commitment_difficulty: 80,
        ..quick_config()
    };
    let engine = Engine::new(config).unwrap().with_shutdown(shutdown.clone());
    let mut sink = MemorySink::new();
    let interrupt = tokio::time::sleep(Duration::from_millis(50));
    let result = with_timeout(
        "interrupted seq run",
        LIMIT,
        xspeculate::until_signal(
            engine.run_and_record(1, RunMode::Sequential, &mut sink),
            interrupt,
            &shutdown,
        ),
    )
    .await;
    assert!(matches!(result, Err(BenchError::Cancelled)));
    assert!(shutdown.is_cancelled());
    assert!(sink.records.is_empty());
}

#[test]
fn test_overflowing_oracle_config_rejected() {
    let config = BenchConfig {
        oracle_dimension: 4,
        oracle_entry_bound: i64::MAX,
        ..BenchConfig::default()
    };
    assert!(matches!(
        Engine::new(config),
        Err(BenchError::InvalidConfig(_))
    ));
}

#[test]
fn test_invalid_config_rejected_by_engine() {
    let config = BenchConfig {
        poll: xspeculate::PollIntervals {
            commitment: 0,
            ..Default::default()
        },
        ..BenchConfig::default()
    };
    assert!(matches!(
        Engine::new(config),
        Err(BenchError::InvalidConfig(_))
    ));
}
