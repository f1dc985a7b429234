//! Stress tests for concurrent use of derived handlers
//!
//! These tests verify:
//! - Handlers derived from one parent can be used from many threads
//! - Every record is forwarded exactly once under contention
//! - Shared metrics stay consistent

use log_dedup::prelude::*;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: usize = 250;

/// Every thread derives its own scope from a shared parent
#[test]
fn test_derived_handlers_across_threads() {
    let sink = MemoryAppender::new();
    let metrics = Arc::new(DedupMetrics::new());
    let parent = DedupHandler::builder()
        .policy(DedupPolicy::Increment)
        .metrics(metrics.clone())
        .build(sink.clone())
        .with_attrs(vec![Attr::string("service", "api"), Attr::string("env", "test")]);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let handler = parent
                .with_attrs(vec![Attr::uint("worker", t as u64)])
                .with_group("job");
            thread::spawn(move || {
                let logger = Logger::new(handler);
                for i in 0..RECORDS_PER_THREAD {
                    logger
                        .info(
                            "tick",
                            vec![Attr::uint("seq", i as u64), Attr::uint("seq", i as u64 + 1)],
                        )
                        .expect("memory sink never fails");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let records = sink.take();
    assert_eq!(records.len(), THREADS * RECORDS_PER_THREAD);
    assert_eq!(metrics.records_handled() as usize, THREADS * RECORDS_PER_THREAD);

    for record in &records {
        let keys: Vec<&str> = record.attrs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["env", "job", "service", "worker"]);
        let job = record.attrs[1].value.as_group().expect("job group");
        assert_eq!(job.len(), 2);
        assert_eq!(job[1].key, "seq#01");
    }

    // The parent never sees what its children added
    assert_eq!(parent.deduplicate(Vec::new()).len(), 2);
}

/// Concurrent writers share one JSON file without interleaving lines
#[test]
fn test_concurrent_json_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.jsonl");

    let appender = JsonAppender::new(&log_file)
        .expect("Failed to create appender")
        .with_source(false);
    let logger = Logger::new(DedupHandler::append(appender))
        .with(vec![Attr::string("tag", "base")]);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.with(vec![Attr::string("tag", format!("thread-{}", t))]);
            thread::spawn(move || {
                for i in 0..RECORDS_PER_THREAD {
                    logger
                        .warn(format!("message {}", i), vec![Attr::int("n", i as i64)])
                        .expect("write");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer panicked");
    }
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let mut count = 0;
    for line in content.lines() {
        let json: serde_json::Value = serde_json::from_str(line).expect("whole JSON line");
        let tags = json["tag"].as_array().expect("tags appended");
        assert_eq!(tags[0], "base");
        assert_eq!(tags.len(), 2);
        count += 1;
    }
    assert_eq!(count, THREADS * RECORDS_PER_THREAD);
}
