use std::io;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::fanout::Mode;
use crate::io::InMemorySink;
use crate::tests::support::{FailingWriter, SlowWriter};
use crate::{Multi, MultiBuilder, aggregate_error, destination_error};

fn parallel(minimal_size: usize) -> Multi {
    MultiBuilder::new()
        .with_config(Config::default().with_minimal_size(minimal_size))
        .with_mode(Mode::Parallel)
        .build()
}

#[test]
fn every_destination_receives_the_payload() {
    let sinks: Vec<_> = (0..5).map(|i| InMemorySink::new(format!("s{i}"))).collect();
    let m = parallel(0);
    m.add_writers(sinks.iter().map(InMemorySink::writer));

    let payload = vec![7u8; 4096];
    assert_eq!(m.write(&payload).unwrap(), payload.len());
    assert!(sinks.iter().all(|s| s.contents() == payload));
}

#[test]
fn every_destination_is_attempted_despite_failures() {
    let ok1 = InMemorySink::new("ok1");
    let fail1 = FailingWriter::new(io::ErrorKind::BrokenPipe);
    let ok2 = InMemorySink::new("ok2");
    let fail2 = FailingWriter::new(io::ErrorKind::TimedOut);

    let m = parallel(0);
    m.add_writer(ok1.writer());
    m.add_writer(fail1.clone());
    m.add_writer(ok2.writer());
    m.add_writer(fail2.clone());

    let err = m.write(b"broadcast").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Other);
    assert_eq!(fail1.calls(), 1);
    assert_eq!(fail2.calls(), 1);
    assert_eq!(ok1.contents_string(), "broadcast");
    assert_eq!(ok2.contents_string(), "broadcast");

    let agg = aggregate_error(&err).expect("aggregated failures");
    let keys: Vec<u64> = agg.iter().map(|e| e.key).collect();
    assert_eq!(keys, vec![1, 3]);
    assert_eq!(agg.errors[1].kind(), io::ErrorKind::TimedOut);
    assert!(err.to_string().contains("2 destination(s)"));
}

#[test]
fn single_failure_keeps_its_kind() {
    let m = parallel(0);
    m.add_writer(io::sink());
    m.add_writer(FailingWriter::new(io::ErrorKind::WriteZero));

    let err = m.write(b"x").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    assert_eq!(aggregate_error(&err).unwrap().len(), 1);
}

#[test]
fn small_payload_falls_back_to_sequential() {
    let fail = FailingWriter::new(io::ErrorKind::BrokenPipe);
    let after = InMemorySink::new("after");

    let m = parallel(1024);
    m.add_writer(fail);
    m.add_writer(after.writer());

    let err = m.write(b"tiny").unwrap_err();
    assert!(destination_error(&err).is_some(), "fail-fast error, not aggregated");
    assert!(after.is_empty());

    let big = vec![1u8; 2048];
    let err = m.write(&big).unwrap_err();
    assert!(aggregate_error(&err).is_some());
    assert_eq!(after.len(), 2048);
}

#[test]
fn latency_tracks_the_slowest_destination() {
    let delay = Duration::from_millis(60);
    let sinks: Vec<_> = (0..4).map(|i| InMemorySink::new(format!("s{i}"))).collect();

    let m = parallel(0);
    m.add_writers(sinks.iter().map(|s| SlowWriter::new(delay, s)));

    let start = Instant::now();
    m.write(b"slow").unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= delay);
    assert!(elapsed < delay * 4, "writes overlapped, took {elapsed:?}");
    assert!(sinks.iter().all(|s| s.contents() == b"slow"));
}
