//! Registration, writing and lifecycle through the facade.

use std::io::{self, Write};
use std::sync::Arc;

use crate::config::{Config, FileExistsPolicy, OutputSpec};
use crate::error::destination_error;
use crate::io::InMemorySink;
use crate::tests::support::{FailingWriter, PartialWriter, UnflushableWriter};
use crate::{Mode, Multi, MultiBuilder};

#[test]
fn write_reaches_every_writer() {
    let buf1 = InMemorySink::new("buf1");
    let buf2 = InMemorySink::new("buf2");

    let m = Multi::new();
    m.add_writers([buf1.writer(), buf2.writer()]);

    let n = m.write(b"hi").expect("write");
    assert_eq!(n, 2);
    assert_eq!(buf1.contents_string(), "hi");
    assert_eq!(buf2.contents_string(), "hi");
}

#[test]
fn sequential_write_stops_at_first_failure() {
    let ok = InMemorySink::new("ok");
    let fail = FailingWriter::new(io::ErrorKind::BrokenPipe);
    let after = InMemorySink::new("after");

    let m = MultiBuilder::new().with_mode(Mode::Sequential).build();
    m.add_writer(ok.writer());
    m.add_writer(fail.clone());
    m.add_writer(after.writer());

    let err = m.write(b"data").expect_err("second writer fails");
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert_eq!(ok.contents_string(), "data");
    assert_eq!(fail.calls(), 1);
    assert!(after.is_empty(), "writers after the failure are skipped");

    let detail = destination_error(&err).expect("destination detail");
    assert_eq!(detail.key, 1);
    assert_eq!(detail.written, 0);
}

#[test]
fn partial_failure_reports_bytes_accepted() {
    let m = Multi::new();
    m.add_writer(PartialWriter::new(5));

    let err = m.write(b"hello world").expect_err("writer fills up");
    let detail = destination_error(&err).expect("destination detail");
    assert_eq!(detail.written, 5);
    assert_eq!(err.kind(), io::ErrorKind::StorageFull);
}

#[test]
fn failed_write_leaves_instance_usable() {
    let m = Multi::new();
    m.add_writer(FailingWriter::new(io::ErrorKind::Other));
    assert!(m.write(b"x").is_err());

    m.clean();
    let sink = InMemorySink::new("s");
    m.add_writer(sink.writer());
    assert_eq!(m.write(b"again").unwrap(), 5);
    assert_eq!(sink.contents_string(), "again");
}

#[test]
fn clean_turns_writes_into_discard() {
    let sinks: Vec<_> = (0..3).map(|i| InMemorySink::new(format!("s{i}"))).collect();
    let m = Multi::new();
    m.add_writers(sinks.iter().map(InMemorySink::writer));
    assert_eq!(m.len(), 3);

    m.clean();
    assert!(m.is_empty());

    let n = m.write(b"discarded").expect("discard write");
    assert_eq!(n, 9);
    assert!(sinks.iter().all(InMemorySink::is_empty));
}

#[test]
fn clean_is_idempotent_and_keeps_earlier_output() {
    let before = InMemorySink::new("before");
    let after = InMemorySink::new("after");

    let m = Multi::new();
    m.add_writer(before.writer());
    m.write(b"before").unwrap();
    m.clean();
    m.clean();
    m.add_writer(after.writer());
    m.write(b"after").unwrap();

    assert_eq!(before.contents_string(), "before");
    assert_eq!(after.contents_string(), "after");
}

#[test]
fn write_without_writers_is_discarded() {
    let m = Multi::new();
    assert_eq!(m.write(b"nowhere").unwrap(), 7);
    assert_eq!(m.write(&[]).unwrap(), 0);
}

#[test]
fn zero_length_write_and_write_str() {
    let sink = InMemorySink::new("s");
    let m = Multi::new();
    m.add_writer(sink.writer());

    assert_eq!(m.write(&[]).unwrap(), 0);
    assert_eq!(m.write_str("").unwrap(), 0);

    let text = "Hello 世界 🌍";
    assert_eq!(m.write_str(text).unwrap(), text.len());
    assert_eq!(sink.contents_string(), text);
}

#[test]
fn binary_payload_is_copied_verbatim() {
    let sink = InMemorySink::new("s");
    let m = Multi::new();
    m.add_writer(sink.writer());

    let data = [0x00, 0xFF, 0x01, 0xFE, 0x02, 0xFD];
    m.write(&data).unwrap();
    assert_eq!(sink.contents(), data);
}

#[test]
fn keys_are_monotonic_and_restart_after_close() {
    let m = Multi::new();
    assert_eq!(m.add_writer(io::sink()), 0);
    assert_eq!(m.add_writers([io::sink(), io::sink()]), vec![1, 2]);

    m.clean();
    assert_eq!(m.add_writer(io::sink()), 3);

    m.close().unwrap();
    assert_eq!(m.add_writer(io::sink()), 0);
}

#[test]
fn absent_writers_are_skipped() {
    let sink = InMemorySink::new("s");
    let m = Multi::new();
    let keys = m.add_writers([None, Some(sink.writer()), None].into_iter().flatten());
    assert_eq!(keys, vec![0]);
    assert_eq!(m.len(), 1);

    let none: [Option<io::Sink>; 2] = [None, None];
    assert!(m.add_writers(none.into_iter().flatten()).is_empty());
    assert_eq!(m.writer().len(), 1);
}

#[test]
fn close_allows_later_writes() {
    let sink = InMemorySink::new("s");
    let m = Multi::new();
    m.add_writer(sink.writer());
    m.close().unwrap();

    assert!(m.is_empty());
    assert_eq!(m.write(b"after close").unwrap(), 11);
    assert!(sink.is_empty());
    m.close().unwrap();
}

#[test]
fn close_logs_flush_failures_by_default() {
    let m = Multi::new();
    m.add_writer(UnflushableWriter);
    assert!(m.close().is_ok());
}

#[test]
fn close_returns_flush_failures_when_configured() {
    let m = Multi::with_config(Config::default().with_report_close_errors(true));
    m.add_writer(UnflushableWriter);

    let err = m.close().expect_err("flush failure is reported");
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(m.is_empty(), "destinations are dropped even on failure");
}

#[test]
fn flush_reaches_every_destination() {
    let m = Multi::new();
    m.add_writer(io::sink());
    m.add_writer(UnflushableWriter);
    assert!(m.flush().is_err());

    m.clean();
    m.add_writer(io::sink());
    assert!(m.flush().is_ok());
}

#[test]
fn multi_is_a_std_writer() {
    let sink = InMemorySink::new("s");
    let mut m = Multi::new();
    m.add_writer(sink.writer());

    write!(m, "{}-{}", 1, 2).unwrap();
    let shared = &m;
    io::copy(&mut &b"+tail"[..], &mut &*shared).unwrap();
    assert_eq!(sink.contents_string(), "1-2+tail");
}

#[test]
fn output_spec_follows_file_exists_policy() {
    let sink = InMemorySink::new("mem");
    sink.writer().write_all(b"old").unwrap();
    let target = Arc::new(sink.clone());

    let m = Multi::new();

    let refuse = OutputSpec::new("mem", target.clone());
    let err = m.add_output_spec(&refuse).expect_err("target has content");
    assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    assert!(m.is_empty());

    let append = OutputSpec::new("mem", target.clone()).with_file_exists_policy(FileExistsPolicy::Append);
    m.add_output_spec(&append).unwrap();
    m.write(b"+new").unwrap();
    assert_eq!(sink.contents_string(), "old+new");

    m.clean();
    let overwrite = OutputSpec::new("mem", target).with_file_exists_policy(FileExistsPolicy::Overwrite);
    m.add_output_spec(&overwrite).unwrap();
    m.write(b"fresh").unwrap();
    assert_eq!(sink.contents_string(), "fresh");
}

#[test]
fn output_spec_failures_name_the_target() {
    let m = Multi::new();
    let target = Arc::new(InMemorySink::new("named"));
    m.add_output_spec(&OutputSpec::new("named", target).with_file_exists_policy(FileExistsPolicy::Overwrite))
        .unwrap();
    m.add_writer(FailingWriter::new(io::ErrorKind::Other));

    let err = m.write(b"x").unwrap_err();
    let detail = destination_error(&err).unwrap();
    assert_eq!(detail.key, 1);
    assert_eq!(detail.target, None);

    let m = Multi::new();
    #[derive(Debug)]
    struct Broken;
    impl crate::io::OutputTarget for Broken {
        fn id(&self) -> &str {
            "broken"
        }
        fn open_overwrite(&self) -> io::Result<Box<dyn Write + Send>> {
            Ok(Box::new(FailingWriter::new(io::ErrorKind::PermissionDenied)))
        }
        fn open_append(&self) -> io::Result<Box<dyn Write + Send>> {
            self.open_overwrite()
        }
    }
    m.add_output_spec(&OutputSpec::new("broken", Arc::new(Broken))).unwrap();
    let err = m.write(b"x").unwrap_err();
    assert_eq!(destination_error(&err).unwrap().target.as_deref(), Some("broken"));
    assert!(err.to_string().contains("broken"));
}

#[test]
fn observers_report_mode_and_state() {
    let m = Multi::new();
    assert!(m.is_sequential());
    assert!(!m.is_parallel());
    assert!(!m.is_adaptive());
    assert_eq!(m.mode(), Mode::Sequential);

    let m = MultiBuilder::new().with_parallel(true).with_adaptive(true).build();
    assert!(m.is_parallel());
    assert!(m.is_adaptive());
    assert_eq!(m.writer().mode(), Mode::Parallel);
    assert!(format!("{m:?}").contains("Parallel"));
}
