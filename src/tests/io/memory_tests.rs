//! Tests for in-memory IO implementations.

use crate::{InMemorySink, InMemorySource, InputProvider, OutputTarget};
use std::io::{Read, Write};

#[test]
fn in_memory_source_reads_data() {
    let src = InMemorySource::from_string("id", "hello");

    let mut reader = src.open().expect("open in-memory source");
    let mut buf = String::new();
    reader.read_to_string(&mut buf).unwrap();
    assert_eq!(buf, "hello");

    let mut again = String::new();
    src.reader().read_to_string(&mut again).unwrap();
    assert_eq!(again, "hello", "every reader starts from the beginning");
}

#[test]
fn sink_writers_share_one_buffer() {
    let sink = InMemorySink::new("out");
    let mut a = sink.writer();
    let mut b = sink.clone().writer();

    a.write_all(b"abc").unwrap();
    b.write_all(b"def").unwrap();
    assert_eq!(sink.contents(), b"abcdef".to_vec());
    assert_eq!(sink.len(), 6);
    assert!(sink.exists());

    sink.clear();
    assert!(sink.is_empty());
}

#[test]
fn in_memory_sink_overwrite_and_append() {
    let sink = InMemorySink::new("out");

    {
        let mut w = sink.open_overwrite().unwrap();
        w.write_all(b"abc").unwrap();
    }
    {
        let mut w = sink.open_append().unwrap();
        w.write_all(b"def").unwrap();
    }
    assert_eq!(sink.contents_string(), "abcdef");

    {
        let mut w = sink.open_overwrite().unwrap();
        w.write_all(b"xyz").unwrap();
    }
    assert_eq!(sink.contents_string(), "xyz");
}
