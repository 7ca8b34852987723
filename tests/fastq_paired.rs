use fastx_fastq::{
    Destination, ErrorKind, FastqError, FastqReader, FastqWriter, OutputFormat, PairedFastqReader,
    PairedFastqWriter, PairedSequenceWriter, ReaderOptions, create_paired_writer,
};
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

fn records(prefix: &str, n: usize) -> String {
    (0..n)
        .map(|i| format!("@{prefix}{i}\nACGT\n+\nIIII\n"))
        .collect()
}

fn mem_reader(data: String, label: &str) -> FastqReader {
    FastqReader::from_bufread(
        Cursor::new(data.into_bytes()),
        label,
        ReaderOptions::with_offset(33),
    )
}

fn paired(a: String, b: String) -> PairedFastqReader {
    PairedFastqReader::new(mem_reader(a, "a.fq"), mem_reader(b, "b.fq"))
}

#[test]
fn equal_streams_complete() {
    let mut pe = paired(records("a", 3), records("b", 3));
    let mut n = 0;
    while let Some((r1, r2)) = pe.read_next_pair().unwrap() {
        assert_eq!(r1.id, format!("a{n}").into_bytes());
        assert_eq!(r2.id, format!("b{n}").into_bytes());
        n += 1;
    }
    assert_eq!(n, 3);
    assert_eq!(pe.pairs_read(), 3);
    assert!(pe.read_next_pair().unwrap().is_none());
}

#[test]
fn second_file_shorter() {
    let mut pe = paired(records("a", 3), records("b", 2));
    assert!(pe.read_next_pair().unwrap().is_some());
    assert!(pe.read_next_pair().unwrap().is_some());
    match pe.read_next_pair().unwrap_err() {
        FastqError::UnequalRecordCounts { ended, remaining } => {
            assert_eq!(ended, "b.fq");
            assert_eq!(remaining, "a.fq");
        }
        other => panic!("expected unequal record counts, got {other:?}"),
    }
    assert!(matches!(
        pe.read_next_pair(),
        Err(FastqError::Halted { .. })
    ));
}

#[test]
fn first_file_shorter() {
    let pe = paired(records("a", 1), records("b", 2));
    let results: Vec<_> = pe.collect();
    assert_eq!(results.len(), 2);
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LengthMismatch);
    assert!(err.to_string().contains("'a.fq' ended before 'b.fq'"));
}

#[test]
fn both_sides_are_read_in_lockstep() {
    let mut pe = paired(records("a", 2), records("b", 2));
    pe.read_next_pair().unwrap();
    assert_eq!(pe.end1().records_read(), 1);
    assert_eq!(pe.end2().records_read(), 1);
    assert_eq!(pe.end1().line_num(), 4);
    assert_eq!(pe.end2().line_num(), 4);
}

#[test]
fn malformed_mate_is_fatal() {
    let bad = format!("{}@b1\nACGT\n+\n!!\n", records("b", 1));
    let mut pe = paired(records("a", 2), bad);
    assert!(pe.read_next_pair().unwrap().is_some());
    let err = pe.read_next_pair().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContentViolation);
    let ctx = err.context().unwrap();
    assert_eq!(ctx.source, "b.fq");
    assert_eq!(ctx.line_num, 8);
}

#[test]
fn paired_writer_writes_both_sides() {
    let pairs: Vec<_> = paired(records("a", 2), records("b", 2))
        .map(|p| p.unwrap())
        .collect();
    let mut w = PairedFastqWriter::new(
        FastqWriter::new(Vec::new(), "1.fq"),
        FastqWriter::new(Vec::new(), "2.fq"),
    );
    for (r1, r2) in &pairs {
        w.write_pair(r1, r2).unwrap();
    }
    let (out1, out2) = w.into_inner().unwrap();
    assert_eq!(String::from_utf8(out1).unwrap(), records("a", 2));
    assert_eq!(String::from_utf8(out2).unwrap(), records("b", 2));
}

#[test]
fn paired_files_round_trip() {
    let dir = tempdir().unwrap();
    let in1 = dir.path().join("in_1.fq");
    let in2 = dir.path().join("in_2.fq");
    std::fs::write(&in1, records("a", 4)).unwrap();
    std::fs::write(&in2, records("b", 4)).unwrap();
    let out1 = dir.path().join("out_1.fq");
    let out2 = dir.path().join("out_2.fq");
    let tab = dir.path().join("out.tab");

    let pe = PairedFastqReader::from_paths(&in1, &in2, ReaderOptions::with_offset(33)).unwrap();
    {
        let mut fq = PairedFastqReader::fastx_writer(
            &Destination::Path(out1.clone()),
            &Destination::Path(out2.clone()),
        )
        .unwrap();
        let mut tw = create_paired_writer(
            OutputFormat::Tabular,
            &Destination::Path(tab.clone()),
            &Destination::Stdout,
        )
        .unwrap();
        for pair in pe {
            let (r1, r2) = pair.unwrap();
            fq.write_pair(&r1, &r2).unwrap();
            tw.write_pair(&r1, &r2).unwrap();
        }
        fq.finish().unwrap();
        tw.finish().unwrap();
    }

    let read = |p: &Path| std::fs::read_to_string(p).unwrap();
    assert_eq!(read(out1.as_path()), records("a", 4));
    assert_eq!(read(out2.as_path()), records("b", 4));
    let tab_text = read(tab.as_path());
    assert_eq!(tab_text.lines().count(), 4);
    assert_eq!(
        tab_text.lines().next().unwrap(),
        "a0\tACGT\tIIII\tb0\tACGT\tIIII"
    );
}
