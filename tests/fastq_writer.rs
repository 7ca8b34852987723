use fastx_fastq::{
    Destination, ErrorKind, FastqError, FastqReader, FastqRecord, FastqWriter, OutputFormat,
    QualityEncoding, ReaderOptions, SequenceWriter, TabularWriter, create_writer,
};
use std::io::{self, Cursor, Write};
use tempfile::tempdir;

fn read_all(data: &[u8], offset: i32) -> Vec<FastqRecord> {
    FastqReader::from_bufread(
        Cursor::new(data.to_vec()),
        "in.fq",
        ReaderOptions::with_offset(offset),
    )
    .map(|r| r.unwrap())
    .collect()
}

fn write_all(records: &[FastqRecord]) -> String {
    let mut w = FastqWriter::new(Vec::new(), "mem");
    for rec in records {
        w.write(rec).unwrap();
    }
    assert_eq!(w.records_written(), records.len() as u64);
    String::from_utf8(w.into_inner().unwrap()).unwrap()
}

#[test]
fn ascii_records_round_trip_byte_identical() {
    let input = "@r1 lane:1\nACGTN\n+r1 lane:1\nII#5!\n@r2\nAC\n+\n~~\n";
    let records = read_all(input.as_bytes(), 33);
    assert_eq!(write_all(&records), input);
}

#[test]
fn numeric_records_keep_their_style() {
    let input = "@r1\nACGT\n+\n40 41 42 43\n";
    let records = read_all(input.as_bytes(), 0);
    assert_eq!(write_all(&records), input);

    let records = read_all(b"@r1\nAC\n+\n  70   80 \n", 64);
    assert_eq!(write_all(&records), "@r1\nAC\n+\n70 80\n");
}

#[test]
fn quality_less_record_gets_synthesized_lines() {
    let mut rec = FastqRecord::new("x", "ACGT");
    rec.encoding = QualityEncoding::Ascii { offset: 33 };
    assert!(!rec.has_quality());
    // one zero score per byte of the separator text, not per nucleotide
    assert_eq!(write_all(&[rec]), "@x\nACGT\n+x\n!\n");
}

#[test]
fn quality_less_record_prefers_id2() {
    let mut rec = FastqRecord::new("read", "ACGTACGT");
    rec.id2 = b"abc".to_vec();
    rec.encoding = QualityEncoding::Numeric { offset: 64 };
    assert_eq!(write_all(&[rec]), "@read\nACGTACGT\n+abc\n64 64 64\n");
}

#[test]
fn default_encoding_is_phred64_ascii() {
    let rec = FastqRecord::new("ab", "A");
    assert_eq!(write_all(&[rec]), "@ab\nA\n+ab\n@@\n");
}

#[test]
fn empty_id_is_rejected() {
    let ascii33 = QualityEncoding::Ascii { offset: 33 };
    let rec = FastqRecord::with_quality("", "A", vec![30], ascii33);
    let mut w = FastqWriter::new(Vec::new(), "out.fq");
    let err = w.write(&rec).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
    assert!(matches!(err, FastqError::EmptyId { ref dest } if dest == "out.fq"));
    assert!(w.into_inner().unwrap().is_empty());
}

struct FailAfter {
    remaining: usize,
}

impl Write for FailAfter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        let n = buf.len().min(self.remaining);
        self.remaining -= n;
        Ok(n)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failure_reports_line() {
    let ascii33 = QualityEncoding::Ascii { offset: 33 };
    let rec = FastqRecord::with_quality("r", "AC", vec![1, 2], ascii33);
    // "@r\n" + "AC\n" fit, the separator line does not
    let mut w = FastqWriter::new(FailAfter { remaining: 6 }, "pipe");
    let err = w.write(&rec).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
    let ctx = err.context().unwrap();
    assert_eq!(ctx.source, "pipe");
    assert_eq!(ctx.line_num, 3);
}

#[test]
fn write_after_finish_fails() {
    let rec = FastqRecord::new("r", "AC");
    let mut w = FastqWriter::new(Vec::new(), "mem");
    w.write_record(&rec).unwrap();
    w.finish().unwrap();
    // a second finish is a no-op
    w.finish().unwrap();

    let err = w.write_record(&rec).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
    assert_eq!(err.context().unwrap().line_num, 5);
    assert_eq!(w.records_written(), 1);
}

#[test]
fn non_utf8_id_is_written_verbatim() {
    let input = b"@r\xff\xfe\nAC\n+\xff\n!!\n";
    let records = read_all(input, 33);
    assert_eq!(records[0].id, b"r\xff\xfe");
    assert_eq!(records[0].id2, b"\xff");

    let mut w = FastqWriter::new(Vec::new(), "mem");
    w.write(&records[0]).unwrap();
    assert_eq!(w.into_inner().unwrap(), input);
}

#[test]
fn tabular_output() {
    let records = read_all(b"@r1\nACGT\n+\n!!#I\n@r2\nAC\n+\n30 31\n", 33);
    let mut w = TabularWriter::new(Vec::new(), "tab");
    for rec in &records {
        w.write_record(rec).unwrap();
    }
    w.write_record(&FastqRecord::new("r3", "GG")).unwrap();
    assert_eq!(w.destination(), "tab");
    let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
    assert_eq!(out, "r1\tACGT\t!!#I\nr2\tAC\t30 31\nr3\tGG\t\n");
}

#[test]
fn destination_from_arg() {
    assert_eq!(Destination::from_arg(""), Destination::Stdout);
    assert_eq!(Destination::from_arg("-"), Destination::Stdout);
    assert_eq!(
        Destination::from_arg("out.fq"),
        Destination::Path("out.fq".into())
    );
    assert_eq!(Destination::Stdout.name(), "stdout");
}

#[test]
fn factory_writers_to_files() {
    let dir = tempdir().unwrap();
    let fq_path = dir.path().join("out.fq");
    let tab_path = dir.path().join("out.tab");
    let records = read_all(b"@r1\nACGT\n+\n!!!!\n", 33);

    {
        let fq_dest = Destination::Path(fq_path.clone());
        let mut fq = create_writer(OutputFormat::Fastq, &fq_dest).unwrap();
        let mut tab = FastqReader::tabular_writer(&Destination::Path(tab_path.clone())).unwrap();
        for rec in &records {
            fq.write_record(rec).unwrap();
            tab.write_record(rec).unwrap();
        }
        fq.finish().unwrap();
        tab.finish().unwrap();
    }

    let back: Vec<_> = FastqReader::from_path(&fq_path, ReaderOptions::with_offset(33))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(back, records);
    assert_eq!(std::fs::read_to_string(&tab_path).unwrap(), "r1\tACGT\t!!!!\n");
}

#[test]
fn unwritable_destination_is_io_failure() {
    let dir = tempdir().unwrap();
    let dest = Destination::Path(dir.path().join("missing").join("out.fq"));
    let err = FastqReader::fastx_writer(&dest).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}
