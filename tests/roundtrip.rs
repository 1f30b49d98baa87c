use chrono::NaiveDate;
use lastxt::{
    ConversionPipeline, Reader, SeekableSink, Vector,
    pipeline::{self, Options},
    text::{self, Separator, TextWriter},
};
use std::io::Cursor;

const PARSE: &str = "xyztiarncupedRGB";

fn to_las(text: &str, parse: &str) -> Vec<u8> {
    let options = Options {
        parse: parse.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 2, 29),
        ..Default::default()
    };
    let mut pipeline = ConversionPipeline::new(options).unwrap();
    let mut sink = SeekableSink::new(Cursor::new(Vec::new()));
    let _ = pipeline
        .run(|| Ok(Cursor::new(text.as_bytes())), &mut sink)
        .unwrap();
    sink.into_inner().into_inner()
}

fn to_text(las: Vec<u8>, parse: &str, separator: Separator) -> String {
    let options = text::Options {
        parse: parse.to_string(),
        separator,
        header_comment: None,
    };
    let mut output = Vec::new();
    let _ = text::convert(Cursor::new(las), &mut output, &options, false).unwrap();
    String::from_utf8(output).unwrap()
}

fn numbers(line: &str) -> Vec<f64> {
    line.split(' ').map(|token| token.parse().unwrap()).collect()
}

#[test]
fn every_field() {
    let input = "1.234 5.678 -9.101 100.5 12 -5 1 2 3 4 5 1 0 1000 2000 3000\n\
                 -0.004 0.006 1e2 7.25 65535 90 7 7 255 255 65535 0 1 0 0 65535\n";
    let output = to_text(to_las(input, PARSE), PARSE, Separator::Space);
    assert_eq!(2, output.lines().count());
    for (expected, actual) in input.lines().zip(output.lines()) {
        let expected = numbers(expected);
        let actual = numbers(actual);
        for i in 0..3 {
            assert!(
                (expected[i] - actual[i]).abs() <= 0.005 + 1e-9,
                "{} became {}",
                expected[i],
                actual[i]
            );
        }
        assert_eq!(expected[3..], actual[3..]);
    }
}

#[test]
fn header_describes_the_points() {
    let las = to_las("1 2 3 1\n-1 -2 -3 2\n5 5 5 2\n", "xyzr");
    let reader = Reader::new(Cursor::new(las)).unwrap();
    let header = reader.header();
    assert_eq!(3, header.number_of_points);
    assert_eq!([1, 2, 0, 0, 0], header.number_of_points_by_return);
    assert_eq!(Vector { x: -1., y: -2., z: -3. }, header.bounds.min);
    assert_eq!(Vector { x: 5., y: 5., z: 5. }, header.bounds.max);
    assert_eq!(NaiveDate::from_ymd_opt(2024, 2, 29), header.date);
    assert_eq!(0, u8::from(header.point_format));
}

#[test]
fn bad_lines_are_skipped() {
    let las = to_las("1 2 3\n1 2\nfoo 2 3\n4 5 6\n", "xyz");
    assert_eq!("1,2,3\n4,5,6\n", to_text(las, "xyz", Separator::Comma));
}

#[test]
fn point_index_prints_its_own_column() {
    let las = to_las("1 2 3\n4 5 6\n", "xyz");
    assert_eq!("0 1\n0 4\n", to_text(las, "Mx", Separator::Space));
    let las = to_las("1 2 3\n", "xyz");
    assert_eq!("1 1 2\n", to_text(las, "xMM", Separator::Space));
}

#[test]
fn missing_attributes_print_zeros() {
    let las = to_las("1 2 3\n", "xyz");
    assert_eq!("1 0 0\n", to_text(las, "xtR", Separator::Space));
}

#[test]
fn text_writer_after_pipeline() {
    let options = pipeline::Options {
        parse: "sxyz".to_string(),
        skip_lines: 1,
        ..Default::default()
    };
    let mut pipeline = ConversionPipeline::new(options).unwrap();
    let mut sink = SeekableSink::new(Cursor::new(Vec::new()));
    let summary = pipeline
        .run(
            || Ok(Cursor::new("id x y z\n7 0.5 0.25 0.125\n")),
            &mut sink,
        )
        .unwrap();
    assert_eq!(1, summary.points_written);

    let mut reader = Reader::new(Cursor::new(sink.into_inner().into_inner())).unwrap();
    let mut writer = TextWriter::new(Vec::new(), &text::Options::default());
    for point in reader.points() {
        writer.write_point(&point.unwrap()).unwrap();
    }
    assert_eq!(
        "0.5 0.25 0.13\n",
        String::from_utf8(writer.into_inner()).unwrap()
    );
}
