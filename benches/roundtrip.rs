use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lastxt::{
    ConversionPipeline, Reader, SeekableSink, StreamSink,
    pipeline::Options,
    text::{self, TextWriter},
};
use std::{fmt::Write as _, hint::black_box, io::Cursor};

fn lines(npoints: usize) -> String {
    let mut text = String::new();
    for i in 0..npoints {
        let _ = writeln!(
            text,
            "{}.25 {}.5 {}.125 {} {}",
            i,
            i * 2,
            i % 100,
            i % 256,
            i % 5 + 1
        );
    }
    text
}

fn to_las(text: &str) -> Vec<u8> {
    let options = Options {
        parse: "xyzir".to_string(),
        ..Default::default()
    };
    let mut pipeline = ConversionPipeline::new(options).unwrap();
    let mut sink = SeekableSink::new(Cursor::new(Vec::new()));
    let _ = pipeline.run(|| Ok(Cursor::new(text)), &mut sink).unwrap();
    sink.into_inner().into_inner()
}

fn text_to_las(c: &mut Criterion) {
    for npoints in [100, 10_000] {
        let text = lines(npoints);
        c.bench_with_input(BenchmarkId::new("single pass", npoints), &text, |b, text| {
            b.iter(|| to_las(black_box(text)))
        });
        c.bench_with_input(BenchmarkId::new("two pass", npoints), &text, |b, text| {
            b.iter(|| {
                let options = Options {
                    parse: "xyzir".to_string(),
                    ..Default::default()
                };
                let mut pipeline = ConversionPipeline::new(options).unwrap();
                let mut sink = StreamSink::new(Vec::new());
                let _ = pipeline
                    .run(|| Ok(Cursor::new(black_box(text))), &mut sink)
                    .unwrap();
                sink.into_inner()
            })
        });
    }
}

fn las_to_text(c: &mut Criterion) {
    for npoints in [100, 10_000] {
        let las = to_las(&lines(npoints));
        c.bench_with_input(BenchmarkId::new("las to text", npoints), &las, |b, las| {
            b.iter(|| {
                let mut reader = Reader::new(Cursor::new(black_box(las))).unwrap();
                let options = text::Options {
                    parse: "xyzir".to_string(),
                    ..Default::default()
                };
                let mut writer = TextWriter::new(Vec::new(), &options);
                for point in reader.points() {
                    writer.write_point(&point.unwrap()).unwrap();
                }
                writer.into_inner()
            })
        });
    }
}

criterion_group!(benches, text_to_las, las_to_text);
criterion_main!(benches);
