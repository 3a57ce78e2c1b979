use bencher::{TestCase, TestGroup};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use micro_gzip::{GzipLevel, GzipResponse};
use micro_resp::recorder::ResponseRecorder;
use micro_resp::{Response, ResponseWriter};
use std::hint::black_box;

// handlers usually write in small pieces
const CHUNK_SIZE: usize = 4096;

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::html("html_small", TestGroup::Small),
        TestCase::html("html_normal", TestGroup::Normal),
        TestCase::html("html_large", TestGroup::Large),
        TestCase::noise("noise_normal", TestGroup::Normal),
    ]
}

fn write_all<W: ResponseWriter>(writer: &mut W, payload: &[u8]) {
    for chunk in payload.chunks(CHUNK_SIZE) {
        writer.write(chunk).expect("recorder should accept the body");
    }
    writer.close().expect("recorder should close");
}

fn benchmark_gzip_writer(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("gzip_writer");

    for case in &test_cases {
        group.throughput(Throughput::Bytes(case.payload().len() as u64));

        for level in [GzipLevel::FAST, GzipLevel::default(), GzipLevel::BEST] {
            let id = BenchmarkId::new(case.name(), format!("level_{}", level.value()));
            group.bench_with_input(id, case, |b, case| {
                b.iter_batched(
                    || GzipResponse::with_level(ResponseRecorder::new(), level),
                    |mut writer| {
                        write_all(&mut writer, case.payload());
                        black_box(writer.into_inner())
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

fn benchmark_plain_writer(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("plain_writer");

    for case in &test_cases {
        group.throughput(Throughput::Bytes(case.payload().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), case, |b, case| {
            b.iter_batched(
                || Response::wrap(ResponseRecorder::new()),
                |mut writer| {
                    write_all(&mut writer, case.payload());
                    black_box(writer.into_inner())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(writer, benchmark_gzip_writer, benchmark_plain_writer);
criterion_main!(writer);
