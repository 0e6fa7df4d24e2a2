use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crcgen::models;
use crcgen::{generate, Algorithm, Crc, CrcParams, Target};

fn model_params(name: &str, algorithm: Algorithm) -> CrcParams {
    let mut params = CrcParams {
        algorithm,
        ..CrcParams::default()
    };
    models::find(name).expect("model exists").apply_to(&mut params);
    params
}

fn bench_generate(c: &mut Criterion) {
    let constant = model_params("crc-32", Algorithm::TableDriven);
    c.bench_function("generate_c_crc32_table_driven", |b| {
        b.iter(|| generate(black_box(&constant), Target::Source))
    });

    let runtime = CrcParams {
        algorithm: Algorithm::TableDriven,
        ..CrcParams::default()
    };
    c.bench_function("generate_c_undefined_params", |b| {
        b.iter(|| generate(black_box(&runtime), Target::Source))
    });
}

fn bench_checksum(c: &mut Criterion) {
    let params = model_params("crc-32", Algorithm::TableDriven);
    let crc = Crc::from_params(&params).expect("defined");
    let data: Vec<u8> = (0..1024u32).map(|i| (i * 31) as u8).collect();

    c.bench_function("table_driven_1k", |b| {
        b.iter(|| crc.table_driven(black_box(&data)))
    });
    c.bench_function("bit_by_bit_fast_1k", |b| {
        b.iter(|| crc.bit_by_bit_fast(black_box(&data)))
    });
}

criterion_group!(benches, bench_generate, bench_checksum);
criterion_main!(benches);
