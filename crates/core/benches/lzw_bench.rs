//! Benchmarks for the LZW decoder hot path.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::HashMap;
use std::hint::black_box;

use pdfdelta_core::lzw::lzwdecode;

/// Generate raw bytes for testing (repeating pattern - compresses well).
fn generate_raw_bytes(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Generate random bytes for testing (doesn't compress well).
/// Uses simple PRNG for reproducibility.
fn generate_random_bytes(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed: u64 = 42;
    for _ in 0..size {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((seed >> 16) as u8);
    }
    data
}

/// Encode data using LZW (PDF variant: MSB first, EarlyChange=1).
fn lzw_encode(data: &[u8]) -> Vec<u8> {
    let mut dict: HashMap<Vec<u8>, u16> = (0u16..256).map(|i| (vec![i as u8], i)).collect();
    let mut next_free: u16 = 258;
    let mut codes: Vec<u16> = vec![256];
    let mut w: Vec<u8> = Vec::new();

    for &byte in data {
        let mut wc = w.clone();
        wc.push(byte);
        if dict.contains_key(&wc) {
            w = wc;
            continue;
        }
        codes.push(dict[&w]);
        if next_free < 4095 {
            dict.insert(wc, next_free);
            next_free += 1;
        } else {
            codes.push(256);
            dict = (0u16..256).map(|i| (vec![i as u8], i)).collect();
            next_free = 258;
        }
        w = vec![byte];
    }
    if !w.is_empty() {
        codes.push(dict[&w]);
    }
    codes.push(257);

    // Pack with the width growth a decoder with EarlyChange=1 applies.
    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut nbits: u8 = 0;
    let mut free: u16 = 258;
    let mut code_len: u8 = 9;
    let mut first = true;
    for code in codes {
        acc = (acc << code_len) | u32::from(code);
        nbits += code_len;
        while nbits >= 8 {
            nbits -= 8;
            out.push((acc >> nbits) as u8);
            acc &= (1 << nbits) - 1;
        }
        match code {
            256 => {
                free = 258;
                code_len = 9;
                first = true;
            }
            257 => {}
            _ if first => first = false,
            _ => {
                free += 1;
                if code_len < 12 && free == (1 << code_len) - 1 {
                    code_len += 1;
                }
            }
        }
    }
    if nbits > 0 {
        out.push((acc << (8 - nbits)) as u8);
    }
    out
}

/// Benchmark LZW decoding at various sizes.
fn bench_lzw(c: &mut Criterion) {
    let mut group = c.benchmark_group("lzw_decode");

    for size in [1024usize, 10 * 1024, 100 * 1024] {
        let encoded = lzw_encode(&generate_raw_bytes(size));
        group.bench_with_input(
            BenchmarkId::new("pattern", size),
            &encoded,
            |b, encoded| b.iter(|| lzwdecode(black_box(encoded))),
        );

        let encoded = lzw_encode(&generate_random_bytes(size));
        group.bench_with_input(BenchmarkId::new("random", size), &encoded, |b, encoded| {
            b.iter(|| lzwdecode(black_box(encoded)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lzw);
criterion_main!(benches);
