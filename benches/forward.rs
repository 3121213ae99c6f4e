use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::ffi::CStr;

use devaarg::{forward_arg, forward_charp, forward_int, probes, TrailingArg};

fn bench_forward(c: &mut Criterion) {
    let first = CStr::from_bytes_with_nul(b"bench\0").unwrap();
    let text = CStr::from_bytes_with_nul(b"forwarded text\0").unwrap();

    c.bench_function("forward_int", |b| {
        b.iter(|| unsafe { forward_int(probes::int_identity(), first.as_ptr(), black_box(42)) });
    });

    c.bench_function("forward_charp", |b| {
        b.iter(|| unsafe { forward_charp(probes::charp_len(), first.as_ptr(), black_box(text.as_ptr())) });
    });

    c.bench_function("forward_arg_tagged", |b| {
        b.iter(|| unsafe {
            forward_arg(probes::int_identity(), first.as_ptr(), black_box(TrailingArg::Int(42)))
        });
    });
}

criterion_group!(benches, bench_forward);
criterion_main!(benches);
