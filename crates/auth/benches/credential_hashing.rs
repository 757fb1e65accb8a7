//! Credential hashing is the intentional per-request latency floor of the
//! login path. These benchmarks track it across cost settings so a cost
//! change is a deliberate decision, not a surprise.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use opencampus_auth::CredentialHasher;

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("credential_hash");

    // (memory KiB, iterations, lanes): low/dev cost up to the default.
    let costs = [(1024u32, 1u32, 1u32), (4096, 2, 1), (19456, 2, 1)];

    for (m, t, p) in costs {
        let hasher = CredentialHasher::with_cost(m, t, p).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("m{m}_t{t}_p{p}")),
            &hasher,
            |b, hasher| {
                b.iter(|| hasher.hash(black_box("correct horse battery staple")).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let hasher = CredentialHasher::with_cost(4096, 2, 1).unwrap();
    let secret = hasher.hash("correct horse battery staple").unwrap();

    let mut group = c.benchmark_group("credential_verify");
    group.bench_function("matching_password", |b| {
        b.iter(|| hasher.verify(black_box("correct horse battery staple"), &secret));
    });
    group.bench_function("wrong_password", |b| {
        b.iter(|| hasher.verify(black_box("incorrect horse battery staple"), &secret));
    });
    group.finish();
}

criterion_group!(benches, bench_hash, bench_verify);
criterion_main!(benches);
