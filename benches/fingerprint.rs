//! Benchmarks for request fingerprinting
//!
//! This benchmark measures:
//! - Canonical JSON serialization of generation payloads
//! - SHA-256 fingerprinting as the skill list grows
//! - A full in-memory cache lookup

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::sync::Arc;

use docgen_core::cache::{canonical_json, CacheConfig, CacheKeyGenerator, ResponseCache};
use docgen_core::metrics::GenerationMetrics;
use docgen_core::types::DocumentKind;

fn payload(skills: usize) -> Value {
    json!({
        "profile": {
            "current_role": "Senior Backend Engineer",
            "years_experience": 9,
            "education": "BSc Computer Science",
            "skills": (0..skills).map(|i| format!("skill-{i}")).collect::<Vec<_>>(),
            "experience": "Designed and operated payment services handling 4k requests per second",
            "target_role": "Staff Engineer",
            "industry": "technology",
            "tone": "professional"
        },
        "job_description": "Own the reliability of our payments platform",
        "company_info": "",
        "hiring_manager": ""
    })
}

fn bench_canonical_json(c: &mut Criterion) {
    let value = payload(20);
    c.bench_function("canonical_json", |b| b.iter(|| canonical_json(black_box(&value))));
}

fn bench_fingerprint(c: &mut Criterion) {
    let keys = CacheKeyGenerator::new();
    let mut group = c.benchmark_group("fingerprint");
    for skills in [1usize, 10, 50] {
        let value = payload(skills);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(skills), &value, |b, v| {
            b.iter(|| keys.generate(black_box(v), DocumentKind::Resume, "tech_resume"))
        });
    }
    group.finish();
}

fn bench_cache_lookup(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let cache = ResponseCache::new(CacheConfig::default(), Arc::new(GenerationMetrics::new()));
    let value = payload(10);
    let key = cache.fingerprint(&value, DocumentKind::CoverLetter, "");
    rt.block_on(cache.set(&key, "cached cover letter")).expect("set");

    c.bench_function("cache_hit", |b| {
        b.to_async(&rt).iter(|| async {
            let k = cache.fingerprint(black_box(&value), DocumentKind::CoverLetter, "");
            cache.get(&k).await
        })
    });
}

criterion_group!(benches, bench_canonical_json, bench_fingerprint, bench_cache_lookup);
criterion_main!(benches);
