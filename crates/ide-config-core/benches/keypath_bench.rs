//! Criterion benchmarks for key-path flattening and configuration writes.
//!
//! Run with:
//! ```bash
//! cargo bench --package ide-config-core --bench keypath_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ide_config_core::{key_paths, merge, Configuration, DEFAULT_PROFILE};
use serde_json::{json, Map, Value};

fn overrides() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("theme".into(), json!("dark"));
    map.insert("styleOptions.showLogo".into(), json!("off"));
    map.insert("appOptions.ioLayout".into(), json!("column"));
    map.insert("appOptions.showConsole".into(), json!("no"));
    map
}

fn bench_key_paths(c: &mut Criterion) {
    let shape = DEFAULT_PROFILE.to_value();

    c.bench_function("key_paths/default_profile", |b| {
        b.iter(|| key_paths(black_box(&shape), "").count())
    });
}

fn bench_merge_into_plain_value(c: &mut Criterion) {
    let src = overrides();

    c.bench_function("merge/plain_value", |b| {
        b.iter(|| {
            let mut dest = DEFAULT_PROFILE.to_value();
            merge(&mut dest, black_box(&src));
            dest
        })
    });
}

fn bench_configuration_get(c: &mut Criterion) {
    let config = Configuration::default();

    c.bench_function("configuration/get_leaf", |b| {
        b.iter(|| config.get(black_box("appOptions.assistantLayout")))
    });
    c.bench_function("configuration/get_section", |b| {
        b.iter(|| config.get(black_box("styleOptions")))
    });
}

criterion_group!(
    benches,
    bench_key_paths,
    bench_merge_into_plain_value,
    bench_configuration_get
);
criterion_main!(benches);
