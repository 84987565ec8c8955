use appfile_config::{parse_str, CaddyfileAdapter};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn caddyfile(apps: usize) -> String {
    let mut source = String::from("{\n");
    for i in 1..=apps {
        source.push_str(&format!(
            "    app{i} app{i} {{\n        +servers {{\n            listen :{port}\n            +routes handle proxy\n        }}\n        =meta {{\"id\":{i}}}\n    }}\n",
            port = 8000 + i
        ));
    }
    source.push_str("}\n");
    source
}

fn bench_adapt(c: &mut Criterion) {
    let adapter = CaddyfileAdapter::new();
    let source = caddyfile(16);
    c.bench_function("adapt_16_apps", |b| {
        b.iter(|| adapter.adapt_with_env(black_box(&source), |_| None).unwrap())
    });
}

fn bench_parse_body(c: &mut Criterion) {
    let mut body = String::from("root {\n");
    for i in 0..200 {
        body.push_str(&format!("    +items key{i} [ {i} {i}.5 true ]\n"));
    }
    body.push_str("}\n");
    c.bench_function("parse_body_200_entries", |b| {
        b.iter(|| parse_str(black_box(&body)).unwrap())
    });
}

criterion_group!(benches, bench_adapt, bench_parse_body);
criterion_main!(benches);
