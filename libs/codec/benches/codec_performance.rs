//! Throughput of the hot read paths: attribute walks and dumps
//!
//! Dumps go into an in-memory sink so formatting cost is measured without
//! any subscriber overhead.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netlink_codec::{
    AttrIter, CacheOps, CacheOpsRegistry, MsgDumper, NlMsg, NETLINK_ROUTE, NLM_F_REQUEST,
};

/// Link dump reply with a flat section and a two-level nest
fn build_link_message() -> NlMsg {
    let mut msg = NlMsg::alloc_size(4096);
    msg.put_header(0, 1, 16, NLM_F_REQUEST);
    msg.set_protocol(NETLINK_ROUTE);
    msg.append(&[0u8; 16]).expect("family header fits");

    for attr_type in 1..=32u16 {
        msg.put_u32(attr_type, u32::from(attr_type) * 100)
            .expect("flat attributes fit");
    }
    msg.put_string(3, "enp0s31f6").expect("name fits");

    let stats = msg.nest_start(7).expect("nest fits");
    for attr_type in 1..=16u16 {
        msg.put_u64(attr_type, u64::from(attr_type)).expect("stats fit");
    }
    msg.nest_end(stats).expect("nest closes");

    msg
}

fn bench_attribute_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("attribute_walk");
    let msg = build_link_message();

    group.bench_function("iterate_flat", |b| {
        b.iter(|| {
            let count = msg.attrs(16).filter(|a| a.is_ok()).count();
            black_box(count);
        });
    });

    group.bench_function("find_last", |b| {
        b.iter(|| {
            let found = msg.find_attr(16, black_box(7)).ok().flatten();
            black_box(found.map(|a| a.len()));
        });
    });

    group.bench_function("iterate_nested", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for attr in msg.attrs(16).flatten() {
                if attr.is_nested() {
                    for inner in AttrIter::new(attr.payload()).flatten() {
                        total += inner.get_u64().unwrap_or(0);
                    }
                }
            }
            black_box(total);
        });
    });

    group.finish();
}

fn bench_dump(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump");
    let msg = build_link_message();
    let mut registry = CacheOpsRegistry::new();
    registry.register(CacheOps::new("route/link", NETLINK_ROUTE, 16).with_type(16, "new"));

    group.bench_function("dump_to_vec", |b| {
        b.iter(|| {
            let mut lines: Vec<String> = Vec::with_capacity(256);
            MsgDumper::new(&mut lines, &registry).dump(black_box(&msg));
            black_box(lines.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_attribute_walk, bench_dump);
criterion_main!(benches);
