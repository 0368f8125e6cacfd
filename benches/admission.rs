use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use lobx_exchange::venue::Discard;
use lobx_exchange::{AllocationPolicy, Exchange, Owner, Side, VenueConfig};

fn exchange(policy: AllocationPolicy) -> Exchange {
    let mut config = VenueConfig::with_symbols(["BENCH"]);
    config.allocation_policy = policy;
    config.order_ids.seed = Some(1);
    Exchange::new(config, Arc::new(Discard), Arc::new(Discard))
}

fn seeded(policy: AllocationPolicy, levels: u64) -> Exchange {
    let exchange = exchange(policy);
    for i in 0..levels {
        for _ in 0..4 {
            exchange
                .router()
                .submit_limit("BENCH", 100.0 + i as f64, 10, Side::Ask, Owner::Unowned)
                .ok();
            exchange
                .router()
                .submit_limit("BENCH", 99.0 - i as f64, 10, Side::Bid, Owner::Unowned)
                .ok();
        }
    }
    exchange
}

fn bench_resting_limit(c: &mut Criterion) {
    let exchange = exchange(AllocationPolicy::PriceTime);
    let mut i = 0u64;
    c.bench_function("rest_limit", |b| {
        b.iter(|| {
            i += 1;
            let price = 50.0 + (i % 40) as f64;
            black_box(exchange.router().submit_limit("BENCH", price, 5, Side::Bid, Owner::Unowned).ok());
        })
    });
}

fn bench_market_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_sweep");
    for policy in [AllocationPolicy::PriceTime, AllocationPolicy::ProRata] {
        group.bench_function(format!("{policy:?}"), |b| {
            b.iter_batched(
                || seeded(policy, 20),
                |exchange| black_box(exchange.router().submit_market("BENCH", 400, Side::Bid, Owner::Unowned).ok()),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_top_of_book(c: &mut Criterion) {
    let exchange = seeded(AllocationPolicy::PriceTime, 50);
    c.bench_function("best_bid", |b| b.iter(|| black_box(exchange.router().best_bid("BENCH").ok())));
}

criterion_group!(benches, bench_resting_limit, bench_market_sweep, bench_top_of_book);
criterion_main!(benches);
