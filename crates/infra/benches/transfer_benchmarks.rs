use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::Arc;

use tallybook_core::{Money, WalletId};
use tallybook_infra::{InMemoryWalletRepository, WalletRepository, WalletService};

fn wallet_id(i: usize) -> WalletId {
    WalletId::new(format!("w{i}")).unwrap()
}

fn setup(wallets: usize) -> WalletService<Arc<InMemoryWalletRepository>> {
    let service = WalletService::new(Arc::new(InMemoryWalletRepository::new()));
    for i in 0..wallets {
        service
            .create_wallet(wallet_id(i), format!("owner {i}"), Money::from_minor_units(u64::MAX / 4))
            .unwrap();
    }
    service
}

fn bench_transfer_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_latency");
    group.sample_size(1000);

    let service = setup(2);
    let (from, to) = (wallet_id(0), wallet_id(1));

    group.bench_function("transfer_committed", |b| {
        b.iter(|| {
            service
                .transfer(&from, &to, black_box(Money::from_minor_units(1)))
                .unwrap()
        })
    });

    group.bench_function("transfer_rejected_same_wallet", |b| {
        b.iter(|| {
            service
                .transfer(&from, &from, black_box(Money::from_minor_units(1)))
                .unwrap_err()
        })
    });

    group.finish();
}

fn bench_store_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_vs_store_size");
    group.throughput(Throughput::Elements(1));

    for wallets in [10usize, 1_000, 100_000].iter() {
        let service = setup(*wallets);
        let (from, to) = (wallet_id(0), wallet_id(wallets - 1));

        group.bench_with_input(BenchmarkId::from_parameter(wallets), wallets, |b, _| {
            b.iter(|| {
                service
                    .transfer(&from, &to, black_box(Money::from_minor_units(1)))
                    .unwrap();
                black_box(service.repository().get_by_id(&to).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transfer_latency, bench_store_size);
criterion_main!(benches);
