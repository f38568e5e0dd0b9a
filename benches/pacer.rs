use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use drossel::{AtomicStorage, LocalStorage, ManualClock, Pacer, StdClock, Throttle};

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("pacer");
    group
        .throughput(Throughput::Elements(1))
        .sample_size(100)
        .bench_function("plan-manual-clock-local-storage", |b| {
            let clock = ManualClock::default();
            let pacer = Pacer::<LocalStorage, _>::from_parts(Throttle::kib_per_sec(64), &clock);
            clock.set(10.0);
            b.iter(|| {
                let _g = std::hint::black_box(pacer.plan(8192));
            });
        })
        .bench_function("plan-manual-clock-atomic-storage", |b| {
            let clock = ManualClock::default();
            let pacer = Pacer::<AtomicStorage, _>::from_parts(Throttle::kib_per_sec(64), &clock);
            clock.set(10.0);
            b.iter(|| {
                let _g = std::hint::black_box(pacer.plan(8192));
            });
        })
        .bench_function("plan-std-clock-atomic-storage", |b| {
            let pacer = Pacer::with_clock(Throttle::kib_per_sec(64), StdClock::default());
            b.iter(|| {
                let _g = std::hint::black_box(pacer.plan(8192));
            });
        })
        .bench_function("plan-unlimited", |b| {
            let pacer = Pacer::new(Throttle::UNLIMITED);
            b.iter(|| {
                let _g = std::hint::black_box(pacer.plan(8192));
            });
        })
        .bench_function("record-atomic-storage", |b| {
            let clock = ManualClock::default();
            let pacer = Pacer::<AtomicStorage, _>::from_parts(Throttle::kib_per_sec(64), &clock);
            b.iter(|| {
                pacer.record(1);
            });
        });
    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
