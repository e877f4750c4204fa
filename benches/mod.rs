use criterion::{criterion_group, criterion_main};

mod ota;

criterion_group!(
    benches,
    ota::checker::bench_check_up_to_date,
    ota::checker::bench_check_update_available,
    ota::checker::bench_scheduler_poll
);
criterion_main!(benches);
