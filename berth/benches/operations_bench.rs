use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tempfile::TempDir;

use berth::availability::{self, AvailabilityQuery};
use berth::config::{Config, ConfigBuilder};
use berth::database::{Database, DatabaseConfig};
use berth::operations::{BookingOptions, BookingPlan, ExecutionResult, PlanExecutor};
use berth::{Category, CategoryId, Money, NewUnit, PaymentStatus, StayPolicy};

const BOOKED_SIZES: &[usize] = &[10, 100, 1000];
const UNITS: u32 = 50;

fn benchmark_config() -> Config {
    ConfigBuilder::new()
        .skip_env()
        .skip_files()
        .build()
        .expect("failed to build benchmark configuration")
}

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date")
}

fn standard() -> CategoryId {
    CategoryId::new("standard").expect("valid category id")
}

fn setup_database() -> (TempDir, Database) {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let db_path = temp_dir.path().join("berth.db");
    let mut db = Database::open(DatabaseConfig::new(&db_path)).expect("failed to open database");

    let category = Category::builder(standard(), "Standard")
        .nightly_price(Money::from_major(120))
        .max_occupancy(2)
        .total_units(UNITS)
        .build()
        .expect("valid category");
    let units: Vec<NewUnit> = (0..UNITS)
        .map(|n| NewUnit::new(standard(), format!("U{n:03}")).expect("valid unit"))
        .collect();
    db.import_catalog(&[category], &units)
        .expect("failed to import catalog");

    (temp_dir, db)
}

fn perform_booking(
    db: &mut Database,
    config: &Config,
    offset: u64,
    payment: PaymentStatus,
) -> ExecutionResult {
    let check_in = first_day() + Days::new(offset);
    let options = BookingOptions::new(
        "Bench Guest",
        "bench@example.com",
        "555-0100",
        standard(),
        check_in,
        check_in + Days::new(2),
    )
    .with_payment_status(payment);
    let plan = BookingPlan::new(options, config)
        .with_today(first_day())
        .build_plan(db)
        .expect("failed to plan booking");
    PlanExecutor::new(db)
        .with_config(config)
        .execute(&plan)
        .expect("failed to execute booking plan")
}

/// Spreads `count` two-night bookings over the calendar so no night fills up.
fn populate_bookings(db: &mut Database, config: &Config, count: usize) {
    for i in 0..count {
        perform_booking(db, config, (i as u64) % 300, PaymentStatus::Pending);
    }
}

fn bench_book_single(c: &mut Criterion) {
    let config = benchmark_config();
    let mut group = c.benchmark_group("book_single");

    for payment in [PaymentStatus::Pending, PaymentStatus::Paid] {
        group.bench_function(payment.as_str(), |b| {
            b.iter_batched(
                setup_database,
                |(_temp, mut db)| {
                    black_box(perform_booking(&mut db, &config, 0, payment));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_availability(c: &mut Criterion) {
    let config = benchmark_config();
    let mut group = c.benchmark_group("availability");

    for &size in BOOKED_SIZES {
        let (_temp, mut db) = setup_database();
        populate_bookings(&mut db, &config, size);
        let stay = StayPolicy::default()
            .stay(first_day() + Days::new(10), first_day() + Days::new(14))
            .expect("valid stay");
        let query = AvailabilityQuery::new(standard(), stay, 2);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(
                    availability::check(db.connection(), &query, config.inventory_source())
                        .expect("availability query failed"),
                );
            });
        });
    }

    group.finish();
}

fn bench_plan_only(c: &mut Criterion) {
    let config = benchmark_config();
    let (_temp, mut db) = setup_database();
    populate_bookings(&mut db, &config, 100);

    c.bench_function("plan_booking", |b| {
        b.iter(|| {
            let options = BookingOptions::new(
                "Bench Guest",
                "bench@example.com",
                "555-0100",
                standard(),
                first_day() + Days::new(20),
                first_day() + Days::new(23),
            );
            black_box(
                BookingPlan::new(options, &config)
                    .with_today(first_day())
                    .build_plan(&db)
                    .expect("failed to plan booking"),
            );
        });
    });
}

criterion_group!(
    operations_bench,
    bench_book_single,
    bench_availability,
    bench_plan_only
);
criterion_main!(operations_bench);
