//! # CareBridge Benchmarks
//!
//! Hot paths through the facade, on the in-memory adapters:
//!
//! | Path | Why it matters |
//! |------|----------------|
//! | contribute | serialized per case under the case row lock |
//! | list_cases | filters and redacts every row for the caller |
//! | available_donors | hospital matching screen |

use std::sync::Arc;
use std::time::Duration;

use care_runtime::{CareApi, RuntimeConfig, ServiceContainer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hc_01_identity::{Credentials, PasswordHashing, SignUp};
use hc_02_donor_registry::DonorRegistration;
use hc_03_cases::{CaseFilter, NewCase};
use shared_types::{Actor, Role};
use tokio::runtime::Runtime;

const PASSWORD: &str = "benchmark-pass";

struct Bench {
    api: CareApi,
    admin: Actor,
}

impl Bench {
    async fn new() -> Self {
        let mut config = RuntimeConfig::default();
        config.bootstrap.admin_email = Some("admin@bench.test".into());
        config.bootstrap.admin_password = Some(PASSWORD.into());
        config.passwords = PasswordHashing::for_testing();
        let api = CareApi::new(Arc::new(ServiceContainer::new(config)));
        api.bootstrap_admin().await.unwrap();
        let admin = api
            .authenticate(Credentials::new("admin@bench.test", PASSWORD))
            .await
            .unwrap();
        Self { api, admin }
    }

    async fn join(&self, role: Role, tag: &str) -> Actor {
        let email = format!("{}@bench.test", tag);
        let user = self
            .api
            .sign_up(SignUp::new(&email, PASSWORD, tag, role))
            .await
            .unwrap()
            .value;
        if !user.approved {
            self.api.approve_user(&self.admin, user.id).await.unwrap();
        }
        self.api.refresh_actor(user.id).await.unwrap()
    }

    async fn cases(&self, patient: &Actor, count: usize) {
        let urgencies = ["critical", "high", "medium", "low"];
        for i in 0..count {
            self.api
                .create_case(
                    patient,
                    NewCase {
                        organ_needed: Some("kidney".into()),
                        urgency_level: Some(urgencies[i % urgencies.len()].into()),
                        funding_goal: Some(1_000_000),
                        ..NewCase::default()
                    },
                )
                .await
                .unwrap();
        }
    }
}

fn bench_contribute(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("hc-04-funding-ledger");
    group.measurement_time(Duration::from_secs(5));

    let (bench, sponsor, case_id) = rt.block_on(async {
        let bench = Bench::new().await;
        let patient = bench.join(Role::Patient, "patient").await;
        let sponsor = bench.join(Role::Sponsor, "sponsor").await;
        let case = bench
            .api
            .create_case(
                &patient,
                NewCase {
                    organ_needed: Some("liver".into()),
                    urgency_level: Some("high".into()),
                    ..NewCase::default()
                },
            )
            .await
            .unwrap()
            .value;
        (bench, sponsor, case.id)
    });

    group.throughput(Throughput::Elements(1));
    group.bench_function("contribute", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(bench.api.contribute(&sponsor, case_id, 1).await.unwrap())
            })
        })
    });
    group.finish();
}

fn bench_list_cases(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("hc-03-cases");

    for size in [10usize, 100, 1_000] {
        let (bench, hospital) = rt.block_on(async {
            let bench = Bench::new().await;
            let patient = bench.join(Role::Patient, "patient").await;
            let hospital = bench.join(Role::Hospital, "hospital").await;
            bench.cases(&patient, size).await;
            (bench, hospital)
        });

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("list_cases", size), &size, |b, _| {
            b.iter(|| {
                rt.block_on(async {
                    black_box(
                        bench
                            .api
                            .list_cases(&hospital, CaseFilter::default())
                            .await
                            .unwrap(),
                    )
                })
            })
        });
    }
    group.finish();
}

fn bench_available_donors(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("hc-02-donor-registry");

    let (bench, hospital) = rt.block_on(async {
        let bench = Bench::new().await;
        let hospital = bench.join(Role::Hospital, "hospital").await;
        for i in 0..200 {
            let donor = bench.join(Role::Donor, &format!("donor{}", i)).await;
            bench
                .api
                .register_donor(
                    &donor,
                    DonorRegistration {
                        donor_type: Some("living".into()),
                        blood_type: Some("B+".into()),
                        age: Some(30),
                        gender: Some("male".into()),
                        medical_history: Some("Healthy, annual checkups".into()),
                        organs: vec!["kidney".into(), "bone_marrow".into()],
                        give_consent: true,
                        ..DonorRegistration::default()
                    },
                )
                .await
                .unwrap();
        }
        (bench, hospital)
    });

    group.bench_function("available_donors_200", |b| {
        b.iter(|| rt.block_on(async { black_box(bench.api.available_donors(&hospital).await.unwrap()) }))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_contribute,
    bench_list_cases,
    bench_available_donors
);
criterion_main!(benches);
