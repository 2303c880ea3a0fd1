use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use orca_git::SyncRepository;
use orca_test_utils::{Machine, write_profile};

fn seeded_machine(files: usize) -> Machine {
    let machine = Machine::new();
    let user = machine.profile_dir("user");
    for i in 0..files {
        write_profile(&user, &format!("filament/profile_{i}.json"), "{\"temp\": 210}");
    }
    machine
}

fn benchmark_push_tree_and_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_tree_commit");

    for files in [10usize, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(files), &files, |b, &files| {
            b.iter_with_setup(
                || {
                    let machine = seeded_machine(files);
                    let repo = SyncRepository::open(machine.repo_path(), None).unwrap();
                    (machine, repo)
                },
                |(machine, mut repo)| {
                    repo.push_tree(&[machine.profile_dir("user")]).unwrap();
                    repo.commit(Some("bench")).unwrap();
                },
            );
        });
    }

    group.finish();
}

fn benchmark_status(c: &mut Criterion) {
    let machine = seeded_machine(100);
    let mut repo = SyncRepository::open(machine.repo_path(), None).unwrap();
    repo.push_tree(&[machine.profile_dir("user")]).unwrap();
    repo.commit(Some("seed")).unwrap();

    c.bench_function("status_100_files", |b| {
        b.iter(|| repo.status().unwrap());
    });
}

criterion_group!(benches, benchmark_push_tree_and_commit, benchmark_status);
criterion_main!(benches);
