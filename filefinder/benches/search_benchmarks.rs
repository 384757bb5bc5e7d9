use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filefinder::{reconcile, Finder, Match};
use std::{fs::File, io::Write, num::NonZeroUsize};
use tempfile::tempdir;

fn create_test_tree(
    dir: &tempfile::TempDir,
    subdir_count: usize,
    files_per_dir: usize,
) -> std::io::Result<()> {
    for d in 0..subdir_count {
        let subdir = dir.path().join(format!("dir_{}", d));
        std::fs::create_dir_all(&subdir)?;
        for f in 0..files_per_dir {
            let mut file = File::create(subdir.join(format!("report_{}.txt", f)))?;
            for line in 0..20 {
                writeln!(file, "Line {} of report {}: status OK", line, f)?;
            }
            writeln!(file, "TODO: review report {} in dir {}", f, d)?;
        }
    }
    Ok(())
}

fn bench_subdirectory_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Subdirectory Scaling");
    for &count in &[1, 10, 50] {
        let dir = tempdir().unwrap();
        create_test_tree(&dir, count, 5).unwrap();
        let finder = Finder::default();

        group.bench_function(format!("subdirs_{}", count), |b| {
            b.iter(|| black_box(finder.find_combined("report", "todo", dir.path()).unwrap()));
        });
    }
    group.finish();
}

fn bench_worker_count(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_tree(&dir, 40, 5).unwrap();

    let mut group = c.benchmark_group("Worker Count");
    for &workers in &[1, 4, 10] {
        let finder = Finder::default().with_worker_count(NonZeroUsize::new(workers).unwrap());
        group.bench_function(format!("workers_{}", workers), |b| {
            b.iter(|| black_box(finder.find_combined("", "todo", dir.path()).unwrap()));
        });
    }
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let by_name: Vec<Match> = (0..1000)
        .map(|i| Match::new(format!("/data/file_{}.txt", i), format!("file_{}.txt", i), ""))
        .collect();
    let by_content: Vec<Match> = (500..1500)
        .map(|i| {
            Match::new(
                format!("/data/file_{}.txt", i),
                format!("file_{}.txt", i),
                "TODO: review",
            )
        })
        .collect();

    c.bench_function("reconcile_1000x1000", |b| {
        b.iter(|| black_box(reconcile(by_name.clone(), by_content.clone())));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_subdirectory_scaling, bench_worker_count, bench_reconcile
}

criterion_main!(benches);
