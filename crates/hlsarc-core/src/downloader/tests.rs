use super::*;
use crate::cache::{CacheRegistry, MANIFEST_CATEGORY};
use crate::testing::{quick_options, MapFetcher};

fn options() -> FetchOptions {
    quick_options(2)
}

fn names() -> CacheNames {
    let mut reg = CacheRegistry::new();
    reg.register("https://h/v/index.m3u8", MANIFEST_CATEGORY).unwrap();
    reg.register("https://h/v/k.key", "key").unwrap();
    reg.register("https://h/v/s0.ts", "ts").unwrap();
    reg.register("https://h/v/s1.ts", "ts").unwrap();
    reg.register("https://h/v/s2.ts", "ts").unwrap();
    reg.freeze()
}

fn all_bodies() -> MapFetcher {
    MapFetcher::new(&[
        ("https://h/v/k.key", "0123456789abcdef"),
        ("https://h/v/s0.ts", "seg0"),
        ("https://h/v/s1.ts", "seg1"),
        ("https://h/v/s2.ts", "seg2"),
    ])
}

#[test]
fn downloads_every_resource_but_manifests() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = all_bodies();
    let report = download_resources(
        dir.path(),
        &names(),
        &fetcher,
        &options(),
        2,
        &AbortRegistry::new(),
        None,
    )
    .unwrap();
    assert_eq!(report.completed, 4);
    assert_eq!(report.skipped, 0);
    assert!(report.is_complete());
    assert_eq!(report.bytes, 16 + 12);
    assert_eq!(std::fs::read(dir.path().join("ts/1.ts")).unwrap(), b"seg1");
    assert_eq!(
        std::fs::read(dir.path().join("key/0.key")).unwrap(),
        b"0123456789abcdef"
    );
    assert!(!dir.path().join("m3u8").exists());
    assert!(!dir.path().join("ts/1.ts.part").exists());
}

#[test]
fn existing_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("ts")).unwrap();
    std::fs::write(dir.path().join("ts/0.ts"), b"kept").unwrap();
    let fetcher = all_bodies();
    let report = download_resources(
        dir.path(),
        &names(),
        &fetcher,
        &options(),
        4,
        &AbortRegistry::new(),
        None,
    )
    .unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.completed, 3);
    assert_eq!(fetcher.calls(), 3);
    assert_eq!(std::fs::read(dir.path().join("ts/0.ts")).unwrap(), b"kept");
}

#[test]
fn one_failure_does_not_stop_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MapFetcher::new(&[
        ("https://h/v/k.key", "k"),
        ("https://h/v/s0.ts", "seg0"),
        ("https://h/v/s2.ts", "seg2"),
    ]);
    let report = download_resources(
        dir.path(),
        &names(),
        &fetcher,
        &options(),
        1,
        &AbortRegistry::new(),
        None,
    )
    .unwrap();
    assert_eq!(report.completed, 3);
    assert_eq!(report.failed.len(), 1);
    let failure = &report.failed[0];
    assert_eq!(failure.source, "https://h/v/s1.ts");
    assert_eq!(failure.name, "ts/1.ts");
    assert!(failure.error.contains("404"), "{}", failure.error);
    assert!(!dir.path().join("ts/1.ts").exists());
    assert!(dir.path().join("ts/2.ts").exists());
}

#[test]
fn abort_all_stops_remaining_resources() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = all_bodies();
    let aborts = AbortRegistry::new();
    aborts.abort_all();
    let report =
        download_resources(dir.path(), &names(), &fetcher, &options(), 2, &aborts, None).unwrap();
    assert_eq!(report.completed, 0);
    assert_eq!(report.failed.len(), 4);
    assert_eq!(fetcher.calls(), 0);
}

#[test]
fn progress_is_reported_per_resource() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = all_bodies();
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);
    let report = download_resources(
        dir.path(),
        &names(),
        &fetcher,
        &options(),
        3,
        &AbortRegistry::new(),
        Some(&tx),
    )
    .unwrap();
    drop(tx);
    let mut events = Vec::new();
    while let Ok(p) = rx.try_recv() {
        events.push(p);
    }
    assert_eq!(events.len(), report.total());
    let last = events.last().unwrap();
    assert_eq!(last.done, 4);
    assert_eq!(last.total, 4);
    assert_eq!(last.fraction(), 1.0);
}

#[test]
fn manifest_only_table_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = CacheRegistry::new();
    reg.register("https://h/index.m3u8", MANIFEST_CATEGORY).unwrap();
    let report = download_resources(
        dir.path(),
        &reg.freeze(),
        &all_bodies(),
        &options(),
        2,
        &AbortRegistry::new(),
        None,
    )
    .unwrap();
    assert_eq!(report, DownloadReport::default());
}
