mod common;

use bookshelf_core::{is_valid_isbn, BookRecord, Catalog, CatalogObserver};
use common::{MemoryStore, SnapshotRecorder};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const INSERTS_PER_THREAD: usize = 20;

fn thread_book(thread_id: usize, index: usize) -> BookRecord {
    let isbn = format!("978-{:010}", thread_id * INSERTS_PER_THREAD + index);
    assert!(is_valid_isbn(&isbn), "generated isbn `{isbn}` must be valid");
    BookRecord::new(
        format!("Thread {thread_id} Book {index}"),
        format!("Author {thread_id}"),
        isbn,
        "Test",
        2000,
    )
    .expect("generated book should be valid")
}

#[test]
fn parallel_inserts_lose_no_records() {
    let store = MemoryStore::new();
    let catalog = Arc::new(Catalog::new(store.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                for index in 0..INSERTS_PER_THREAD {
                    let added = catalog
                        .add(thread_book(thread_id, index))
                        .expect("in-memory save should succeed");
                    assert!(added);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread should not panic");
    }

    let total = THREADS * INSERTS_PER_THREAD;
    let snapshot = catalog.snapshot();
    assert_eq!(snapshot.len(), total);
    let unique: HashSet<&str> = snapshot.iter().map(BookRecord::isbn).collect();
    assert_eq!(unique.len(), total);
    assert_eq!(store.save_count(), total);
    assert_eq!(store.persisted().len(), total);
}

#[test]
fn racing_duplicates_admit_exactly_one() {
    let catalog = Arc::new(Catalog::new(MemoryStore::new()));

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                let record = BookRecord::new(
                    format!("Contender {thread_id}"),
                    "Racer",
                    "978-0000000042",
                    "Test",
                    2000,
                )
                .expect("contender should be valid");
                catalog.add(record).expect("in-memory save should succeed")
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker thread should not panic"))
        .filter(|added| *added)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(catalog.len(), 1);
}

#[test]
fn observers_see_every_parallel_insert() {
    let catalog = Arc::new(Catalog::new(MemoryStore::new()));
    let recorder = SnapshotRecorder::new();
    catalog.subscribe(recorder.clone() as Arc<dyn CatalogObserver>);

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                for index in 0..INSERTS_PER_THREAD {
                    catalog
                        .add(thread_book(thread_id, index))
                        .expect("in-memory save should succeed");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread should not panic");
    }

    let sizes: Vec<usize> = recorder.deliveries().iter().map(Vec::len).collect();
    let expected: Vec<usize> = (0..=THREADS * INSERTS_PER_THREAD).collect();
    assert_eq!(sizes, expected);
}
