mod common;

use bookshelf_core::{
    AdvancedFilter, BookRecord, Catalog, CatalogObserver, ReadingStatus, SearchByAuthor, SearchByIsbn,
    SearchKey, SortByAuthor, SortByYear, SortKey,
};
use common::{book, isbns, MemoryStore, SnapshotRecorder};
use std::sync::Arc;

fn seeded_catalog() -> Catalog<Arc<MemoryStore>> {
    let catalog = Catalog::new(MemoryStore::new());
    catalog
        .add(book("Libro Uno", "AAAA", "978-0000000001", 2020))
        .unwrap();
    catalog
        .add(book("Libro Due", "BBBB", "978-0000000002", 2021))
        .unwrap();
    catalog
        .add(book("Libro Tre", "CCCC", "978-0000000003", 2019))
        .unwrap();
    catalog
}

#[test]
fn default_strategies_are_title_based() {
    let catalog = Catalog::new(MemoryStore::new());
    assert_eq!(catalog.sort_strategy_name(), "title");
    assert_eq!(catalog.search_strategy_name(), "title");
}

#[test]
fn add_keeps_catalog_sorted_by_title() {
    let catalog = seeded_catalog();
    let titles: Vec<String> = catalog
        .snapshot()
        .iter()
        .map(|b| b.title().to_string())
        .collect();
    assert_eq!(titles, ["Libro Due", "Libro Tre", "Libro Uno"]);
}

#[test]
fn title_sort_ignores_case() {
    let catalog = Catalog::new(MemoryStore::new());
    catalog.add(book("beta", "X", "0000000001", 2000)).unwrap();
    catalog.add(book("Alpha", "X", "0000000002", 2000)).unwrap();
    catalog.add(book("GAMMA", "X", "0000000003", 2000)).unwrap();

    assert_eq!(
        isbns(&catalog.snapshot()),
        ["0000000002", "0000000001", "0000000003"]
    );
}

#[test]
fn sort_by_year_reorders_immediately() {
    let catalog = seeded_catalog();
    catalog.set_sort_strategy(Arc::new(SortByYear));

    let years: Vec<i32> = catalog
        .snapshot()
        .iter()
        .map(|b| b.publication_year())
        .collect();
    assert_eq!(years, [2019, 2020, 2021]);
    assert_eq!(catalog.sort_strategy_name(), "year");
}

#[test]
fn sorting_twice_is_idempotent() {
    let catalog = seeded_catalog();
    catalog.set_sort_strategy(Arc::new(SortByAuthor));
    let first = isbns(&catalog.snapshot());
    catalog.set_sort_strategy(Arc::new(SortByAuthor));
    assert_eq!(isbns(&catalog.snapshot()), first);
}

#[test]
fn equal_keys_keep_relative_order() {
    let catalog = Catalog::new(MemoryStore::new());
    catalog.add(book("Zeta", "X", "0000000001", 1990)).unwrap();
    catalog.add(book("Alpha", "X", "0000000002", 1990)).unwrap();
    catalog.add(book("Mid", "X", "0000000003", 1980)).unwrap();
    let by_title = isbns(&catalog.snapshot());
    assert_eq!(by_title, ["0000000002", "0000000003", "0000000001"]);

    catalog.set_sort_strategy(SortKey::Year.strategy());
    assert_eq!(
        isbns(&catalog.snapshot()),
        ["0000000003", "0000000002", "0000000001"]
    );
}

#[test]
fn changing_sort_strategy_notifies_observers() {
    let catalog = seeded_catalog();
    let recorder = SnapshotRecorder::new();
    catalog.subscribe(recorder.clone() as Arc<dyn CatalogObserver>);

    catalog.set_sort_strategy(Arc::new(SortByYear));

    assert_eq!(recorder.delivery_count(), 2);
    assert_eq!(
        recorder.last().unwrap(),
        ["978-0000000003", "978-0000000001", "978-0000000002"]
    );
}

#[test]
fn sort_strategy_change_does_not_persist() {
    let store = MemoryStore::new();
    let catalog = Catalog::new(store.clone());
    catalog.add(book("B", "X", "0000000001", 2001)).unwrap();
    catalog.add(book("A", "X", "0000000002", 2000)).unwrap();

    catalog.set_sort_strategy(Arc::new(SortByYear));
    assert_eq!(store.save_count(), 2);
}

#[test]
fn search_by_title_is_case_insensitive_substring() {
    let catalog = seeded_catalog();

    assert_eq!(catalog.search("libro").len(), 3);
    assert_eq!(isbns(&catalog.search("TRE")), ["978-0000000003"]);
    assert!(catalog.search("missing").is_empty());
}

#[test]
fn swapping_search_strategy_changes_matching_field() {
    let catalog = seeded_catalog();

    catalog.set_search_strategy(Arc::new(SearchByAuthor));
    assert_eq!(isbns(&catalog.search("bbbb")), ["978-0000000002"]);
    assert!(catalog.search("Libro").is_empty());

    catalog.set_search_strategy(Arc::new(SearchByIsbn));
    assert_eq!(isbns(&catalog.search("978-0000000001")), ["978-0000000001"]);
    assert!(catalog.search("978-000000000").is_empty());
    assert_eq!(catalog.search_strategy_name(), "isbn");
}

#[test]
fn search_results_are_copies() {
    let catalog = seeded_catalog();
    catalog.set_search_strategy(SearchKey::Author.strategy());

    let mut results = catalog.search("aaaa");
    results.clear();
    assert_eq!(catalog.len(), 3);
}

#[test]
fn advanced_filter_combines_criteria() {
    let catalog = Catalog::new(MemoryStore::new());
    let dune = BookRecord::new("Dune", "Frank Herbert", "0441013597", "Sci-Fi", 1965)
        .unwrap()
        .with_status(ReadingStatus::Read)
        .with_rating(5)
        .unwrap();
    let hobbit =
        BookRecord::new("The Hobbit", "J.R.R. Tolkien", "0547928227", "Fantasy", 1937).unwrap();
    let neuromancer =
        BookRecord::new("Neuromancer", "William Gibson", "0441569595", "Sci-Fi", 1984)
            .unwrap()
            .with_status(ReadingStatus::Reading);
    for record in [dune, hobbit, neuromancer] {
        catalog.add(record).unwrap();
    }

    let sci_fi = AdvancedFilter {
        genre: Some("Sci-Fi".to_string()),
        ..AdvancedFilter::new()
    };
    assert_eq!(catalog.filter(&sci_fi).len(), 2);

    let rated_sixties = AdvancedFilter {
        year_min: Some(1960),
        year_max: Some(1969),
        min_rating: Some(4),
        ..AdvancedFilter::new()
    };
    assert_eq!(isbns(&catalog.filter(&rated_sixties)), ["0441013597"]);

    let reading = AdvancedFilter {
        status: Some(ReadingStatus::Reading),
        author: Some("gibson".to_string()),
        ..AdvancedFilter::new()
    };
    assert_eq!(isbns(&catalog.filter(&reading)), ["0441569595"]);

    assert_eq!(catalog.filter(&AdvancedFilter::new()).len(), 3);
}
