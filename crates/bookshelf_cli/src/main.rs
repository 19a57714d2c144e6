//! Bookshelf command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto `bookshelf_core::Catalog` operations.
//! - Resolve configuration from flags first, then `BOOKSHELF_*` variables.
//!
//! # Invariants
//! - Every catalog rule (ISBN uniqueness, rating coupling) is enforced by the
//!   core; this binary only formats results.

use anyhow::{anyhow, bail, Context, Result};
use bookshelf_core::{
    core_version, init_logging, normalize_level, AdvancedFilter, BookRecord, BookshelfConfig,
    Catalog, CatalogStore, ReadingStatus, SearchKey, SortKey, StoreBackend,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookshelf", about = "Personal book catalog", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Catalog file (defaults to BOOKSHELF_DATA_PATH or bookshelf.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Storage backend: json | sqlite
    #[arg(long, global = true)]
    backend: Option<StoreBackend>,

    /// trace | debug | info | warn | error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every book
    List {
        #[arg(long, default_value = "title")]
        sort: SortKey,
    },
    /// Add a new book
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        genre: String,
        #[arg(long)]
        year: i32,
        #[arg(long, default_value = "to_read")]
        status: ReadingStatus,
        /// 1-5, only for books marked as read
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Remove the book with this ISBN
    Remove { isbn: String },
    /// Change fields of the book with this ISBN
    Edit {
        isbn: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Replacement ISBN
        #[arg(long)]
        new_isbn: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        status: Option<ReadingStatus>,
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Search with one of the built-in strategies
    Search {
        criterion: String,
        #[arg(long, default_value = "title")]
        by: SearchKey,
    },
    /// Multi-criteria filter; omitted options match everything
    Filter {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        status: Option<ReadingStatus>,
        #[arg(long)]
        year_min: Option<i32>,
        #[arg(long)]
        year_max: Option<i32>,
        #[arg(long)]
        min_rating: Option<u8>,
    },
    /// List distinct genres and the publication year range
    Genres,
    /// Print the core version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Command::Version = cli.command {
        print_version();
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    start_logging(&config)?;

    let catalog = Catalog::open(config.open_store()).with_context(|| {
        format!("failed to load catalog from {}", config.data_path.display())
    })?;
    info!(
        "event=cli_start module=cli status=ok backend={} total={}",
        config.backend.as_str(),
        catalog.len()
    );

    run(&catalog, cli.command)
}

fn resolve_config(cli: &Cli) -> Result<BookshelfConfig> {
    let mut config = BookshelfConfig::from_env()?;
    if let Some(backend) = cli.backend {
        config.set_backend(backend);
    }
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = normalize_level(level)?;
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

fn start_logging(config: &BookshelfConfig) -> Result<()> {
    let Some(dir) = &config.log_dir else {
        return Ok(());
    };
    let dir = if dir.is_absolute() {
        dir.clone()
    } else {
        std::env::current_dir()
            .context("cannot resolve current directory")?
            .join(dir)
    };
    init_logging(config.log_level, &dir)?;
    Ok(())
}

fn run<S: CatalogStore>(catalog: &Catalog<S>, command: Command) -> Result<()> {
    match command {
        Command::List { sort } => {
            catalog.set_sort_strategy(sort.strategy());
            print_books(&catalog.snapshot());
        }
        Command::Add {
            title,
            author,
            isbn,
            genre,
            year,
            status,
            rating,
        } => {
            let mut record = BookRecord::new(title, author, isbn, genre, year)?.with_status(status);
            if let Some(rating) = rating {
                record.set_rating(rating)?;
            }
            let isbn = record.isbn().to_string();
            if !catalog.add(record)? {
                bail!("a book with ISBN {isbn} is already in the catalog");
            }
            println!("added {isbn}");
        }
        Command::Remove { isbn } => {
            let existing = find(catalog, &isbn)?;
            catalog.remove(&existing)?;
            println!("removed {}", existing.isbn());
        }
        Command::Edit {
            isbn,
            title,
            author,
            new_isbn,
            genre,
            year,
            status,
            rating,
        } => {
            let existing = find(catalog, &isbn)?;
            let status = status.unwrap_or(existing.reading_status());
            let mut updated = BookRecord::new(
                title.unwrap_or_else(|| existing.title().to_string()),
                author.unwrap_or_else(|| existing.author().to_string()),
                new_isbn.unwrap_or_else(|| existing.isbn().to_string()),
                genre.unwrap_or_else(|| existing.genre().to_string()),
                year.unwrap_or(existing.publication_year()),
            )?
            .with_status(status);
            match rating {
                Some(rating) => updated.set_rating(rating)?,
                None if existing.is_rated() && status == ReadingStatus::Read => {
                    updated.set_rating(existing.rating())?
                }
                None => {}
            }
            let updated_isbn = updated.isbn().to_string();
            if !catalog.modify(&existing, updated)? {
                bail!("ISBN {updated_isbn} already belongs to another book");
            }
            println!("updated {updated_isbn}");
        }
        Command::Search { criterion, by } => {
            catalog.set_search_strategy(by.strategy());
            print_books(&catalog.search(&criterion));
        }
        Command::Filter {
            title,
            author,
            genre,
            status,
            year_min,
            year_max,
            min_rating,
        } => {
            let filter = AdvancedFilter {
                title,
                author,
                genre,
                status,
                year_min,
                year_max,
                min_rating,
                ..AdvancedFilter::new()
            };
            print_books(&catalog.filter(&filter));
        }
        Command::Genres => {
            for genre in catalog.genres() {
                println!("{genre}");
            }
            if let Some((min, max)) = catalog.year_bounds() {
                println!("years {min}-{max}");
            }
        }
        Command::Version => print_version(),
    }
    Ok(())
}

fn find<S: CatalogStore>(catalog: &Catalog<S>, isbn: &str) -> Result<BookRecord> {
    catalog
        .find_by_isbn(isbn)
        .ok_or_else(|| anyhow!("no book with ISBN {}", isbn.trim()))
}

fn print_version() {
    println!("bookshelf_core version={}", core_version());
}

fn print_books(books: &[BookRecord]) {
    if books.is_empty() {
        println!("(no books)");
        return;
    }
    for book in books {
        println!("{book}");
    }
}
