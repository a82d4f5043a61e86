//! State inspector for a vocab engine database.
//!
//! # Responsibility
//! - Open a persisted state database, optionally hydrate a TSV word list.
//! - Print a deterministic summary of the restored state and visible list.
//!
//! Usage: `vocab_cli <state.sqlite3> [words.tsv] [--log-dir <abs-dir>]`

mod tsv;

use log::{error, info};
use std::process::ExitCode;
use vocab_core::{
    default_log_level, init_logging, LoadMeta, LoaderStatus, SqliteKeyValueStore, Store,
};

struct Args {
    db_path: String,
    tsv_path: Option<String>,
    log_dir: Option<String>,
}

fn parse_args(raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut log_dir = None;
    let mut raw = raw;
    while let Some(arg) = raw.next() {
        if arg == "--log-dir" {
            log_dir = Some(raw.next().ok_or("--log-dir needs a directory")?);
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let db_path = positional
        .next()
        .ok_or("usage: vocab_cli <state.sqlite3> [words.tsv] [--log-dir <abs-dir>]")?;
    let tsv_path = positional.next();
    if positional.next().is_some() {
        return Err("too many arguments".to_string());
    }
    Ok(Args {
        db_path,
        tsv_path,
        log_dir,
    })
}

fn run(args: Args) -> Result<(), String> {
    if let Some(dir) = &args.log_dir {
        init_logging(default_log_level(), dir)?;
    }

    let backend = SqliteKeyValueStore::open(&args.db_path)
        .map_err(|err| format!("cannot open `{}`: {err}", args.db_path))?;
    let mut store = Store::new(backend);

    if let Some(path) = &args.tsv_path {
        store.set_loader_status(LoaderStatus::Loading);
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                store.set_loader_status(LoaderStatus::Error);
                error!("event=tsv_read module=cli status=error error={err}");
                return Err(format!("cannot read `{path}`: {err}"));
            }
        };
        let rows = tsv::parse_tsv(&text);
        info!("event=tsv_read module=cli status=ok rows={}", rows.len());
        store.hydrate_words(
            &rows,
            LoadMeta {
                source: "tsv".to_string(),
                loaded_at_ms: None,
                loader_status: Some(LoaderStatus::Loaded),
            },
        );
    }

    print_summary(&store);
    Ok(())
}

fn print_summary(store: &Store<SqliteKeyValueStore>) {
    let state = store.state();
    println!("vocab_core version={}", vocab_core::core_version());
    println!(
        "words total={} source={} loader={}",
        state.words.len(),
        if state.meta.words_source.is_empty() {
            "-"
        } else {
            state.meta.words_source.as_str()
        },
        state.meta.loader_status.as_str()
    );
    println!(
        "filters active={} starred={} weights={:?} search_len={}",
        store.active_filter_count(),
        state.filters.starred,
        state.filters.weight,
        state.filters.search.chars().count()
    );
    println!(
        "sort key={} dir={:?}",
        if state.sort.is_sorted() {
            state.sort.key.as_str()
        } else {
            "(shuffled)"
        },
        state.sort.dir
    );
    println!(
        "filter_sets={} matching={}",
        state.filter_sets.len(),
        store
            .matching_filter_set()
            .map_or("-", |set| set.name.as_str())
    );
    println!("order_len={}", state.order.len());

    let facets = store.facet_values();
    println!(
        "facets pos={} cefr={} tags={}",
        facets.pos.len(),
        facets.cefr.len(),
        facets.tags.len()
    );

    let visible = store.visible_words();
    println!("visible={}", visible.len());
    for entry in visible.iter().take(10) {
        println!("  {}\t{}\t{}", entry.id, entry.word, entry.definition);
    }
    println!("write_failures={}", store.write_failures());
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
