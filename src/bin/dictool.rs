use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use kana_engine::engine::{Candidate, DictionaryEngine};
use kana_engine::settings::{settings, SearchSettings};
use kana_engine::store::{bundle, interchange, DictionaryStore, FileStore};
use kana_engine::{romaji, trace_init};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Parser)]
#[command(name = "dictool", about = "Kana engine dictionary tool")]
struct Cli {
    /// Custom settings TOML
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Custom romaji rules TOML
    #[arg(long, global = true)]
    romaji: Option<String>,
    /// Write JSON trace logs into this directory (requires --features trace)
    #[arg(long, global = true)]
    trace_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a tab-separated seed into a system dictionary snapshot
    Compile {
        /// Seed file (key<TAB>word...)
        seed: String,
        /// Output snapshot
        output_file: String,
    },
    /// Install dictionary snapshots from a zip archive
    Install {
        /// Zip archive
        archive: String,
        /// Data directory (default: ~/.local/share/kana-engine)
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Export a store as tab-separated text
    Export {
        /// Store file
        store: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Merge tab-separated text into a store
    Import {
        /// Store file (created if missing)
        store: String,
        /// Input file
        input: String,
    },
    /// Show candidates for a key
    Search {
        /// Typed key (romaji or kana)
        key: String,
        #[arg(long)]
        data_dir: Option<String>,
        /// Override search.search_limit
        #[arg(long)]
        limit: Option<usize>,
        /// Override search.completion_length_delta
        #[arg(long)]
        delta: Option<usize>,
        /// Include half-width katakana
        #[arg(long)]
        halfkana: bool,
    },
    /// Show predictions following a committed candidate
    Predict {
        key: String,
        value: String,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Commit a word, optionally after a previous candidate
    Learn {
        key: String,
        word: String,
        /// Previous candidate as KEY VALUE
        #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"])]
        after: Option<Vec<String>>,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Transliterate romaji to hiragana
    Romaji {
        input: String,
    },
    /// Export default romaji rules as TOML
    RomajiExport,
    /// Validate a custom romaji TOML file
    RomajiValidate {
        file: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        file: String,
    },
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{home}/.local/share/kana-engine"))
}

fn data_dir(arg: Option<String>) -> PathBuf {
    arg.map(PathBuf::from).unwrap_or_else(default_data_dir)
}

fn init_config(cli: &Cli) {
    if let Some(dir) = &cli.trace_dir {
        trace_init::init_tracing(Path::new(dir));
    }
    if let Some(file) = &cli.settings {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(
            kana_engine::settings::init_custom(content),
            "Error in settings: {}"
        );
    }
    if let Some(file) = &cli.romaji {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(
            romaji::RomajiTable::init_custom(content),
            "Error in romaji rules: {}"
        );
    }
}

fn compile(seed: &str, output_file: &str) {
    let file = die!(File::open(seed), "Error opening {seed}: {}");
    let report = die!(
        bundle::compile_seed(BufReader::new(file), Path::new(output_file)),
        "Error compiling: {}"
    );
    println!(
        "Compiled {} lines ({} words, {} skipped) → {output_file}",
        report.lines, report.words, report.skipped
    );
}

fn install(archive: &str, dir: &Path) {
    let written = die!(
        bundle::install_archive_file(Path::new(archive), dir),
        "Error installing {archive}: {}"
    );
    println!("Installed {written} file(s) into {}", dir.display());
}

fn export(store: &str, output: Option<&str>) {
    let store = die!(
        FileStore::open_read_only_with_log(Path::new(store)),
        "Error opening {store}: {}"
    );
    let lines = match output {
        Some(path) => {
            let file = die!(File::create(path), "Error creating {path}: {}");
            die!(
                interchange::export(&store, io::BufWriter::new(file)),
                "Error writing: {}"
            )
        }
        None => die!(
            interchange::export(&store, io::stdout().lock()),
            "Error writing: {}"
        ),
    };
    eprintln!("{lines} entries");
}

fn import(store: &str, input: &str) {
    let mut target = die!(FileStore::open(Path::new(store)), "Error opening {store}: {}");
    let file = die!(File::open(input), "Error opening {input}: {}");
    let report = die!(
        interchange::import(&mut target, BufReader::new(file)),
        "Error importing: {}"
    );
    die!(target.checkpoint(), "Error writing {store}: {}");
    println!(
        "Imported {} lines ({} words, {} skipped); {} keys total",
        report.lines,
        report.words,
        report.skipped,
        target.len()
    );
}

fn search(engine: &DictionaryEngine, key: &str) {
    let candidates = engine.search(key);
    if candidates.is_empty() {
        println!("(no candidates)");
        return;
    }
    for (i, c) in candidates.iter().enumerate() {
        println!("{:>3}  {}\t{}", i + 1, c.value(), c.key());
    }
}

fn predict(engine: &DictionaryEngine, last: &Candidate) {
    match engine.predict(Some(last)) {
        Some(next) => {
            for c in &next {
                println!("{}\t{}", c.value(), c.key());
            }
        }
        None => println!("(no predictions)"),
    }
}

fn learn(engine: &mut DictionaryEngine, key: &str, word: &str, after: Option<Candidate>) {
    let current = Candidate::new(key, word);
    die!(engine.commit(key, word), "Error learning {key} → {word}: {}");
    if let Some(prev) = after {
        if let Err(e) = engine.commit_connection(&prev, &current) {
            eprintln!("connection not learned: {e}");
        }
        if let Err(e) = engine.commit_concatenation(&prev, &current) {
            eprintln!("concatenation not learned: {e}");
        }
    }
    die!(engine.try_flush(), "Error saving: {}");
    println!("Learned: {} → {word}", romaji::transliterate(key));
}

fn romaji_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let table = die!(romaji::parse_romaji_toml(&content), "Error: {}");
    println!("OK: {} rules", table.len());
}

fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        kana_engine::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: search.convert_halfkana={}, search.search_limit={}, search.completion_length_delta={}",
        s.search.convert_halfkana, s.search.search_limit, s.search.completion_length_delta
    );
}

fn main() {
    let cli = Cli::parse();
    init_config(&cli);

    match cli.command {
        Command::Compile { seed, output_file } => compile(&seed, &output_file),
        Command::Install { archive, data_dir: dir } => install(&archive, &data_dir(dir)),
        Command::Export { store, output } => export(&store, output.as_deref()),
        Command::Import { store, input } => import(&store, &input),
        Command::Search {
            key,
            data_dir: dir,
            limit,
            delta,
            halfkana,
        } => {
            let base = settings().search.clone();
            let search_settings = SearchSettings {
                convert_halfkana: halfkana || base.convert_halfkana,
                search_limit: limit.unwrap_or(base.search_limit).max(1),
                completion_length_delta: delta.unwrap_or(base.completion_length_delta),
            };
            let engine = DictionaryEngine::with_settings(
                kana_engine::Dictionaries::open(&data_dir(dir)),
                search_settings,
            );
            search(&engine, &key);
        }
        Command::Predict {
            key,
            value,
            data_dir: dir,
        } => {
            let engine = DictionaryEngine::open(&data_dir(dir));
            predict(&engine, &Candidate::new(key, value));
        }
        Command::Learn {
            key,
            word,
            after,
            data_dir: dir,
        } => {
            let dir = data_dir(dir);
            die!(fs::create_dir_all(&dir), "Error creating {}: {}", dir.display());
            let mut engine = DictionaryEngine::open(&dir);
            let after = after.and_then(|pair| match pair.as_slice() {
                [k, v] => Some(Candidate::new(k.as_str(), v.as_str())),
                _ => None,
            });
            learn(&mut engine, &key, &word, after);
        }
        Command::Romaji { input } => println!("{}", romaji::transliterate(&input)),
        Command::RomajiExport => print!("{}", romaji::default_toml()),
        Command::RomajiValidate { file } => romaji_validate(&file),
        Command::SettingsExport => print!("{}", kana_engine::settings::default_toml()),
        Command::SettingsValidate { file } => settings_validate(&file),
    }
}
