use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use synscrape::config::Config;
use synscrape::db::Db;
use synscrape::error_log::ErrorLog;
use synscrape::fetcher::DocumentFetcher;
use synscrape::fetcher::thesaurus::ThesaurusFetcher;
use synscrape::normalize::normalize;
use synscrape::pipeline::{BatchOutcome, Pipeline, ThreadSleep};

#[derive(Parser)]
#[command(name = "synscrape", version, about = "Scrape synonyms into a local thesaurus database")]
struct Cli {
    /// Path to the JSON config file (defaults to ./config.json)
    #[arg(short, long, default_value = "")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the next batch of words from the queue into the database
    Run {
        /// Number of words to take from the queue
        #[arg(short, long)]
        words: Option<usize>,

        /// Leave consumed lines in the queue file
        #[arg(long)]
        keep: bool,
    },
    /// Fetch one word and print its normalized meanings without storing them
    Fetch { word: String },
    /// Print the synonyms stored for a word
    Lookup { word: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Command::Run { words, keep } => {
            if let Some(n) = words {
                config.words_per_run = n;
            }
            if keep {
                config.delete_consumed = false;
            }
            config.validate()?;

            let fetcher = ThesaurusFetcher::new(&config.fetch)?;
            let log = ErrorLog::new(&config.log_file);
            let pipeline = Pipeline::new(&config, &fetcher, &ThreadSleep, &log);

            match pipeline.run().context("batch aborted")? {
                BatchOutcome::NoWords => println!("No words! Exiting"),
                BatchOutcome::NothingToPersist(report) => {
                    println!(
                        "Nothing scrapable among {} word(s); see {}",
                        report.taken,
                        log.path().display()
                    );
                }
                BatchOutcome::Persisted(report) => {
                    println!(
                        "Stored {} meaning(s) for {} of {} word(s)",
                        report.meanings, report.persisted, report.taken
                    );
                }
            }
        }
        Command::Fetch { word } => {
            config.validate()?;
            let fetcher = ThesaurusFetcher::new(&config.fetch)?;
            let document = fetcher
                .fetch(&word)
                .with_context(|| format!("failed to fetch {word:?}"))?;
            let fragments = normalize(&word, &document);
            info!("{} meaning(s) for {word:?}", fragments.len());
            println!(
                "{}",
                serde_json::to_string_pretty(&fragments).context("failed to serialize")?
            );
        }
        Command::Lookup { word } => {
            let db = Db::open(&config.db_path, config.max_word_len)
                .context("Failed to open database")?;
            let rows = db.synonyms_of(&word)?;
            if rows.is_empty() {
                println!("No synonyms stored for {word:?}");
            }

            let mut current = None;
            for row in rows {
                if current != Some(row.meaning_id) {
                    println!("{} ({})", row.definition, row.part_of_speech);
                    current = Some(row.meaning_id);
                }
                println!("  {:>3}  {}", row.similarity, row.synonym);
            }
        }
    }

    Ok(())
}
