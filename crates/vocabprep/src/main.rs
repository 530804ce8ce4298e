use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wordnet_db::LoadMode;
use wordnet_types::Pos;

use vocabprep::persist::{self, DEFAULT_COLUMN};
use vocabprep::report::{FilterReport, VocabReport};
use vocabprep::{
    Corpus, CorpusFilter, CorpusFormat, FilterConfig, Normalizer, Settings, VocabConfig,
    Vocabulary, VocabularyBuild, VocabularyBuilder, WordNetLemmatizer,
};

const DEFAULT_WORDNET_PATH: &str = "open_english_wordnet_2024/oewn2024";
const DEFAULT_WORDNET_SYSTEM_PATH: &str = "/usr/share/wordnet";
const PREVIEW_LINES: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "vocabprep",
    version,
    about = "Build tokenizer vocabularies and filter datasets down to them"
)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    /// WordNet dictionary directory holding index.* and *.exc files
    #[arg(long, global = true, env = "WORDNET_DIR", value_name = "DIR")]
    wordnet_dir: Option<PathBuf>,

    /// How to load WordNet files: mmap or owned
    #[arg(
        long,
        global = true,
        env = "WORDNET_LOAD_MODE",
        value_name = "MODE",
        default_value = "mmap",
        value_parser = parse_load_mode
    )]
    wordnet_mode: LoadMode,

    /// Part-of-speech lookup order for lemmatization (e.g. n,v,a,r)
    #[arg(long, global = true, value_delimiter = ',', value_name = "POS")]
    pos_order: Vec<Pos>,

    /// JSON settings file; command-line flags take precedence
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count, prune and cap tokens of a reference corpus into a vocabulary file
    BuildVocab(BuildVocabArgs),
    /// Rewrite a dataset so each line only holds vocabulary tokens
    PrepData(PrepDataArgs),
}

#[derive(Args, Debug)]
struct FormatArgs {
    /// Field delimiter of the input file
    #[arg(long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Treat the first line as a header (default unless the config says otherwise)
    #[arg(long, overrides_with = "no_header")]
    header: bool,

    /// Process the first line as data
    #[arg(long, overrides_with = "header")]
    no_header: bool,
}

#[derive(Args, Debug)]
struct BuildVocabArgs {
    /// Reference corpus (CSV); `.csv` is appended when no extension is given
    input: PathBuf,

    /// Minimum occurrences for a token to be kept
    #[arg(long, value_name = "COUNT")]
    min_occurrence: Option<usize>,

    /// Maximum number of frequency-selected tokens
    #[arg(long, value_name = "COUNT")]
    max_tokens: Option<usize>,

    /// Term to drop regardless of frequency (repeatable; replaces the defaults)
    #[arg(long = "deny", value_name = "TERM")]
    denylist: Vec<String>,

    /// Token to force into the vocabulary (repeatable; replaces the defaults)
    #[arg(long = "mandatory", value_name = "TOKEN")]
    mandatory_tokens: Vec<String>,

    /// Token exempt from lemmatization (repeatable; replaces the defaults)
    #[arg(long = "keep-form", value_name = "TOKEN")]
    exceptions: Vec<String>,

    #[command(flatten)]
    format: FormatArgs,

    /// Output path; defaults to <input>_vocab_<N>_tokens.txt
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the selected tokens with counts and wait for ENTER before saving
    #[arg(long)]
    review: bool,

    /// Write a JSON run report
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PrepDataArgs {
    /// Dataset to filter (CSV); `.csv` is appended when no extension is given
    dataset: PathBuf,

    /// Vocabulary file; `.txt` is appended when no extension is given
    #[arg(long = "vocab", value_name = "PATH")]
    vocabulary: PathBuf,

    /// Maximum number of tokens per output line
    #[arg(long, value_name = "COUNT")]
    max_tokens_per_line: Option<usize>,

    /// Token exempt from lemmatization (repeatable; replaces the defaults)
    #[arg(long = "keep-form", value_name = "TOKEN")]
    exceptions: Vec<String>,

    #[command(flatten)]
    format: FormatArgs,

    /// Column name for the output CSV
    #[arg(long, value_name = "NAME", default_value = DEFAULT_COLUMN)]
    column: String,

    /// Output path; defaults to <dataset>_prepped_for_tokenizer.csv
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Write a JSON run report
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut settings = match &cli.config {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings {
            format: CorpusFormat {
                has_header: true,
                ..CorpusFormat::default()
            },
            ..Settings::default()
        },
    };

    match &cli.command {
        Commands::BuildVocab(args) => build_vocab(&cli, args, &mut settings),
        Commands::PrepData(args) => prep_data(&cli, args, &mut settings),
    }
}

fn build_vocab(cli: &Cli, args: &BuildVocabArgs, settings: &mut Settings) -> Result<()> {
    apply_format(&args.format, &mut settings.format);
    settings.format.validate()?;
    if !args.exceptions.is_empty() {
        settings.normalize.exceptions = args.exceptions.clone();
    }

    let mut builder = VocabConfig::builder()
        .min_occurrence(args.min_occurrence.unwrap_or(settings.vocab.min_occurrence))
        .max_tokens(args.max_tokens.unwrap_or(settings.vocab.max_tokens))
        .denylist(settings.vocab.denylist.clone())
        .mandatory_tokens(settings.vocab.mandatory_tokens.clone());
    if !args.denylist.is_empty() {
        builder = builder.denylist(args.denylist.clone());
    }
    if !args.mandatory_tokens.is_empty() {
        builder = builder.mandatory_tokens(args.mandatory_tokens.clone());
    }
    let config = builder.build()?;

    let input = persist::with_default_extension(&args.input, "csv");
    info!(
        "building vocabulary from {} (min occurrence {}, max tokens {})",
        input.display(),
        config.min_occurrence,
        config.max_tokens
    );

    let lemmatizer = load_lemmatizer(cli)?;
    let normalizer = Normalizer::new(&lemmatizer, &settings.normalize);
    let bytes = persist::read_input(&input)?;
    preview_input(&bytes, &settings.format);

    let start = Instant::now();
    let build = VocabularyBuilder::new(config.clone(), &normalizer)?
        .with_format(settings.format.clone())?
        .build_from_bytes(&bytes)?;
    info!("vocabulary built in {} ms", start.elapsed().as_millis());

    if args.review {
        review(&build)?;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| persist::vocabulary_path(&input, build.len()));
    persist::write_vocabulary(&output, &build.vocabulary)?;

    if let Some(path) = &args.report {
        let report = VocabReport::new(input.clone(), output.clone(), &config, &build);
        persist::write_json(path, &report)?;
    }
    Ok(())
}

fn prep_data(cli: &Cli, args: &PrepDataArgs, settings: &mut Settings) -> Result<()> {
    apply_format(&args.format, &mut settings.format);
    settings.format.validate()?;
    if !args.exceptions.is_empty() {
        settings.normalize.exceptions = args.exceptions.clone();
    }
    let config = FilterConfig::new(
        args.max_tokens_per_line
            .unwrap_or(settings.filter.max_tokens_per_line),
    )?;

    let dataset = persist::with_default_extension(&args.dataset, "csv");
    let vocab_path = persist::with_default_extension(&args.vocabulary, "txt");
    info!(
        "filtering {} against {} (max {} tokens per line)",
        dataset.display(),
        vocab_path.display(),
        config.max_tokens_per_line
    );

    let vocab_bytes = persist::read_input(&vocab_path)?;
    let vocabulary = Vocabulary::from_text(&String::from_utf8_lossy(&vocab_bytes))
        .with_context(|| format!("reading vocabulary {}", vocab_path.display()))?;
    info!("loaded {} vocabulary tokens", vocabulary.len());

    let lemmatizer = load_lemmatizer(cli)?;
    let normalizer = Normalizer::new(&lemmatizer, &settings.normalize);
    let filter = CorpusFilter::new(&vocabulary, &normalizer, &config)?;

    let bytes = persist::read_input(&dataset)?;
    preview_input(&bytes, &settings.format);
    let corpus = Corpus::from_bytes(&bytes, &settings.format);

    let progress = if args.no_progress || cli.quiet > 0 {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(corpus.len() as u64);
        let style = ProgressStyle::with_template("{bar:40} {pos}/{len} lines {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    };

    let start = Instant::now();
    let outcome = filter.filter_corpus_with(&corpus, || progress.inc(1))?;
    progress.finish_and_clear();
    info!("dataset filtered in {} ms", start.elapsed().as_millis());

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| persist::prepped_path(&dataset));
    persist::write_filtered(&output, &args.column, &outcome.lines)?;

    if let Some(path) = &args.report {
        let report = FilterReport::new(
            dataset.clone(),
            vocab_path.clone(),
            output.clone(),
            &config,
            vocabulary.len(),
            &outcome,
        );
        persist::write_json(path, &report)?;
    }
    Ok(())
}

fn apply_format(args: &FormatArgs, format: &mut CorpusFormat) {
    if let Some(delimiter) = args.delimiter {
        format.delimiter = delimiter;
    }
    if args.no_header {
        format.has_header = false;
    } else if args.header {
        format.has_header = true;
    }
}

fn load_lemmatizer(cli: &Cli) -> Result<WordNetLemmatizer> {
    let dir = cli.wordnet_dir.clone().unwrap_or_else(default_wordnet_path);
    info!(
        "using wordnet at {} (mode: {:?})",
        dir.display(),
        cli.wordnet_mode
    );
    let start = Instant::now();
    let mut lemmatizer = WordNetLemmatizer::load(&dir, cli.wordnet_mode)
        .with_context(|| format!("loading WordNet from {}", dir.display()))?;
    if !cli.pos_order.is_empty() {
        lemmatizer = lemmatizer.with_pos_order(cli.pos_order.iter().copied())?;
    }
    info!("wordnet loaded in {} ms", start.elapsed().as_millis());
    Ok(lemmatizer)
}

fn default_wordnet_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_WORDNET_PATH);
    if local.exists() {
        return local;
    }
    PathBuf::from(DEFAULT_WORDNET_SYSTEM_PATH)
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    raw.parse::<LoadMode>().map_err(|err| err.to_string())
}

fn preview_input(bytes: &[u8], format: &CorpusFormat) {
    let corpus = Corpus::from_bytes(bytes, format);
    if let Some(header) = corpus.header() {
        debug!("skipping header: {header}");
    }
    for line in corpus.lines().take(PREVIEW_LINES).flatten() {
        debug!("line #{}: {}", line.number, line.text);
    }
}

fn review(build: &VocabularyBuild) -> Result<()> {
    let mut err = io::stderr().lock();
    for entry in &build.entries {
        writeln!(err, "{:>8}  {}", entry.count, entry.token)?;
    }
    writeln!(
        err,
        "\n{} tokens selected. Press ENTER to continue...",
        build.entries.len()
    )?;
    err.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn init_tracing(verbose: u8, quiet: u8) {
    let default_level = match i16::from(verbose) - i16::from(quiet) {
        ..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}
