//! `amner`: limpeza de mensagens coletadas e geração de dados de treino NER em CoNLL.
//!
//! ```text
//! amner clean    --input raw.csv      --output cleaned.csv
//! amner label    --input cleaned.csv  --output labeled.conll --report report.json
//! amner validate --input labeled.conll
//! ```

mod input;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use amner_core::conll;
use amner_core::normalizer::NormalizerConfig;
use amner_core::{AnnotationConfig, CorpusLabeler, LabelingReport, MatchingMode, PriceSpanPolicy};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amner",
    about = "Anotação NER por regras para mensagens de e-commerce em amárico",
    version
)]
struct Cli {
    /// Log em nível debug (RUST_LOG tem precedência)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove mensagens vazias e normaliza a coluna `Message` do CSV
    Clean {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Remove também palavras só com letras latinas
        #[arg(long)]
        strip_latin: bool,
    },
    /// Rotula as mensagens do CSV e grava no formato CoNLL
    Label(LabelArgs),
    /// Lê um arquivo CoNLL e mostra contagens e violações BIO
    Validate {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Args)]
struct LabelArgs {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long)]
    output: PathBuf,
    /// Arquivo TOML com as listas de palavras-chave (padrão: listas embutidas)
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    matching: Option<MatchingArg>,
    #[arg(long, value_enum)]
    price_spans: Option<PriceSpansArg>,
    /// `--strip-latin` liga; `--strip-latin=false` desliga mesmo que o TOML ligue
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    strip_latin: Option<bool>,
    /// `--parallel` liga; `--parallel=false` desliga mesmo que o TOML ligue
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    parallel: Option<bool>,
    /// Grava o relatório da execução em JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum MatchingArg {
    Exact,
    Substring,
}

impl From<MatchingArg> for MatchingMode {
    fn from(arg: MatchingArg) -> Self {
        match arg {
            MatchingArg::Exact => MatchingMode::Exact,
            MatchingArg::Substring => MatchingMode::Substring,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PriceSpansArg {
    Literal,
    Tracked,
}

impl From<PriceSpansArg> for PriceSpanPolicy {
    fn from(arg: PriceSpansArg) -> Self {
        match arg {
            PriceSpansArg::Literal => PriceSpanPolicy::Literal,
            PriceSpansArg::Tracked => PriceSpanPolicy::Tracked,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Clean {
            input,
            output,
            strip_latin,
        } => run_clean(&input, &output, NormalizerConfig { strip_latin }),
        Commands::Label(args) => run_label(&args),
        Commands::Validate { input } => run_validate(&input),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_clean(input: &Path, output: &Path, config: NormalizerConfig) -> Result<()> {
    let reader = File::open(input).with_context(|| format!("abrindo {}", input.display()))?;
    let writer = File::create(output).with_context(|| format!("criando {}", output.display()))?;

    let summary = input::clean_messages(BufReader::new(reader), BufWriter::new(writer), &config)
        .with_context(|| format!("limpando {}", input.display()))?;

    info!(
        read = summary.read,
        dropped = summary.dropped,
        unreadable = summary.unreadable,
        written = summary.written,
        "CSV limpo gravado em {}",
        output.display()
    );
    Ok(())
}

fn run_label(args: &LabelArgs) -> Result<()> {
    let config = load_config(args)?;
    let labeler = CorpusLabeler::new(config).context("configuração inválida")?;

    let file =
        File::open(&args.input).with_context(|| format!("abrindo {}", args.input.display()))?;
    let messages = input::read_messages(BufReader::new(file))
        .with_context(|| format!("lendo {}", args.input.display()))?;
    info!(messages = messages.len(), "mensagens carregadas");

    let output = labeler.label_with_report(&messages);
    conll::export_to_file(&output.sequences, &args.output)
        .with_context(|| format!("gravando {}", args.output.display()))?;

    if let Some(path) = &args.report {
        let file = File::create(path).with_context(|| format!("criando {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &output.report)
            .context("serializando relatório")?;
        writer.flush()?;
        info!("relatório gravado em {}", path.display());
    }

    print_report(&output.report);
    Ok(())
}

/// Arquivo (ou listas embutidas) com as flags da linha de comando por cima.
fn load_config(args: &LabelArgs) -> Result<AnnotationConfig> {
    let mut config = match &args.config {
        Some(path) => AnnotationConfig::from_file(path)
            .with_context(|| format!("carregando configuração {}", path.display()))?,
        None => AnnotationConfig::default(),
    };

    if let Some(matching) = args.matching {
        config.classifier.matching = matching.into();
    }
    if let Some(policy) = args.price_spans {
        config.classifier.price_spans = policy.into();
    }
    if let Some(strip_latin) = args.strip_latin {
        config.normalizer.strip_latin = strip_latin;
    }
    if let Some(parallel) = args.parallel {
        config.parallel = parallel;
    }
    Ok(config)
}

fn run_validate(input: &Path) -> Result<()> {
    let sentences =
        conll::read_conll_file(input).with_context(|| format!("lendo {}", input.display()))?;
    let sequences: Vec<_> = sentences
        .into_iter()
        .enumerate()
        .map(|(i, sentence)| conll::into_sequence((i + 1).to_string(), sentence))
        .collect();

    let report = LabelingReport::from_sequences(&sequences);
    print_report(&report);
    Ok(())
}

fn print_report(report: &LabelingReport) {
    println!("Sequências:      {}", report.processed + report.skipped);
    println!("  puladas:       {}", report.skipped);
    println!("  vazias:        {}", report.empty_sequences);
    println!("Tokens:          {}", report.total_tokens);
    for (category, count) in &report.entities {
        println!("  {category:<13} {count}");
    }
    println!("Violações BIO:   {}", report.bio_violations);
    for skip in &report.skip_reasons {
        println!("  [{}] {}", skip.message_id, skip.reason);
    }
}
