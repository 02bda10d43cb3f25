use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use rs_markov_core::io::{open_input, WhitespaceTokens};
use rs_markov_core::model::builder::build;
use rs_markov_core::model::config::{ChainConfig, Overflow};
use rs_markov_core::model::random::SeededRandom;

/// How generated tokens are separated on stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One line, tokens separated by spaces
    Words,
    /// One token per line
    Lines,
}

/// Reads text, builds a word-level Markov chain and prints random text from it.
#[derive(Parser, Debug)]
#[command(name = "rs-markov", version)]
struct Args {
    /// Number of tokens to generate after the starting prefix
    count: usize,

    /// Number of words in a prefix
    #[arg(short = 'n', long, default_value_t = 2)]
    order: usize,

    /// Training text (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Random seed (defaults to the current time)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum token length in bytes
    #[arg(long, default_value_t = 99)]
    max_token_len: usize,

    /// Drop the end of oversized words instead of splitting them
    #[arg(long)]
    truncate: bool,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = Format::Words)]
    format: Format,

    /// Print model statistics as JSON on stderr
    #[arg(long)]
    stats: bool,

    /// Log build and generation details
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Maps the command line onto a validated chain configuration.
    fn chain_config(&self) -> Result<ChainConfig, String> {
        let mut config = ChainConfig::new(self.order)?;
        config.set_max_token_len(self.max_token_len)?;
        config.overflow = if self.truncate { Overflow::Truncate } else { Overflow::Split };
        Ok(config)
    }
}

/// Writes `tokens` separated according to `format`.
///
/// A final newline follows the last token; nothing at all is written when
/// there is no token. Returns the number of tokens written.
fn write_tokens<'a, W, I>(out: &mut W, tokens: I, format: Format) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    let separator = match format {
        Format::Words => " ",
        Format::Lines => "\n",
    };

    let mut written = 0;
    for token in tokens {
        if written > 0 {
            out.write_all(separator.as_bytes())?;
        }
        out.write_all(token.as_bytes())?;
        written += 1;
    }
    if written > 0 {
        writeln!(out)?;
    }
    Ok(written)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = args.chain_config()?;

    let mut rng = match args.seed {
        Some(seed) => SeededRandom::from_seed(seed),
        None => SeededRandom::from_time(),
    };
    log::info!("random seed: {}", rng.seed());

    // The whole input is consumed before anything is generated
    let input = open_input(args.input.as_ref())?;
    let source = WhitespaceTokens::new(input, &config);
    let model = build(config, source, &mut rng)?;

    if args.stats {
        eprintln!("{}", serde_json::to_string_pretty(model.stats())?);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = write_tokens(&mut out, model.generate(args.count, &mut rng), args.format)?;
    out.flush()?;

    log::debug!("wrote {written} tokens");
    Ok(())
}
