use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use todo_core::CsvSeparator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_convert::{convert, read_input, write_output, ConvertOptions, Format};

#[derive(Parser)]
#[command(name = "todo-convert")]
#[command(about = "Convert to-do items between the JSON array and CSV line forms")]
struct Cli {
    /// Input file, or `-` for stdin
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input format (inferred from the input extension when omitted)
    #[arg(long, value_enum)]
    from: Option<Format>,

    /// Output format (inferred from the output extension, else the other format)
    #[arg(long, value_enum)]
    to: Option<Format>,

    /// CSV column separator: `semicolon` or `comma`
    #[arg(long, default_value = "semicolon", env = "TODO_CONVERT_SEPARATOR")]
    separator: CsvSeparator,

    /// Abort on the first record that fails to parse instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "todo_convert=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let from = cli
        .from
        .or_else(|| Format::from_path(&cli.input))
        .context("cannot infer the input format; pass --from json|csv")?;
    let to = cli
        .to
        .or_else(|| cli.output.as_deref().and_then(Format::from_path))
        .unwrap_or_else(|| from.other());

    let options = ConvertOptions {
        from,
        to,
        separator: cli.separator,
        strict: cli.strict,
        pretty: cli.pretty,
    };

    let input = read_input(&cli.input)?;
    let conversion = convert(&input, &options)?;
    write_output(cli.output.as_deref(), &conversion.output)?;

    Ok(())
}
