//! `marc2skos` command line tool.
//!
//! Converts a MARCXML file of MARC 21 Classification records to SKOS.
//!
//! ```bash
//! marc2skos --notes --outformat jskos ddc23.xml ddc23.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use marc2skos::output::{write_output, OutputTarget};
use marc2skos::{ConversionConfig, Converter, OutputFormat};

/// Convert MARC21 Classification to SKOS/RDF
#[derive(Parser, Debug)]
#[command(name = "marc2skos", version)]
struct Args {
    /// Input XML file, or - for standard input
    infile: String,

    /// Output RDF file (standard output if absent or -)
    outfile: Option<String>,

    /// More verbose output (debug level, applied on top of RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Output format: turtle (default), jskos, or ndjson
    #[arg(short, long, value_name = "FORMAT", default_value = "turtle")]
    outformat: String,

    /// URI template
    #[arg(long = "uri", value_name = "TEMPLATE")]
    base_uri: Option<String>,

    /// SKOS scheme for all records
    #[arg(long = "scheme", value_name = "URI")]
    scheme_uri: Option<String>,

    /// SKOS scheme for table records, use {edition} to specify edition
    #[arg(long = "table_scheme", value_name = "URI")]
    table_scheme_uri: Option<String>,

    /// Include index terms from 7XX
    #[arg(long)]
    indexterms: bool,

    /// Include note fields
    #[arg(long)]
    notes: bool,

    /// Include component information from 765
    #[arg(long)]
    components: bool,
}

impl Args {
    fn config(&self) -> Result<ConversionConfig> {
        let format: OutputFormat = self.outformat.parse()?;
        let mut config = ConversionConfig::new()
            .with_index_terms(self.indexterms)
            .with_notes(self.notes)
            .with_components(self.components)
            .with_output_format(format);
        if let Some(template) = &self.base_uri {
            config = config.with_base_uri(template);
        }
        if let Some(uri) = &self.scheme_uri {
            config = config.with_scheme_uri(uri);
        }
        if let Some(uri) = &self.table_scheme_uri {
            config = config.with_table_scheme_uri(uri);
        }
        Ok(config)
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.config()?;
    let format = config.output_format;

    let outcome = Converter::new(config)
        .convert_path(&args.infile)
        .with_context(|| format!("Failed to convert {}", args.infile))?;

    let target = OutputTarget::from_arg(args.outfile.as_deref());
    write_output(&outcome.graph, format, &target)
        .with_context(|| format!("Failed to write {format} output"))?;
    Ok(())
}

/// `RUST_LOG` directives (info by default), with `--verbose` raising the
/// level to debug on top of them.
fn log_filter(verbose: bool) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || run(&args))
}
