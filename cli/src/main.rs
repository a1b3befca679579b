use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use schemagen_core::{
    discard_unnecessary_all_of_wrappers, GeneratorConfig, SchemaGenerator, SchemaVersion,
    TypeGraph,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Assemble a JSON Schema document from per-type fragments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a schema from a type graph
    Generate {
        /// Input type graph file
        input: PathBuf,

        /// Output schema file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generator config file; command-line flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Target JSON Schema version
        #[arg(long, value_enum)]
        schema_version: Option<VersionArg>,

        /// Register every referenced type as a definition, even if used once
        #[arg(long)]
        definitions_for_all: bool,

        /// Keep allOf wrappers instead of merging them into their parent
        #[arg(long)]
        keep_all_of: bool,

        /// Omit the $schema declaration
        #[arg(long)]
        no_schema_indicator: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Merge unnecessary allOf wrappers in an existing schema
    Simplify {
        /// Input JSON Schema file
        input: PathBuf,

        /// Output schema file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON Schema version the input is written against
        #[arg(long, value_enum, default_value_t = VersionArg::Draft2020_12)]
        schema_version: VersionArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum VersionArg {
    #[value(name = "draft-6")]
    Draft6,
    #[value(name = "draft-7")]
    Draft7,
    #[value(name = "draft-2019-09")]
    Draft2019_09,
    #[value(name = "draft-2020-12")]
    Draft2020_12,
}

impl From<VersionArg> for SchemaVersion {
    fn from(val: VersionArg) -> Self {
        match val {
            VersionArg::Draft6 => SchemaVersion::Draft6,
            VersionArg::Draft7 => SchemaVersion::Draft7,
            VersionArg::Draft2019_09 => SchemaVersion::Draft2019_09,
            VersionArg::Draft2020_12 => SchemaVersion::Draft2020_12,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            input,
            output,
            config: config_path,
            schema_version,
            definitions_for_all,
            keep_all_of,
            no_schema_indicator,
            format,
        } => {
            let mut config: GeneratorConfig = match &config_path {
                Some(path) => read_json(path, "config")?,
                None => GeneratorConfig::default(),
            };
            if let Some(version) = schema_version {
                config.schema_version = version.into();
            }
            if definitions_for_all {
                config.create_definitions_for_all_objects = true;
            }
            if keep_all_of {
                config.cleanup_unnecessary_all_of = false;
            }
            if no_schema_indicator {
                config.include_schema_version_indicator = false;
            }

            let graph: TypeGraph = read_json(&input, "type graph")?;
            let schema = SchemaGenerator::new(config)
                .generate_from_graph(&graph)
                .map_err(|e| anyhow::Error::from(e).context("Generation failed"))?;

            write_json(&schema, output.as_ref(), format)?;
        }
        Commands::Simplify {
            input,
            output,
            schema_version,
            format,
        } => {
            let mut schema: serde_json::Value = read_json(&input, "schema")?;
            let config = GeneratorConfig {
                schema_version: schema_version.into(),
                ..GeneratorConfig::default()
            };
            discard_unnecessary_all_of_wrappers(&mut schema, &config);

            write_json(&schema, output.as_ref(), format)?;
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {what} file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {what} from: {}", path.display()))
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
