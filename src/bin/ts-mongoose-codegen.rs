use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ts_mongoose_codegen::config::parse_override;
use ts_mongoose_codegen::{
    generate_declarations, generate_factory_code, load_schema_bundle, render_populate_helpers,
    CodegenConfig, CodegenError, DeclarationShape, GeneratedCode,
};

/// Generates TypeScript declarations and mock factories from ODM schema descriptions.
#[derive(Parser, Debug)]
#[command(name = "ts-mongoose-codegen")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file with `dto`, `model` and `factory` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Data transfer object declarations (`XDto`)
    Dto {
        /// Schema JSON file
        input: PathBuf,

        /// Emit interfaces instead of classes
        #[arg(long)]
        interface: bool,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Model declarations (`XModel`)
    Model {
        /// Schema JSON file
        input: PathBuf,

        /// Emit interfaces instead of classes
        #[arg(long)]
        interface: bool,

        /// Render string enums as unions of their literals
        #[arg(long)]
        enum_union: bool,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Mock factory functions built on faker
    Factory {
        /// Schema JSON file
        input: PathBuf,

        /// Module path the dto declarations are imported from
        #[arg(long)]
        dto_path: Option<String>,

        /// Custom field value, `name=value` or `name:Type=value`
        #[arg(long = "override", num_args = 1)]
        overrides: Vec<String>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Populated-reference type helpers module
    Helpers {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), CodegenError> {
    let config = match &cli.config {
        Some(path) => CodegenConfig::from_path(path)?,
        None => CodegenConfig::default(),
    };

    match cli.command {
        Commands::Dto {
            input,
            interface,
            out,
        } => {
            let mut options = config.dto_options();
            if interface {
                options.shape = DeclarationShape::InterfaceLike;
            }
            let bundle = load_schema_bundle(&input)?;
            debug!(input = %input.display(), schemas = bundle.schemas.len(), "generating dto types");
            emit(generate_declarations(&bundle, options), out)
        }
        Commands::Model {
            input,
            interface,
            enum_union,
            out,
        } => {
            let mut options = config.model_options();
            if interface {
                options.shape = DeclarationShape::InterfaceLike;
            }
            if enum_union {
                options.string_enum_union = true;
            }
            let bundle = load_schema_bundle(&input)?;
            debug!(input = %input.display(), schemas = bundle.schemas.len(), "generating model types");
            emit(generate_declarations(&bundle, options), out)
        }
        Commands::Factory {
            input,
            dto_path,
            overrides,
            out,
        } => {
            let mut options = config.factory_options(dto_path.as_deref())?;
            // Command-line overrides are checked before configured ones.
            let mut custom = overrides
                .iter()
                .map(|raw| parse_override(raw))
                .collect::<Result<Vec<_>, _>>()?;
            custom.append(&mut options.overrides);
            options.overrides = custom;

            let bundle = load_schema_bundle(&input)?;
            debug!(input = %input.display(), schemas = bundle.schemas.len(), "generating factories");
            emit(generate_factory_code(&bundle, options), out)
        }
        Commands::Helpers { out } => emit(
            GeneratedCode {
                code: render_populate_helpers(),
                warnings: Vec::new(),
            },
            out,
        ),
    }
}

fn emit(generated: GeneratedCode, out: Option<PathBuf>) -> Result<(), CodegenError> {
    for warning in &generated.warnings {
        eprintln!("warning: {warning}");
    }
    match out {
        Some(path) => {
            fs::write(&path, generated.code)?;
            debug!(path = %path.display(), "wrote output");
        }
        None => print!("{}", generated.code),
    }
    Ok(())
}
