//! biome-kit CLI
//!
//! Command-line interface for synthesizing Biome configuration and generating
//! its TypeScript types

mod commands;

use anyhow::Result;
use biome_kit_core::init_tracing;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "biome-kit")]
#[command(about = "biome-kit: Biome configuration for scaffolded TypeScript projects")]
#[command(version = biome_kit_core::VERSION)]
#[command(
    long_about = "biome-kit generates a Biome configuration from project options, keeps it from\n\
clashing with Eslint and Prettier, and generates TypeScript types from the Biome schema.\n\
\n\
Examples:\n  \
biome-kit config init          # Create biome-kit.json\n  \
biome-kit synth                # Write biome.jsonc and the task manifest\n  \
biome-kit run test             # Run the test task (spawns biome)\n  \
biome-kit types                # Generate src/biome-configuration.ts"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to options file (biome-kit.json/.jsonc/.yaml/.yml/.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize biome.jsonc, the task manifest and the dependency manifest
    Synth {
        /// Project root
        #[arg(short, long, help = "Project directory (default: directory of the options file)")]
        dir: Option<PathBuf>,
    },

    /// Generate TypeScript declarations from the Biome configuration schema
    Types {
        /// Schema to read
        #[arg(
            short,
            long,
            help = "Schema path (default: node_modules/@biomejs/biome/configuration_schema.json)"
        )]
        schema: Option<PathBuf>,

        /// Output file
        #[arg(short, long, help = "Output path (default: src/biome-configuration.ts)")]
        output: Option<PathBuf>,
    },

    /// Run a task from the synthesized task manifest
    Run {
        /// Task name
        #[arg(help = "Name of the task to run (e.g. test, biome)")]
        task: String,
    },

    /// Manage the options file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new options file
    Init {
        /// Options file format
        #[arg(long, default_value = "json", help = "Options file format")]
        format: InitFormat,

        /// Overwrite existing options file
        #[arg(long, help = "Overwrite existing options file")]
        force: bool,
    },

    /// Validate an options file
    Validate {
        /// Path to options file to validate
        #[arg(help = "Path to options file (default: search for biome-kit.*)")]
        path: Option<PathBuf>,
    },

    /// Show current options
    Show {
        /// Show the generated Biome configuration instead of the options
        #[arg(long, help = "Show the merged Biome configuration")]
        resolved: bool,
    },

    /// Print the JSON Schema of the options file
    Schema {
        /// Write the schema to a file instead of stdout
        #[arg(short, long, help = "Output path for the schema")]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum InitFormat {
    /// JSON options file
    Json,
    /// YAML options file
    Yaml,
    /// TOML options file
    Toml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity. RUST_LOG wins when no -v is given.
    if cli.verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        let log_level = match cli.verbose {
            0 => "biome_kit=error",
            1 => "biome_kit=warn",
            2 => "biome_kit=info",
            3 => "biome_kit=debug",
            _ => "biome_kit=trace",
        };
        // Still single-threaded: the runtime is built below.
        unsafe {
            std::env::set_var("RUST_LOG", log_level);
        }
    }
    init_tracing();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return Ok(());
    }

    match run_command(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("biome-kit failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

async fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Synth { dir }) => commands::synth_command(dir, cli.config).await,

        Some(Commands::Types { schema, output }) => {
            commands::types_command(schema, output, cli.config).await
        }

        Some(Commands::Run { task }) => commands::run_command(task, cli.config).await,

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => {
                commands::config_init_command(format.into(), force).await
            }
            ConfigAction::Validate { path } => {
                commands::config_validate_command(path.or(cli.config)).await
            }
            ConfigAction::Show { resolved } => {
                commands::config_show_command(resolved, cli.config).await
            }
            ConfigAction::Schema { output } => commands::config_schema_command(output).await,
        },

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}

impl From<InitFormat> for biome_kit_core::ConfigFormat {
    fn from(format: InitFormat) -> Self {
        match format {
            InitFormat::Json => Self::Json,
            InitFormat::Yaml => Self::Yaml,
            InitFormat::Toml => Self::Toml,
        }
    }
}
