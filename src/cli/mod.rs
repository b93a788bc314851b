//! Command-line interface for symposium
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - One-shot subcommands (resolve, schema, completion, config, version)

pub mod completion;

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::completion::{CompletionEngine, Prefix, SchemaDocument};
use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::{Result, SchemaError};
use crate::formatter::Formatter;

/// Symposium - command-path completion for a conversational workspace
#[derive(Parser, Debug)]
#[command(
    name = "symposium",
    version,
    about = "Command-path completion for @/ targets and #/ operations",
    long_about = "Interactive prompt with inline completion of @/ target paths and #/ operation
paths, plus one-shot commands to resolve paths and inspect the navigation schema."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Directory holding `<collection>.json` fixture files
    #[arg(long, value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Custom schema document (JSON)
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Input mode at startup (convo, manage)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Output format (table, json, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for symposium
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a command token such as `@/lib` or `#/edit/card/`
    Resolve {
        /// Token including its prefix
        #[arg(value_name = "TOKEN", allow_hyphen_values = true)]
        input: String,

        /// Search box value, applied when the path lists resources
        #[arg(long, value_name = "QUERY")]
        search: Option<String>,
    },

    /// Print every path of the navigation schema
    Schema,

    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    ///
    /// # Arguments
    /// * `config` - Configuration to modify
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_data_args(config, args);
        Self::apply_display_args(config, args);
        Self::apply_logging_args(config, args);

        if let Some(mode) = &args.mode {
            match mode.parse() {
                Ok(mode) => config.repl.mode = mode,
                Err(e) => eprintln!("Warning: {}, using {}", e, config.repl.mode),
            }
        }
    }

    /// Apply data-source CLI arguments to configuration
    fn apply_data_args(config: &mut Config, args: &CliArgs) {
        if let Some(directory) = &args.data {
            config.data.directory = directory.clone();
        }

        if let Some(schema) = &args.schema {
            config.data.schema_file = Some(schema.clone());
        }
    }

    /// Apply display-related CLI arguments to configuration
    fn apply_display_args(config: &mut Config, args: &CliArgs) {
        if let Some(format_str) = &args.format {
            config.display.format = OutputFormat::parse(format_str).unwrap_or_else(|| {
                eprintln!("Warning: Unknown format '{}', using table", format_str);
                OutputFormat::Table
            });
        }

        if args.no_color {
            config.display.color_output = false;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Load the navigation schema and its bindings
    ///
    /// Uses the configured schema document, or the built-in tree when none is
    /// set.
    pub fn load_schema(&self) -> Result<SchemaDocument> {
        match &self.config.data.schema_file {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                Ok(SchemaDocument::from_json(&text)?)
            }
            None => Ok(SchemaDocument::builtin()),
        }
    }

    /// Handle subcommands that need no completion engine
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Resolve { .. } | Commands::Schema) | None => Ok(false),
        }
    }

    /// Handle subcommands answered by the completion engine
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to start the REPL
    pub fn handle_query(&self, engine: &CompletionEngine) -> Result<bool> {
        let formatter = Formatter::from_config(&self.config.display);

        match &self.args.command {
            Some(Commands::Resolve { input, search }) => {
                println!("{}", self.resolve_output(engine, &formatter, input, search.as_deref())?);
                Ok(true)
            }
            Some(Commands::Schema) => {
                println!("{}", formatter.format_schema(engine.schema())?);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Resolve one command token and format the items
    fn resolve_output(
        &self,
        engine: &CompletionEngine,
        formatter: &Formatter,
        input: &str,
        search: Option<&str>,
    ) -> Result<String> {
        let (prefix, raw_path) = Prefix::split(input.trim())
            .ok_or_else(|| SchemaError::UnknownPrefix(input.to_string()))?;

        let items = engine.resolve(prefix, raw_path, search);
        formatter.format_items(prefix, &items)
    }

    /// Show version information
    fn show_version(&self) {
        println!("symposium version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        println!("Configuration file: {}", self.get_config_path().display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Print the startup banner
    pub fn print_banner(&self, collections: usize, records: usize) {
        if !self.args.quiet {
            println!("Symposium {}", env!("CARGO_PKG_VERSION"));
            println!(
                "Loaded {} records from {} collections in {}",
                records,
                collections,
                self.config.data.directory.display()
            );
            println!("Mode: {}. Type :help for commands.", self.config.repl.mode);
        }
    }
}
