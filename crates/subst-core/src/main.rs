//! Substitute Scout CLI.
//!
//! Turns a prediction reply (saved, or computed locally from a catalog) into
//! a display decision and renders it as JSON, Markdown or a summary line.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use subst_common::{Error, OutputFormat, PredictionReply, ProductId, SCHEMA_VERSION};
use subst_core::config::{load_config, validate_file, ConfigError, ConfigOptions, ResolvedConfig};
use subst_core::decision::ResultSummarizer;
use subst_core::exit_codes::ExitCode;
use subst_core::log_event;
use subst_core::logging::{
    event_names, generate_run_id, get_host_id, init_logging, LogConfig, LogContext, LogFormat,
    LogLevel, Stage,
};
use subst_core::output::{render_decision, render_error};
use subst_core::predict::{Catalog, LocalPredictor, PredictionSource, ReplyFile};
use subst_core::schema::{available_schemas, generate_all_schemas, generate_schema};
use tracing::field::display;

/// Substitute Scout - rank and summarize substitute products
#[derive(Parser)]
#[command(name = "subst-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Directory holding policy.json and scoring.json
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a saved prediction reply
    Summarize(SummarizeArgs),

    /// Score substitutes from a local catalog, then summarize
    Predict(PredictArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print JSON Schemas for replies, decisions and config files
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Reply JSON file, or `-` for stdin
    #[arg(long, short = 'i', default_value = "-")]
    input: String,

    /// Queried product, when the reply does not echo it
    #[arg(long)]
    product: Option<String>,

    /// Show every substitute instead of rolling weak ones into "Others"
    #[arg(long)]
    show_all: bool,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Catalog JSON file (array of product records)
    #[arg(long)]
    catalog: PathBuf,

    /// Product to find substitutes for
    #[arg(long)]
    product: String,

    /// Show every substitute instead of rolling weak ones into "Others"
    #[arg(long)]
    show_all: bool,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type to print a schema for
    #[arg(conflicts_with_all = ["list", "all"])]
    name: Option<String>,

    /// List available schema types
    #[arg(long)]
    list: bool,

    /// Print every schema, keyed by type name
    #[arg(long, conflicts_with = "list")]
    all: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved configuration
    Show,

    /// Validate configuration files
    Validate {
        /// A policy/scoring file or a config directory
        path: Option<String>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not errors
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Rendered
            };
            std::process::exit(code.as_i32());
        }
    };

    let mut log_config = LogConfig::from_env(None, None);
    log_config.level =
        LogLevel::from_verbosity(log_config.level, cli.global.verbose, cli.global.quiet);
    if cli.global.format == OutputFormat::Json {
        log_config = log_config.with_format(LogFormat::Jsonl);
    }
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id(), get_host_id());
    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_STARTED,
        Stage::Init,
        "starting",
        format = display(cli.global.format)
    );

    let exit_code = match &cli.command {
        Commands::Summarize(args) => run_summarize(&cli.global, &ctx, args),
        Commands::Predict(args) => run_predict(&cli.global, &ctx, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&cli.global, &ctx),
            ConfigCommands::Validate { path } => {
                run_config_validate(&cli.global, &ctx, path.as_deref())
            }
        },
        Commands::Schema(args) => run_schema(&cli.global, args),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Rendered
        }
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Render,
        "finished",
        exit_code = exit_code.as_i32()
    );
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Commands
// ============================================================================

fn run_summarize(global: &GlobalOpts, ctx: &LogContext, args: &SummarizeArgs) -> ExitCode {
    let config = match load_logged(global, ctx) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let product = match args.product.as_deref().map(ProductId::new).transpose() {
        Ok(p) => p,
        Err(e) => return output_error(global, ctx, &e),
    };

    let source = ReplyFile::from_arg(&args.input);
    let reply = match &product {
        Some(p) => source.fetch(p),
        None => source.read(),
    };
    let reply = match reply {
        Ok(r) => r,
        Err(e) => {
            log_event!(
                ctx,
                WARN,
                event_names::REPLY_REJECTED,
                Stage::Load,
                "could not read reply",
                input = display(&args.input),
                error = display(&e)
            );
            return output_error(global, ctx, &e);
        }
    };
    log_event!(
        ctx,
        INFO,
        event_names::REPLY_LOADED,
        Stage::Load,
        "reply loaded",
        input = display(&args.input),
        failure = reply.is_failure()
    );

    summarize_reply(global, ctx, &config, reply, product.as_ref(), args.show_all)
}

fn run_predict(global: &GlobalOpts, ctx: &LogContext, args: &PredictArgs) -> ExitCode {
    let config = match load_logged(global, ctx) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let product = match ProductId::new(args.product.as_str()) {
        Ok(p) => p,
        Err(e) => return output_error(global, ctx, &e),
    };

    let catalog = match Catalog::from_file(&args.catalog) {
        Ok(c) => c,
        Err(e) => return output_error(global, ctx, &e),
    };
    log_event!(
        ctx,
        INFO,
        event_names::CATALOG_LOADED,
        Stage::Load,
        "catalog loaded",
        path = display(args.catalog.display()),
        products = catalog.len()
    );

    let predictor = LocalPredictor::new(catalog, config.scoring().clone());
    let reply = match predictor.fetch(&product) {
        Ok(r) => r,
        Err(e) => return output_error(global, ctx, &e),
    };

    summarize_reply(global, ctx, &config, reply, Some(&product), args.show_all)
}

/// Validate `reply`, summarize it and print the decision.
fn summarize_reply(
    global: &GlobalOpts,
    ctx: &LogContext,
    config: &ResolvedConfig,
    reply: PredictionReply,
    queried: Option<&ProductId>,
    show_all: bool,
) -> ExitCode {
    let result = match reply.into_result(queried) {
        Ok(r) => r,
        Err(e) => return output_error(global, ctx, &e),
    };

    let summarizer = ResultSummarizer::new(config.policy().clone());
    let decision = summarizer.summarize(&result, show_all);
    log_event!(
        ctx,
        INFO,
        event_names::SUMMARIZE_FINISHED,
        Stage::Summarize,
        "decision ready",
        subject = display(result.subject_id()),
        shown = decision.shown().len(),
        hidden = decision.hidden().len()
    );

    match render_decision(global.format, &ctx.run_id, result.subject_id(), &decision) {
        Ok(Some(out)) => println!("{}", out),
        Ok(None) => {}
        Err(e) => return output_error(global, ctx, &Error::Json(e)),
    }
    log_event!(
        ctx,
        DEBUG,
        event_names::RENDER_FINISHED,
        Stage::Render,
        "rendered",
        format = display(global.format)
    );

    ExitCode::for_result_len(result.len())
}

fn run_config_show(global: &GlobalOpts, ctx: &LogContext) -> ExitCode {
    let config = match load_logged(global, ctx) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let snapshot = &config.snapshot;

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "config_id": snapshot.short_id(),
                "policy": {
                    "source": {
                        "path": snapshot.policy_path,
                        "hash": snapshot.policy_hash,
                        "origin": snapshot.policy_source,
                        "using_defaults": snapshot.policy_path.is_none(),
                    },
                    "values": config.policy(),
                },
                "scoring": {
                    "source": {
                        "path": snapshot.scoring_path,
                        "hash": snapshot.scoring_hash,
                        "origin": snapshot.scoring_source,
                        "using_defaults": snapshot.scoring_path.is_none(),
                    },
                    "values": config.scoring(),
                }
            });
            print_json(&response);
        }
        OutputFormat::Summary => {
            println!(
                "[{}] config: policy={} scoring={}",
                ctx.run_id,
                snapshot.policy_path.as_deref().unwrap_or("built-in defaults"),
                snapshot.scoring_path.as_deref().unwrap_or("built-in defaults")
            );
        }
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            let policy = config.policy();
            let scoring = config.scoring();
            println!("# subst-core config show");
            println!();
            println!("## Policy");
            match &snapshot.policy_path {
                Some(path) => {
                    println!("Source: {} ({})", path, snapshot.policy_source);
                    println!("Hash: {}", snapshot.policy_hash.as_deref().unwrap_or("n/a"));
                }
                None => println!("Source: **built-in defaults** (no policy.json found)"),
            }
            println!("Small result limit: {}", policy.small_result_limit);
            println!("Min confidence: {}", policy.min_confidence);
            println!("Min probability: {}", policy.min_probability);
            println!();
            println!("## Scoring");
            match &snapshot.scoring_path {
                Some(path) => {
                    println!("Source: {} ({})", path, snapshot.scoring_source);
                    println!("Hash: {}", snapshot.scoring_hash.as_deref().unwrap_or("n/a"));
                }
                None => println!("Source: **built-in defaults** (no scoring.json found)"),
            }
            println!("Temperature: {}", scoring.temperature);
            println!("Cross-family multiplier: {}", scoring.cross_family_multiplier);
        }
    }

    ExitCode::Rendered
}

fn run_config_validate(global: &GlobalOpts, ctx: &LogContext, path: Option<&str>) -> ExitCode {
    let outcome = match path.map(PathBuf::from) {
        Some(p) if !p.exists() => Err(ConfigError::NotFound { path: p }),
        Some(p) if p.is_file() => validate_file(&p).map(|()| vec![p.display().to_string()]),
        Some(dir) => load_config(&ConfigOptions {
            config_dir: Some(dir),
            ..ConfigOptions::default()
        })
        .map(|c| loaded_files(&c)),
        None => load_config(&config_options(global)).map(|c| loaded_files(&c)),
    };

    let files = match outcome {
        Ok(files) => files,
        Err(e) => return output_config_error(global, ctx, &e),
    };

    match global.format {
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "valid",
                "files": files,
            }));
        }
        OutputFormat::Summary => println!("[{}] config validate: OK", ctx.run_id),
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            println!("# Configuration Validation");
            println!();
            println!("Status: ✓ Valid");
            if files.is_empty() {
                println!("Using built-in defaults");
            }
            for file in &files {
                println!("- {}", file);
            }
        }
    }
    ExitCode::Rendered
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> ExitCode {
    if args.all {
        print_json(&generate_all_schemas());
        return ExitCode::Rendered;
    }

    let Some(name) = args.name.as_deref() else {
        match global.format {
            OutputFormat::Json => {
                let list: Vec<_> = available_schemas()
                    .into_iter()
                    .map(|(name, description)| {
                        serde_json::json!({ "name": name, "description": description })
                    })
                    .collect();
                print_json(&list);
            }
            OutputFormat::Exitcode => {}
            _ => {
                for (name, description) in available_schemas() {
                    println!("{:<20} {}", name, description);
                }
            }
        }
        return ExitCode::Rendered;
    };

    match generate_schema(name) {
        Some(schema) => {
            print_json(&schema);
            ExitCode::Rendered
        }
        None => {
            eprintln!(
                "unknown schema type: {} (run 'subst-core schema --list')",
                name
            );
            ExitCode::ArgsError
        }
    }
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "subst_core_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            }));
        }
        OutputFormat::Exitcode => {}
        _ => {
            println!("subst-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn config_options(global: &GlobalOpts) -> ConfigOptions {
    ConfigOptions {
        config_dir: global.config.as_ref().map(PathBuf::from),
        ..ConfigOptions::default()
    }
}

/// Load configuration, logging where it came from.
fn load_logged(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedConfig, ExitCode> {
    match load_config(&config_options(global)) {
        Ok(config) => {
            if config.is_default() {
                log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "no config files found, using built-in defaults"
                );
            } else {
                log_event!(
                    ctx,
                    INFO,
                    event_names::CONFIG_LOADED,
                    Stage::Init,
                    "configuration loaded",
                    config_id = config.snapshot.short_id()
                );
            }
            Ok(config)
        }
        Err(e) => Err(output_config_error(global, ctx, &e)),
    }
}

fn loaded_files(config: &ResolvedConfig) -> Vec<String> {
    [&config.paths.policy, &config.paths.scoring]
        .into_iter()
        .flatten()
        .map(|p| p.display().to_string())
        .collect()
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

fn use_color(global: &GlobalOpts) -> bool {
    !global.no_color && std::io::stderr().is_terminal()
}

/// Print `err` to stderr and map it to an exit code.
fn output_error(global: &GlobalOpts, ctx: &LogContext, err: &Error) -> ExitCode {
    let exit_code = ExitCode::from(err);
    if exit_code == ExitCode::UpstreamError {
        log_event!(
            ctx,
            WARN,
            event_names::UPSTREAM_FAILURE,
            Stage::Predict,
            "prediction failed",
            error = display(err)
        );
    } else if exit_code.is_internal_error() {
        log_event!(
            ctx,
            ERROR,
            event_names::INTERNAL_ERROR,
            Stage::Render,
            "command failed",
            code = err.code(),
            error = display(err)
        );
    }

    if let Some(out) = render_error(global.format, &ctx.run_id, err, use_color(global)) {
        eprintln!("{}", out);
    }
    exit_code
}

/// Output a config error in the appropriate format.
fn output_config_error(global: &GlobalOpts, ctx: &LogContext, error: &ConfigError) -> ExitCode {
    let exit_code = match error {
        ConfigError::NotFound { .. }
        | ConfigError::ParseError { .. }
        | ConfigError::ValidationError(_) => ExitCode::ArgsError,
        ConfigError::IoError { .. } => ExitCode::IoError,
        ConfigError::VersionMismatch { .. } => ExitCode::VersionError,
    };
    log_event!(
        ctx,
        ERROR,
        event_names::CONFIG_ERROR,
        Stage::Init,
        "configuration rejected",
        error = display(error)
    );

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": ctx.run_id,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "error": {
                    "code": exit_code.as_i32(),
                    "code_name": exit_code.code_name(),
                    "message": error.to_string(),
                }
            });
            match serde_json::to_string_pretty(&response) {
                Ok(s) => eprintln!("{}", s),
                Err(_) => eprintln!("config error: {}", error),
            }
        }
        OutputFormat::Summary => eprintln!("[{}] config error: {}", ctx.run_id, error),
        OutputFormat::Exitcode => {}
        OutputFormat::Md => {
            eprintln!("# Configuration Error");
            eprintln!();
            eprintln!("Error: {}", error);
        }
    }

    exit_code
}
