//! stackscope: environment-scoped resource names and access policies
//!
//! Prints physical names, reverse-resolves them, renders IAM policies and
//! composes stack definitions. Results go to stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stackscope_common::defaults::{ENV_APP_NAME, ENV_ENVIRONMENT};
use stackscope_common::{NamingConfig, ResourceKind, ResourceNamer};
use stackscope_composer::{
    AccessLevel, AccessPolicyBuilder, AccountScope, PolicyDocument, StackComposer, StackSpec,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stackscope")]
#[command(about = "Environment-scoped resource names and access policies")]
#[command(version)]
struct Args {
    /// Application identity, e.g. "appre"
    #[arg(long, global = true, env = "APP_NAME")]
    app_name: Option<String>,

    /// Target environment, e.g. "test" or "production"
    #[arg(long, global = true, env = "ENVIRONMENT")]
    environment: Option<String>,

    /// Accept environments outside development/test/staging/production
    #[arg(long, global = true)]
    allow_unknown_environment: bool,

    /// Region for generated ARNs (default: *)
    #[arg(long, global = true)]
    region: Option<String>,

    /// Account ID for generated ARNs (default: *)
    #[arg(long, global = true)]
    account_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn naming_config(&self) -> Result<NamingConfig> {
        let app_name = self
            .app_name
            .as_deref()
            .with_context(|| format!("--app-name or {ENV_APP_NAME} is required"))?;
        let environment = self
            .environment
            .as_deref()
            .with_context(|| format!("--environment or {ENV_ENVIRONMENT} is required"))?;

        let config = if self.allow_unknown_environment {
            NamingConfig::new(app_name, environment)
        } else {
            NamingConfig::new_strict(app_name, environment)
        };
        config.context("Invalid naming configuration")
    }

    fn account_scope(&self) -> AccountScope {
        AccountScope::new(self.region.clone(), self.account_id.clone())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the physical name for a base name
    Name {
        #[arg(long)]
        kind: ResourceKind,

        #[arg(long)]
        base: String,
    },

    /// Recover the base name from a physical name
    Extract {
        #[arg(long)]
        kind: ResourceKind,

        /// Physical name to resolve
        name: String,
    },

    /// Print an environment-scoped IAM policy
    Policy {
        #[arg(long)]
        kind: ResourceKind,

        #[arg(long, default_value = "read")]
        access: AccessLevel,

        /// Base names to grant (repeatable; default: every resource of the kind)
        #[arg(long = "base")]
        bases: Vec<String>,
    },

    /// Compose a stack definition from a JSON stack spec
    Compose {
        /// Path to the stack spec
        #[arg(long)]
        spec: PathBuf,

        /// Write the definition here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error with its cause chain
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.naming_config()?;
    let scope = args.account_scope();

    match &args.command {
        Command::Name { kind, base } => {
            let name = ResourceNamer::physical_name(&config, *kind, base)
                .with_context(|| format!("Cannot name {kind} '{base}'"))?;
            println!("{name}");
        }

        Command::Extract { kind, name } => {
            let base = ResourceNamer::extract_base_name(name, &config, *kind)
                .with_context(|| format!("Cannot resolve '{name}'"))?;
            println!("{base}");
        }

        Command::Policy {
            kind,
            access,
            bases,
        } => {
            let bases: Vec<&str> = bases.iter().map(String::as_str).collect();
            let statements = AccessPolicyBuilder::new(&config)
                .grant(*kind, *access, &bases, &scope)
                .context("Failed to build policy")?;
            let document: PolicyDocument = statements.into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&document.to_json())?);
        }

        Command::Compose { spec, output } => {
            let stack_spec = StackSpec::load(spec)?;
            let stack = StackComposer::new(&config, scope)
                .compose(&stack_spec)
                .with_context(|| format!("Failed to compose {}", spec.display()))?;
            let json = serde_json::to_string_pretty(&stack)?;

            match output {
                Some(path) => {
                    std::fs::write(path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Wrote stack definition");
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}
