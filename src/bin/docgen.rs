//! docgen: 求职文档生成命令行工具
//!
//! Usage:
//!   docgen generate <kind> --profile <file.json> [--job <file>] [--company <text>]
//!   docgen batch <kind,kind,...> --profile <file.json> [--job <file>] [--company <text>]
//!   docgen config [--config <file.yaml>]

use anyhow::{anyhow, bail, Context};
use docgen_core::generators::GenerationContext;
use docgen_core::provider::ScriptedProvider;
use docgen_core::types::{DocumentKind, ProfileInput};
use docgen_core::{DocumentService, ServiceConfig};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]).await,
        "batch" => cmd_batch(&args[2..]).await,
        "config" => cmd_config(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"docgen: career document generator

USAGE:
    docgen <COMMAND> [OPTIONS]

COMMANDS:
    generate <kind>             Generate one document
    batch <kind,kind,...>       Generate several documents concurrently
    config                      Print the effective configuration
    version                     Show version information
    help                        Show this help message

KINDS:
    resume, cover_letter, profile_optimization (linkedin), interview_preparation (interview)

OPTIONS:
    --profile <file.json>       Profile to generate for (required for generate/batch)
    --job <file>                Job description text file
    --company <text>            Company information
    --hiring-manager <name>     Addressee for cover letters
    --template <id>             Template id (tech_resume, executive_resume, creative_portfolio)
    --config <file.yaml>        Service configuration; DOCGEN_* variables override it
    --dry-run                   Answer from a canned provider instead of the network

ENVIRONMENT:
    OPENAI_API_KEY              Provider key when none is stored in the keyring
    OPENAI_BASE_URL             OpenAI-compatible endpoint
    RUST_LOG                    Log filter (default: info)"#
    );
}

fn cmd_version() {
    println!("docgen {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn load_config(args: &[String]) -> anyhow::Result<ServiceConfig> {
    let config = match flag_value(args, "--config") {
        Some(path) => ServiceConfig::from_file(path)?.apply_env()?,
        None => ServiceConfig::from_env()?,
    };
    Ok(config)
}

fn load_profile(args: &[String]) -> anyhow::Result<ProfileInput> {
    let path = flag_value(args, "--profile").ok_or_else(|| anyhow!("--profile <file.json> is required"))?;
    let text = std::fs::read_to_string(Path::new(path)).with_context(|| format!("cannot read profile {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("invalid profile JSON in {path}"))
}

fn load_context(args: &[String]) -> anyhow::Result<GenerationContext> {
    let mut ctx = GenerationContext::new();
    if let Some(path) = flag_value(args, "--job") {
        let text = std::fs::read_to_string(path).with_context(|| format!("cannot read job description {path}"))?;
        ctx = ctx.with_job_description(text);
    }
    if let Some(company) = flag_value(args, "--company") {
        ctx = ctx.with_company_info(company);
    }
    if let Some(manager) = flag_value(args, "--hiring-manager") {
        ctx = ctx.with_hiring_manager(manager);
    }
    if let Some(template) = flag_value(args, "--template") {
        ctx = ctx.with_template(template);
    }
    Ok(ctx)
}

fn build_service(args: &[String]) -> anyhow::Result<DocumentService> {
    let mut builder = DocumentService::builder().config(load_config(args)?);
    if has_flag(args, "--dry-run") {
        builder = builder.provider(Arc::new(ScriptedProvider::dry_run()));
    }
    Ok(builder.build()?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_generate(args: &[String]) -> anyhow::Result<()> {
    let Some(kind) = args.first().filter(|a| !a.starts_with("--")) else {
        bail!("usage: docgen generate <kind> --profile <file.json>");
    };
    let kind: DocumentKind = kind.parse()?;
    let service = build_service(args)?;
    let profile = load_profile(args)?;
    let ctx = load_context(args)?;

    match service.generate(kind, &profile, &ctx).await {
        Ok(doc) => print_json(&doc),
        Err(e) => {
            print_json(&e.to_service_error())?;
            std::process::exit(1);
        }
    }
}

async fn cmd_batch(args: &[String]) -> anyhow::Result<()> {
    let Some(list) = args.first().filter(|a| !a.starts_with("--")) else {
        bail!("usage: docgen batch <kind,kind,...> --profile <file.json>");
    };
    let kinds = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse::<DocumentKind>())
        .collect::<Result<Vec<_>, _>>()?;
    let service = build_service(args)?;
    let profile = load_profile(args)?;
    let ctx = load_context(args)?;

    match service.batch_generate(&profile, &kinds, &ctx).await {
        Ok(report) => print_json(&report),
        Err(e) => {
            print_json(&e.to_service_error())?;
            std::process::exit(1);
        }
    }
}

fn cmd_config(args: &[String]) -> anyhow::Result<()> {
    print_json(&load_config(args)?)
}
