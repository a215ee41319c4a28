use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use sweep_engine::{
    ActionResult, BatchOutcome, EngineConfig, MemoryNotifier, Notification, Orchestrator,
};
use sweep_gate::{EligibilityGate, EligibilityPartition};
use sweep_types::{Bucket, Item, Severity};

use crate::cli::*;
use crate::manifest::{Manifest, ManifestItem};
use crate::service::{self, SimulatedAction, StdinConfirm};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Run(args) => cmd_run(args, format).await,
        Command::Check(args) => cmd_check(args, format).await,
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("invalid configuration {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

async fn cmd_run(args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let config = load_config(args.config.as_deref())?;
    let verb = manifest.verb()?;
    let notifier = Arc::new(MemoryNotifier::new());

    let mut builder = Orchestrator::builder(manifest.kind()?, verb.clone())
        .check(service::eligibility(&manifest)?)
        .action(SimulatedAction::new(verb))
        .notifier(notifier.clone())
        .config(config);
    if !args.yes {
        builder = builder.confirm(StdinConfirm);
    }
    let orchestrator = builder.build()?;

    let outcome = orchestrator.perform(manifest.items).await?;
    let notifications = notifier.notifications();

    match format {
        OutputFormat::Json => {
            let body = match &outcome {
                BatchOutcome::Completed(result) => json!({
                    "outcome": "completed",
                    "notifications": notifications,
                    "result": result,
                }),
                BatchOutcome::Aborted { offered } => json!({
                    "outcome": "aborted",
                    "offered": offered,
                    "notifications": notifications,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            for notification in &notifications {
                print_notification(notification);
            }
            match &outcome {
                BatchOutcome::Completed(result) => print_result(result),
                BatchOutcome::Aborted { offered } => println!(
                    "{} Cancelled. {} eligible item(s) left untouched.",
                    "!".yellow().bold(),
                    offered
                ),
            }
        }
    }
    Ok(())
}

async fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let config = load_config(args.config.as_deref())?;
    let gate = EligibilityGate::new(Arc::new(service::eligibility(&manifest)?), config.gate);
    let partition = gate.partition(manifest.items).await;

    match format {
        OutputFormat::Json => {
            let ineligible: Vec<_> = partition
                .ineligible
                .iter()
                .map(|i| json!({ "id": i.item.id, "reason": i.reason }))
                .collect();
            let body = json!({
                "eligible": partition.eligible_ids(),
                "ineligible": ineligible,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => print_partition(&partition),
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.path.as_deref())?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn print_notification(notification: &Notification) {
    let marker = match notification.severity {
        Severity::Success => "✓".green().bold(),
        Severity::Error => "✗".red().bold(),
    };
    println!("{} {}", marker, notification.message());
}

fn print_result(result: &ActionResult) {
    if result.is_empty() {
        println!("Nothing changed.");
        return;
    }
    for bucket in Bucket::ALL {
        let entries = result.bucket(bucket);
        if entries.is_empty() {
            continue;
        }
        let ids = entries
            .iter()
            .map(|e| e.id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let label = format!("{:<8}", bucket.as_str());
        let label = if bucket == Bucket::Failed {
            label.red()
        } else {
            label.green()
        };
        println!("  {} {}", label, ids);
    }
}

fn print_partition(partition: &EligibilityPartition<ManifestItem>) {
    for item in &partition.eligible {
        println!("  {} {}", "eligible".green(), item.label());
    }
    for denied in &partition.ineligible {
        println!(
            "  {} {} ({})",
            "denied  ".red(),
            denied.item.label(),
            denied.reason.to_string().dimmed()
        );
    }
    println!(
        "{} of {} item(s) eligible.",
        partition.eligible.len().to_string().bold(),
        partition.len()
    );
}
