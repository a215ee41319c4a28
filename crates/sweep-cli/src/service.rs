//! A stand-in for the resource service a real console would call.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sweep_engine::{ConfirmRequest, ConfirmStep, Confirmation, ItemAction};
use sweep_gate::{CheckPipeline, PolicyCheck, StateCheck, StaticPolicy};
use sweep_types::{ActionVerb, Item};
use tracing::{debug, warn};

use crate::manifest::{Manifest, ManifestItem};

/// Eligibility for a manifest: its policy rules, then the per-item `deny` flag.
pub fn eligibility(manifest: &Manifest) -> anyhow::Result<CheckPipeline<ManifestItem>> {
    let mut pipeline = CheckPipeline::new();

    let required = manifest.required_rules()?;
    if !required.is_empty() {
        let policy = StaticPolicy::granting(manifest.granted_rules()?);
        let check = required
            .into_iter()
            .fold(PolicyCheck::new(Arc::new(policy)), PolicyCheck::require);
        pipeline = pipeline.with(check);
    }

    Ok(pipeline.with(StateCheck::new(
        "state",
        "current state does not allow this action",
        |item: &ManifestItem| !item.deny,
    )))
}

/// Performs the verb after the item's simulated latency, failing items
/// flagged with `fail`.
pub struct SimulatedAction {
    verb: ActionVerb,
}

impl SimulatedAction {
    pub fn new(verb: ActionVerb) -> Self {
        Self { verb }
    }
}

#[async_trait]
impl ItemAction<ManifestItem> for SimulatedAction {
    type Value = ();
    type Error = String;

    async fn perform(&self, item: ManifestItem) -> Result<(), String> {
        if item.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(item.delay_ms)).await;
        }
        if item.fail {
            return Err(format!(
                "service refused to {} {}",
                self.verb.present(),
                item.id
            ));
        }
        debug!(item = %item.id, verb = %self.verb, "simulated call succeeded");
        Ok(())
    }
}

/// Asks on the terminal; only `y` or `yes` proceeds.
///
/// The prompt goes to stderr so stdout carries only the command's output.
pub struct StdinConfirm;

#[async_trait]
impl<I: Item> ConfirmStep<I> for StdinConfirm {
    async fn confirm(&self, request: &ConfirmRequest<'_, I>) -> Confirmation {
        let prompt = request.prompt();
        let answer = tokio::task::spawn_blocking(move || {
            ask(&prompt, &mut std::io::stdin().lock(), &mut std::io::stderr())
        })
        .await;

        match answer {
            Ok(Ok(confirmation)) => confirmation,
            Ok(Err(e)) => {
                warn!(error = %e, "cannot read confirmation");
                Confirmation::Cancel
            }
            Err(e) => {
                warn!(error = %e, "confirmation prompt aborted");
                Confirmation::Cancel
            }
        }
    }
}

/// Write `prompt` to `out` and read the answer from one line of `input`.
pub fn ask(
    prompt: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> std::io::Result<Confirmation> {
    write!(out, "{prompt}? [y/N] ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_answer(&line))
}

pub fn parse_answer(line: &str) -> Confirmation {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Confirmation::Proceed,
        _ => Confirmation::Cancel,
    }
}
