use std::collections::HashSet;
use std::sync::Arc;

use sweep_gate::{AllowAll, EligibilityCheck, EligibilityGate, EligibilityPartition};
use sweep_result::{ActionResult, ResultAggregator};
use sweep_settle::{Operation, SettlementReport, Settler};
use sweep_types::{ActionVerb, Item, ItemId, Noun, ResourceKind, RunId};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::action::ItemAction;
use crate::config::{EngineConfig, IneligibleReporting};
use crate::confirm::{AutoConfirm, ConfirmRequest, ConfirmStep, Confirmation};
use crate::error::{EngineError, EngineResult};
use crate::events::{BatchEvent, EventSink};
use crate::notify::{Notification, NotificationPhase, NotificationSink, TracingNotifier};
use crate::state::BatchState;

// ---------------------------------------------------------------------------
// BatchOutcome
// ---------------------------------------------------------------------------

/// How a batch ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The batch ran to completion. Individual items may still have failed;
    /// see [`ActionResult::failed`].
    Completed(ActionResult),
    /// The user declined the confirmation. No action was invoked.
    Aborted {
        /// Eligible items that were offered for confirmation.
        offered: usize,
    },
}

impl BatchOutcome {
    pub fn result(&self) -> Option<&ActionResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Aborted { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<ActionResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Aborted { .. } => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

struct EventRoute {
    sink: Arc<dyn EventSink>,
    success: String,
    failure: Option<String>,
}

/// Drives one batch action end to end.
///
/// `perform` checks every item's eligibility, reports denials once, asks for
/// confirmation, runs the action on all eligible items concurrently, and
/// folds the outcomes into a single [`ActionResult`]. Item-level failures
/// are data, not errors: the only `Err` a run can produce is a programming
/// error in the input.
///
/// One orchestrator is built per resource type and action, then reused for
/// any number of runs.
pub struct Orchestrator<I: Item, A: ItemAction<I>> {
    kind: ResourceKind,
    verb: ActionVerb,
    noun: Noun,
    gate: EligibilityGate<I>,
    confirm: Arc<dyn ConfirmStep<I>>,
    action: Arc<A>,
    notifier: Arc<dyn NotificationSink>,
    events: Option<EventRoute>,
    config: EngineConfig,
}

impl<I: Item, A: ItemAction<I>> Orchestrator<I, A> {
    pub fn builder(kind: ResourceKind, verb: ActionVerb) -> OrchestratorBuilder<I, A> {
        OrchestratorBuilder::new(kind, verb)
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    pub fn verb(&self) -> &ActionVerb {
        &self.verb
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the batch action over `items`.
    pub async fn perform(&self, items: Vec<I>) -> EngineResult<BatchOutcome> {
        let run = RunId::new();
        let span = info_span!(
            "batch",
            run = %run.short_id(),
            kind = %self.kind,
            verb = %self.verb,
            items = items.len()
        );
        self.run(run, items).instrument(span).await
    }

    async fn run(&self, run: RunId, items: Vec<I>) -> EngineResult<BatchOutcome> {
        let mut state = BatchState::Idle;
        ensure_unique(&items)?;

        if items.is_empty() {
            advance(&mut state, BatchState::Done);
            return Ok(BatchOutcome::Completed(ActionResult::empty()));
        }

        advance(&mut state, BatchState::CheckingEligibility);
        let partition = self.gate.partition(items).await;
        self.report_denials(run, &partition);

        let mut aggregator = ResultAggregator::new();
        let register_ineligible = match self.config.ineligible {
            IneligibleReporting::Always => true,
            IneligibleReporting::FailedWhenNoneEligible => partition.eligible.is_empty(),
            IneligibleReporting::Never => false,
        };
        if register_ineligible {
            for denied in &partition.ineligible {
                aggregator.failed(self.kind.clone(), denied.item.id());
            }
        }

        if partition.eligible.is_empty() {
            advance(&mut state, BatchState::Done);
            info!(denied = partition.ineligible.len(), "no eligible items");
            return Ok(BatchOutcome::Completed(aggregator.snapshot()));
        }

        advance(&mut state, BatchState::AwaitingConfirmation);
        let request = ConfirmRequest {
            kind: &self.kind,
            verb: &self.verb,
            noun: &self.noun,
            items: &partition.eligible,
        };
        if self.confirm.confirm(&request).await == Confirmation::Cancel {
            advance(&mut state, BatchState::Done);
            info!(offered = partition.eligible.len(), "batch cancelled at confirmation");
            return Ok(BatchOutcome::Aborted {
                offered: partition.eligible.len(),
            });
        }

        advance(&mut state, BatchState::Executing);
        let report = self.execute(partition.eligible).await;

        advance(&mut state, BatchState::Settled);
        self.collect(run, report, &mut aggregator);

        advance(&mut state, BatchState::Done);
        let result = aggregator.snapshot();
        info!(
            succeeded = result.bucket(self.verb.bucket()).len(),
            failed = result.failed().len(),
            "batch complete"
        );
        Ok(BatchOutcome::Completed(result))
    }

    /// Launch the action for every eligible item and wait for all of them.
    async fn execute(&self, eligible: Vec<I>) -> SettlementReport<I, A::Value, A::Error> {
        let ops = eligible
            .into_iter()
            .map(|item| {
                let action = Arc::clone(&self.action);
                let target = item.clone();
                Operation::new(item, async move { action.perform(target).await })
            })
            .collect();

        Settler::new()
            .with_timeout(self.config.action_timeout())
            .settle(ops)
            .await
    }

    /// Fold a settlement into the aggregator and report it.
    fn collect(
        &self,
        run: RunId,
        report: SettlementReport<I, A::Value, A::Error>,
        aggregator: &mut ResultAggregator,
    ) {
        let bucket = self.verb.bucket();

        let mut passed_ids = Vec::with_capacity(report.passed.len());
        let mut passed_labels = Vec::with_capacity(report.passed.len());
        for entry in &report.passed {
            let id = entry.context.id();
            aggregator.register(bucket, self.kind.clone(), id.clone());
            passed_labels.push(entry.context.label());
            passed_ids.push(id);
        }

        let mut failed_ids = Vec::with_capacity(report.failed.len());
        let mut failed_labels = Vec::with_capacity(report.failed.len());
        for entry in &report.failed {
            let id = entry.context.id();
            warn!(item = %id, error = %entry.value, "action failed");
            aggregator.failed(self.kind.clone(), id.clone());
            failed_labels.push(entry.context.label());
            failed_ids.push(id);
        }

        if !passed_labels.is_empty() {
            self.notify(run, NotificationPhase::Succeeded, passed_labels);
        }
        if !failed_labels.is_empty() {
            self.notify(run, NotificationPhase::Failed, failed_labels);
        }

        if let Some(route) = &self.events {
            if !passed_ids.is_empty() {
                route.sink.emit(&BatchEvent::new(route.success.as_str(), passed_ids));
            }
            if let Some(failure) = &route.failure {
                if !failed_ids.is_empty() {
                    route.sink.emit(&BatchEvent::new(failure.as_str(), failed_ids));
                }
            }
        }
    }

    fn report_denials(&self, run: RunId, partition: &EligibilityPartition<I>) {
        if partition.ineligible.is_empty() {
            return;
        }
        let labels = partition.ineligible_items().map(Item::label).collect();
        self.notify(run, NotificationPhase::Denied, labels);
    }

    fn notify(&self, run: RunId, phase: NotificationPhase, labels: Vec<String>) {
        let notification = Notification::new(
            run,
            phase,
            self.kind.clone(),
            self.verb.clone(),
            self.noun.clone(),
            labels,
        );
        self.notifier.notify(&notification);
    }
}

fn advance(state: &mut BatchState, next: BatchState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal batch transition {state} -> {next}"
    );
    debug!(from = %state, to = %next, "batch state");
    *state = next;
}

fn ensure_unique<I: Item>(items: &[I]) -> EngineResult<()> {
    let mut seen: HashSet<ItemId> = HashSet::with_capacity(items.len());
    for item in items {
        let id = item.id();
        if !seen.insert(id.clone()) {
            return Err(EngineError::DuplicateItem(id));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// OrchestratorBuilder
// ---------------------------------------------------------------------------

/// Assembles an [`Orchestrator`] from its collaborators.
///
/// Only the action is required. Defaults: every item eligible, confirmation
/// granted without asking, notifications written to tracing, no events.
pub struct OrchestratorBuilder<I: Item, A: ItemAction<I>> {
    kind: ResourceKind,
    verb: ActionVerb,
    noun: Option<Noun>,
    check: Arc<dyn EligibilityCheck<I>>,
    confirm: Arc<dyn ConfirmStep<I>>,
    action: Option<Arc<A>>,
    notifier: Arc<dyn NotificationSink>,
    events: Option<EventRoute>,
    config: EngineConfig,
}

impl<I: Item, A: ItemAction<I>> OrchestratorBuilder<I, A> {
    pub fn new(kind: ResourceKind, verb: ActionVerb) -> Self {
        Self {
            kind,
            verb,
            noun: None,
            check: Arc::new(AllowAll),
            confirm: Arc::new(AutoConfirm),
            action: None,
            notifier: Arc::new(TracingNotifier),
            events: None,
            config: EngineConfig::default(),
        }
    }

    /// Display noun; defaults to [`ResourceKind::noun`].
    pub fn noun(mut self, noun: Noun) -> Self {
        self.noun = Some(noun);
        self
    }

    pub fn check(mut self, check: impl EligibilityCheck<I> + 'static) -> Self {
        self.check = Arc::new(check);
        self
    }

    pub fn shared_check(mut self, check: Arc<dyn EligibilityCheck<I>>) -> Self {
        self.check = check;
        self
    }

    pub fn confirm(mut self, confirm: impl ConfirmStep<I> + 'static) -> Self {
        self.confirm = Arc::new(confirm);
        self
    }

    pub fn action(mut self, action: A) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Emit `success_event` with the ids of items the action succeeded on.
    pub fn events(mut self, sink: Arc<dyn EventSink>, success_event: impl Into<String>) -> Self {
        self.events = Some(EventRoute {
            sink,
            success: success_event.into(),
            failure: None,
        });
        self
    }

    /// Also emit `failure_event` with the ids of failed items. Has no effect
    /// unless [`Self::events`] was called first.
    pub fn failure_event(mut self, failure_event: impl Into<String>) -> Self {
        if let Some(route) = self.events.as_mut() {
            route.failure = Some(failure_event.into());
        }
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> EngineResult<Orchestrator<I, A>> {
        let action = self
            .action
            .ok_or(EngineError::MissingCollaborator("action"))?;
        self.config.validate()?;

        let noun = self.noun.unwrap_or_else(|| self.kind.noun());
        let gate = EligibilityGate::new(self.check, self.config.gate.clone());

        Ok(Orchestrator {
            kind: self.kind,
            verb: self.verb,
            noun,
            gate,
            confirm: self.confirm,
            action,
            notifier: self.notifier,
            events: self.events,
            config: self.config,
        })
    }
}
