//! Page guard: decides whether a navigation to a step may proceed.
//!
//! The guard is an ordered rule chain. Rules are evaluated top to bottom and
//! the first rule with an opinion wins; later rules are never consulted. The
//! chain is a plain list so the precedence is visible in one place instead
//! of being spread across pages.

use crate::error::OnboardingError;
use crate::flow::FlowPayload;
use crate::ledger::StepLedger;
use crate::review::ReviewSignal;
use crate::session::SessionSnapshot;
use crate::steps::{Route, StepId};

/// What the guard decided for the attempted navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// A guard decision plus any ledger side effect it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOutcome {
    pub decision: GuardDecision,
    /// A step to opportunistically record as completed. Set when the server
    /// hint proves the prior step was accepted server-side even though this
    /// device never recorded it.
    pub mark_completed: Option<StepId>,
}

impl GuardOutcome {
    fn allow() -> Self {
        Self {
            decision: GuardDecision::Allow,
            mark_completed: None,
        }
    }

    fn redirect(route: Route) -> Self {
        Self {
            decision: GuardDecision::Redirect(route),
            mark_completed: None,
        }
    }
}

/// Everything a guard rule may consult.
#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
    pub step: StepId,
    pub session: &'a SessionSnapshot,
    pub payload: Option<&'a FlowPayload>,
    pub ledger: &'a StepLedger,
}

type GuardRule = fn(&GuardContext) -> Option<GuardOutcome>;

/// The review page stays reachable for a rejected review even without a
/// session, so a driver told "rejected" during verification can read why.
fn rejected_review_access(ctx: &GuardContext) -> Option<GuardOutcome> {
    if ctx.step == StepId::VerifiedAccount
        && ctx
            .payload
            .is_some_and(|p| p.review_signal == Some(ReviewSignal::Rejected))
    {
        return Some(GuardOutcome::allow());
    }
    None
}

/// Every other step needs an authenticated driver.
fn require_authenticated_user(ctx: &GuardContext) -> Option<GuardOutcome> {
    if ctx.session.user.is_none() {
        return Some(GuardOutcome::redirect(Route::Step(StepId::Signup)));
    }
    None
}

/// The server's next-required-step hint overrides the local ledger.
///
/// When the hint names the document submitted at this step, access is
/// granted and the prior step is recorded as completed. When the hint is
/// absent, every document step is submitted and the terminal steps open up.
fn server_hint_grants_access(ctx: &GuardContext) -> Option<GuardOutcome> {
    match ctx.step.document_kind() {
        Some(kind) if ctx.session.next_required_step == Some(kind) => Some(GuardOutcome {
            decision: GuardDecision::Allow,
            mark_completed: ctx.step.previous(),
        }),
        None if ctx.session.next_required_step.is_none()
            && matches!(ctx.step, StepId::VerifiedAccount | StepId::Subscription) =>
        {
            Some(GuardOutcome::allow())
        }
        _ => None,
    }
}

/// A navigation carrying form data captured at an earlier step is a mid-flow
/// hand-off, not a fresh entry. An active resubmission traversal pointed at
/// this step counts too: its steps were completed before, so the ledger
/// rules below would wrongly bounce it.
fn mid_flow_payload(ctx: &GuardContext) -> Option<GuardOutcome> {
    let Some(payload) = ctx.payload else {
        return None;
    };
    if payload.carries_prior_step_data(ctx.step) {
        return Some(GuardOutcome::allow());
    }
    let traversal_target = payload
        .resubmission
        .as_ref()
        .and_then(|cursor| cursor.current())
        .map(|kind| kind.step());
    if traversal_target == Some(ctx.step) {
        return Some(GuardOutcome::allow());
    }
    None
}

/// Completed steps cannot be revisited.
fn already_completed(ctx: &GuardContext) -> Option<GuardOutcome> {
    if ctx.ledger.is_completed(ctx.step) {
        return Some(GuardOutcome::redirect(Route::Step(
            ctx.ledger.first_incomplete_step(),
        )));
    }
    None
}

/// Steps cannot be skipped ahead to.
fn prior_steps_incomplete(ctx: &GuardContext) -> Option<GuardOutcome> {
    if !ctx.ledger.prior_steps_completed(ctx.step) {
        return Some(GuardOutcome::redirect(Route::Step(
            ctx.ledger.first_incomplete_step(),
        )));
    }
    None
}

/// Rule chain in precedence order.
const RULES: &[GuardRule] = &[
    rejected_review_access,
    require_authenticated_user,
    server_hint_grants_access,
    mid_flow_payload,
    already_completed,
    prior_steps_incomplete,
];

/// Run the rule chain. Falls through to `Allow` when no rule objects.
pub fn evaluate(ctx: &GuardContext) -> GuardOutcome {
    for rule in RULES {
        if let Some(outcome) = rule(ctx) {
            return outcome;
        }
    }
    GuardOutcome::allow()
}

/// Resolve the target of a backwards navigation from `step`.
///
/// Going back onto a completed step is refused; the flow only moves forward
/// once a step's data has been accepted.
pub fn back_target(step: StepId, ledger: &StepLedger) -> Result<StepId, OnboardingError> {
    let previous = step.previous().ok_or_else(|| {
        OnboardingError::GatingRefusal("There is no previous step".to_string())
    })?;
    if ledger.is_completed(previous) {
        return Err(OnboardingError::GatingRefusal(
            "You cannot go back to completed steps".to_string(),
        ));
    }
    Ok(previous)
}
