//! Review-outcome resolution for the verified-account page.
//!
//! The review page shows one of three outcomes derived from four inputs: an
//! explicit signal from the navigating page, rejections carried in the
//! navigation, rejections stored with the session, and the per-document
//! records on the profile. The sources are consulted in a fixed priority
//! order; when none of them has an opinion the previous outcome stands.

use crate::documents::{DocumentKind, DocumentSnapshot, RejectedDocument, ReviewStatus};
use crate::flow::ResubmissionPlan;

/// Explicit review-state hint carried by a navigation into the review page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSignal {
    Submitted,
    Approved,
    Rejected,
}

/// What the review page displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewOutcome {
    /// Documents are with the reviewers.
    #[default]
    Submitted,
    /// Every document was approved.
    Approved,
    /// At least one document needs resubmission.
    Rejected,
}

/// The four sources the resolver consults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewInputs<'a> {
    /// Signal from the navigating page, if any.
    pub signal: Option<ReviewSignal>,
    /// Rejections carried in the navigation payload.
    pub transient_rejected: Option<&'a [RejectedDocument]>,
    /// Rejections stored with the session at verification time.
    pub session_rejected: &'a [RejectedDocument],
    /// Per-document records from the profile. `None` when nobody is signed
    /// in.
    pub documents: Option<&'a DocumentSnapshot>,
}

fn has_entries(list: Option<&[RejectedDocument]>) -> bool {
    list.is_some_and(|l| !l.is_empty())
}

/// Resolve the outcome to display.
///
/// Priorities, first match wins:
/// 1. explicit `Rejected` signal
/// 2. explicit `Submitted` signal
/// 3. any carried or stored rejection entry
/// 4. every profile document still pending
/// 5. any profile document rejected
/// 6. every profile document approved
/// 7. otherwise the previous outcome is kept
///
/// An explicit `Approved` signal never short-circuits; approval is only ever
/// concluded from the profile records.
pub fn resolve_outcome(inputs: &ReviewInputs, previous: ReviewOutcome) -> ReviewOutcome {
    match inputs.signal {
        Some(ReviewSignal::Rejected) => return ReviewOutcome::Rejected,
        Some(ReviewSignal::Submitted) => return ReviewOutcome::Submitted,
        _ => {}
    }

    if has_entries(inputs.transient_rejected) || !inputs.session_rejected.is_empty() {
        return ReviewOutcome::Rejected;
    }

    if let Some(docs) = inputs.documents {
        if docs.all_pending() {
            return ReviewOutcome::Submitted;
        }
        if docs.any_rejected() {
            return ReviewOutcome::Rejected;
        }
        if docs.all_approved() {
            return ReviewOutcome::Approved;
        }
    }

    previous
}

/// Whether the review page should schedule the automatic advance to the
/// subscription step.
///
/// Fires only on approval, and never while the profile still reports every
/// document pending.
pub fn should_auto_advance(outcome: ReviewOutcome, documents: Option<&DocumentSnapshot>) -> bool {
    let all_pending = documents.is_some_and(DocumentSnapshot::all_pending);
    outcome == ReviewOutcome::Approved && !all_pending
}

/// Build the resubmission plan from every rejection source.
///
/// The three sources are unioned and the result follows canonical document
/// order, so the traversal visits steps in flow order no matter which source
/// reported them.
pub fn build_resubmission_plan(inputs: &ReviewInputs) -> ResubmissionPlan {
    let mut kinds: Vec<DocumentKind> = Vec::new();
    if let Some(transient) = inputs.transient_rejected {
        kinds.extend(transient.iter().map(|d| d.key));
    }
    kinds.extend(inputs.session_rejected.iter().map(|d| d.key));
    if let Some(docs) = inputs.documents {
        kinds.extend(docs.rejected_kinds());
    }
    ResubmissionPlan::from_kinds(kinds)
}

fn reason_line(doc: &RejectedDocument) -> String {
    match &doc.reject_reason {
        Some(reason) if !reason.trim().is_empty() => reason.clone(),
        _ => format!("{} document is rejected", doc.key.as_str()),
    }
}

/// Assemble the human-readable rejection reasons.
///
/// Sources are consulted in the same order as the resolver and only the
/// first non-empty one contributes. When every source is empty a generic
/// placeholder list is returned so the rejected screen never renders blank.
pub fn rejection_reasons(inputs: &ReviewInputs) -> Vec<String> {
    if let Some(transient) = inputs.transient_rejected {
        if !transient.is_empty() {
            return transient.iter().map(reason_line).collect();
        }
    }

    if !inputs.session_rejected.is_empty() {
        return inputs.session_rejected.iter().map(reason_line).collect();
    }

    if let Some(docs) = inputs.documents {
        let reasons: Vec<String> = DocumentKind::CANONICAL_ORDER
            .iter()
            .filter_map(|kind| {
                let record = docs.get(*kind);
                match (&record.status, &record.reject_reason) {
                    (ReviewStatus::Rejected, Some(reason)) => {
                        Some(format!("{}: {}", kind.display_name(), reason))
                    }
                    _ => None,
                }
            })
            .collect();
        if !reasons.is_empty() {
            return reasons;
        }
    }

    vec![
        "Your profile picture is blurry.".to_string(),
        "Number Plate cannot be readable.".to_string(),
    ]
}
