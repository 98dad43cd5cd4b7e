/// Merging of text-derived and tabular-derived facts into one summary.
use crate::extraction::ExtractedFields;
use crate::tabular::{TabularRecord, TabularSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The externally visible artifact of an analysis run: extracted report
/// fields plus the classified tabular records, with subscriptions unified
/// across both sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedSummary {
    #[serde(flatten)]
    pub fields: ExtractedFields,
    pub rent_payments: Vec<TabularRecord>,
    pub recurring_obligations: Vec<TabularRecord>,
    pub active_subscriptions: BTreeSet<String>,
}

/// Merges extraction output with tabular classification.
///
/// Subscriptions are a set union over both origins, so consolidation is
/// idempotent and order-independent. Every other field has exactly one
/// producing source and passes through unchanged: extracted fields come from
/// the report text, rent and recurring lists come from the tabular input.
pub fn consolidate(
    fields: ExtractedFields,
    text_subscriptions: BTreeSet<String>,
    tabular: TabularSummary,
) -> ConsolidatedSummary {
    let mut active_subscriptions = text_subscriptions;
    active_subscriptions.extend(tabular.subscriptions);

    ConsolidatedSummary {
        fields,
        rent_payments: tabular.rent_payments,
        recurring_obligations: tabular.recurring_obligations,
        active_subscriptions,
    }
}
