/// Assembly of the fixed-order feature vector the scoring model consumes.
use crate::extraction::ExtractedFields;
use std::collections::HashMap;

/// Number of model input features. The model contract fixes both the length
/// and the order; neither varies with input.
pub const FEATURE_COUNT: usize = 5;

/// Canonical model feature order.
pub const MODEL_FEATURES: [&str; FEATURE_COUNT] = [
    "credit_utilization",
    "open_accounts",
    "missed_payments",
    "monthly_rent",
    "active_subscriptions",
];

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Placeholder values for features a report document alone cannot supply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureDefaults {
    pub assumed_monthly_rent: f64,
    pub assumed_subscription_count: f64,
}

impl Default for FeatureDefaults {
    fn default() -> Self {
        Self {
            assumed_monthly_rent: crate::config::DEFAULT_ASSUMED_MONTHLY_RENT,
            assumed_subscription_count: crate::config::DEFAULT_ASSUMED_SUBSCRIPTION_COUNT,
        }
    }
}

/// Builds the feature vector from caller-supplied raw values. Names absent
/// from the mapping contribute 0; unknown names are ignored.
pub fn from_raw_map(values: &HashMap<String, f64>) -> FeatureVector {
    let mut features = [0.0; FEATURE_COUNT];
    for (i, name) in MODEL_FEATURES.iter().enumerate() {
        features[i] = values.get(*name).copied().unwrap_or(0.0);
    }
    features
}

/// Builds the feature vector for the document-only path: extracted fields
/// where available, placeholder defaults for rent and subscriptions.
pub fn from_extracted(fields: &ExtractedFields, defaults: &FeatureDefaults) -> FeatureVector {
    [
        fields.credit_utilization_percent.unwrap_or(0.0),
        f64::from(fields.number_of_open_accounts),
        f64::from(fields.missed_payment_total()),
        defaults.assumed_monthly_rent,
        defaults.assumed_subscription_count,
    ]
}
