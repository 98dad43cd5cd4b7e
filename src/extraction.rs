/// Pattern-based field extraction from credit report text.
///
/// Each field is recovered by an ordered cascade of labeled patterns; the
/// first pattern that matches anywhere in the text wins. Count-style fields
/// (accounts, cards, loans, inquiries) fall back to counting occurrence
/// markers when no explicit label is present, and that count (possibly zero)
/// is authoritative. Fields without a counting fallback stay absent when
/// nothing matches.
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// One run of days-past-due values from a payment history section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpdGroup {
    pub dpd: Vec<u32>,
}

/// Typed fields recovered from a report text blob.
///
/// `None` marks a field whose patterns found nothing, as distinct from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub credit_utilization_percent: Option<f64>,
    pub number_of_open_accounts: u32,
    pub number_of_closed_accounts: u32,
    pub account_age_years: Option<f64>,
    pub credit_card_count: u32,
    pub loan_count: u32,
    pub recent_inquiries: u32,
    pub late_payments: u32,
    pub missed_payments: u32,
    pub payment_history: Vec<DpdGroup>,
}

impl ExtractedFields {
    /// Combined late + missed payment count fed to the scoring model.
    pub fn missed_payment_total(&self) -> u32 {
        self.late_payments + self.missed_payments
    }
}

/// Parses a numeric token from a matched label, stripping thousands
/// separators first ("1,234.5" -> 1234.5). Returns `None` when the token
/// does not survive float parsing (e.g. "1.2.3").
pub fn parse_numeric_token(token: &str) -> Option<f64> {
    let cleaned = token.replace(',', "");
    cleaned.parse::<f64>().ok()
}

/// A labeled pattern plus the mapping applied to its captured value.
/// Cascades are plain ordered lists of these, so precedence is data,
/// not code order.
struct NumericRule {
    pattern: Regex,
    map: fn(f64) -> f64,
}

fn identity(value: f64) -> f64 {
    value
}

fn months_to_years(value: f64) -> f64 {
    value / 12.0
}

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

/// Compiled pattern cascades for every extracted field. Build once and
/// share; extraction itself is stateless.
pub struct FieldExtractor {
    utilization: Vec<NumericRule>,
    account_age: Vec<NumericRule>,
    open_accounts_label: Regex,
    open_status_marker: Regex,
    closed_status_marker: Regex,
    credit_card_label: Regex,
    credit_card_term: Regex,
    loan_label: Regex,
    loan_term: Regex,
    inquiry_marker: Regex,
    late_payments_label: Regex,
    missed_payments_label: Regex,
    // DPD sections are upper-case in every known report layout; this one
    // stays case-sensitive.
    dpd_run: Regex,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            utilization: vec![
                NumericRule {
                    pattern: case_insensitive(r"Credit Utilization\s*:\s*([\d,.]+)%"),
                    map: identity,
                },
                NumericRule {
                    pattern: case_insensitive(r"Utilization\s*:\s*([\d,.]+)%"),
                    map: identity,
                },
            ],
            account_age: vec![
                NumericRule {
                    pattern: case_insensitive(r"Account Age\s*:\s*([\d,.]+)\s*yrs"),
                    map: identity,
                },
                NumericRule {
                    pattern: case_insensitive(r"Account Age\s*:\s*([\d,.]+)\s*months"),
                    map: months_to_years,
                },
            ],
            open_accounts_label: case_insensitive(r"Open Accounts\s*:\s*(\d+)"),
            open_status_marker: case_insensitive(r"Status\s*:\s*Open"),
            closed_status_marker: case_insensitive(r"Status\s*:\s*Closed"),
            credit_card_label: case_insensitive(r"Credit Card\s*:\s*(\d+)"),
            credit_card_term: case_insensitive(r"Credit Card"),
            loan_label: case_insensitive(r"Loan\s*:\s*(\d+)"),
            loan_term: case_insensitive(r"Loan"),
            inquiry_marker: case_insensitive(r"Enquiry Date"),
            late_payments_label: case_insensitive(r"Late Payments?\s*:\s*(\d+)"),
            missed_payments_label: case_insensitive(r"Missed Payments?\s*:\s*(\d+)"),
            dpd_run: Regex::new(r"DPD\s*:\s*([0-9\s]+)").unwrap(),
        }
    }

    /// Extracts all supported fields from the text. Failures are contained
    /// per field: a label whose number fails to parse leaves only that field
    /// absent, never aborting the remaining fields.
    pub fn extract(&self, text: &str) -> ExtractedFields {
        ExtractedFields {
            credit_utilization_percent: cascade_value(&self.utilization, text),
            number_of_open_accounts: self.labeled_count(
                &self.open_accounts_label,
                &self.open_status_marker,
                text,
            ),
            number_of_closed_accounts: count_matches(&self.closed_status_marker, text),
            account_age_years: cascade_value(&self.account_age, text),
            credit_card_count: self.labeled_count(
                &self.credit_card_label,
                &self.credit_card_term,
                text,
            ),
            loan_count: self.labeled_count(&self.loan_label, &self.loan_term, text),
            recent_inquiries: count_matches(&self.inquiry_marker, text),
            late_payments: labeled_u32(&self.late_payments_label, text).unwrap_or(0),
            missed_payments: labeled_u32(&self.missed_payments_label, text).unwrap_or(0),
            payment_history: self.extract_dpd_groups(text),
        }
    }

    /// Label value if present, otherwise the occurrence count of `marker`.
    fn labeled_count(&self, label: &Regex, marker: &Regex, text: &str) -> u32 {
        labeled_u32(label, text).unwrap_or_else(|| count_matches(marker, text))
    }

    /// Each labeled run of whitespace-separated integers becomes one group;
    /// tokens that do not parse are dropped, not errors.
    fn extract_dpd_groups(&self, text: &str) -> Vec<DpdGroup> {
        self.dpd_run
            .captures_iter(text)
            .map(|caps| DpdGroup {
                dpd: caps[1]
                    .split_whitespace()
                    .filter_map(|token| token.parse::<u32>().ok())
                    .collect(),
            })
            .collect()
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// First matching rule in the cascade wins; a matched-but-malformed number
/// leaves the field absent.
fn cascade_value(rules: &[NumericRule], text: &str) -> Option<f64> {
    for rule in rules {
        if let Some(caps) = rule.pattern.captures(text) {
            return parse_numeric_token(&caps[1]).map(rule.map);
        }
    }
    None
}

fn labeled_u32(label: &Regex, text: &str) -> Option<u32> {
    label
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
}

fn count_matches(marker: &Regex, text: &str) -> u32 {
    marker.find_iter(text).count() as u32
}
