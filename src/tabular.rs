/// Classification of row-oriented financial records (bank exports and the
/// like) into rent payments, recurring obligations, and subscriptions.
use crate::subscriptions::SUBSCRIPTION_CATALOG;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;

/// Keywords marking a row as a rent payment.
pub const RENT_KEYWORDS: [&str; 4] = ["rent", "house rent", "flat rent", "apartment rent"];

/// Keywords marking a row as a recurring financial obligation.
pub const RECURRING_KEYWORDS: [&str; 7] = [
    "emi",
    "insurance",
    "loan",
    "credit card",
    "sip",
    "mutual fund",
    "subscription",
];

/// One classified input row. Amount and date are carried as opaque strings;
/// no currency or date parsing happens at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularRecord {
    pub description: String,
    pub amount: String,
    pub date: String,
}

/// Classified output of one or more tabular inputs. A single row may appear
/// in several lists; rows matching nothing appear in none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularSummary {
    pub rent_payments: Vec<TabularRecord>,
    pub recurring_obligations: Vec<TabularRecord>,
    pub subscriptions: BTreeSet<String>,
}

impl TabularSummary {
    /// Folds another parsed input into this one.
    pub fn merge(&mut self, other: TabularSummary) {
        self.rent_payments.extend(other.rent_payments);
        self.recurring_obligations.extend(other.recurring_obligations);
        self.subscriptions.extend(other.subscriptions);
    }
}

/// Parses one CSV input with header-declared columns "Description",
/// "Amount", "Date" and classifies every row. Missing columns read as empty
/// strings; they are never an error.
pub fn classify_rows<R: Read>(reader: R) -> Result<TabularSummary, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let description_idx = headers.iter().position(|h| h == "Description");
    let amount_idx = headers.iter().position(|h| h == "Amount");
    let date_idx = headers.iter().position(|h| h == "Date");

    let mut summary = TabularSummary::default();

    for record in csv_reader.records() {
        let record = record?;

        let description = column(&record, description_idx).to_lowercase();
        let amount = column(&record, amount_idx).to_string();
        let date = column(&record, date_idx).to_string();

        if RENT_KEYWORDS.iter().any(|k| description.contains(k)) {
            summary.rent_payments.push(TabularRecord {
                description: description.clone(),
                amount: amount.clone(),
                date: date.clone(),
            });
        }

        for service in SUBSCRIPTION_CATALOG {
            if description.contains(&service.to_lowercase()) {
                summary.subscriptions.insert(service.to_string());
            }
        }

        if RECURRING_KEYWORDS.iter().any(|k| description.contains(k)) {
            summary.recurring_obligations.push(TabularRecord {
                description,
                amount,
                date,
            });
        }
    }

    Ok(summary)
}

fn column<'r>(record: &'r csv::StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}
