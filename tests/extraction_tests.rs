/// Unit tests for pattern-based field extraction
/// Covers cascade precedence, fallback counting, numeric parsing, and
/// per-field failure containment
use rust_credit_api::extraction::{parse_numeric_token, FieldExtractor};

#[cfg(test)]
mod numeric_token_tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_numeric_token("500"), Some(500.0));
        assert_eq!(parse_numeric_token("42.5"), Some(42.5));
        assert_eq!(parse_numeric_token("0"), Some(0.0));
    }

    #[test]
    fn test_thousands_separators_stripped() {
        assert_eq!(parse_numeric_token("1,234"), Some(1234.0));
        assert_eq!(parse_numeric_token("1,234.5"), Some(1234.5));
        assert_eq!(parse_numeric_token("12,34,567"), Some(1234567.0));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert_eq!(parse_numeric_token("1.2.3"), None);
        assert_eq!(parse_numeric_token("."), None);
        assert_eq!(parse_numeric_token(""), None);
    }
}

#[cfg(test)]
mod utilization_tests {
    use super::*;

    #[test]
    fn test_labeled_pattern_beats_generic() {
        let extractor = FieldExtractor::new();
        let text = "Credit Utilization: 42.5%\nUtilization: 99%";
        let fields = extractor.extract(text);
        assert_eq!(fields.credit_utilization_percent, Some(42.5));
    }

    #[test]
    fn test_generic_pattern_when_label_missing() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("Utilization: 75%");
        assert_eq!(fields.credit_utilization_percent, Some(75.0));
    }

    #[test]
    fn test_case_insensitive_match() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("CREDIT UTILIZATION : 33%");
        assert_eq!(fields.credit_utilization_percent, Some(33.0));
    }

    #[test]
    fn test_thousands_separator_in_percentage() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("Credit Utilization: 1,234.5%");
        assert_eq!(fields.credit_utilization_percent, Some(1234.5));
    }

    #[test]
    fn test_absent_when_no_pattern_matches() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("No percentages here");
        assert_eq!(fields.credit_utilization_percent, None);
    }

    #[test]
    fn test_malformed_number_contained_to_field() {
        // The label matches but "1.2.3" is not a number: only utilization
        // becomes absent, sibling fields extract normally.
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("Credit Utilization: 1.2.3%\nOpen Accounts: 4");
        assert_eq!(fields.credit_utilization_percent, None);
        assert_eq!(fields.number_of_open_accounts, 4);
    }
}

#[cfg(test)]
mod account_count_tests {
    use super::*;

    #[test]
    fn test_open_accounts_label_wins() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("Open Accounts: 4\nStatus: Open\nStatus: Open");
        assert_eq!(fields.number_of_open_accounts, 4);
    }

    #[test]
    fn test_open_accounts_fallback_counts_status_markers() {
        let extractor = FieldExtractor::new();
        let text = "Account 1 Status: Open\nAccount 2 Status : open\nAccount 3 STATUS: OPEN";
        let fields = extractor.extract(text);
        assert_eq!(fields.number_of_open_accounts, 3);
    }

    #[test]
    fn test_open_accounts_zero_without_label_or_markers() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("nothing relevant");
        assert_eq!(fields.number_of_open_accounts, 0);
    }

    #[test]
    fn test_closed_accounts_counted_from_status_markers() {
        let extractor = FieldExtractor::new();
        let text = "Status: Closed\nStatus: Open\nStatus: Closed";
        let fields = extractor.extract(text);
        assert_eq!(fields.number_of_closed_accounts, 2);
        assert_eq!(fields.number_of_open_accounts, 1);
    }
}

#[cfg(test)]
mod account_age_tests {
    use super::*;

    #[test]
    fn test_age_in_years() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("Account Age: 5.5 yrs");
        assert_eq!(fields.account_age_years, Some(5.5));
    }

    #[test]
    fn test_age_in_months_normalized_to_years() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("Account Age: 24 months");
        assert_eq!(fields.account_age_years, Some(2.0));

        let fields = extractor.extract("Account Age: 30 months");
        assert_eq!(fields.account_age_years, Some(2.5));
    }

    #[test]
    fn test_age_absent_without_label() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("opened a while ago");
        assert_eq!(fields.account_age_years, None);
    }
}

#[cfg(test)]
mod product_count_tests {
    use super::*;

    #[test]
    fn test_credit_card_label_wins_over_term_count() {
        let extractor = FieldExtractor::new();
        // The label line itself contains the literal term once; the labeled
        // value must still win.
        let fields = extractor.extract("Credit Card: 3");
        assert_eq!(fields.credit_card_count, 3);
    }

    #[test]
    fn test_credit_card_fallback_counts_occurrences() {
        let extractor = FieldExtractor::new();
        let text = "HDFC Credit Card ending 1234\nICICI credit card ending 9999";
        let fields = extractor.extract(text);
        assert_eq!(fields.credit_card_count, 2);
    }

    #[test]
    fn test_loan_label_and_fallback() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("Loan: 2");
        assert_eq!(fields.loan_count, 2);

        let fields = extractor.extract("Home Loan\nPersonal loan\nLoan against property");
        assert_eq!(fields.loan_count, 3);
    }

    #[test]
    fn test_recent_inquiries_counted() {
        let extractor = FieldExtractor::new();
        let text = "Enquiry Date: 01/02/2024\nEnquiry Date: 15/03/2024";
        let fields = extractor.extract(text);
        assert_eq!(fields.recent_inquiries, 2);
    }
}

#[cfg(test)]
mod payment_history_tests {
    use super::*;

    #[test]
    fn test_late_and_missed_payment_labels() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("Late Payments: 3\nMissed Payment: 1");
        assert_eq!(fields.late_payments, 3);
        assert_eq!(fields.missed_payments, 1);
        assert_eq!(fields.missed_payment_total(), 4);
    }

    #[test]
    fn test_counts_default_to_zero() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("spotless history");
        assert_eq!(fields.late_payments, 0);
        assert_eq!(fields.missed_payments, 0);
        assert_eq!(fields.missed_payment_total(), 0);
    }

    #[test]
    fn test_dpd_groups_collected_per_label() {
        let extractor = FieldExtractor::new();
        let text = "Account 1 DPD: 0 0 30 60\nAccount 2 DPD: 90 0";
        let fields = extractor.extract(text);
        assert_eq!(fields.payment_history.len(), 2);
        assert_eq!(fields.payment_history[0].dpd, vec![0, 0, 30, 60]);
        assert_eq!(fields.payment_history[1].dpd, vec![90, 0]);
    }

    #[test]
    fn test_dpd_label_is_case_sensitive() {
        let extractor = FieldExtractor::new();
        let fields = extractor.extract("dpd: 30 60");
        assert!(fields.payment_history.is_empty());
    }

    #[test]
    fn test_unparseable_dpd_tokens_dropped() {
        let extractor = FieldExtractor::new();
        // 99999999999 overflows the day counter and is dropped, not an error
        let fields = extractor.extract("DPD: 30 99999999999 60");
        assert_eq!(fields.payment_history[0].dpd, vec![30, 60]);
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::*;

    #[test]
    fn test_clean_report_extraction() {
        let extractor = FieldExtractor::new();
        let text = "Credit Utilization: 42.5%\nOpen Accounts: 4\n";
        let fields = extractor.extract(text);
        assert_eq!(fields.credit_utilization_percent, Some(42.5));
        assert_eq!(fields.number_of_open_accounts, 4);
        assert_eq!(fields.missed_payment_total(), 0);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = FieldExtractor::new();
        let text = "Credit Utilization: 64%\nStatus: Open\nLoan: 1\nDPD: 0 30";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
