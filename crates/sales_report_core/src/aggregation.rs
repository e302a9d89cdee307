use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::warn;

use crate::contract::{LocationSales, OrderRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingLocation,
    InvalidAmount,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingLocation => "missing_location",
            Self::InvalidAmount => "invalid_amount",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Accumulated,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub accumulated: usize,
    pub skipped: usize,
}

/// Running per-location totals for one invocation.
///
/// Locations keep the order in which they were first seen so that equal
/// totals come out in a deterministic order after the stable sort.
#[derive(Debug, Default)]
pub struct SalesAggregator {
    totals: Vec<(String, f64)>,
    index: HashMap<String, usize>,
    skipped: usize,
}

impl SalesAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, order: &OrderRecord) -> RecordOutcome {
        let location = match order.location_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return self.skip(order, SkipReason::MissingLocation),
        };
        let Some(amount) = order.total_amount.filter(|value| value.is_finite()) else {
            return self.skip(order, SkipReason::InvalidAmount);
        };

        match self.index.get(location) {
            Some(&position) => self.totals[position].1 += amount,
            None => {
                self.index.insert(location.to_string(), self.totals.len());
                self.totals.push((location.to_string(), amount));
            }
        }
        RecordOutcome::Accumulated
    }

    pub fn ingest_page(&mut self, orders: &[OrderRecord]) -> PageSummary {
        let mut summary = PageSummary::default();
        for order in orders {
            match self.record(order) {
                RecordOutcome::Accumulated => summary.accumulated += 1,
                RecordOutcome::Skipped(_) => summary.skipped += 1,
            }
        }
        summary
    }

    /// Totals in first-seen order.
    pub fn totals(&self) -> &[(String, f64)] {
        &self.totals
    }

    pub fn location_count(&self) -> usize {
        self.totals.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> Vec<LocationSales> {
        let entries = self
            .totals
            .into_iter()
            .map(|(name, total)| LocationSales {
                name,
                sales: format_sales(total),
            })
            .collect();
        sort_by_sales_desc(entries)
    }

    fn skip(&mut self, order: &OrderRecord, reason: SkipReason) -> RecordOutcome {
        self.skipped += 1;
        warn!(
            component = "sales_aggregator",
            event = "order_skipped",
            order_id = %order.id,
            reason = reason.as_str(),
            "Order {} has no valid location or totalAmount",
            order.id
        );
        RecordOutcome::Skipped(reason)
    }
}

/// Renders a total with two decimals, rounding exact half-cent ties up in
/// magnitude (`10.125` becomes `"10.13"`, `-0.125` becomes `"-0.13"`).
pub fn format_sales(total: f64) -> String {
    let magnitude = total.abs();
    // f64 values have a terminating decimal expansion of at most 1074 digits.
    let exact = format!("{magnitude:.1074}");
    let rounded = if is_half_cent_tie(&exact) {
        round_up_to_cents(&exact)
    } else {
        format!("{magnitude:.2}")
    };

    if total < 0.0 {
        format!("-{rounded}")
    } else {
        rounded
    }
}

fn is_half_cent_tie(exact: &str) -> bool {
    let fraction = exact
        .split_once('.')
        .map(|(_, fraction)| fraction.trim_end_matches('0'))
        .unwrap_or("");
    fraction.len() == 3 && fraction.ends_with('5')
}

fn round_up_to_cents(exact: &str) -> String {
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact, ""));
    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(2))
        .collect();

    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let (whole, cents) = digits.split_at(digits.len() - 2);
    format!(
        "{}.{}",
        String::from_utf8_lossy(whole),
        String::from_utf8_lossy(cents)
    )
}

/// Sorts by the numeric value of the rendered `sales`, highest first.
/// Ties keep their input order.
pub fn sort_by_sales_desc(entries: Vec<LocationSales>) -> Vec<LocationSales> {
    let mut keyed: Vec<(f64, LocationSales)> = entries
        .into_iter()
        .map(|entry| (entry.sales.parse::<f64>().unwrap_or(f64::NEG_INFINITY), entry))
        .collect();
    keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    keyed.into_iter().map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, sales: &str) -> LocationSales {
        LocationSales {
            name: name.to_string(),
            sales: sales.to_string(),
        }
    }

    fn cents(value: &str) -> i64 {
        (value.parse::<f64>().expect("sales should parse") * 100.0).round() as i64
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_sales(12.5), "12.50");
        assert_eq!(format_sales(0.0), "0.00");
        assert_eq!(format_sales(3.14159), "3.14");
        assert_eq!(format_sales(1_000.0), "1000.00");
    }

    #[test]
    fn half_cent_ties_round_up_in_magnitude() {
        assert_eq!(format_sales(10.125), "10.13");
        assert_eq!(format_sales(0.625), "0.63");
        assert_eq!(format_sales(0.125), "0.13");
        assert_eq!(format_sales(2.375), "2.38");
        assert_eq!(format_sales(-0.125), "-0.13");
    }

    #[test]
    fn near_ties_follow_the_stored_binary_value() {
        // 1.005 and 9.995 are stored just below the half cent.
        assert_eq!(format_sales(1.005), "1.00");
        assert_eq!(format_sales(9.995), "9.99");
        assert_eq!(format_sales(-0.0), "0.00");
    }

    #[test]
    fn tie_totals_round_up_after_aggregation() {
        let mut aggregator = SalesAggregator::new();
        aggregator.ingest_page(&[
            OrderRecord::new("1", Some("A"), Some(10.0)),
            OrderRecord::new("2", Some("B"), Some(0.625)),
            OrderRecord::new("3", Some("C"), Some(2.5)),
            OrderRecord::new("4", Some("A"), Some(0.125)),
        ]);

        assert_eq!(
            aggregator.finish(),
            vec![entry("A", "10.13"), entry("C", "2.50"), entry("B", "0.63")]
        );
    }

    #[test]
    fn groups_and_sorts_by_location() {
        let mut aggregator = SalesAggregator::new();
        aggregator.ingest_page(&[
            OrderRecord::new("1", Some("A"), Some(10.0)),
            OrderRecord::new("2", Some("B"), Some(30.0)),
            OrderRecord::new("3", Some("A"), Some(5.0)),
        ]);

        assert_eq!(
            aggregator.finish(),
            vec![entry("B", "30.00"), entry("A", "15.00")]
        );
    }

    #[test]
    fn skips_orders_without_location_or_amount() {
        let mut aggregator = SalesAggregator::new();
        let summary = aggregator.ingest_page(&[
            OrderRecord::new("1", None, Some(10.0)),
            OrderRecord::new("2", Some(""), Some(10.0)),
            OrderRecord::new("3", Some("A"), None),
            OrderRecord::new("4", Some("A"), Some(2.0)),
        ]);

        assert_eq!(
            summary,
            PageSummary {
                accumulated: 1,
                skipped: 3
            }
        );
        assert_eq!(aggregator.skipped(), 3);
        assert_eq!(aggregator.totals(), &[("A".to_string(), 2.0)]);
    }

    #[test]
    fn skip_reason_distinguishes_location_from_amount() {
        let mut aggregator = SalesAggregator::new();
        assert_eq!(
            aggregator.record(&OrderRecord::new("1", None, None)),
            RecordOutcome::Skipped(SkipReason::MissingLocation)
        );
        assert_eq!(
            aggregator.record(&OrderRecord::new("2", Some("A"), None)),
            RecordOutcome::Skipped(SkipReason::InvalidAmount)
        );
        assert_eq!(aggregator.location_count(), 0);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut aggregator = SalesAggregator::new();
        aggregator.ingest_page(&[
            OrderRecord::new("1", Some("C"), Some(5.0)),
            OrderRecord::new("2", Some("A"), Some(5.0)),
            OrderRecord::new("3", Some("B"), Some(9.0)),
            OrderRecord::new("4", Some("D"), Some(5.0)),
        ]);

        let names: Vec<String> = aggregator.finish().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn signed_zeros_tie_and_keep_input_order() {
        let sorted = sort_by_sales_desc(vec![
            entry("refunded", "-0.00"),
            entry("idle", "0.00"),
            entry("busy", "1.00"),
        ]);
        let names: Vec<&str> = sorted.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["busy", "refunded", "idle"]);
    }

    #[test]
    fn sort_compares_numerically_not_lexically() {
        let sorted = sort_by_sales_desc(vec![
            entry("small", "9.00"),
            entry("large", "100.00"),
            entry("negative", "-5.00"),
        ]);
        let names: Vec<&str> = sorted.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["large", "small", "negative"]);
    }

    #[test]
    fn output_sum_matches_valid_input_sum() {
        let orders: Vec<OrderRecord> = (0..250)
            .map(|i| {
                let location = match i % 4 {
                    0 => None,
                    1 => Some("North"),
                    2 => Some("South"),
                    _ => Some("East"),
                };
                let amount = if i % 7 == 0 { None } else { Some(i as f64 * 1.25) };
                OrderRecord::new(i.to_string(), location, amount)
            })
            .collect();
        let expected_cents: i64 = orders
            .iter()
            .filter(|o| o.location_name.is_some())
            .filter_map(|o| o.total_amount)
            .map(|amount| (amount * 100.0).round() as i64)
            .sum();

        let mut aggregator = SalesAggregator::new();
        for chunk in orders.chunks(30) {
            aggregator.ingest_page(chunk);
        }
        let result = aggregator.finish();

        assert_eq!(result.iter().map(|e| cents(&e.sales)).sum::<i64>(), expected_cents);
        for pair in result.windows(2) {
            assert!(cents(&pair[0].sales) >= cents(&pair[1].sales));
        }
    }
}
