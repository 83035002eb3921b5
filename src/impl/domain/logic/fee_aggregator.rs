use crate::entities::{CategoryTotals, VisaCategory, WorkRecord};

/// Sums fee amounts per visa category, split by payment status.
pub(crate) struct FeeAggregator<'a> {
    records: &'a [WorkRecord],
    restrict_to_paid: bool,
}

impl<'a> FeeAggregator<'a> {
    pub(crate) fn new(records: &'a [WorkRecord], restrict_to_paid: bool) -> Self {
        Self {
            records,
            restrict_to_paid,
        }
    }

    pub(crate) fn process(self) -> CategoryTotals {
        let mut totals = CategoryTotals::default();
        for record in self.records {
            if self.restrict_to_paid && !record.is_paid() {
                continue;
            }
            for category in VisaCategory::ALL {
                // Blank and non-numeric amounts contribute nothing.
                let Some(amount) = record.fee(category) else {
                    continue;
                };
                let entry = totals.0.entry(category).or_default();
                entry.total += amount;
                if record.is_paid() {
                    entry.paid += amount;
                } else {
                    entry.unpaid += amount;
                }
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::fixtures::{date, paid_on, record},
        entities::{CategoryTotal, FeeAmount, VisaCategory::*},
    };

    use super::*;

    #[test]
    fn empty_input_yields_all_categories_at_zero() {
        let totals = FeeAggregator::new(&[], false).process();
        assert_eq!(totals.iter().count(), 4);
        for (_, t) in totals.iter() {
            assert_eq!(t, CategoryTotal::default());
        }
    }

    #[test]
    fn splits_paid_and_unpaid() {
        let records = vec![
            paid_on(record(1, &[(Gas, 1000.0), (Salubridad, 200.0)]), date(2024, 3, 1)),
            record(2, &[(Gas, 500.0)]),
            record(3, &[(Electromecanica, 50.5)]),
        ];
        let totals = FeeAggregator::new(&records, false).process();
        assert_eq!(
            totals.get(Gas),
            CategoryTotal {
                total: 1500.0,
                paid: 1000.0,
                unpaid: 500.0
            }
        );
        assert_eq!(totals.get(Salubridad).paid, 200.0);
        assert_eq!(totals.get(Electrica), CategoryTotal::default());
        assert_eq!(totals.get(Electromecanica).unpaid, 50.5);
    }

    #[test]
    fn restrict_to_paid_skips_unpaid_records() {
        let records = vec![
            paid_on(record(1, &[(Electrica, 300.0)]), date(2024, 3, 1)),
            record(2, &[(Electrica, 700.0)]),
        ];
        let totals = FeeAggregator::new(&records, true).process();
        assert_eq!(
            totals.get(Electrica),
            CategoryTotal {
                total: 300.0,
                paid: 300.0,
                unpaid: 0.0
            }
        );
    }

    #[test]
    fn unparseable_amounts_are_skipped() {
        let mut r = paid_on(record(1, &[(Salubridad, 100.0)]), date(2024, 3, 1));
        r.fee_amounts
            .insert(Gas, FeeAmount::Unparseable("s/d".to_string()));
        let totals = FeeAggregator::new(&[r], true).process();
        assert_eq!(totals.get(Gas), CategoryTotal::default());
        assert_eq!(totals.get(Salubridad).paid, 100.0);
    }
}
