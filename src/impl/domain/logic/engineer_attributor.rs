use std::collections::BTreeMap;

use crate::entities::{CategoryTotals, EngineerRouting, EngineerTotal, SplitRule};

/// Attributes paid category totals to the engineer owning each category and
/// splits every engineer's gross between the consejo and the engineer.
pub(crate) struct EngineerAttributor<'a> {
    routing: &'a EngineerRouting,
    split: &'a SplitRule,
}

impl<'a> EngineerAttributor<'a> {
    pub(crate) fn new(routing: &'a EngineerRouting, split: &'a SplitRule) -> Self {
        Self { routing, split }
    }

    pub(crate) fn process(
        &self,
        category_totals_paid: &CategoryTotals,
    ) -> BTreeMap<String, EngineerTotal> {
        self.routing
            .assignments()
            .iter()
            .map(|assignment| {
                let gross: f64 = assignment
                    .categories
                    .iter()
                    .map(|c| category_totals_paid.get(*c).paid)
                    .sum();
                let (consejo_share, engineer_share) = self.split.split(gross);
                (
                    assignment.name.clone(),
                    EngineerTotal {
                        gross,
                        consejo_share,
                        engineer_share,
                        categories: assignment.categories.clone(),
                    },
                )
            })
            .collect()
    }
}
