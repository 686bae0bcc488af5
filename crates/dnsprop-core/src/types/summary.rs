use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::{ResolveResult, Status};

/// Propagation overview across one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of results
    pub total: usize,

    /// Results per status string
    pub by_status: BTreeMap<String, usize>,

    /// Distinct answer sets among `ok` results (order-insensitive)
    pub distinct_answer_sets: usize,

    /// Resolvers that answered `ok`
    pub ok: usize,

    /// `ok` resolvers holding the expected value, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching: Option<usize>,
}

impl Summary {
    /// Summarise a result list, optionally checking for an expected value.
    #[must_use]
    pub fn from_results(results: &[ResolveResult], expected: Option<&str>) -> Self {
        let mut by_status = BTreeMap::new();
        let mut answer_sets = BTreeSet::new();
        let mut ok = 0;
        let mut matching = 0;

        for result in results {
            *by_status.entry(result.status.to_string()).or_insert(0) += 1;
            if result.status != Status::Ok {
                continue;
            }
            ok += 1;

            let mut values: Vec<String> = result
                .answers
                .iter()
                .map(|a| a.value.to_ascii_lowercase())
                .collect();
            values.sort_unstable();
            answer_sets.insert(values);

            if let Some(expected) = expected {
                if result.answers.iter().any(|a| a.matches(expected)) {
                    matching += 1;
                }
            }
        }

        Self {
            total: results.len(),
            by_status,
            distinct_answer_sets: answer_sets.len(),
            ok,
            matching: expected.map(|_| matching),
        }
    }

    /// Every `ok` resolver reports the expected value, and at least one does.
    ///
    /// Without an expected value: every `ok` resolver agrees on one answer set.
    #[must_use]
    pub fn is_propagated(&self) -> bool {
        match self.matching {
            Some(matching) => self.ok > 0 && matching == self.ok,
            None => self.ok > 0 && self.distinct_answer_sets == 1,
        }
    }
}
