//! Point-in-time snapshots of balances and metrics.
//!
//! Snapshots are constructed only by the test manager and are immutable once
//! built; resolvers read from them through [`Snapshot::balances`] and
//! [`Snapshot::get`]. A missing entry is a lookup error, distinct from an
//! invariant violation.

use std::collections::BTreeMap;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// A named metric value: either an amount or a boolean flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricValue {
    Amount(U256),
    Flag(bool),
}

/// Immutable record of named balances and named metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// token label -> holder label -> amount
    balances: BTreeMap<String, BTreeMap<String, U256>>,
    /// dotted path -> value
    metrics: BTreeMap<String, MetricValue>,
}

impl Snapshot {
    /// Balance of `holder` in `token`, by label.
    pub fn balances(&self, token: &str, holder: &str) -> Result<U256> {
        self.balances
            .get(token)
            .and_then(|holders| holders.get(holder).copied())
            .ok_or_else(|| HarnessError::MissingBalance {
                token: token.to_string(),
                holder: holder.to_string(),
            })
    }

    /// Metric at a dotted path, e.g. `sett.pricePerFullShare`.
    pub fn get(&self, path: &str) -> Result<MetricValue> {
        self.metrics
            .get(path)
            .copied()
            .ok_or_else(|| HarnessError::MissingMetric {
                path: path.to_string(),
            })
    }

    /// Amount metric at a dotted path.
    pub fn amount(&self, path: &str) -> Result<U256> {
        match self.get(path)? {
            MetricValue::Amount(value) => Ok(value),
            MetricValue::Flag(_) => Err(HarnessError::MetricType {
                path: path.to_string(),
                expected: "amount",
            }),
        }
    }

    /// Boolean metric at a dotted path.
    pub fn flag(&self, path: &str) -> Result<bool> {
        match self.get(path)? {
            MetricValue::Flag(value) => Ok(value),
            MetricValue::Amount(_) => Err(HarnessError::MetricType {
                path: path.to_string(),
                expected: "flag",
            }),
        }
    }

    /// Entries that changed between `self` (before) and `after`.
    /// Used for compare diagnostics after an operation.
    pub fn changes(&self, after: &Snapshot) -> Vec<Change> {
        let mut changes = Vec::new();

        for (token, holders) in &self.balances {
            for (holder, before) in holders {
                let after_value = after
                    .balances(token, holder)
                    .unwrap_or(U256::ZERO);
                if after_value != *before {
                    changes.push(Change {
                        name: format!("balances({token}, {holder})"),
                        before: MetricValue::Amount(*before),
                        after: MetricValue::Amount(after_value),
                    });
                }
            }
        }

        for (path, before) in &self.metrics {
            if let Ok(after_value) = after.get(path) {
                if after_value != *before {
                    changes.push(Change {
                        name: path.clone(),
                        before: *before,
                        after: after_value,
                    });
                }
            }
        }

        changes
    }
}

/// A single changed entry between two snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct Change {
    pub name: String,
    pub before: MetricValue,
    pub after: MetricValue,
}

/// Builder used by the manager while reading chain state.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a balance for a token/holder label pair.
    pub fn balance(&mut self, token: &str, holder: &str, amount: U256) -> &mut Self {
        self.snapshot
            .balances
            .entry(token.to_string())
            .or_default()
            .insert(holder.to_string(), amount);
        self
    }

    /// Record a metric at a dotted path.
    pub fn metric(&mut self, path: &str, value: MetricValue) -> &mut Self {
        self.snapshot.metrics.insert(path.to_string(), value);
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut builder = SnapshotBuilder::new();
        builder
            .balance("want", "aToken", U256::from(100))
            .balance("want", "strategist", U256::from(5))
            .metric("sett.pricePerFullShare", MetricValue::Amount(U256::from(2)))
            .metric("strategy.isTendable", MetricValue::Flag(true));
        builder.build()
    }

    #[test]
    fn test_balance_lookup() {
        let snapshot = sample();
        assert_eq!(
            snapshot.balances("want", "aToken").unwrap(),
            U256::from(100)
        );
        assert!(matches!(
            snapshot.balances("want", "governanceRewards"),
            Err(HarnessError::MissingBalance { .. })
        ));
    }

    #[test]
    fn test_metric_lookup_and_kinds() {
        let snapshot = sample();
        assert_eq!(
            snapshot.amount("sett.pricePerFullShare").unwrap(),
            U256::from(2)
        );
        assert!(snapshot.flag("strategy.isTendable").unwrap());
        assert!(matches!(
            snapshot.amount("strategy.isTendable"),
            Err(HarnessError::MetricType { .. })
        ));
        assert!(matches!(
            snapshot.get("strategy.balanceOf"),
            Err(HarnessError::MissingMetric { .. })
        ));
    }

    #[test]
    fn test_changes_lists_only_moved_entries() {
        let before = sample();
        let mut builder = SnapshotBuilder::new();
        builder
            .balance("want", "aToken", U256::from(150))
            .balance("want", "strategist", U256::from(5))
            .metric("sett.pricePerFullShare", MetricValue::Amount(U256::from(2)))
            .metric("strategy.isTendable", MetricValue::Flag(false));
        let after = builder.build();

        let changes = before.changes(&after);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().any(|c| c.name == "balances(want, aToken)"));
        assert!(changes.iter().any(|c| c.name == "strategy.isTendable"));
    }
}
