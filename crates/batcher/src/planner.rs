use crate::estimator::TokenEstimator;
use serde::{Deserialize, Serialize};
use testforge_extractor::BlockRecord;

/// Configuration for batch planning behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum cumulative token weight per batch (hard ceiling, except for
    /// single records that alone exceed it)
    pub max_tokens_per_batch: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_batch: 195_000,
        }
    }
}

impl PlannerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens_per_batch == 0 {
            return Err("max_tokens_per_batch must be > 0".to_string());
        }
        Ok(())
    }
}

/// A weight-bounded, ordered group of block records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Batch {
    /// Records in discovery order
    pub records: Vec<BlockRecord>,

    /// Cumulative estimated token weight of the serialized records
    pub estimated_tokens: usize,
}

impl Batch {
    /// Number of records in this batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the batch holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Block ids of the contained records, in order
    #[must_use]
    pub fn record_ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.block_id.as_str()).collect()
    }
}

/// Packs an ordered record sequence into weight-bounded batches.
///
/// Greedy, single pass, order-preserving: first-fit-append-or-flush, not
/// optimal bin packing. Batch order always matches record discovery order.
pub struct BatchPlanner {
    config: PlannerConfig,
    estimator: TokenEstimator,
}

impl BatchPlanner {
    /// Create a new planner with configuration
    #[must_use]
    pub fn new(config: PlannerConfig) -> Self {
        config
            .validate()
            .expect("Invalid planner configuration provided");
        Self {
            config,
            estimator: TokenEstimator::new(),
        }
    }

    /// Partition `records` into batches, weighing each record by the token
    /// count of its canonical JSON form
    #[must_use]
    pub fn plan(&self, records: Vec<BlockRecord>) -> Vec<Batch> {
        let estimator = self.estimator;
        self.plan_with(records, |record| {
            let text = serde_json::to_string(record).unwrap_or_default();
            estimator.count(&text)
        })
    }

    /// Partition `records` using an explicit weigher.
    ///
    /// A record whose weight alone exceeds the ceiling flushes the in-progress
    /// batch and is emitted as its own one-record batch; that is the only case
    /// where a returned batch may exceed the ceiling.
    pub fn plan_with<F>(&self, records: Vec<BlockRecord>, weigh: F) -> Vec<Batch>
    where
        F: Fn(&BlockRecord) -> usize,
    {
        let max_tokens = self.config.max_tokens_per_batch;

        let mut batches = Vec::new();
        let mut current = Vec::new();
        let mut current_tokens = 0usize;

        for record in records {
            let weight = weigh(&record);

            if weight > max_tokens {
                // This single record doesn't fit in the budget.
                if !current.is_empty() {
                    batches.push(Batch {
                        records: std::mem::take(&mut current),
                        estimated_tokens: current_tokens,
                    });
                    current_tokens = 0;
                }
                log::warn!(
                    "block {} weighs {weight} tokens, over the {max_tokens} ceiling; emitting it alone",
                    record.block_id
                );
                batches.push(Batch {
                    records: vec![record],
                    estimated_tokens: weight,
                });
                continue;
            }

            if !current.is_empty() && current_tokens + weight > max_tokens {
                batches.push(Batch {
                    records: std::mem::take(&mut current),
                    estimated_tokens: current_tokens,
                });
                current_tokens = 0;
            }

            current.push(record);
            current_tokens += weight;
        }

        if !current.is_empty() {
            batches.push(Batch {
                records: current,
                estimated_tokens: current_tokens,
            });
        }

        batches
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}
