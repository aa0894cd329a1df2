use crate::planner::Batch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use testforge_extractor::{BlockRecord, Language};
use thiserror::Error;

/// Opaque text produced by the external generation service; the core never
/// inspects its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText(pub String);

/// Failure from the external dispatch collaborator
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The collaborator rejected or failed the batch
    #[error("dispatch failed: {0}")]
    Failed(String),

    /// Transport-level problem reaching the collaborator
    #[error("transport error: {0}")]
    Transport(String),
}

/// External collaborator that consumes one batch and produces content
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Process one batch for the given language
    async fn dispatch(
        &self,
        batch: &Batch,
        language: Language,
    ) -> Result<GeneratedText, DispatchError>;
}

/// Outcome of driving all batches through a dispatcher
#[derive(Debug)]
pub struct DispatchReport {
    /// Successful outputs, ordered by batch index
    pub outputs: Vec<(usize, GeneratedText)>,

    /// Failures, ordered by batch index
    pub failures: Vec<(usize, DispatchError)>,
}

impl DispatchReport {
    /// True when every batch produced output
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Concatenated output text, batch order preserved
    #[must_use]
    pub fn concatenated(&self) -> String {
        let mut out = String::new();
        for (_, text) in &self.outputs {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&text.0);
        }
        out
    }
}

/// Hand batches to the dispatcher strictly in order.
///
/// Batches are independent units of work: a failed batch is recorded and the
/// remaining batches are still attempted, so a run can finish with partial
/// success instead of aborting. Output ordering always reflects input batch
/// order.
pub async fn dispatch_all(
    dispatcher: &dyn Dispatcher,
    batches: &[Batch],
    language: Language,
) -> DispatchReport {
    let mut report = DispatchReport {
        outputs: Vec::new(),
        failures: Vec::new(),
    };

    for (idx, batch) in batches.iter().enumerate() {
        log::info!(
            "dispatching batch {}/{} ({} record(s), ~{} tokens)",
            idx + 1,
            batches.len(),
            batch.len(),
            batch.estimated_tokens
        );
        match dispatcher.dispatch(batch, language).await {
            Ok(text) => report.outputs.push((idx, text)),
            Err(err) => {
                log::warn!("batch {} failed: {err}", idx + 1);
                report.failures.push((idx, err));
            }
        }
    }

    report
}

/// Derive the output artifact name for a group of records.
///
/// The module name is the first record's `block_id` minus its trailing
/// `_<index>` suffix; a `class_context` anywhere in the group takes precedence
/// over the module-derived name.
#[must_use]
pub fn test_artifact_name(records: &[BlockRecord], language: Language) -> String {
    let ext = language.artifact_extension();

    let Some(first) = records.first() else {
        return format!("test_generated.{ext}");
    };

    if let Some(class_name) = records.iter().find_map(|r| r.class_context.as_deref()) {
        return format!("test_{class_name}.{ext}");
    }

    let module = first.module_name();
    let stem = module.rsplit_once('.').map_or(module, |(stem, _)| stem);
    format!("test_{stem}.{ext}")
}
