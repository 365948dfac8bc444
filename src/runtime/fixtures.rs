//! Conformance fixture runner
//!
//! Feeds every fixture input of a block through `execute` and compares the
//! emitted events, in order, with the expected ones.

use crate::core::block::{Block, BlockError, ExecutionContext};
use crate::core::output::OutputEvent;

/// Fixture run failures
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// Block failed instead of producing events
    #[error("fixture {index} of '{block}' failed: {source}")]
    Failed {
        block: String,
        index: usize,
        #[source]
        source: BlockError,
    },

    /// Events differ from the expected sequence
    #[error("fixture {index} of '{block}' emitted {actual:?}, expected {expected:?}")]
    Mismatch {
        block: String,
        index: usize,
        expected: Vec<OutputEvent>,
        actual: Vec<OutputEvent>,
    },
}

/// Run every fixture of `block`, returning how many passed
pub async fn run_fixtures(block: &dyn Block, context: &ExecutionContext) -> Result<usize, FixtureError> {
    let meta = block.metadata();

    for (index, fixture) in meta.fixtures.iter().enumerate() {
        let actual = block
            .execute(&fixture.input, context)
            .await
            .map_err(|source| FixtureError::Failed {
                block: meta.name.clone(),
                index,
                source,
            })?
            .collect_events();

        if actual != fixture.expected {
            return Err(FixtureError::Mismatch {
                block: meta.name.clone(),
                index,
                expected: fixture.expected.clone(),
                actual,
            });
        }
    }

    tracing::debug!(block = %meta.name, fixtures = meta.fixtures.len(), "fixtures passed");
    Ok(meta.fixtures.len())
}
