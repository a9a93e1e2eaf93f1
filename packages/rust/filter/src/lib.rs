//! Notebook preprocessors that hide code before export.
//!
//! A host conversion pipeline hands each [`Preprocessor`] the notebook and its
//! resources map in turn. [`HideCodePreprocessor`] blanks the source of cells
//! flagged as hidden and removes code cells left empty; [`Pipeline`] chains
//! several preprocessors the way an exporter does.

mod hide_code;
mod passes;
mod pipeline;

use hidecode_shared::{Cell, Notebook, Resources, Result};

pub use hide_code::{FilterStats, HideCodePreprocessor};
pub use passes::is_empty_code_cell;
pub use pipeline::{Pipeline, PipelineReport, StepReport};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A notebook transformation step run by the host before rendering.
///
/// Implementors override [`preprocess_cell`](Preprocessor::preprocess_cell)
/// for per-cell work, or [`preprocess`](Preprocessor::preprocess) when they
/// need the whole document (to drop or reorder cells, for instance).
pub trait Preprocessor: Send + Sync {
    /// Human-readable step name for tracing and error reports.
    fn name(&self) -> &str;

    /// Transform one cell. `index` is the cell's position in the notebook.
    fn preprocess_cell(
        &self,
        _cell: &mut Cell,
        _resources: &mut Resources,
        _index: usize,
    ) -> Result<()> {
        Ok(())
    }

    /// Transform the whole notebook. Defaults to calling
    /// [`preprocess_cell`](Preprocessor::preprocess_cell) on every cell in order.
    fn preprocess(&self, nb: &mut Notebook, resources: &mut Resources) -> Result<()> {
        for (index, cell) in nb.cells.iter_mut().enumerate() {
            self.preprocess_cell(cell, resources, index)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
