//! The hide-code preprocessor.
//!
//! Blanks the source of cells flagged as hidden, optionally clears their
//! prompt numbers, then drops code cells left with nothing to show.

use hidecode_shared::{AppConfig, Cell, HideCodeConfig, Notebook, Resources, Result};
use tracing::{debug, instrument, trace};

use crate::Preprocessor;
use crate::passes;

/// Counts of what one run of the filter changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Cells whose source text was removed.
    pub sources_blanked: usize,
    /// Cells whose prompt numbers were cleared.
    pub prompts_cleared: usize,
    /// Empty code cells removed from the notebook.
    pub cells_dropped: usize,
}

/// Strips hidden code and empty code cells before export.
#[derive(Debug, Clone, Default)]
pub struct HideCodePreprocessor {
    config: HideCodeConfig,
}

impl HideCodePreprocessor {
    /// Create a preprocessor with the given options.
    pub fn new(config: HideCodeConfig) -> Self {
        Self { config }
    }

    /// Create a preprocessor from a loaded config, validating it first.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.hide_code.clone()))
    }

    /// Options in effect.
    pub fn config(&self) -> &HideCodeConfig {
        &self.config
    }

    /// Apply the per-cell passes to one cell and report what changed.
    fn transform_cell(&self, cell: &mut Cell, stats: &mut FilterStats) {
        if passes::blank_hidden_source(cell, &self.config.hide_code_key) {
            stats.sources_blanked += 1;
        }
        if self.config.hide_prompt
            && passes::clear_hidden_prompt(cell, &self.config.hide_prompt_key)
        {
            stats.prompts_cleared += 1;
        }
    }

    /// Run the filter over a whole notebook and return the counts.
    ///
    /// Cells are transformed in document order first; empty code cells are
    /// removed afterwards so a cell blanked by the first step is dropped
    /// unless it still has outputs.
    #[instrument(skip_all, fields(cells = nb.cells.len()))]
    pub fn apply(&self, nb: &mut Notebook) -> FilterStats {
        let mut stats = FilterStats::default();

        if !self.config.enabled {
            debug!("hide-code filter disabled, notebook left unchanged");
            return stats;
        }

        for (index, cell) in nb.cells.iter_mut().enumerate() {
            trace!(index, cell_type = %cell.cell_type, "transforming cell");
            self.transform_cell(cell, &mut stats);
        }

        if self.config.drop_empty_code_cells {
            stats.cells_dropped = passes::drop_empty_code_cells(&mut nb.cells);
        }

        debug!(
            sources_blanked = stats.sources_blanked,
            prompts_cleared = stats.prompts_cleared,
            cells_dropped = stats.cells_dropped,
            remaining = nb.cells.len(),
            "hide-code filter complete"
        );

        stats
    }
}

impl Preprocessor for HideCodePreprocessor {
    fn name(&self) -> &str {
        "hide-code"
    }

    fn preprocess_cell(
        &self,
        cell: &mut Cell,
        _resources: &mut Resources,
        index: usize,
    ) -> Result<()> {
        if self.config.enabled {
            trace!(index, cell_type = %cell.cell_type, "transforming cell");
            self.transform_cell(cell, &mut FilterStats::default());
        }
        Ok(())
    }

    fn preprocess(&self, nb: &mut Notebook, _resources: &mut Resources) -> Result<()> {
        self.apply(nb);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
