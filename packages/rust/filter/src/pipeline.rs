//! Ordered chain of preprocessors, run the way an exporter runs them.

use hidecode_shared::{AppConfig, HideCodeError, Notebook, Resources, Result};
use tracing::{debug, info, instrument};

use crate::{HideCodePreprocessor, Preprocessor};

/// Outcome of one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Step name as reported by [`Preprocessor::name`].
    pub name: String,
    /// Cells the step removed (zero if it only rewrote cells or added some).
    pub cells_removed: usize,
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub cells_before: usize,
    pub cells_after: usize,
    pub steps: Vec<StepReport>,
}

/// Preprocessors applied in insertion order to one notebook at a time.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Preprocessor>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline holding only the hide-code filter built from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new().with(HideCodePreprocessor::from_config(config)?))
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, step: impl Preprocessor + 'static) -> Self {
        self.push(step);
        self
    }

    /// Append a step.
    pub fn push(&mut self, step: impl Preprocessor + 'static) {
        self.steps.push(Box::new(step));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the steps in run order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step over `nb`, stopping at the first failure.
    ///
    /// The notebook's format version is checked before any step runs. A
    /// failing step's error is reported as [`HideCodeError::Preprocess`]
    /// naming the step.
    #[instrument(skip_all, fields(steps = self.steps.len(), cells = nb.cells.len()))]
    pub fn run(&self, nb: &mut Notebook, resources: &mut Resources) -> Result<PipelineReport> {
        nb.validate()?;

        let cells_before = nb.cells.len();
        let mut steps = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let before = nb.cells.len();
            step.preprocess(nb, resources).map_err(|e| match e {
                HideCodeError::Preprocess { .. } => e,
                other => HideCodeError::preprocess(step.name(), other.to_string()),
            })?;

            let cells_removed = before.saturating_sub(nb.cells.len());
            debug!(step = step.name(), cells_removed, "step complete");
            steps.push(StepReport {
                name: step.name().to_string(),
                cells_removed,
            });
        }

        info!(cells_before, cells_after = nb.cells.len(), "pipeline complete");

        Ok(PipelineReport {
            cells_before,
            cells_after: nb.cells.len(),
            steps,
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hidecode_shared::Cell;
    use serde_json::json;

    struct Failing;

    impl Preprocessor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn preprocess(&self, _nb: &mut Notebook, _resources: &mut Resources) -> Result<()> {
            Err(HideCodeError::validation("bad cell"))
        }
    }

    /// Inserts an empty code cell at the front.
    struct PrependEmpty;

    impl Preprocessor for PrependEmpty {
        fn name(&self) -> &str {
            "prepend-empty"
        }

        fn preprocess(&self, nb: &mut Notebook, _resources: &mut Resources) -> Result<()> {
            nb.cells.insert(0, Cell::code(""));
            Ok(())
        }
    }

    fn sample() -> Notebook {
        Notebook::new(vec![
            Cell::markdown("# Report"),
            Cell::code("load()").with_metadata("hideCode", json!(true)),
            Cell::code(""),
        ])
    }

    #[test]
    fn from_config_runs_hide_code() {
        let pipeline = Pipeline::from_config(&AppConfig::default()).expect("pipeline");
        assert_eq!(pipeline.step_names(), ["hide-code"]);

        let mut nb = sample();
        let mut resources = Resources::new();
        let report = pipeline.run(&mut nb, &mut resources).expect("run");

        assert_eq!(report.cells_before, 3);
        assert_eq!(report.cells_after, 1);
        assert_eq!(report.steps[0].cells_removed, 2);
        assert_eq!(nb.cells[0].source, "# Report");
    }

    #[test]
    fn steps_run_in_insertion_order() {
        let pipeline = Pipeline::new()
            .with(PrependEmpty)
            .with(HideCodePreprocessor::default());

        let mut nb = Notebook::new(vec![Cell::markdown("only")]);
        let report = pipeline
            .run(&mut nb, &mut Resources::new())
            .expect("run");

        assert_eq!(nb.cells.len(), 1);
        assert_eq!(report.steps[0].cells_removed, 0);
        assert_eq!(report.steps[1].cells_removed, 1);
    }

    #[test]
    fn failing_step_is_named_and_stops_the_run() {
        let pipeline = Pipeline::new()
            .with(Failing)
            .with(HideCodePreprocessor::default());

        let mut nb = sample();
        let err = pipeline.run(&mut nb, &mut Resources::new()).unwrap_err();

        assert!(matches!(err, HideCodeError::Preprocess { ref step, .. } if step == "failing"));
        assert!(err.to_string().contains("bad cell"));
        assert_eq!(nb.cells.len(), 3, "later steps must not run");
    }

    #[test]
    fn unsupported_format_is_rejected_before_any_step() {
        let pipeline = Pipeline::new().with(PrependEmpty);
        let mut nb = sample();
        nb.nbformat = 3;

        let err = pipeline.run(&mut nb, &mut Resources::new()).unwrap_err();
        assert!(matches!(err, HideCodeError::Validation { .. }));
        assert_eq!(nb.cells.len(), 3);
    }

    #[test]
    fn empty_pipeline_is_a_no_op() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());

        let original = sample();
        let mut nb = original.clone();
        let report = pipeline.run(&mut nb, &mut Resources::new()).expect("run");

        assert!(report.steps.is_empty());
        assert_eq!(nb, original);
    }
}
