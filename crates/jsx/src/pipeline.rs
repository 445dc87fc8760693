//! Document transformation pipeline and batch orchestration.

use crate::codegen::assemble;
use crate::legalize::legalize;
use crate::options::{OptionOverrides, Options};
use crate::renderer::{MarkupRenderer, MdastRenderer};
use cereal_core::{CerealError, Extraction, extract_metadata};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Label of the measurement covering a whole top-level call.
pub const RUN_LABEL: &str = "cereal";

/// Receives stage timings. Purely observational.
pub trait Instrumentation: Send + Sync {
    /// Called once per finished measurement.
    fn measure(&self, label: &str, elapsed: Duration);
}

/// Reports timings through the `log` facade: the whole run at info level,
/// individual stages at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogInstrumentation;

impl Instrumentation for LogInstrumentation {
    fn measure(&self, label: &str, elapsed: Duration) {
        let ms = elapsed.as_millis();
        if label == RUN_LABEL {
            log::info!("Done in {}ms.", ms);
        } else {
            log::debug!("{} finished in {}ms.", label, ms);
        }
    }
}

/// Input for batch processing - a single document to transform.
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Raw document text.
    pub source: String,
    /// Name of the generated component.
    pub component_name: String,
}

/// Result for a single document in a batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Document identifier matching the input.
    pub id: String,
    /// Component name matching the input.
    pub component_name: String,
    /// Generated module (present on success).
    pub code: Option<String>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStats {
    /// Total number of documents processed.
    pub total: u32,
    /// Number of successfully transformed documents.
    pub succeeded: u32,
    /// Number of failed documents.
    pub failed: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to the rayon global pool.
    pub max_threads: Option<usize>,
}

/// Result of batch processing: one entry per input, in input order.
#[derive(Debug, Clone)]
pub struct BatchProcessingResult {
    /// Individual results for each input document.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Turns documents into page component modules.
///
/// Holds the resolved options, the Markdown renderer and an optional
/// timing sink; reuse one transformer for any number of documents.
pub struct Transformer<R = MdastRenderer> {
    options: Options,
    renderer: R,
    instrumentation: Option<Arc<dyn Instrumentation>>,
}

impl Transformer<MdastRenderer> {
    /// Creates a transformer using the default markdown-rs renderer.
    pub fn new(options: Options) -> Self {
        Self::with_renderer(options, MdastRenderer::default())
    }
}

impl Default for Transformer<MdastRenderer> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<R: MarkupRenderer> Transformer<R> {
    /// Creates a transformer with a custom renderer.
    pub fn with_renderer(options: Options, renderer: R) -> Self {
        Self {
            options,
            renderer,
            instrumentation: None,
        }
    }

    /// Attaches a timing sink.
    pub fn with_instrumentation(mut self, instrumentation: Arc<dyn Instrumentation>) -> Self {
        self.instrumentation = Some(instrumentation);
        self
    }

    /// The options every document is transformed with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn measure(&self, label: &str, start: Instant) {
        if let Some(instrumentation) = &self.instrumentation {
            instrumentation.measure(label, start.elapsed());
        }
    }

    fn run(&self, raw: &str, component_name: &str) -> Result<String, CerealError> {
        let start = Instant::now();
        let extraction = extract_metadata(raw);
        if let Some(warning) = extraction.warning() {
            log::warn!("{}: {}", component_name, warning);
        }
        let Extraction { metadata, body } = extraction.into_value();
        self.measure("extract", start);

        let start = Instant::now();
        let markup = self.renderer.render(body)?;
        self.measure("render", start);

        let start = Instant::now();
        let markup = legalize(&markup);
        self.measure("legalize", start);

        let start = Instant::now();
        let code = assemble(&metadata, &markup, component_name, &self.options);
        self.measure("assemble", start);

        Ok(code)
    }

    /// Transforms one document, surfacing failures.
    pub fn try_transform_one(&self, raw: &str, component_name: &str) -> Result<String, CerealError> {
        let start = Instant::now();
        let result = self.run(raw, component_name);
        self.measure(RUN_LABEL, start);
        result
    }

    /// Transforms one document. On failure the error is logged and an
    /// empty string is returned.
    pub fn transform_one(&self, raw: &str, component_name: &str) -> String {
        match self.try_transform_one(raw, component_name) {
            Ok(code) => code,
            Err(err) => {
                log::error!("Failed to transform {}: {}", component_name, err);
                String::new()
            }
        }
    }

    /// Transforms many documents in parallel.
    ///
    /// Every input yields exactly one result, in input order; a failing
    /// document never stops the others.
    pub fn transform_many(
        &self,
        inputs: Vec<BatchInput>,
        options: &BatchOptions,
    ) -> BatchProcessingResult {
        let start = Instant::now();

        let pool = options.max_threads.and_then(|max_threads| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads)
                .build()
                .map_err(|err| log::warn!("Falling back to the global thread pool: {}", err))
                .ok()
        });

        let total = inputs.len() as u32;
        let succeeded = AtomicU32::new(0);
        let failed = AtomicU32::new(0);

        let process_input = |input: BatchInput| -> BatchResult {
            match self.run(&input.source, &input.component_name) {
                Ok(code) => {
                    succeeded.fetch_add(1, Ordering::Relaxed);
                    BatchResult {
                        id: input.id,
                        component_name: input.component_name,
                        code: Some(code),
                        error: None,
                    }
                }
                Err(err) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    log::error!("Failed to transform {}: {}", input.id, err);
                    BatchResult {
                        id: input.id,
                        component_name: input.component_name,
                        code: None,
                        error: Some(err.to_string()),
                    }
                }
            }
        };

        let results: Vec<BatchResult> = if let Some(pool) = pool {
            pool.install(|| inputs.into_par_iter().map(process_input).collect())
        } else {
            inputs.into_par_iter().map(process_input).collect()
        };

        let elapsed = start.elapsed();
        if let Some(instrumentation) = &self.instrumentation {
            instrumentation.measure(RUN_LABEL, elapsed);
        }

        BatchProcessingResult {
            results,
            stats: BatchStats {
                total,
                succeeded: succeeded.load(Ordering::Relaxed),
                failed: failed.load(Ordering::Relaxed),
                processing_time_ms: elapsed.as_secs_f64() * 1000.0,
            },
        }
    }
}

/// Transforms a Markdown string into a React component module.
///
/// `overrides` are layered over the defaults. Failures are logged and
/// yield an empty string.
///
/// # Examples
///
/// ```
/// use cereal_jsx::transform_markdown_string;
///
/// let code = transform_markdown_string("# Hello", "Hello", None);
/// assert!(code.contains("export default function Hello()"));
/// assert!(code.contains("<h1>Hello</h1>"));
/// ```
pub fn transform_markdown_string(
    raw: &str,
    component_name: &str,
    overrides: Option<&OptionOverrides>,
) -> String {
    Transformer::new(Options::resolve(overrides))
        .with_instrumentation(Arc::new(LogInstrumentation))
        .transform_one(raw, component_name)
}
