//! Driver stages for one harmonization run.
//!
//! Resolves reference data, discovers and reads the module files, runs the
//! core pipeline and writes every output. Library-level so integration tests
//! can drive a full run without the binary.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{debug, error, info, info_span, warn};

use tus_ingest::{
    IngestError, ReadFailure, ReadOptions, discover_module_files, list_input_files,
    read_module_inputs,
};
use tus_model::{Diagnostics, DistrictTable, ModuleKind, PipelineOptions, Severity, SurveyLayout};
use tus_report::{DEFAULT_OUTPUT_FILE, WrittenOutputs, write_outputs};
use tus_standards::{CodeMapRegistry, layout_preset, load_district_table, load_layout};
use tus_transform::{HarmonizationPipeline, PipelineOutput};

/// Where the survey layout comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Preset(String),
    File(PathBuf),
}

impl Default for LayoutSource {
    fn default() -> Self {
        LayoutSource::Preset("tus2019".to_string())
    }
}

/// Everything a run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub logs_dir: PathBuf,
    pub layout: LayoutSource,
    pub districts: Option<PathBuf>,
    pub code_maps: Option<PathBuf>,
    pub read: ReadOptions,
    pub options: PipelineOptions,
}

impl RunConfig {
    /// Defaults rooted at `input_dir`: the table and `logs/` are written
    /// next to the inputs.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        Self {
            output: input_dir.join(DEFAULT_OUTPUT_FILE),
            logs_dir: input_dir.join("logs"),
            input_dir,
            layout: LayoutSource::default(),
            districts: None,
            code_maps: None,
            read: ReadOptions::default(),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_logs_dir(mut self, logs_dir: impl Into<PathBuf>) -> Self {
        self.logs_dir = logs_dir.into();
        self
    }

    pub fn with_layout(mut self, layout: LayoutSource) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_districts(mut self, path: Option<PathBuf>) -> Self {
        self.districts = path;
        self
    }

    pub fn with_code_maps(mut self, path: Option<PathBuf>) -> Self {
        self.code_maps = path;
        self
    }

    pub fn with_read_options(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunResult {
    pub layout_name: String,
    pub output: PipelineOutput,
    pub written: WrittenOutputs,
    /// Files in the input folder that no module claimed.
    pub unassigned: Vec<PathBuf>,
    pub read_failures: Vec<ReadFailure>,
}

impl RunResult {
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.output.diagnostics
    }
}

/// Run the whole harmonization for `config`.
///
/// Fails only when no output can be produced: unreadable configuration or
/// reference data, no readable module files, or an unwritable output.
/// Every other degradation is carried in the returned diagnostics.
pub fn run_harmonization(config: &RunConfig) -> Result<RunResult> {
    let span = info_span!("run", input = %config.input_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    // Stage 1: reference data
    let layout = resolve_layout(&config.layout)?;
    let registry = resolve_registry(config.code_maps.as_deref())?;
    let districts = resolve_districts(config.districts.as_deref(), &layout)?;

    // Stage 2: discovery and reading
    let files = list_input_files(&config.input_dir)
        .with_context(|| format!("list input files in {}", config.input_dir.display()))?;
    let discovery = discover_module_files(&files, &layout);
    if discovery.is_empty() {
        return Err(IngestError::NoInputFiles {
            path: config.input_dir.clone(),
        })
        .context("discover survey modules");
    }
    for path in &discovery.unassigned {
        debug!(file = %path.display(), "file matches no module");
    }
    info!(
        files = discovery.file_count(),
        unassigned = discovery.unassigned.len(),
        superseded = discovery.superseded.len(),
        "discovered module files"
    );

    let report = read_module_inputs(&discovery, &config.read);
    if report.inputs.is_empty() {
        bail!(
            "none of the {} module files in {} could be read",
            discovery.file_count(),
            config.input_dir.display()
        );
    }

    // Stage 3: harmonization
    let layout_name = layout.name.clone();
    let mut pipeline =
        HarmonizationPipeline::new(layout, registry).with_options(config.options.clone());
    if let Some(table) = districts {
        pipeline = pipeline.with_district_table(table);
    }
    let output = pipeline
        .run(report.inputs)
        .context("harmonize survey modules")?;
    mirror_diagnostics(&output.diagnostics);

    // Stage 4: outputs
    let written = write_outputs(&output, &config.output, &config.logs_dir)
        .with_context(|| format!("write outputs to {}", config.output.display()))?;

    info!(
        rows = output.table.height(),
        columns = output.table.width(),
        output = %written.table.display(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );

    Ok(RunResult {
        layout_name,
        output,
        written,
        unassigned: discovery.unassigned,
        read_failures: report.failures,
    })
}

fn resolve_layout(source: &LayoutSource) -> Result<SurveyLayout> {
    match source {
        LayoutSource::Preset(name) => {
            layout_preset(name).with_context(|| format!("load layout preset {name}"))
        }
        LayoutSource::File(path) => {
            load_layout(path).with_context(|| format!("load layout {}", path.display()))
        }
    }
}

fn resolve_registry(overrides: Option<&Path>) -> Result<CodeMapRegistry> {
    let mut registry = CodeMapRegistry::builtin();
    if let Some(path) = overrides {
        let merged = registry
            .load_overrides(path)
            .with_context(|| format!("load code map overrides {}", path.display()))?;
        debug!(path = %path.display(), merged, "code map overrides applied");
    }
    Ok(registry)
}

fn resolve_districts(path: Option<&Path>, layout: &SurveyLayout) -> Result<Option<DistrictTable>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let Some(geo) = &layout.geography else {
        warn!(
            layout = %layout.name,
            path = %path.display(),
            "layout has no geography; district reference ignored"
        );
        return Ok(None);
    };
    load_district_table(path, geo)
        .map(Some)
        .with_context(|| format!("load district reference {}", path.display()))
}

/// Re-emit collected diagnostics as tracing events at their severity.
fn mirror_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        let module = diagnostic
            .module
            .as_ref()
            .map_or("-", ModuleKind::as_str);
        let column = diagnostic.column.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Info => info!(
                stage = %diagnostic.stage,
                kind = diagnostic.kind.as_str(),
                module,
                column,
                "{}",
                diagnostic.message
            ),
            Severity::Warning => warn!(
                stage = %diagnostic.stage,
                kind = diagnostic.kind.as_str(),
                module,
                column,
                "{}",
                diagnostic.message
            ),
            Severity::Error => error!(
                stage = %diagnostic.stage,
                kind = diagnostic.kind.as_str(),
                module,
                column,
                "{}",
                diagnostic.message
            ),
        }
    }
}
