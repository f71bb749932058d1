//! Harmonization pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Normalize**: subset each file part and resolve column aliases
//! 2. **Identifiers**: synthesize the household id for every part
//! 3. **Concat**: stack the parts of each module, harmonizing drift
//! 4. **Module rules**: select columns, synthesize the person id, resolve
//!    districts and run the enrichment plan
//! 5. **Join**: link modules on household and person ids
//! 6. **Projection**: analytic renames, dropped columns and column order
//!
//! Stages 1 to 4 run independently per module, optionally on a worker pool.
//! Joins and projection run once all modules are ready.

use std::collections::BTreeMap;
use std::time::Instant;

use polars::prelude::{DataFrame, PolarsResult};
use rayon::ThreadPoolBuilder;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, info_span};
use tus_model::{
    Diagnostic, DiagnosticKind, Diagnostics, DistrictKey, DistrictTable, DuplicateDistrictKey,
    ModuleKind, ModuleLayout, PipelineOptions, Severity, Stage, SurveyLayout,
};
use tus_standards::CodeMapRegistry;

use crate::error::{Result, TransformError};
use crate::frame::{ModuleFrame, ModuleFrameMeta, ModuleInput, SourcePart};
use crate::harmonize::{concat_parts, left_join};
use crate::identifiers::{compute_household_id, compute_person_id, find_duplicate_ids};
use crate::mapping::{apply_enrichment_plan, map_district};
use crate::normalize::{drop_columns, normalize_part, rename_columns, select_available};
use crate::projection::project_columns;

/// Ids listed in a duplicate-id diagnostic before the message is truncated.
const MAX_LISTED_IDS: usize = 5;

/// Geographic reference anomalies kept for the audit logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistrictAudit {
    /// Composite keys repeated in the reference table.
    pub duplicates: Vec<DuplicateDistrictKey>,
    /// Composite keys in the data with no reference entry.
    pub unresolved: Vec<DistrictKey>,
}

/// What one module contributed to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    pub kind: ModuleKind,
    /// Parts whose rows made it into the module table.
    pub parts: usize,
    pub rows: usize,
    /// Parts left out.
    pub dropped: Vec<String>,
}

impl ModuleSummary {
    /// True when the module produced no table at all.
    pub fn is_excluded(&self) -> bool {
        self.parts == 0
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The merged and projected table.
    pub table: DataFrame,
    pub diagnostics: Diagnostics,
    pub district_audit: DistrictAudit,
    /// Per-module summaries in module order.
    pub modules: Vec<ModuleSummary>,
}

/// Result of the per-module stages.
struct PreparedModule {
    kind: ModuleKind,
    frame: Option<ModuleFrame>,
    diagnostics: Diagnostics,
    unresolved: Vec<DistrictKey>,
    /// Parts left out of a module that produced no frame.
    dropped: Vec<String>,
}

impl PreparedModule {
    fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            kind: self.kind,
            parts: self
                .frame
                .as_ref()
                .map_or(0, |frame| frame.source_parts().len()),
            rows: self.frame.as_ref().map_or(0, ModuleFrame::record_count),
            dropped: self
                .frame
                .as_ref()
                .map_or(self.dropped.as_slice(), ModuleFrame::dropped_parts)
                .to_vec(),
        }
    }
}

/// One configured harmonization run over a survey round.
#[derive(Debug, Clone)]
pub struct HarmonizationPipeline {
    layout: SurveyLayout,
    registry: CodeMapRegistry,
    districts: Option<DistrictTable>,
    options: PipelineOptions,
}

impl HarmonizationPipeline {
    pub fn new(layout: SurveyLayout, registry: CodeMapRegistry) -> Self {
        Self {
            layout,
            registry,
            districts: None,
            options: PipelineOptions::default(),
        }
    }

    #[must_use]
    pub fn with_district_table(mut self, table: DistrictTable) -> Self {
        self.districts = Some(table);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn layout(&self) -> &SurveyLayout {
        &self.layout
    }

    /// Run every stage over the given module inputs.
    ///
    /// Only an invalid layout, a worker pool that cannot start, or a run in
    /// which no module produced a table is an error. Everything else is
    /// recorded in the output diagnostics.
    pub fn run(&self, inputs: Vec<ModuleInput>) -> Result<PipelineOutput> {
        self.layout.validate()?;
        let run_span = info_span!("harmonize", layout = %self.layout.name);
        let _run_guard = run_span.enter();
        let run_start = Instant::now();

        let mut diagnostics = Diagnostics::new();
        let duplicates = self.record_reference_duplicates(&mut diagnostics);

        let grouped = self.group_inputs(inputs, &mut diagnostics);
        let prepared = self.prepare_modules(grouped)?;

        let mut audit = DistrictAudit {
            duplicates,
            unresolved: Vec::new(),
        };
        let mut modules = Vec::with_capacity(prepared.len());
        let mut frames: BTreeMap<ModuleKind, ModuleFrame> = BTreeMap::new();
        for mut module in prepared {
            modules.push(module.summary());
            module.diagnostics.tag_module(module.kind);
            diagnostics.extend(module.diagnostics);
            audit.unresolved.extend(module.unresolved);
            if let Some(frame) = module.frame {
                frames.insert(module.kind, frame);
            }
        }
        audit.unresolved.sort();
        audit.unresolved.dedup();

        let merged = info_span!("join").in_scope(|| {
            let start = Instant::now();
            let merged = self.link_modules(frames, &mut diagnostics);
            if let Some(table) = &merged {
                debug!(
                    rows = table.height(),
                    columns = table.width(),
                    duration_ms = start.elapsed().as_millis(),
                    "join complete"
                );
            }
            merged
        });
        let merged = merged.ok_or(TransformError::NoOutput)?;

        let table = info_span!("projection").in_scope(|| self.project(merged, &mut diagnostics));

        info!(
            rows = table.height(),
            columns = table.width(),
            diagnostics = diagnostics.len(),
            duration_ms = run_start.elapsed().as_millis(),
            "harmonization complete"
        );
        Ok(PipelineOutput {
            table,
            diagnostics,
            district_audit: audit,
            modules,
        })
    }

    fn record_reference_duplicates(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> Vec<DuplicateDistrictKey> {
        let Some(table) = &self.districts else {
            return Vec::new();
        };
        let duplicates = table.duplicates();
        if !duplicates.is_empty() {
            diagnostics.push(Diagnostic::new(
                Stage::Mapping,
                DiagnosticKind::DuplicateReferenceKey,
                format!(
                    "{} composite key(s) repeat in the district reference; the last entry wins",
                    duplicates.len()
                ),
            ));
        }
        duplicates
    }

    /// Merge inputs of the same module and report configured modules with
    /// no input. Groups come back in module order.
    fn group_inputs(
        &self,
        inputs: Vec<ModuleInput>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<(ModuleKind, Vec<SourcePart>)> {
        let mut grouped: BTreeMap<ModuleKind, Vec<SourcePart>> = BTreeMap::new();
        for input in inputs {
            grouped.entry(input.kind).or_default().extend(input.parts);
        }
        for module in &self.layout.modules {
            if grouped.get(&module.kind).is_none_or(Vec::is_empty) {
                diagnostics.push(
                    Diagnostic::new(
                        Stage::Normalize,
                        DiagnosticKind::ModuleExcluded,
                        "no input files for module",
                    )
                    .with_module(module.kind),
                );
            }
        }
        grouped
            .into_iter()
            .filter(|(_, parts)| !parts.is_empty())
            .collect()
    }

    fn prepare_modules(
        &self,
        grouped: Vec<(ModuleKind, Vec<SourcePart>)>,
    ) -> Result<Vec<PreparedModule>> {
        if !self.options.parallel || grouped.len() < 2 {
            return Ok(grouped
                .into_iter()
                .map(|(kind, parts)| self.prepare_module(kind, parts))
                .collect());
        }
        let workers = self.options.worker_count();
        debug!(workers, modules = grouped.len(), "preparing modules in parallel");
        let pool = ThreadPoolBuilder::new().num_threads(workers).build()?;
        Ok(pool.install(|| {
            grouped
                .into_par_iter()
                .map(|(kind, parts)| self.prepare_module(kind, parts))
                .collect::<Vec<_>>()
        }))
    }

    /// Normalize, key, concatenate and enrich one module.
    fn prepare_module(&self, kind: ModuleKind, parts: Vec<SourcePart>) -> PreparedModule {
        let span = info_span!("module", module = %kind, parts = parts.len());
        let _guard = span.enter();
        let start = Instant::now();

        let fallback;
        let module = match self.layout.module(kind) {
            Some(module) => module,
            None => {
                debug!("module has no layout entry, using defaults");
                fallback = ModuleLayout::new(kind);
                &fallback
            }
        };

        let mut diagnostics = Diagnostics::new();
        let mut dropped = Vec::new();
        let mut keyed = Vec::with_capacity(parts.len());
        for part in parts {
            match self.key_part(&part, module, &mut diagnostics) {
                Some(df) => keyed.push((part.name, df)),
                None => dropped.push(part.name),
            }
        }

        let Some(concat) = concat_parts(keyed, &mut diagnostics) else {
            diagnostics.push(Diagnostic::new(
                Stage::Concat,
                DiagnosticKind::ModuleExcluded,
                "no part of the module could be linked",
            ));
            return PreparedModule {
                kind,
                frame: None,
                diagnostics,
                unresolved: Vec::new(),
                dropped,
            };
        };
        dropped.extend(concat.dropped);

        let mut data = self.select_module_columns(concat.data, module, &mut diagnostics);
        if kind.is_person_level() {
            data = self.attach_person_id(data, kind, &mut diagnostics);
        }

        let mut unresolved = Vec::new();
        if module.map_geography {
            let (mapped, keys) = self.resolve_districts(data, &mut diagnostics);
            data = mapped;
            unresolved = keys;
        }
        data = apply_enrichment_plan(&data, &module.enrichment, &self.registry, &mut diagnostics);

        debug!(
            rows = data.height(),
            columns = data.width(),
            duration_ms = start.elapsed().as_millis(),
            "module prepared"
        );
        let frame = ModuleFrame::new(kind, data).with_meta(ModuleFrameMeta {
            source_parts: concat.included,
            dropped_parts: dropped,
        });
        PreparedModule {
            kind,
            frame: Some(frame),
            diagnostics,
            unresolved,
            dropped: Vec::new(),
        }
    }

    /// Normalize one part and give it a household id.
    fn key_part(
        &self,
        part: &SourcePart,
        module: &ModuleLayout,
        diagnostics: &mut Diagnostics,
    ) -> Option<DataFrame> {
        let df = normalize_part(
            &part.data,
            &part.name,
            module.subset.as_ref(),
            &self.layout,
            diagnostics,
        )?;
        match compute_household_id(&df, &self.layout.design_key, &self.layout.household_id_column)
        {
            Ok((_, coverage)) if coverage.is_empty() => {
                diagnostics.push(Diagnostic::new(
                    Stage::Identifiers,
                    DiagnosticKind::ModuleExcluded,
                    format!("{}: no design key column available", part.name),
                ));
                None
            }
            Ok((keyed, coverage)) => {
                if coverage.is_degraded() {
                    diagnostics.push(Diagnostic::new(
                        Stage::Identifiers,
                        DiagnosticKind::DegradedKey,
                        format!(
                            "{}: household id built from {} of {} design key columns; missing {}",
                            part.name,
                            coverage.used.len(),
                            self.layout.design_key.len(),
                            coverage.missing.join(", ")
                        ),
                    ));
                }
                Some(keyed)
            }
            Err(error) => {
                diagnostics.push(Diagnostic::new(
                    Stage::Identifiers,
                    DiagnosticKind::ModuleExcluded,
                    format!("{}: household id could not be built: {error}", part.name),
                ));
                None
            }
        }
    }

    /// Apply the module's column list, always keeping the id inputs.
    fn select_module_columns(
        &self,
        data: DataFrame,
        module: &ModuleLayout,
        diagnostics: &mut Diagnostics,
    ) -> DataFrame {
        if module.columns.is_empty() {
            return data;
        }
        let mut wanted = vec![self.layout.household_id_column.clone()];
        if module.kind.is_person_level() {
            wanted.push(self.layout.person_seq_column.clone());
        }
        for column in &module.columns {
            if !wanted.contains(column) {
                wanted.push(column.clone());
            }
        }
        match select_available(&data, &wanted) {
            Ok((selected, missing)) => {
                if !missing.is_empty() {
                    diagnostics.push(Diagnostic::new(
                        Stage::Normalize,
                        DiagnosticKind::MissingColumn,
                        format!("selected column(s) absent: {}", missing.join(", ")),
                    ));
                }
                selected
            }
            Err(error) => {
                diagnostics.push(Diagnostic::new(
                    Stage::Normalize,
                    DiagnosticKind::MissingColumn,
                    format!("column selection failed, keeping all columns: {error}"),
                ));
                data
            }
        }
    }

    fn attach_person_id(
        &self,
        data: DataFrame,
        kind: ModuleKind,
        diagnostics: &mut Diagnostics,
    ) -> DataFrame {
        let layout = &self.layout;
        let with_id = match compute_person_id(
            &data,
            &layout.household_id_column,
            &layout.person_seq_column,
            &layout.person_id_column,
        ) {
            Ok(Some(with_id)) => with_id,
            Ok(None) => {
                diagnostics.push(
                    Diagnostic::new(
                        Stage::Identifiers,
                        DiagnosticKind::MissingColumn,
                        "person sequence column absent; no person id",
                    )
                    .with_column(layout.person_seq_column.clone()),
                );
                return data;
            }
            Err(error) => {
                diagnostics.push(Diagnostic::new(
                    Stage::Identifiers,
                    DiagnosticKind::MissingColumn,
                    format!("person id could not be built: {error}"),
                ));
                return data;
            }
        };

        if kind == ModuleKind::Person {
            let duplicates = find_duplicate_ids(&with_id, &layout.person_id_column);
            if !duplicates.is_empty() {
                let listed: Vec<&str> = duplicates
                    .iter()
                    .take(MAX_LISTED_IDS)
                    .map(String::as_str)
                    .collect();
                diagnostics.push(
                    Diagnostic::new(
                        Stage::Identifiers,
                        DiagnosticKind::DuplicatePersonId,
                        format!(
                            "{} person id(s) occur more than once: {}",
                            duplicates.len(),
                            listed.join(", ")
                        ),
                    )
                    .with_column(layout.person_id_column.clone()),
                );
            }
        }
        with_id
    }

    fn resolve_districts(
        &self,
        data: DataFrame,
        diagnostics: &mut Diagnostics,
    ) -> (DataFrame, Vec<DistrictKey>) {
        let (Some(geo), Some(table)) = (&self.layout.geography, &self.districts) else {
            diagnostics.push(
                Diagnostic::new(
                    Stage::Mapping,
                    DiagnosticKind::MappingFailed,
                    "no district reference loaded; district codes left as-is",
                )
                .with_severity(Severity::Warning),
            );
            return (data, Vec::new());
        };
        let (mapped, outcome) = map_district(&data, geo, table, diagnostics);
        (mapped, outcome.unresolved)
    }

    /// Join the module tables.
    ///
    /// The person table drives: household columns join on the household id
    /// and diary rows on the person id. Without a person table the diary
    /// drives; without either the household table is returned alone.
    fn link_modules(
        &self,
        mut frames: BTreeMap<ModuleKind, ModuleFrame>,
        diagnostics: &mut Diagnostics,
    ) -> Option<DataFrame> {
        let household = frames.remove(&ModuleKind::Household);
        let person = frames.remove(&ModuleKind::Person);
        let activity = frames.remove(&ModuleKind::Activity);
        let layout = &self.layout;

        let (driver, diary) = match (person, activity) {
            (Some(person), activity) => (person, activity),
            (None, Some(activity)) => (activity, None),
            (None, None) => {
                let household = household?;
                diagnostics.push(
                    Diagnostic::new(
                        Stage::Join,
                        DiagnosticKind::ModuleExcluded,
                        "no person-level table; output holds household rows only",
                    )
                    .with_module(ModuleKind::Household),
                );
                return Some(household.data);
            }
        };

        let mut table = driver.data;
        match household {
            Some(household) => {
                let right = without_overlap(&household.data, &table, &layout.design_key);
                table = left_join(&table, &right, &layout.household_id_column, diagnostics);
            }
            None => diagnostics.push(
                Diagnostic::new(
                    Stage::Join,
                    DiagnosticKind::ModuleExcluded,
                    "household table unavailable; household columns not linked",
                )
                .with_module(ModuleKind::Household),
            ),
        }

        if let Some(diary) = diary {
            let mut shared = layout.design_key.clone();
            shared.push(layout.household_id_column.clone());
            let right = without_overlap(&diary.data, &table, &shared);
            table = left_join(&table, &right, &layout.person_id_column, diagnostics);
        }
        Some(table)
    }

    /// Analytic renames, dropped columns and final column order.
    ///
    /// A failing step is recorded and the table from before that step is
    /// kept.
    fn project(&self, mut table: DataFrame, diagnostics: &mut Diagnostics) -> DataFrame {
        let start = Instant::now();
        let renamed = rename_columns(&mut table, &self.layout.renames, diagnostics);
        let renamed = recover_projection(renamed, 0, "analytic renames", diagnostics);
        let table = drop_columns(&table, &self.layout.drop_columns);
        let ordered = project_columns(&table, &self.layout.column_order);
        let table = recover_projection(ordered, table, "column order", diagnostics);
        debug!(
            renamed,
            columns = table.width(),
            duration_ms = start.elapsed().as_millis(),
            "projection complete"
        );
        table
    }
}

/// The step's value, or `fallback` with a `ProjectionFailed` record.
fn recover_projection<T>(
    result: PolarsResult<T>,
    fallback: T,
    step: &str,
    diagnostics: &mut Diagnostics,
) -> T {
    result.unwrap_or_else(|error| {
        diagnostics.push(Diagnostic::new(
            Stage::Projection,
            DiagnosticKind::ProjectionFailed,
            format!("{step} not applied: {error}"),
        ));
        fallback
    })
}

/// `right` without those of `candidates` that `left` already has.
fn without_overlap(right: &DataFrame, left: &DataFrame, candidates: &[String]) -> DataFrame {
    let shared: Vec<&str> = candidates
        .iter()
        .map(String::as_str)
        .filter(|name| left.column(name).is_ok() && right.column(name).is_ok())
        .collect();
    right.drop_many(shared)
}
