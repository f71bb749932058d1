//! Structured record of degradations encountered during a run.
//!
//! Stages never abort on malformed input; they narrow, substitute or drop
//! data and record what they did here so completeness can be audited.

use serde::Serialize;

use crate::enums::{DiagnosticKind, ModuleKind, Severity, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub severity: Severity,
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic at the kind's default severity.
    pub fn new(stage: Stage, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            severity: kind.severity(),
            kind,
            module: None,
            column: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: ModuleKind) -> Self {
        self.module = Some(module);
        self
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticSummary {
    pub info: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl DiagnosticSummary {
    pub fn total(&self) -> usize {
        self.info + self.warnings + self.errors
    }
}

/// Ordered collection of diagnostics.
///
/// Order is the order of recording; module-parallel stages collect locally
/// and are merged in module order so output stays deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Attribute entries recorded without a module to `module`.
    pub fn tag_module(&mut self, module: ModuleKind) {
        for diagnostic in &mut self.entries {
            diagnostic.module.get_or_insert(module);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    pub fn summary(&self) -> DiagnosticSummary {
        let mut summary = DiagnosticSummary::default();
        for diagnostic in &self.entries {
            match diagnostic.severity {
                Severity::Info => summary.info += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Error => summary.errors += 1,
            }
        }
        summary
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_severity() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::new(
            Stage::Concat,
            DiagnosticKind::SchemaDrift,
            "union of columns",
        ));
        diagnostics.push(Diagnostic::new(
            Stage::Identifiers,
            DiagnosticKind::DegradedKey,
            "missing Sector",
        ));
        diagnostics.push(Diagnostic::new(
            Stage::Concat,
            DiagnosticKind::PartDropped,
            "part 2",
        ));
        let summary = diagnostics.summary();
        assert_eq!(summary.info, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn extend_preserves_order() {
        let mut first = Diagnostics::new();
        first.push(Diagnostic::new(Stage::Normalize, DiagnosticKind::MissingColumn, "a"));
        let mut second = Diagnostics::new();
        second.push(Diagnostic::new(Stage::Mapping, DiagnosticKind::UnmappedCodes, "b"));
        first.extend(second);
        let messages: Vec<_> = first.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b"]);
    }

    #[test]
    fn tag_module_keeps_existing_attribution() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::new(Stage::Mapping, DiagnosticKind::UnmappedCodes, "a"));
        diagnostics.push(
            Diagnostic::new(Stage::Join, DiagnosticKind::ColumnCollision, "b")
                .with_module(ModuleKind::Household),
        );
        diagnostics.tag_module(ModuleKind::Person);
        let modules: Vec<_> = diagnostics.iter().map(|d| d.module).collect();
        assert_eq!(
            modules,
            vec![Some(ModuleKind::Person), Some(ModuleKind::Household)]
        );
    }

    #[test]
    fn serializes_optional_fields_only_when_present() {
        let diagnostic = Diagnostic::new(Stage::Mapping, DiagnosticKind::UnmappedCodes, "2 codes")
            .with_module(ModuleKind::Person)
            .with_column("gender");
        let json = serde_json::to_value(&diagnostic).expect("serialize");
        assert_eq!(json["module"], "person");
        assert_eq!(json["column"], "gender");
        assert_eq!(json["severity"], "info");

        let bare = Diagnostic::new(Stage::Join, DiagnosticKind::ColumnCollision, "x");
        let json = serde_json::to_value(&bare).expect("serialize");
        assert!(json.get("module").is_none());
    }
}
