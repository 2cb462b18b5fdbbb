//! Diagnostic records shared by every pipeline stage.
//!
//! The core never prints or colors anything itself — that is the driver's
//! job; each stage only appends [`Diagnostic`] records to a sink. Detection
//! order within a stage is scan order, and the sink preserves insertion
//! order end to end.

use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Halts the whole pipeline after the stage that raised it finishes.
    Fatal,
    /// Recorded and the stage continues (panic-mode resync, semantic alert).
    Warning,
    /// Informational only (memory usage crossing 90%).
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "erro"),
            Severity::Warning => write!(f, "alerta"),
            Severity::Note => write!(f, "nota"),
        }
    }
}

/// Which stage raised a diagnostic; used only for grouping the console
/// report, never for deciding whether to abort (that's `Severity::Fatal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Memory,
    Lexical,
    Syntactic,
    Structural,
    Semantic,
}

/// A single diagnostic: a severity, a 1-based source line, and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub stage: Stage,
    pub severity: Severity,
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: Stage, severity: Severity, line: u32, message: impl Into<String>) -> Self {
        Self {
            stage,
            severity,
            line,
            message: message.into(),
        }
    }

    pub fn fatal(stage: Stage, line: u32, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Fatal, line, message)
    }

    pub fn warning(stage: Stage, line: u32, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Warning, line, message)
    }

    pub fn note(stage: Stage, line: u32, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Note, line, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Fatal => write!(f, "Erro (linha {}): {}", self.line, self.message),
            Severity::Warning => write!(f, "Alerta (linha {}): {}", self.line, self.message),
            Severity::Note => write!(f, "{}", self.message),
        }
    }
}

/// Append-only, order-preserving collector for diagnostics. Every stage
/// shares one bag (passed by `&mut`) rather than reaching for a global.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    records: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    pub fn report(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn has_fatal(&self) -> bool {
        self.records.iter().any(|d| d.severity == Severity::Fatal)
    }

    pub fn has_fatal_in(&self, stage: Stage) -> bool {
        self.records
            .iter()
            .any(|d| d.stage == stage && d.severity == Severity::Fatal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut bag = DiagnosticBag::new();
        bag.push(Diagnostic::fatal(Stage::Lexical, 3, "first"));
        bag.push(Diagnostic::warning(Stage::Syntactic, 5, "second"));
        let lines: Vec<u32> = bag.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[test]
    fn has_fatal_only_true_for_fatal_severity() {
        let mut bag = DiagnosticBag::new();
        assert!(!bag.has_fatal());
        bag.push(Diagnostic::warning(Stage::Semantic, 1, "alert"));
        assert!(!bag.has_fatal());
        bag.push(Diagnostic::fatal(Stage::Lexical, 2, "boom"));
        assert!(bag.has_fatal());
        assert!(bag.has_fatal_in(Stage::Lexical));
        assert!(!bag.has_fatal_in(Stage::Semantic));
    }
}
