//! Render diagnostics and the severity threshold that turns them into failures.

use std::fmt;

use super::RenderConfig;

/// Severity of a render diagnostic, ordered from least to most serious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info = 1,
    Warning = 2,
    Error = 3,
    Severe = 4,
}

impl Severity {
    /// Upper-case label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Severe => "SEVERE",
        }
    }

    /// Parse a level from its name or number (`"warning"`, `"2"`).
    pub fn parse(s: &str) -> Option<Severity> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" | "1" => Some(Severity::Info),
            "warning" | "2" => Some(Severity::Warning),
            "error" | "3" => Some(Severity::Error),
            "severe" | "4" => Some(Severity::Severe),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.label(), *self as u8)
    }
}

/// A problem found in the markup source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based source line.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<source>:{}: ({}) {}", self.line, self.severity, self.message)
    }
}

/// Rendering stopped at a diagnostic at or above the configured halt level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    /// The diagnostic that stopped rendering.
    pub diagnostic: Diagnostic,
    /// Diagnostics reported before it; empty unless traceback is enabled.
    pub context: Vec<Diagnostic>,
}

impl RenderError {
    pub fn severity(&self) -> Severity {
        self.diagnostic.severity
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Render error: {}", self.diagnostic)?;
        for earlier in &self.context {
            write!(f, "\n  after {earlier}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RenderError {}

/// Collects diagnostics and escalates the first one at or above the halt level.
pub(crate) struct Reporter {
    halt_level: Severity,
    traceback: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            halt_level: config.halt_level,
            traceback: config.traceback,
            diagnostics: Vec::new(),
        }
    }

    pub fn report(
        &mut self,
        severity: Severity,
        line: usize,
        message: impl Into<String>,
    ) -> Result<(), RenderError> {
        let diagnostic = Diagnostic {
            severity,
            line,
            message: message.into(),
        };

        if severity >= self.halt_level {
            let context = if self.traceback {
                std::mem::take(&mut self.diagnostics)
            } else {
                Vec::new()
            };
            return Err(RenderError {
                diagnostic,
                context,
            });
        }

        match severity {
            Severity::Info => tracing::debug!(line, "{}", diagnostic.message),
            _ => tracing::warn!(line, level = %severity, "{}", diagnostic.message),
        }
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(halt_level: Severity, traceback: bool) -> RenderConfig {
        RenderConfig::default()
            .with_halt_level(halt_level)
            .with_traceback(traceback)
    }

    #[test]
    fn test_below_threshold_is_recorded() {
        let mut reporter = Reporter::new(&config(Severity::Error, true));

        reporter
            .report(Severity::Warning, 3, "Title underline too short.")
            .unwrap();

        assert_eq!(reporter.diagnostics().len(), 1);
        assert_eq!(reporter.diagnostics()[0].line, 3);
    }

    #[test]
    fn test_at_threshold_halts_with_context() {
        let mut reporter = Reporter::new(&config(Severity::Error, true));
        reporter.report(Severity::Info, 1, "first").unwrap();

        let err = reporter
            .report(Severity::Error, 7, "Unknown directive type \"foo\".")
            .unwrap_err();

        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.diagnostic.line, 7);
        assert_eq!(err.context.len(), 1);
        assert!(err.to_string().contains("(ERROR/3)"));
    }

    #[test]
    fn test_no_traceback_drops_context() {
        let mut reporter = Reporter::new(&config(Severity::Warning, false));
        reporter.report(Severity::Info, 1, "first").unwrap();

        let err = reporter.report(Severity::Severe, 2, "boom").unwrap_err();
        assert!(err.context.is_empty());
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("3"), Some(Severity::Error));
        assert_eq!(Severity::parse("SEVERE"), Some(Severity::Severe));
        assert_eq!(Severity::parse("loud"), None);
    }
}
