// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

use scc_span::Span;

use crate::code::ErrCode;

/// Error taxonomy shared by every compiler stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Redeclaration, undeclared use, or kind mismatch.
    NameError,

    /// Invalid assignment target or address-of operand.
    ObjectError,

    /// Operand, operator, argument or return type mismatch.
    TypeError,

    /// Whole-program shape problems such as a missing entry point.
    StructuralError,

    /// A compiler invariant broke.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NameError => "name error",
            ErrorKind::ObjectError => "object error",
            ErrorKind::TypeError => "type error",
            ErrorKind::StructuralError => "structural error",
            ErrorKind::Internal => "internal error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code:       ErrCode,
    pub kind:       ErrorKind,
    pub severity:   Severity,
    pub span:       Option<Span>,
    pub message:    String,
}

impl Diagnostic {
    pub fn error(kind: ErrorKind, code: ErrCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            code,
            kind,
            severity: Severity::Error,
            span: Some(span),
            message: message.into(),
        }
    }

    pub fn name_error(code: ErrCode, span: Span, message: impl Into<String>) -> Self {
        Self::error(ErrorKind::NameError, code, span, message)
    }

    pub fn object_error(code: ErrCode, span: Span, message: impl Into<String>) -> Self {
        Self::error(ErrorKind::ObjectError, code, span, message)
    }

    pub fn type_error(code: ErrCode, span: Span, message: impl Into<String>) -> Self {
        Self::error(ErrorKind::TypeError, code, span, message)
    }

    /// Whole-program errors carry no source position.
    pub fn structural_error(code: ErrCode, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: ErrorKind::StructuralError,
            severity: Severity::Error,
            span: None,
            message: message.into(),
        }
    }

    pub fn internal(span: Option<Span>, message: impl Into<String>) -> Self {
        Self {
            code: ErrCode::INT9000,
            kind: ErrorKind::Internal,
            severity: Severity::Error,
            span,
            message: message.into(),
        }
    }

    pub fn warning(kind: ErrorKind, code: ErrCode, span: Span, message: impl Into<String>) -> Self {
        Self {
            code,
            kind,
            severity: Severity::Warning,
            span: Some(span),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Turns a warning into an error of the same kind and code.
    pub fn promote(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = &self.span {
            write!(f, "{}: ", span.start)?;
        }
        match self.severity {
            Severity::Error => write!(f, "{}[{}]: {}", self.kind, self.code, self.message),
            Severity::Warning => write!(f, "warning[{}]: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn push(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ErrorKind::NameError, "name error")]
    #[case(ErrorKind::ObjectError, "object error")]
    #[case(ErrorKind::TypeError, "type error")]
    #[case(ErrorKind::StructuralError, "structural error")]
    fn test_error_kind_display(#[case] kind: ErrorKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn test_positioned_error_display() {
        let diag = Diagnostic::name_error(ErrCode::SEM2000, Span::at(3, 7), "undefined 'x'");
        assert_eq!(diag.to_string(), "3:7: name error[SEM2000]: undefined 'x'");
    }

    #[test]
    fn test_structural_error_has_no_position() {
        let diag = Diagnostic::structural_error(ErrCode::STR5000, "'main' is not defined");
        assert!(diag.span.is_none());
        assert_eq!(diag.to_string(), "structural error[STR5000]: 'main' is not defined");
    }

    #[test]
    fn test_bag_tracks_warnings_separately() {
        let mut bag = DiagnosticBag::default();
        bag.push(Diagnostic::warning(ErrorKind::NameError, ErrCode::SEM2004, Span::at(1, 1), "shadowed"));
        assert!(!bag.has_errors());
        assert_eq!(bag.warnings().count(), 1);

        let promoted = bag.warnings().next().cloned().map(Diagnostic::promote);
        assert!(promoted.is_some_and(|d| d.is_error()));
    }
}
