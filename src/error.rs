use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_SYNTAX: &str = "FB-ERR-SYNTAX";
pub const ERR_UNSUPPORTED_EXPORT: &str = "FB-ERR-UNSUPPORTED-EXPORT";
pub const ERR_DUPLICATE_ROUTE: &str = "FB-ERR-DUPLICATE-ROUTE";
pub const ERR_FETCH: &str = "FB-ERR-FETCH";
pub const ERR_ARCHIVE: &str = "FB-ERR-ARCHIVE";

/// The failure categories a compile can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Syntax,
    UnsupportedExport,
    DuplicateRoute,
    FetchFailure,
    Archive,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Syntax => ERR_SYNTAX,
            ErrorKind::UnsupportedExport => ERR_UNSUPPORTED_EXPORT,
            ErrorKind::DuplicateRoute => ERR_DUPLICATE_ROUTE,
            ErrorKind::FetchFailure => ERR_FETCH,
            ErrorKind::Archive => ERR_ARCHIVE,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // GUARANTEES
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn guarantee(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "Only syntactically valid ES modules are compiled.",
            ErrorKind::UnsupportedExport => {
                "Every export is a plain named function whose parameters are identifiers."
            }
            ErrorKind::DuplicateRoute => "Every route path maps to exactly one function.",
            ErrorKind::FetchFailure => {
                "Every non-relative dependency is vendored before the archive is finalized."
            }
            ErrorKind::Archive => "Archives are written completely or not at all.",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message} ({line}:{column})")]
pub struct CompilerError {
    kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub guarantee: String,
    pub line: u32,
    pub column: u32,
    pub context: Option<String>,
}

impl CompilerError {
    pub fn new(kind: ErrorKind, message: &str, line: u32, column: u32) -> Self {
        Self::with_context(kind, message, line, column, None)
    }

    pub fn with_context(
        kind: ErrorKind,
        message: &str,
        line: u32,
        column: u32,
        context: Option<String>,
    ) -> Self {
        CompilerError {
            kind,
            code: kind.code().to_string(),
            message: message.to_string(),
            guarantee: kind.guarantee().to_string(),
            line,
            column,
            context,
        }
    }

    /// Errors raised outside any source position (network, archive).
    pub fn detached(kind: ErrorKind, message: &str) -> Self {
        Self::new(kind, message, 0, 0)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<zip::result::ZipError> for CompilerError {
    fn from(e: zip::result::ZipError) -> Self {
        CompilerError::detached(ErrorKind::Archive, &format!("Failed to write archive: {}", e))
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(e: std::io::Error) -> Self {
        CompilerError::detached(ErrorKind::Archive, &format!("Failed to write archive: {}", e))
    }
}

/// Converts a byte offset into a 1-based (line, column) pair.
pub fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let column = source[line_start..]
        .char_indices()
        .take_while(|(i, _)| line_start + i < offset)
        .count() as u32
        + 1;
    (line, column)
}
