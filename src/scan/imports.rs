//! Import statement extraction.
//!
//! Recognises `import a.b [as c], d` and `from a.b import c [as d], e`
//! (including parenthesised name lists) and normalises both to dotted module
//! paths. Relative imports keep their leading dots; `from . import x` records
//! `.x` since the imported names are sibling modules.
//!
//! Imports in the inline suite of a compound statement
//! (`if TYPE_CHECKING: import x`, `try: import x`) are found as well.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::classes::inline_body;
use super::lexer::{LexError, LogicalLine};

/// Compound statement keywords whose suite may follow the `:` on one line.
const COMPOUND_KEYWORDS: [&str; 9] = [
    "if", "elif", "else", "try", "except", "finally", "with", "for", "while",
];

static DOTTED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\W\d]\w*(?:\.[^\W\d]\w*)*$").expect("DOTTED_NAME must compile")
});

static RELATIVE_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.*(?:[^\W\d]\w*(?:\.[^\W\d]\w*)*)?$").expect("RELATIVE_MODULE must compile")
});

static ALIAS_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+as\s+").expect("ALIAS_SPLIT must compile"));

static IMPORT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bimport\b").expect("IMPORT_KEYWORD must compile"));

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\W\d]\w*$").expect("IDENTIFIER must compile"));

/// A module referenced by an import statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ImportedModule {
    /// Dotted module path, with leading dots for relative imports.
    pub module: String,
    /// Line of the import statement (1-indexed).
    pub line: usize,
}

impl ImportedModule {
    pub fn new(module: impl Into<String>, line: usize) -> Self {
        Self {
            module: module.into(),
            line,
        }
    }

    /// Whether this is a package-relative import (`from .x import y`).
    pub fn is_relative(&self) -> bool {
        self.module.starts_with('.')
    }
}

impl std::fmt::Display for ImportedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.module)
    }
}

/// Extract imported modules, in source order, from logical lines.
///
/// # Errors
///
/// Returns a [`LexError`] for malformed import statements such as
/// `from a` without `import`, or an empty name list.
pub fn extract_imports(lines: &[LogicalLine]) -> Result<Vec<ImportedModule>, LexError> {
    let mut imports = Vec::new();

    for logical in lines {
        for statement in logical.text.split(';') {
            let statement = inline_suite(statement.trim());
            if let Some(rest) = keyword_rest(statement, "import") {
                parse_import(rest, logical.line, &mut imports)?;
            } else if let Some(rest) = keyword_rest(statement, "from") {
                parse_from_import(rest, logical.line, &mut imports)?;
            }
        }
    }

    Ok(imports)
}

/// Innermost inline suite of a one-line compound statement, or the statement itself.
fn inline_suite(mut statement: &str) -> &str {
    while COMPOUND_KEYWORDS.iter().any(|kw| {
        keyword_rest(statement, kw).is_some()
            || statement.strip_prefix(kw).is_some_and(|r| r.starts_with(':'))
    }) {
        match inline_body(statement) {
            Some(body) => statement = body,
            None => break,
        }
    }
    statement
}

/// Text following `keyword` when the statement starts with that keyword.
fn keyword_rest<'a>(statement: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = statement.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '.' || c == '(' => Some(rest),
        Some(_) => None,
    }
}

fn syntax_error(line: usize, detail: &str) -> LexError {
    LexError::new(line, format!("invalid import statement: {}", detail))
}

fn collapse_dots(name: &str) -> String {
    name.split('.')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(".")
}

fn parse_import(rest: &str, line: usize, out: &mut Vec<ImportedModule>) -> Result<(), LexError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(syntax_error(line, "expected a module name after 'import'"));
    }

    for item in rest.split(',') {
        let item = item.trim();
        let mut parts = ALIAS_SPLIT.splitn(item, 2);
        let module = collapse_dots(parts.next().unwrap_or_default());

        if !DOTTED_NAME.is_match(&module) {
            return Err(syntax_error(line, &format!("'{}' is not a module name", item)));
        }
        if let Some(alias) = parts.next() {
            if !IDENTIFIER.is_match(alias.trim()) {
                return Err(syntax_error(line, &format!("invalid alias in '{}'", item)));
            }
        }

        out.push(ImportedModule::new(module, line));
    }

    Ok(())
}

fn parse_from_import(
    rest: &str,
    line: usize,
    out: &mut Vec<ImportedModule>,
) -> Result<(), LexError> {
    let Some(keyword) = IMPORT_KEYWORD.find(rest) else {
        return Err(syntax_error(line, "'from' without 'import'"));
    };

    let module: String = rest[..keyword.start()]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if module.is_empty() || !RELATIVE_MODULE.is_match(&module) {
        return Err(syntax_error(
            line,
            &format!("'{}' is not a module name", rest[..keyword.start()].trim()),
        ));
    }

    let names = imported_names(&rest[keyword.end()..], line)?;

    if module.chars().all(|c| c == '.') {
        for name in names {
            if name == "*" {
                out.push(ImportedModule::new(module.clone(), line));
            } else {
                out.push(ImportedModule::new(format!("{}{}", module, name), line));
            }
        }
    } else {
        out.push(ImportedModule::new(module, line));
    }

    Ok(())
}

/// Names bound by the `import ...` tail of a from-import, aliases stripped.
fn imported_names(tail: &str, line: usize) -> Result<Vec<String>, LexError> {
    let tail = tail.trim();
    if tail == "*" {
        return Ok(vec!["*".to_string()]);
    }

    let (body, parenthesised) = match tail.strip_prefix('(') {
        Some(inner) => match inner.strip_suffix(')') {
            Some(body) => (body, true),
            None => return Err(syntax_error(line, "unbalanced parentheses in name list")),
        },
        None => (tail, false),
    };

    let mut items: Vec<&str> = body.split(',').map(str::trim).collect();
    if parenthesised && items.len() > 1 && items.last().is_some_and(|s| s.is_empty()) {
        items.pop();
    }

    if items.iter().all(|s| s.is_empty()) {
        return Err(syntax_error(line, "expected names after 'import'"));
    }

    let mut names = Vec::with_capacity(items.len());
    for item in items {
        let mut parts = ALIAS_SPLIT.splitn(item, 2);
        let name = parts.next().unwrap_or_default().trim();
        let alias_ok = parts.next().map_or(true, |a| IDENTIFIER.is_match(a.trim()));
        if !IDENTIFIER.is_match(name) || !alias_ok {
            return Err(syntax_error(line, &format!("'{}' is not an importable name", item)));
        }
        names.push(name.to_string());
    }

    Ok(names)
}
