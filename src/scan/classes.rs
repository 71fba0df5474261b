//! Class definition extraction.
//!
//! Finds `class Name(...):` headers at any nesting depth and collects the
//! statements directly inside each body. Nested class bodies are reported as
//! their own [`ClassDef`] and are not part of the enclosing class's members.
//! Each class records its dotted path through enclosing classes, so two
//! `Config` classes nested in different outer classes stay distinguishable.

use std::sync::LazyLock;

use regex::Regex;

use super::lexer::LogicalLine;

static CLASS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^class\s+([^\W\d]\w*)").expect("CLASS_HEADER must compile")
});

/// A class definition and its direct member statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    /// Enclosing class names and `name`, joined by `.` (`Outer.Inner`).
    pub qualname: String,
    /// Line of the `class` keyword (1-indexed).
    pub line: usize,
    /// Column of the `class` keyword (1-indexed).
    pub column: usize,
    /// Statements at the first indentation level of the body.
    pub members: Vec<LogicalLine>,
}

/// Find every class definition in `lines`, in source order.
pub fn find_classes(lines: &[LogicalLine]) -> Vec<ClassDef> {
    let mut classes = Vec::new();
    // Open class bodies as (header indent, qualname), innermost last.
    let mut scopes: Vec<(usize, String)> = Vec::new();

    for (idx, header) in lines.iter().enumerate() {
        while scopes.last().is_some_and(|(indent, _)| *indent >= header.indent) {
            scopes.pop();
        }

        let Some(captures) = CLASS_HEADER.captures(&header.text) else {
            continue;
        };
        let name = captures[1].to_string();
        let qualname = match scopes.last() {
            Some((_, outer)) => format!("{}.{}", outer, name),
            None => name.clone(),
        };

        let members = match inline_body(&header.text) {
            Some(inline) => inline
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|text| LogicalLine {
                    line: header.line,
                    indent: header.indent + 1,
                    text: text.to_string(),
                })
                .collect(),
            None => block_members(&lines[idx + 1..], header.indent),
        };

        scopes.push((header.indent, qualname.clone()));
        classes.push(ClassDef {
            name,
            qualname,
            line: header.line,
            column: header.column(),
            members,
        });
    }

    classes
}

/// Statements following the header's top-level `:` when the body is on the same line.
pub(crate) fn inline_body(header: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (idx, c) in header.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                let rest = header[idx + 1..].trim();
                return if rest.is_empty() { None } else { Some(rest) };
            }
            _ => {}
        }
    }
    None
}

fn block_members(following: &[LogicalLine], class_indent: usize) -> Vec<LogicalLine> {
    let Some(first) = following.first().filter(|l| l.indent > class_indent) else {
        return Vec::new();
    };
    let body_indent = first.indent;

    following
        .iter()
        .take_while(|l| l.indent > class_indent)
        .filter(|l| l.indent == body_indent)
        .cloned()
        .collect()
}
