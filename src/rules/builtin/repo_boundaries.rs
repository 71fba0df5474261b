//! Cross-repository import boundaries.
//!
//! Module prefixes are mapped to owning repositories through `ownership`.
//! An import is a violation when it matches a forbidden prefix, or when its
//! longest-prefix owner is another repository. `allowed_cross_repo_prefixes`
//! exempts an import from both checks. Relative imports never cross a
//! repository and are not checked.

use std::collections::BTreeSet;
use std::path::Path;

use crate::policy::{RepoBoundariesConfig, REPO_BOUNDARIES};
use crate::rules::{sort_issues, Issue, Rule, Severity};
use crate::scan::{relative_path, ImportGraph, ImportedModule};

/// Issue code for imports matching `forbidden_import_prefixes`.
pub const FORBIDDEN_IMPORT: &str = "FORBIDDEN_IMPORT";

/// Issue code for imports owned by another repository.
pub const REPO_BOUNDARY_VIOLATION: &str = "REPO_BOUNDARY_VIOLATION";

/// Enforces module ownership and forbidden import prefixes.
pub struct RuleRepoBoundaries {
    config: RepoBoundariesConfig,
}

impl RuleRepoBoundaries {
    pub fn new(config: RepoBoundariesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RepoBoundariesConfig {
        &self.config
    }

    /// Repository owning `module`, by longest matching prefix.
    pub fn owner_of(&self, module: &str) -> Option<&str> {
        self.config
            .ownership
            .iter()
            .filter(|(prefix, _)| module.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, owner)| owner.as_str())
    }

    fn is_allowed(&self, module: &str) -> bool {
        self.config
            .allowed_cross_repo_prefixes
            .iter()
            .any(|prefix| module.starts_with(prefix.as_str()))
    }

    fn forbidden_prefix(&self, module: &str) -> Option<&str> {
        self.config
            .forbidden_import_prefixes
            .iter()
            .find(|prefix| module.starts_with(prefix.as_str()))
            .map(String::as_str)
    }

    fn check_import(&self, import: &ImportedModule, repo_id: &str, file: &str) -> Option<Issue> {
        let module = import.module.as_str();
        if import.is_relative() || self.is_allowed(module) {
            return None;
        }

        let owner = self.owner_of(module);

        let issue = if let Some(prefix) = self.forbidden_prefix(module) {
            Issue::new(
                FORBIDDEN_IMPORT,
                self.config.severity,
                format!(
                    "Import of '{}' matches forbidden prefix '{}' (owner: {})",
                    module,
                    prefix,
                    owner.unwrap_or("unowned")
                ),
                file,
                import.line,
            )
            .with_context("prefix", prefix)
            .with_suggestion(format!(
                "Remove the import or add an entry to allowed_cross_repo_prefixes covering '{}'",
                module
            ))
        } else {
            let owner = owner.filter(|owner| *owner != repo_id)?;
            Issue::new(
                REPO_BOUNDARY_VIOLATION,
                self.config.severity,
                format!(
                    "Import of '{}' crosses into repository '{}' from '{}'",
                    module, owner, repo_id
                ),
                file,
                import.line,
            )
            .with_suggestion(format!(
                "Depend on a public interface of '{}' or allow it via allowed_cross_repo_prefixes",
                owner
            ))
        };

        let issue = issue.with_symbol(module).with_context("import", module);
        Some(match owner {
            Some(owner) => issue.with_context("owner", owner),
            None => issue,
        })
    }
}

impl Rule for RuleRepoBoundaries {
    fn name(&self) -> &'static str {
        REPO_BOUNDARIES
    }

    fn description(&self) -> &str {
        "Prevents imports across repository ownership boundaries"
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn severity(&self) -> Severity {
        self.config.severity
    }

    fn validate(&self, graph: &ImportGraph, repo_id: &str, repo_root: &Path) -> Vec<Issue> {
        if !self.config.enabled {
            return Vec::new();
        }

        let mut issues = Vec::new();
        for (path, file_imports) in graph {
            if !file_imports.is_parsed() {
                continue;
            }

            let file = relative_path(repo_root, path);
            // One issue per module and code within a file
            let mut seen = BTreeSet::new();
            for import in &file_imports.imports {
                if let Some(issue) = self.check_import(import, repo_id, &file) {
                    if seen.insert((issue.code.clone(), import.module.clone())) {
                        issues.push(issue);
                    }
                }
            }
        }

        sort_issues(&mut issues);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::FileImports;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn config() -> RepoBoundariesConfig {
        let mut ownership = BTreeMap::new();
        ownership.insert("base.".to_string(), "base_repo".to_string());
        ownership.insert("base.shared.".to_string(), "shared_repo".to_string());
        ownership.insert("my_app.".to_string(), "my_app".to_string());

        RepoBoundariesConfig {
            ownership,
            forbidden_import_prefixes: vec!["internal.private".into()],
            allowed_cross_repo_prefixes: vec!["base.public.".into()],
            ..Default::default()
        }
    }

    fn graph(files: &[(&str, &[(&str, usize)])]) -> ImportGraph {
        let root = PathBuf::from("/repo");
        files
            .iter()
            .map(|(name, imports)| {
                let path = root.join(name);
                let imports = imports
                    .iter()
                    .map(|(module, line)| ImportedModule::new(*module, *line))
                    .collect();
                (path.clone(), FileImports::parsed(path, imports))
            })
            .collect()
    }

    fn validate(rule: &RuleRepoBoundaries, graph: &ImportGraph) -> Vec<Issue> {
        rule.validate(graph, "my_app", Path::new("/repo"))
    }

    #[test]
    fn longest_prefix_owner() {
        let rule = RuleRepoBoundaries::new(config());
        assert_eq!(rule.owner_of("base.models"), Some("base_repo"));
        assert_eq!(rule.owner_of("base.shared.util"), Some("shared_repo"));
        assert_eq!(rule.owner_of("requests"), None);
    }

    #[test]
    fn own_and_unowned_imports_are_clean() {
        let rule = RuleRepoBoundaries::new(config());
        let g = graph(&[("app.py", &[("my_app.models", 1), ("os", 2), ("requests", 3)])]);
        assert!(validate(&rule, &g).is_empty());
    }

    #[test]
    fn foreign_owner_is_a_boundary_violation() {
        let rule = RuleRepoBoundaries::new(config());
        let g = graph(&[("app.py", &[("base.models", 4)])]);

        let issues = validate(&rule, &g);

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.code, REPO_BOUNDARY_VIOLATION);
        assert_eq!(issue.file, "app.py");
        assert_eq!(issue.line, 4);
        assert_eq!(issue.context["import"], "base.models");
        assert_eq!(issue.context["owner"], "base_repo");
        assert_eq!(issue.symbol(), Some("base.models"));
        assert!(issue.message.contains("base_repo"));
    }

    #[test]
    fn forbidden_prefix_wins() {
        let rule = RuleRepoBoundaries::new(config());
        let g = graph(&[("app.py", &[("internal.private.keys", 2)])]);

        let issues = validate(&rule, &g);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, FORBIDDEN_IMPORT);
        assert_eq!(issues[0].context["prefix"], "internal.private");
        assert!(!issues[0].context.contains_key("owner"));
    }

    #[test]
    fn allowed_prefix_exempts_both_checks() {
        let mut cfg = config();
        cfg.allowed_cross_repo_prefixes.push("internal.private.ok".into());
        let rule = RuleRepoBoundaries::new(cfg);
        let g = graph(&[(
            "app.py",
            &[("base.public.api", 1), ("internal.private.ok.thing", 2)],
        )]);

        assert!(validate(&rule, &g).is_empty());
    }

    #[test]
    fn relative_imports_are_ignored() {
        let rule = RuleRepoBoundaries::new(config());
        let g = graph(&[("app.py", &[(".base", 1), ("..internal.private", 2)])]);
        assert!(validate(&rule, &g).is_empty());
    }

    #[test]
    fn repeated_imports_report_once() {
        let rule = RuleRepoBoundaries::new(config());
        let g = graph(&[("app.py", &[("base.models", 1), ("base.models", 9)])]);

        let issues = validate(&rule, &g);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
    }

    #[test]
    fn parse_failures_are_skipped() {
        let rule = RuleRepoBoundaries::new(config());
        let mut g = graph(&[("ok.py", &[("base.models", 1)])]);
        let broken = PathBuf::from("/repo/broken.py");
        g.insert(broken.clone(), FileImports::failed(broken, "bad syntax"));

        let issues = validate(&rule, &g);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file, "ok.py");
    }

    #[test]
    fn disabled_returns_nothing() {
        let rule = RuleRepoBoundaries::new(RepoBoundariesConfig {
            enabled: false,
            ..config()
        });
        let g = graph(&[("app.py", &[("base.models", 1)])]);
        assert!(validate(&rule, &g).is_empty());
    }

    #[test]
    fn issues_are_sorted_and_use_configured_severity() {
        let rule = RuleRepoBoundaries::new(RepoBoundariesConfig {
            severity: Severity::Warning,
            ..config()
        });
        let g = graph(&[
            ("z.py", &[("base.models", 1)]),
            ("a.py", &[("internal.private", 7), ("base.models", 3)]),
        ]);

        let issues = validate(&rule, &g);

        let keys: Vec<_> = issues.iter().map(|i| (i.file.as_str(), i.line)).collect();
        assert_eq!(keys, vec![("a.py", 3), ("a.py", 7), ("z.py", 1)]);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    }
}
