use crate::index::OwnershipIndex;
use crate::syntax::{ImportOccurrence, SyntaxKind, scan};
use crate::workspace::ModuleIdentity;
use importfix_types::report::{AmbiguousImport, RewriteKind, RewriteRecord};
use std::ops::Range;
use tracing::{debug, warn};

/// Why an occurrence is left as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepReason {
    /// `<Module/Header.h>` is already canonical.
    AlreadyQualified,
    Unrecognized,
    /// No module ships this header: a system header or a file of the current module.
    NotIndexed,
    /// The header belongs to the module the file is in.
    SameModule,
    Ambiguous { candidates: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Rewrite {
        kind: RewriteKind,
        replacement: String,
    },
    Keep(KeepReason),
}

/// Rewritten text plus what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOutcome {
    pub content: String,
    pub changed: bool,
    pub rewrites: Vec<RewriteRecord>,
    pub ambiguous: Vec<AmbiguousImport>,
}

/// Applies the ownership decision rule to the imports of a file.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'a> {
    index: &'a OwnershipIndex,
}

impl<'a> Sanitizer<'a> {
    pub fn new(index: &'a OwnershipIndex) -> Self {
        Self { index }
    }

    /// Decide one occurrence. `owner` is the module the file belongs to, if any.
    pub fn decide(&self, occ: &ImportOccurrence<'_>, owner: Option<&ModuleIdentity>) -> Decision {
        match occ.kind {
            SyntaxKind::AngleWithSlash => Decision::Keep(KeepReason::AlreadyQualified),
            SyntaxKind::Unrecognized => Decision::Keep(KeepReason::Unrecognized),
            SyntaxKind::QuotedWithSlash => Decision::Rewrite {
                kind: RewriteKind::QuotedWithSlash,
                replacement: format!("{} <{}>", occ.directive, occ.payload),
            },
            SyntaxKind::NoSlash => {
                let Some(header) = occ.header else {
                    return Decision::Keep(KeepReason::Unrecognized);
                };
                let Some(owners) = self.index.owners(header) else {
                    return Decision::Keep(KeepReason::NotIndexed);
                };
                let [module] = owners else {
                    return Decision::Keep(KeepReason::Ambiguous {
                        candidates: owners.to_vec(),
                    });
                };
                if owner.is_some_and(|o| o.is(module)) {
                    return Decision::Keep(KeepReason::SameModule);
                }
                Decision::Rewrite {
                    kind: RewriteKind::NoSlash,
                    replacement: format!("{} <{}/{}>", occ.directive, module, header),
                }
            }
        }
    }

    /// Rewrite every qualifying import of `text`.
    ///
    /// Replacements touch only each occurrence's own span and are applied from the highest
    /// offset down, so earlier spans stay valid.
    pub fn sanitize(&self, text: &str, owner: Option<&ModuleIdentity>) -> SanitizeOutcome {
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        let mut rewrites = Vec::new();
        let mut ambiguous = Vec::new();

        for occ in scan(text) {
            match self.decide(&occ, owner) {
                Decision::Rewrite { kind, replacement } => {
                    debug!(line = occ.line, from = %occ.raw, to = %replacement, "rewrite import");
                    rewrites.push(RewriteRecord {
                        line: occ.line,
                        kind,
                        before: occ.raw.to_string(),
                        after: replacement.clone(),
                    });
                    edits.push((occ.span.clone(), replacement));
                }
                Decision::Keep(KeepReason::Ambiguous { candidates }) => {
                    let header = occ.header.unwrap_or(occ.payload);
                    warn!(
                        header = %header,
                        candidates = %candidates.join(","),
                        line = occ.line,
                        "header belongs to several modules; fix manually or add a patch entry"
                    );
                    ambiguous.push(AmbiguousImport {
                        line: occ.line,
                        header: header.to_string(),
                        candidates,
                    });
                }
                Decision::Keep(_) => {}
            }
        }

        let mut content = text.to_string();
        for (span, replacement) in edits.iter().rev() {
            content.replace_range(span.clone(), replacement);
        }

        SanitizeOutcome {
            changed: !edits.is_empty(),
            content,
            rewrites,
            ambiguous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index() -> OwnershipIndex {
        OwnershipIndex::from_entries([
            ("Foo.h", "Alpha"),
            ("Bar.h", "Beta"),
            ("Shared.h", "Alpha"),
            ("Shared.h", "Gamma"),
            ("UIView+Kit.h", "Kit"),
        ])
    }

    fn alpha() -> ModuleIdentity {
        ModuleIdentity::named("Alpha")
    }

    #[test]
    fn quoted_with_slash_swaps_delimiters() {
        let idx = index();
        let out = Sanitizer::new(&idx).sanitize("#import \"Kit/Views/Button.h\"\n", Some(&alpha()));
        assert_eq!(out.content, "#import <Kit/Views/Button.h>\n");
        assert!(out.changed);
        assert_eq!(out.rewrites[0].kind, RewriteKind::QuotedWithSlash);
    }

    #[test]
    fn no_slash_is_qualified_with_single_owner() {
        let idx = index();
        let out = Sanitizer::new(&idx).sanitize(
            "#import \"Bar.h\"\n#import <Bar.h>\n#include \"Bar.h\"\n",
            Some(&alpha()),
        );
        assert_eq!(
            out.content,
            "#import <Beta/Bar.h>\n#import <Beta/Bar.h>\n#include <Beta/Bar.h>\n"
        );
        assert_eq!(out.rewrites.len(), 3);
        assert_eq!(out.rewrites[2].line, 3);
    }

    #[test]
    fn same_module_is_left_alone() {
        let idx = index();
        let text = "#import \"Foo.h\"\n";
        let out = Sanitizer::new(&idx).sanitize(text, Some(&alpha()));
        assert_eq!(out.content, text);
        assert!(!out.changed);
    }

    #[test]
    fn same_module_matches_canonical_name() {
        let idx = OwnershipIndex::from_entries([("Kit.h", "KitCore")]);
        let owner = ModuleIdentity {
            name: "Kit".to_string(),
            module_name: Some("KitCore".to_string()),
        };
        let out = Sanitizer::new(&idx).sanitize("#import \"Kit.h\"", Some(&owner));
        assert!(!out.changed);
    }

    #[test]
    fn no_owner_always_qualifies() {
        let idx = index();
        let out = Sanitizer::new(&idx).sanitize("#import \"Foo.h\"", None);
        assert_eq!(out.content, "#import <Alpha/Foo.h>");
    }

    #[test]
    fn unindexed_and_qualified_imports_are_untouched() {
        let idx = index();
        let text = "#import <Foundation/Foundation.h>\n#import \"Local.h\"\n#include <stdio.h>\n";
        let out = Sanitizer::new(&idx).sanitize(text, Some(&alpha()));
        assert_eq!(out.content, text);
        assert!(out.rewrites.is_empty());
    }

    #[test]
    fn ambiguous_headers_are_reported_not_rewritten() {
        let idx = index();
        let text = "#import \"Shared.h\"\n";
        let out = Sanitizer::new(&idx).sanitize(text, Some(&ModuleIdentity::named("Beta")));
        assert_eq!(out.content, text);
        assert_eq!(
            out.ambiguous,
            vec![AmbiguousImport {
                line: 1,
                header: "Shared.h".to_string(),
                candidates: vec!["Alpha".to_string(), "Gamma".to_string()],
            }]
        );
    }

    #[test]
    fn quoted_paths_with_dot_segments_still_become_angle_imports() {
        let idx = index();
        let text = "#import \"../Bar.h\"\n#import \"./Foo/Bar.h\"\n#include \"../Shared/X.h\"\n";
        let out = Sanitizer::new(&idx).sanitize(text, None);
        assert_eq!(
            out.content,
            "#import <../Bar.h>\n#import <./Foo/Bar.h>\n#include <../Shared/X.h>\n"
        );
        assert!(out.changed);
        assert_eq!(out.rewrites.len(), 3);
        assert!(out.rewrites.iter().all(|r| r.kind == RewriteKind::QuotedWithSlash));
    }

    #[test]
    fn uppercase_directives_keep_their_spelling() {
        let idx = index();
        let out = Sanitizer::new(&idx).sanitize("#IMPORT \"Bar.h\"\n", Some(&alpha()));
        assert_eq!(out.content, "#IMPORT <Beta/Bar.h>\n");
    }

    #[test]
    fn only_the_exact_span_changes() {
        let idx = index();
        let text = "#import \"UIView+Kit.h\" // \"UIView+Kit.h\"\nconst char *s = \"#import \\\"UIView+Kit.h\\\"\";\n  #import \"UIView+Kit.h\"\n";
        let out = Sanitizer::new(&idx).sanitize(text, None);
        assert_eq!(
            out.content,
            "#import <Kit/UIView+Kit.h> // \"UIView+Kit.h\"\nconst char *s = \"#import \\\"UIView+Kit.h\\\"\";\n  #import <Kit/UIView+Kit.h>\n"
        );
    }

    #[test]
    fn mixed_edits_do_not_drift() {
        let idx = index();
        let text = "#import \"Bar.h\"\n#import \"Kit/A.h\"\n#import <UIKit/UIKit.h>\n#import \"Foo.h\"\n";
        let out = Sanitizer::new(&idx).sanitize(text, Some(&ModuleIdentity::named("Beta")));
        assert_eq!(
            out.content,
            "#import \"Bar.h\"\n#import <Kit/A.h>\n#import <UIKit/UIKit.h>\n#import <Alpha/Foo.h>\n"
        );
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let idx = index();
        let sanitizer = Sanitizer::new(&idx);
        let text = "#import \"Bar.h\"\n#import \"Kit/A.h\"\n#import \"Shared.h\"\n";
        let first = sanitizer.sanitize(text, Some(&alpha()));
        assert!(first.changed);
        let second = sanitizer.sanitize(&first.content, Some(&alpha()));
        assert!(!second.changed);
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn decide_reports_reasons() {
        let idx = index();
        let sanitizer = Sanitizer::new(&idx);
        let text = "#import <A/B.h>\n#import \"\"\n#import \"Nope.h\"\n#import \"Foo.h\"\n";
        let reasons: Vec<Decision> = scan(text)
            .map(|o| sanitizer.decide(&o, Some(&alpha())))
            .collect();
        assert_eq!(
            reasons,
            vec![
                Decision::Keep(KeepReason::AlreadyQualified),
                Decision::Keep(KeepReason::Unrecognized),
                Decision::Keep(KeepReason::NotIndexed),
                Decision::Keep(KeepReason::SameModule),
            ]
        );
    }
}
