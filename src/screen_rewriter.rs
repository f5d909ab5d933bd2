//! Rewrites scaffolded screens so relationship fields show a readable column.
//!
//! The rewrite is best effort: a line whose relationship can't be resolved is
//! logged and left as it was.

use crate::class_model::{ClassModel, ClassRegistry, RelationKind};
use crate::error::DisplayFieldError;
use crate::types::TableMeta;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// `->relationship('category', 'name')`
fn relationship_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"->relationship\(\s*['"](\w+)['"]\s*,\s*['"](\w+)['"]"#)
            .expect("invalid built-in relationship regex")
    })
}

/// `TextColumn::make('category.name')`
fn dotted_field() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"::make\(\s*['"](\w+)\.(\w+)['"]"#).expect("invalid built-in dotted field regex")
    })
}

/// Picks the column shown for rows of `table`.
///
/// Ids and foreign keys are never shown. The first remaining column whose
/// name contains one of `hints` wins, otherwise the last remaining column.
pub fn choose_display_field<'a>(
    table: &'a TableMeta,
    hints: &[String],
) -> Result<&'a str, DisplayFieldError> {
    let mut fallback = None;

    for column in table
        .columns
        .iter()
        .filter(|column| !column.is_id_like() && !table.is_foreign_key_column(&column.name))
    {
        let lowered = column.name.to_lowercase();
        if hints.iter().any(|hint| lowered.contains(hint.as_str())) {
            return Ok(&column.name);
        }
        fallback = Some(column.name.as_str());
    }

    fallback.ok_or_else(|| DisplayFieldError::NoCandidate {
        table: table.name.clone(),
    })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub content: String,
    pub rewritten_lines: usize,
    pub failed_lines: usize,
}

pub struct ScreenRewriter<'a> {
    registry: &'a ClassRegistry,
    hints: &'a [String],
}

impl<'a> ScreenRewriter<'a> {
    pub fn new(registry: &'a ClassRegistry, hints: &'a [String]) -> Self {
        Self { registry, hints }
    }

    pub fn rewrite(&self, class: &ClassModel, screen: &str) -> RewriteOutcome {
        let mut outcome = RewriteOutcome::default();

        let lines: Vec<String> = screen
            .split('\n')
            .map(|line| match self.rewrite_line(class, line) {
                Ok(Some(rewritten)) => {
                    outcome.rewritten_lines += 1;
                    rewritten
                }
                Ok(None) => line.to_string(),
                Err(e) => {
                    tracing::warn!(
                        class = %class.class_name,
                        line = line.trim(),
                        error = %e,
                        "could not pick a display field, line left unchanged"
                    );
                    outcome.failed_lines += 1;
                    line.to_string()
                }
            })
            .collect();

        outcome.content = lines.join("\n");
        outcome
    }

    /// `Ok(None)` when the line has nothing to replace.
    fn rewrite_line(&self, class: &ClassModel, line: &str) -> Result<Option<String>, DisplayFieldError> {
        let mut replacements: Vec<(Range<usize>, &str)> = Vec::new();

        for pattern in [relationship_call(), dotted_field()] {
            for captures in pattern.captures_iter(line) {
                let (Some(relationship), Some(field)) = (captures.get(1), captures.get(2)) else {
                    continue;
                };
                let Some(target) = self.belongs_to_target(class, relationship.as_str()) else {
                    continue;
                };

                let table = self
                    .registry
                    .table(target)
                    .ok_or_else(|| DisplayFieldError::UnknownClass(target.to_string()))?;
                let shown = choose_display_field(table, self.hints)?;

                if shown != field.as_str() {
                    replacements.push((field.range(), shown));
                }
            }
        }

        if replacements.is_empty() {
            return Ok(None);
        }

        replacements.sort_by_key(|(range, _)| range.start);
        let mut rewritten = line.to_string();
        for (range, shown) in replacements.into_iter().rev() {
            rewritten.replace_range(range, shown);
        }

        Ok(Some(rewritten))
    }

    fn belongs_to_target<'c>(&self, class: &'c ClassModel, relationship: &str) -> Option<&'c str> {
        class
            .accessor(relationship)
            .filter(|accessor| accessor.kind == RelationKind::BelongsTo)
            .map(|accessor| accessor.target_class.as_str())
    }
}
