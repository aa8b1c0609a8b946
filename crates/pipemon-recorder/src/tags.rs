//! Label sets from `by` path expressions

use crate::error::{RecordError, RecordResult};
use pipemon_metrics::{TagKey, TagSet};
use pipemon_path::{PathTemplate, Value};

/// Label key for a path expression.
///
/// `.spec.pipelineRef.name` becomes `spec_pipelineRef_name`; every run of
/// characters other than ASCII letters and digits collapses into one `_`.
pub fn tag_key_for(path: &str) -> TagKey {
    let trimmed = path.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|p| p.strip_suffix('}'))
        .unwrap_or(trimmed);

    let mut key = String::with_capacity(inner.len());
    for c in inner.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c);
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    let key = key.trim_matches('_');
    TagKey::new(if key.is_empty() { "value" } else { key })
}

/// Tag keys for a view, in `by` order
pub fn view_tags(by: &[String]) -> Vec<TagKey> {
    by.iter().map(|path| tag_key_for(path)).collect()
}

/// Resolve every `by` path against `input`.
///
/// Each path has to produce exactly one value; the first failure aborts
/// the whole set.
pub fn tag_set_from_by(by: &[String], input: &Value) -> RecordResult<TagSet> {
    let mut tags = TagSet::new();
    for path in by {
        let template = PathTemplate::expression(path)?;
        let results = template.find_results(input)?;
        let mut values = results.into_iter().flatten();
        match (values.next(), values.count()) {
            (Some(value), 0) => tags.insert(tag_key_for(path), value.render()),
            (first, rest) => {
                return Err(RecordError::TagResultCount {
                    path: path.clone(),
                    count: usize::from(first.is_some()) + rest,
                })
            }
        }
    }
    Ok(tags)
}
