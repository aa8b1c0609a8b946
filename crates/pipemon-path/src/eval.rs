//! Template evaluation

use crate::error::{PathError, PathResult};
use crate::parser::{CmpOp, Filter, Literal, PathTemplate, Segment, Selector, Step};
use crate::value::Value;
use pipemon_primitives::parse_rfc3339;
use std::cmp::Ordering;

impl PathTemplate {
    /// Evaluate every segment against `input`.
    ///
    /// Returns one result list per segment, in template order. Text segments
    /// produce a single string slot.
    pub fn find_results<'a>(&'a self, input: &'a Value) -> PathResult<Vec<Vec<&'a Value>>> {
        self.segments()
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => Ok(vec![text]),
                Segment::Action(steps) => walk(steps, vec![input], Mode::Strict),
            })
            .collect()
    }
}

/// Missing fields and bad indices are errors in strict mode and are skipped
/// in lenient mode (recursive descent and filter predicates).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Strict,
    Lenient,
}

fn walk<'v>(steps: &[Step], mut nodes: Vec<&'v Value>, mode: Mode) -> PathResult<Vec<&'v Value>> {
    for step in steps {
        let mut next = Vec::new();
        for node in nodes {
            apply(step, node, mode, &mut next)?;
        }
        nodes = next;
    }
    Ok(nodes)
}

fn apply<'v>(step: &Step, node: &'v Value, mode: Mode, out: &mut Vec<&'v Value>) -> PathResult<()> {
    // nothing to traverse behind an absent value
    if is_nil(node) {
        return Ok(());
    }
    match step {
        Step::Field(name) => field(name, node, mode, out),
        Step::Wildcard => {
            children(node, out);
            Ok(())
        }
        Step::Select(selectors) => {
            for selector in selectors {
                select(selector, node, mode, out)?;
            }
            Ok(())
        }
        Step::Recursive(inner) => {
            let mut subtree = vec![node];
            descendants(node, &mut subtree);
            for n in subtree {
                apply(inner, n, Mode::Lenient, out)?;
            }
            Ok(())
        }
        Step::Filter(filter) => {
            let candidates: Vec<&Value> = match node {
                Value::List(items) => items.iter().collect(),
                Value::Map(fields) => fields.values().collect(),
                other if mode == Mode::Strict => {
                    return Err(PathError::NotFilterable { found: other.type_name() })
                }
                _ => return Ok(()),
            };
            for candidate in candidates {
                if matches_filter(filter, candidate)? {
                    out.push(candidate);
                }
            }
            Ok(())
        }
    }
}

fn is_nil(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Time(repr) => repr.is_nil(),
        _ => false,
    }
}

fn field<'v>(name: &str, node: &'v Value, mode: Mode, out: &mut Vec<&'v Value>) -> PathResult<()> {
    match node.get(name) {
        Some(value) => {
            out.push(value);
            Ok(())
        }
        None if mode == Mode::Lenient => Ok(()),
        None => Err(PathError::NotFound { field: name.to_string() }),
    }
}

fn children<'v>(node: &'v Value, out: &mut Vec<&'v Value>) {
    match node {
        Value::List(items) => out.extend(items.iter()),
        Value::Map(fields) => out.extend(fields.values()),
        _ => {}
    }
}

fn descendants<'v>(node: &'v Value, out: &mut Vec<&'v Value>) {
    let mut direct = Vec::new();
    children(node, &mut direct);
    for child in direct {
        out.push(child);
        descendants(child, out);
    }
}

fn select<'v>(
    selector: &Selector,
    node: &'v Value,
    mode: Mode,
    out: &mut Vec<&'v Value>,
) -> PathResult<()> {
    if let Selector::Name(name) = selector {
        return field(name, node, mode, out);
    }
    let items = match node {
        Value::List(items) => items,
        other if mode == Mode::Strict => {
            return Err(PathError::NotIndexable { found: other.type_name() })
        }
        _ => return Ok(()),
    };
    let len = items.len() as i64;
    match *selector {
        Selector::Index(index) => {
            let resolved = if index < 0 { len + index } else { index };
            if (0..len).contains(&resolved) {
                out.push(&items[resolved as usize]);
            } else if mode == Mode::Strict {
                return Err(PathError::IndexOutOfBounds { index, len: items.len() });
            }
        }
        Selector::Slice { start, end, step } => {
            let clamp = |i: i64| if i < 0 { (len + i).max(0) } else { i.min(len) };
            let from = start.map_or(0, clamp);
            let to = end.map_or(len, clamp);
            // from and to are clamped to 0..=len
            if let (Ok(stride @ 1..), true) = (usize::try_from(step), from < to) {
                out.extend((from as usize..to as usize).step_by(stride).map(|i| &items[i]));
            }
        }
        Selector::Name(_) => {}
    }
    Ok(())
}

fn matches_filter(filter: &Filter, candidate: &Value) -> PathResult<bool> {
    let found = walk(&filter.path, vec![candidate], Mode::Lenient)?;
    let Some((op, literal)) = &filter.comparison else {
        return Ok(found.iter().any(|v| !is_nil(v)));
    };
    Ok(found.first().is_some_and(|value| compare(value, *op, literal)))
}

fn compare(value: &Value, op: CmpOp, literal: &Literal) -> bool {
    let ordering = match (value, literal) {
        (Value::String(s), Literal::String(l)) => Some(s.as_str().cmp(l.as_str())),
        (Value::Time(repr), Literal::String(l)) => match (repr.instant(), parse_rfc3339(l)) {
            (Some(t), Ok(lit)) => Some(t.cmp(lit.as_datetime())),
            _ => None,
        },
        (Value::Bool(b), Literal::Bool(l)) => Some(b.cmp(l)),
        (Value::Null, Literal::Null) => Some(Ordering::Equal),
        (Value::Time(repr), Literal::Null) if repr.is_nil() => Some(Ordering::Equal),
        (v, Literal::Number(l)) => v.as_f64().and_then(|n| n.partial_cmp(l)),
        _ => None,
    };
    match ordering {
        Some(ord) => match op {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        },
        // values of different kinds are never equal
        None => op == CmpOp::Ne,
    }
}
