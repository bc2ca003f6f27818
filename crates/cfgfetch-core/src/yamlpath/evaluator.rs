//! Path evaluation against a parsed document.

use serde_yaml::Value;

use super::ast::{Selector, Step, YamlPath};

impl YamlPath {
    /// All nodes matched by the path, in document order, borrowed from `root`.
    pub fn find<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![root];
        for step in &self.steps {
            let mut next = Vec::new();
            for node in current {
                apply(step, node, &mut next);
            }
            current = next;
        }
        current
    }
}

fn apply<'a>(step: &Step, node: &'a Value, out: &mut Vec<&'a Value>) {
    if step.recursive {
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            select(&step.selector, n, out);
            let mut kids = children(n);
            kids.reverse();
            stack.extend(kids);
        }
    } else {
        select(&step.selector, node, out);
    }
}

/// Looks through `!tag` wrappers.
fn untagged(node: &Value) -> &Value {
    match node {
        Value::Tagged(t) => untagged(&t.value),
        other => other,
    }
}

fn children(node: &Value) -> Vec<&Value> {
    match untagged(node) {
        Value::Mapping(m) => m.values().collect(),
        Value::Sequence(s) => s.iter().collect(),
        _ => Vec::new(),
    }
}

fn select<'a>(selector: &Selector, node: &'a Value, out: &mut Vec<&'a Value>) {
    let node = untagged(node);
    match selector {
        Selector::Wildcard => out.extend(children(node)),
        Selector::Names(names) => {
            if let Value::Mapping(m) = node {
                for name in names {
                    out.extend(
                        m.iter()
                            .filter(|(k, _)| key_matches(k, name))
                            .map(|(_, v)| v),
                    );
                }
            }
        }
        Selector::Indices(indices) => {
            if let Value::Sequence(s) = node {
                for &i in indices {
                    if let Some(v) = resolve_index(i, s.len()).and_then(|i| s.get(i)) {
                        out.push(v);
                    }
                }
            }
        }
        Selector::Slice { start, end, step } => {
            if let Value::Sequence(s) = node {
                out.extend(slice_positions(*start, *end, *step, s.len()).map(|i| &s[i]));
            }
        }
    }
}

/// Scalar keys match by their textual form (`1`, `true`, `key`).
fn key_matches(key: &Value, name: &str) -> bool {
    match untagged(key) {
        Value::String(s) => s == name,
        Value::Number(n) => n.to_string() == name,
        Value::Bool(b) => (if *b { "true" } else { "false" }) == name,
        Value::Null => name == "null" || name == "~",
        _ => false,
    }
}

fn resolve_index(i: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let i = if i < 0 { len + i } else { i };
    (0..len).contains(&i).then_some(i as usize)
}

/// Python-style slice positions.
fn slice_positions(
    start: Option<i64>,
    end: Option<i64>,
    step: i64,
    len: usize,
) -> impl Iterator<Item = usize> {
    let len = len as i64;
    let norm = |v: i64| if v < 0 { v + len } else { v };
    let (mut i, stop) = if step > 0 {
        (
            start.map_or(0, |s| norm(s).clamp(0, len)),
            end.map_or(len, |e| norm(e).clamp(0, len)),
        )
    } else {
        (
            start.map_or(len - 1, |s| norm(s).clamp(-1, len - 1)),
            end.map_or(-1, |e| norm(e).clamp(-1, len - 1)),
        )
    };
    std::iter::from_fn(move || {
        let in_range = if step > 0 { i < stop } else { i > stop };
        if !in_range {
            return None;
        }
        let cur = i;
        i = i.checked_add(step).unwrap_or(stop);
        Some(cur as usize)
    })
}
