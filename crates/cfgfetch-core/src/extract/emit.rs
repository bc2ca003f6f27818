//! Block YAML writer: two spaces per level, sequences indented under their key.
//!
//! serde_yaml writes `key:\n- item`; this writes `key:\n  - item`. Scalars are
//! still rendered by serde_yaml, so quoting and block scalars match it.

use serde_yaml::{Mapping, Value};

use super::yaml::{Keyed, Selection};

#[derive(Debug, thiserror::Error)]
pub(super) enum EmitError {
    /// A key that does not fit on one `key:` line (collection, tagged, too long).
    #[error("mapping key needs explicit-key syntax")]
    ComplexKey,
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

type Result<T> = std::result::Result<T, EmitError>;

/// Encodes `selection`, wrapped in `{new_key: ...}` when `new_key` is set.
pub(super) fn to_string(selection: &Selection<'_>, new_key: &str) -> Result<String> {
    let mut w = Writer::default();
    if new_key.is_empty() {
        match selection {
            Selection::One(v) => w.root(v)?,
            Selection::Many(vs) => w.sequence(vs.iter().copied(), 0, false)?,
        }
    } else {
        w.out.push_str(&key_text(&Value::String(new_key.to_owned()))?);
        w.out.push(':');
        match selection {
            Selection::One(v) => w.slot(v, 0, false)?,
            Selection::Many(vs) => {
                w.out.push('\n');
                w.sequence(vs.iter().copied(), 2, false)?;
            }
        }
    }
    Ok(w.out)
}

fn is_block(v: &Value) -> bool {
    match v {
        Value::Mapping(m) => !m.is_empty(),
        Value::Sequence(s) => !s.is_empty(),
        _ => false,
    }
}

#[derive(Default)]
struct Writer {
    out: String,
}

impl Writer {
    fn pad(&mut self, n: usize) {
        self.out.extend(std::iter::repeat(' ').take(n));
    }

    fn root(&mut self, v: &Value) -> Result<()> {
        match v {
            v if is_block(v) => self.block(v, 0),
            Value::Tagged(t) if is_block(&t.value) => {
                self.out.push_str(&t.tag.to_string());
                self.out.push('\n');
                self.block(&t.value, 0)
            }
            _ => {
                self.out.push_str(&scalar_text(v, 0)?);
                self.out.push('\n');
                Ok(())
            }
        }
    }

    /// Non-empty collection starting on a fresh line at column `indent`.
    fn block(&mut self, v: &Value, indent: usize) -> Result<()> {
        match v {
            Value::Mapping(m) => self.mapping(m, indent, false),
            Value::Sequence(s) => self.sequence(s.iter(), indent, false),
            _ => Ok(()),
        }
    }

    /// With `first_inline` the first entry continues the current line (after `- `).
    fn mapping(&mut self, m: &Mapping, indent: usize, first_inline: bool) -> Result<()> {
        for (i, (k, v)) in m.iter().enumerate() {
            if i > 0 || !first_inline {
                self.pad(indent);
            }
            self.out.push_str(&key_text(k)?);
            self.out.push(':');
            self.slot(v, indent, false)?;
        }
        Ok(())
    }

    fn sequence<'v>(
        &mut self,
        items: impl Iterator<Item = &'v Value>,
        indent: usize,
        first_inline: bool,
    ) -> Result<()> {
        for (i, v) in items.enumerate() {
            if i > 0 || !first_inline {
                self.pad(indent);
            }
            self.out.push('-');
            self.slot(v, indent, true)?;
        }
        Ok(())
    }

    /// Writes `v` after a `key:` or `-` at column `col`.
    fn slot(&mut self, v: &Value, col: usize, in_seq: bool) -> Result<()> {
        match v {
            Value::Mapping(m) if !m.is_empty() => {
                self.out.push(if in_seq { ' ' } else { '\n' });
                self.mapping(m, col + 2, in_seq)
            }
            Value::Sequence(s) if !s.is_empty() => {
                self.out.push(if in_seq { ' ' } else { '\n' });
                self.sequence(s.iter(), col + 2, in_seq)
            }
            Value::Tagged(t) if is_block(&t.value) => {
                self.out.push(' ');
                self.out.push_str(&t.tag.to_string());
                self.out.push('\n');
                self.block(&t.value, col + 2)
            }
            _ => {
                self.out.push(' ');
                self.out.push_str(&scalar_text(v, col)?);
                self.out.push('\n');
                Ok(())
            }
        }
    }
}

/// Scalar (or empty collection) as serde_yaml writes a mapping value at
/// column 0, shifted right by `col` on continuation lines.
fn scalar_text(v: &Value, col: usize) -> Result<String> {
    let text = serde_yaml::to_string(&Keyed { key: "k", value: v })?;
    let body = text.strip_prefix("k:").ok_or(EmitError::ComplexKey)?;
    let body = body
        .strip_suffix("\n...\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body);
    let body = body.strip_prefix(' ').unwrap_or(body);

    let mut out = String::with_capacity(body.len());
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.extend(std::iter::repeat(' ').take(col));
            }
        }
        out.push_str(line);
    }
    Ok(out)
}

fn key_text(k: &Value) -> Result<String> {
    if matches!(k, Value::Mapping(_) | Value::Sequence(_) | Value::Tagged(_)) {
        return Err(EmitError::ComplexKey);
    }
    let text = serde_yaml::to_string(&Keyed { key: k, value: () })?;
    match text.strip_suffix(": null\n") {
        Some(key) if !key.contains('\n') && !key.starts_with("? ") => Ok(key.to_string()),
        _ => Err(EmitError::ComplexKey),
    }
}
