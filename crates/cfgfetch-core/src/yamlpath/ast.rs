use std::str::FromStr;

use super::error::YamlPathError;
use super::parser;

/// What a step picks out of each current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Mapping children by key, in the order given.
    Names(Vec<String>),
    /// Sequence items by position.
    Indices(Vec<i64>),
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: i64,
    },
    /// Every mapping value or sequence item.
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// `..`: apply the selector to the node and all its descendants.
    pub recursive: bool,
    pub selector: Selector,
}

/// A compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YamlPath {
    pub steps: Vec<Step>,
}

impl YamlPath {
    /// Compile `path`. See the module docs for the grammar.
    pub fn new(path: &str) -> Result<Self, YamlPathError> {
        parser::parse(path)
    }

    /// True for the empty path (selects the root itself).
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromStr for YamlPath {
    type Err = YamlPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
