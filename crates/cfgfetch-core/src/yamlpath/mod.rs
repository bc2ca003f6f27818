//! YAML path queries over `serde_yaml::Value`.
//!
//! # Supported Syntax
//!
//! - `$` - root node (optional: `a.b` means `$.a.b`)
//! - `.name` / `['name']` / `["name"]` - mapping child
//! - `['a','b']` - several children
//! - `[n]`, `[-1]`, `[0,2]` - sequence index (negative counts from the end)
//! - `[start:end:step]` - sequence slice
//! - `.*` / `[*]` - all children
//! - `..name`, `..*`, `..[0]` - recursive descent
//!
//! The empty path selects the root. Results borrow from the queried tree.

mod ast;
mod error;
mod evaluator;
mod parser;

pub use ast::{Selector, Step, YamlPath};
pub use error::YamlPathError;
