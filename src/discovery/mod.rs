//! Enumerates the files of a tree and decides which of them to analyze.
//!
//! Traversal ([`DirTree`], [`MemoryTree`]) and exclusion ([`IgnoreRules`]) are
//! kept apart: the pipeline walks a tree and asks the ignore predicate about
//! each file once, before it is handed to the analyzers.

mod binary;
mod ignore_rules;
mod tree;

pub use binary::is_binary_sample;
pub use ignore_rules::{is_hidden_path, IgnoreRules};
pub use tree::{DirTree, MemoryTree};
