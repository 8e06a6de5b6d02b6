//! Cross-run chart grouping and union merge.
//!
//! Charts recorded by different runs share a group key; this crate discovers
//! those groups, checks the members' structural compatibility, and folds
//! their row files into one combined, axis-ordered table ready for export.
//! Merging is read-only with respect to the source files and isolates
//! failures per group.

pub mod matcher;
pub mod table;

pub use matcher::{merge_all, merge_group, plan_groups, GroupMerge, MergeReport};
pub use table::{MergedChart, MergedRow};
