//! Hierarchical ignore-rule resolution
//!
//! Rule files work like .gitignore files: one may sit in any directory, it
//! only affects that directory's subtree, and deeper or later patterns
//! override broader ones, including through `!` re-inclusion. The engine is
//! split into the line compiler ([`pattern`]), the rule file loader
//! ([`parser`]), the per-directory index ([`index`]), verdict resolution
//! ([`checker`]) and the tree walk ([`scanner`]).

pub mod checker;
pub mod index;
pub mod parser;
pub mod pattern;
pub mod scanner;

// Re-export commonly used items
pub use checker::{IgnoreChecker, IgnoreResult, MatchedRule};
pub use index::DirectoryRuleIndex;
pub use parser::RuleSet;
pub use pattern::{CompiledPattern, PatternType};
pub use scanner::{select_files, FilteredFileScanner, ScanPhase, ScanProgress, ScanResult, ScanStats, UnresolvedEntry};
