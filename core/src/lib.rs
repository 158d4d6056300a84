pub mod analyzer;
pub mod blocks;
pub mod classify;
pub mod config;
pub mod diagnostic;
pub mod functions;
pub mod literals;
pub mod outline;
pub mod registry;
pub mod scan;
pub mod scope;
pub mod source;
pub mod then;
pub mod util;

#[cfg(test)]
mod blocks_test;
#[cfg(test)]
mod config_test;
#[cfg(test)]
mod literals_test;
#[cfg(test)]
mod scope_test;
#[cfg(test)]
mod then_test;

pub use analyzer::{AblAnalyzer, Analysis};
pub use blocks::BlockRange;
pub use classify::{TokenCategory, TokenSpan};
pub use config::AnalyzerConfig;
pub use diagnostic::{BlockKind, Diagnostic, DiagnosticKind, Severity};
pub use functions::{FunctionInfo, FunctionMap};
pub use outline::{Declaration, DeclarationKind, Outline, Reference, ReferenceKind, Symbol};
pub use registry::{KeywordClass, KeywordRegistry};
pub use source::SourceLines;
