//! IDE features: high-level queries for editor integrations.
//!
//! Each function takes data in and returns data out, using this crate's
//! own types. Protocol types are converted at the integration boundary.
//!
//! ## Usage
//!
//! ```
//! use cmake_outline::hir::SearchScope;
//! use cmake_outline::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! let file = host.set_file_content("/p/CMakeLists.txt", "function(hello)\nendfunction()\n");
//!
//! let analysis = host.analysis();
//! let outline = analysis.outline(file).unwrap();
//! assert_eq!(outline.children[0].label, "function(hello)");
//! assert_eq!(analysis.definitions_named(&SearchScope::All, "hel.*").len(), 1);
//! ```

mod analysis;
mod outline;
mod symbols;

pub use analysis::{Analysis, AnalysisHost};
pub use outline::{OutlineKind, OutlineNode, build_outline};
pub use symbols::{goto_definition, workspace_symbols};
