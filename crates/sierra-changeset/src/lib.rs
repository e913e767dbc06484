//! SIERRA change sets
//!
//! Parameter changes against simulator input templates.
//!
//! # Core Concepts
//!
//! - [`ParamChange`]: one `(path, attribute, value)` edit
//! - [`ChangeSet`]: every edit needed to realise one experiment
//! - [`ElementPath`]: location expression into a template document
//! - [`TemplateEditor`]: capability surface used to apply change sets
//! - [`persist`]: versioned per-experiment definition files
//!
//! # Example
//!
//! ```rust,ignore
//! use sierra_changeset::{ChangeSetBuilder, ElementPath, persist};
//!
//! let entity = ElementPath::descendant(&["arena", "distribute", "entity"]);
//! let changes = ChangeSetBuilder::new().set(&entity, "quantity", 16).build();
//!
//! persist::write_records(&exp_dir.join(persist::EXP_DEF_FILENAME), &[changes])?;
//! ```

#![warn(unreachable_pub)]

mod change;
mod editor;
mod path;
pub mod persist;

pub use change::{ChangeSet, ChangeSetBuilder, Conflict, ParamChange};
pub use editor::{apply_changes, EditError, Element, ElementTree, TemplateEditor};
pub use path::{Anchor, ElementPath, PathError};
pub use persist::PersistError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
