//! Unsaved authoring state. Drafts live only in memory until a workflow view
//! flushes them to the API.

mod modules;
mod questions;

pub use modules::{LocalModule, ModuleContent, ModuleDrafts};
pub use questions::{
    ModuleRef, OptionDraft, QuestionDraft, QuestionDrafts, QuestionKind, ValidationError,
};
