// Extraction Config Compiler
// Implements: key normalization, the versioned config schema, rule rendering,
// prompt compilation, submission checks, and config persistence.
// Compilation is pure and synchronous; only the store and handlers are async.

pub mod compiler;
pub mod handlers;
pub mod keys;
pub mod prompts;
pub mod records;
pub mod rules;
pub mod schema;
pub mod store;
pub mod validation;

pub use store::{ConfigStore, PgConfigStore};
