pub mod bootstrap;
pub mod error;
pub mod files;
pub mod manifest;
pub mod packages;
pub mod patch;
pub mod process;
pub mod project;
pub mod stubs;

// Re-export commonly used types
pub use error::ScaffoldError;
pub use patch::Entry;
pub use process::{Runner, SystemRunner};
pub use project::Project;
pub use stubs::StubStore;
