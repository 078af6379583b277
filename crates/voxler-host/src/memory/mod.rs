//! In-memory host used by tests and the demo binary.

mod host;
mod library;
mod progress;

pub use host::{BodyShape, HostOp, MemoryBody, MemoryHost, MemoryHostStats};
pub use library::{AppearanceEntry, AppearanceLibrary, AppearancesConfig, LibraryAppearance};
pub use progress::ScriptedProgress;
