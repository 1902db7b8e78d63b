//! Session store adapters.
//!
//! - **memory**: process-local store for tests and embedding.
//! - **file**: JSON file written atomically, used by the CLI so a login
//!   survives between invocations.

mod atomic_io;
mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
