#![forbid(unsafe_code)]

//! GPU-free core of the fraglive viewer.
//!
//! Everything here is testable without a window or a GL context: the fault
//! taxonomy, the viewer configuration, the polling file-change detector, and
//! the generic program slot. Backend and host crates build on top.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod slot;
pub mod watch;

pub use config::{load_viewer_config_from, ViewerConfig};
pub use error::{GpuFaultKind, ViewerError};
pub use slot::ProgramSlot;
pub use watch::ShaderWatch;
