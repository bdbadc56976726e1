use std::fmt;
use std::path::PathBuf;

/// Fault taxonomy used across fraglive crates.
///
/// Contract rule: components construct these and hand them upward; the frame
/// driver alone decides fatality (fatal at startup, non-fatal on the reload
/// path, always fatal for [`ViewerError::Gpu`]).
#[derive(Debug)]
pub enum ViewerError {
    // ---- Host / config ----
    ContextCreation(String),

    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    InvalidConfig {
        path: PathBuf,
        msg: String,
    },

    // ---- Shader machine (backend) ----
    VertexCompile(String),
    FragmentCompile(String),
    Link(String),
    GlCreate(String),

    /// A fault drained from the GL error queue after a state-mutating call.
    Gpu {
        kind: GpuFaultKind,
        location: &'static str,
    },
}

/// Classified GL error-queue code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuFaultKind {
    InvalidOperation,
    InvalidEnum,
    InvalidValue,
    OutOfMemory,
    Unknown(u32),
}

impl fmt::Display for GpuFaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuFaultKind::InvalidOperation => write!(f, "GL_INVALID_OPERATION"),
            GpuFaultKind::InvalidEnum => write!(f, "GL_INVALID_ENUM"),
            GpuFaultKind::InvalidValue => write!(f, "GL_INVALID_VALUE"),
            GpuFaultKind::OutOfMemory => write!(f, "GL_OUT_OF_MEMORY"),
            GpuFaultKind::Unknown(code) => write!(f, "UNKNOWN_ERROR (0x{code:x})"),
        }
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::ContextCreation(msg) => {
                write!(f, "context creation failed: {msg}")
            }
            ViewerError::Io { path, source } => {
                write!(f, "io error at {}: {}", path.display(), source)
            }
            ViewerError::Json { path, source } => {
                write!(f, "json parse error at {}: {}", path.display(), source)
            }
            ViewerError::InvalidConfig { path, msg } => {
                write!(f, "invalid config at {}: {}", path.display(), msg)
            }

            ViewerError::VertexCompile(msg) => write!(f, "vertex shader compile error: {msg}"),
            ViewerError::FragmentCompile(msg) => write!(f, "fragment shader compile error: {msg}"),
            ViewerError::Link(msg) => write!(f, "program link error: {msg}"),
            ViewerError::GlCreate(msg) => write!(f, "backend object creation failed: {msg}"),

            ViewerError::Gpu { kind, location } => {
                write!(f, "GPU fault {kind} at {location}")
            }
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Io { source, .. } => Some(source),
            ViewerError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
