//! fraglive shader machine (glow/OpenGL backend)
//
// This crate intentionally contains **only** the GPU-facing pieces:
// - read shader source and compile/link it against the built-in vertex stage
// - resolve the fixed uniform bindings (time / resolution / pointer)
// - fullscreen quad geometry
// - GL error-queue draining
//
// It does NOT contain windowing, file watching, or reload policy.
#![allow(clippy::missing_safety_doc)]

use std::fs;
use std::path::{Path, PathBuf};

use glow::HasContext;
use tracing::error;

pub use fraglive_core::{GpuFaultKind, ViewerError};

/// Built-in vertex stage. Attribute location 0 is the quad position in clip
/// space; the fragment shader is the only user-replaceable stage.
pub const QUAD_VERT: &str = r#"#version 330 core
layout(location = 0) in vec2 a_pos;
void main() {
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

/// Shader file content captured at a point in time.
///
/// Read fresh from disk on every (re)compile attempt and discarded after the
/// compile; never cached across reloads.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub text: String,
    /// Origin path, for logs.
    pub origin: PathBuf,
}

impl ShaderSource {
    pub fn read(path: &Path) -> Result<Self, ViewerError> {
        let text = fs::read_to_string(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            text,
            origin: path.to_path_buf(),
        })
    }
}

// -------------------------------------------------------------------------------------------------
// Uniform bindings
// -------------------------------------------------------------------------------------------------

/// Resolved locations for the fixed uniform set.
///
/// Shaders may declare any subset of `time`, `resolution`, `pointer`; an
/// absent uniform resolves to `None` and its write is a no-op.
#[derive(Debug)]
pub struct UniformBindings {
    pub time: Option<glow::NativeUniformLocation>,
    pub resolution: Option<glow::NativeUniformLocation>,
    pub pointer: Option<glow::NativeUniformLocation>,
}

impl UniformBindings {
    pub unsafe fn resolve(gl: &glow::Context, program: glow::NativeProgram) -> Self {
        Self {
            time: gl.get_uniform_location(program, "time"),
            resolution: gl.get_uniform_location(program, "resolution"),
            pointer: gl.get_uniform_location(program, "pointer"),
        }
    }

    pub unsafe fn write_time(&self, gl: &glow::Context, seconds: f32) {
        if let Some(loc) = &self.time {
            gl.uniform_1_f32(Some(loc), seconds);
        }
    }

    pub unsafe fn write_resolution(&self, gl: &glow::Context, width: f32, height: f32) {
        if let Some(loc) = &self.resolution {
            gl.uniform_2_f32(Some(loc), width, height);
        }
    }

    pub unsafe fn write_pointer(&self, gl: &glow::Context, x: f32, y: f32) {
        if let Some(loc) = &self.pointer {
            gl.uniform_2_f32(Some(loc), x, y);
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Compile / link
// -------------------------------------------------------------------------------------------------

/// A fully linked program plus its stage objects and resolved uniforms.
///
/// Either every GPU object here was created and linked, or this value was
/// never constructed; the render loop cannot observe a half-built program.
#[derive(Debug)]
pub struct CompiledProgram {
    pub program: glow::NativeProgram,
    vertex: glow::NativeShader,
    fragment: glow::NativeShader,
    pub uniforms: UniformBindings,
}

impl CompiledProgram {
    /// Detaches and deletes the stage objects, then the program itself.
    pub unsafe fn release(self, gl: &glow::Context) {
        gl.detach_shader(self.program, self.vertex);
        gl.delete_shader(self.vertex);
        gl.detach_shader(self.program, self.fragment);
        gl.delete_shader(self.fragment);
        gl.delete_program(self.program);
    }
}

/// Compiles and links a program from the built-in vertex stage and the given
/// fragment source.
///
/// Compile and link are validated as separate phases so diagnostics name the
/// failing stage: per-stage syntax errors and link-time interface mismatches
/// are different fault classes. Nothing created here leaks on failure.
pub unsafe fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<CompiledProgram, ViewerError> {
    let vs = gl
        .create_shader(glow::VERTEX_SHADER)
        .map_err(|e| ViewerError::GlCreate(format!("create_shader(VS) failed: {e:?}")))?;
    gl.shader_source(vs, vert_src);
    gl.compile_shader(vs);
    if !gl.get_shader_compile_status(vs) {
        let log = gl.get_shader_info_log(vs);
        gl.delete_shader(vs);
        return Err(ViewerError::VertexCompile(log));
    }

    let fs = match gl.create_shader(glow::FRAGMENT_SHADER) {
        Ok(fs) => fs,
        Err(e) => {
            gl.delete_shader(vs);
            return Err(ViewerError::GlCreate(format!(
                "create_shader(FS) failed: {e:?}"
            )));
        }
    };
    gl.shader_source(fs, frag_src);
    gl.compile_shader(fs);
    if !gl.get_shader_compile_status(fs) {
        let log = gl.get_shader_info_log(fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        return Err(ViewerError::FragmentCompile(log));
    }

    let program = match gl.create_program() {
        Ok(program) => program,
        Err(e) => {
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(ViewerError::GlCreate(format!(
                "create_program failed: {e:?}"
            )));
        }
    };
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.detach_shader(program, vs);
        gl.delete_shader(vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(fs);
        gl.delete_program(program);
        return Err(ViewerError::Link(log));
    }

    let uniforms = UniformBindings::resolve(gl, program);

    Ok(CompiledProgram {
        program,
        vertex: vs,
        fragment: fs,
        uniforms,
    })
}

// -------------------------------------------------------------------------------------------------
// Fullscreen quad
// -------------------------------------------------------------------------------------------------

pub const QUAD_VERTEX_COUNT: i32 = 6;

/// Static full-screen quad: two triangles covering clip space (-1,-1)..(1,1),
/// position only, attribute location 0.
#[derive(Debug)]
pub struct FullscreenQuad {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
}

impl FullscreenQuad {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, ViewerError> {
        let verts: [f32; 12] = [
            -1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0,
        ];

        let vao = gl
            .create_vertex_array()
            .map_err(|e| ViewerError::GlCreate(format!("create_vertex_array: {e}")))?;
        let vbo = gl
            .create_buffer()
            .map_err(|e| ViewerError::GlCreate(format!("create_buffer: {e}")))?;

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&verts),
            glow::STATIC_DRAW,
        );

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 0, 0);

        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        Ok(Self { vao, vbo })
    }

    pub unsafe fn draw(&self, gl: &glow::Context) {
        gl.bind_vertex_array(Some(self.vao));
        gl.draw_arrays(glow::TRIANGLES, 0, QUAD_VERTEX_COUNT);
        gl.bind_vertex_array(None);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
    }
}

// -------------------------------------------------------------------------------------------------
// GL error queue
// -------------------------------------------------------------------------------------------------

fn classify_gl_error(code: u32) -> GpuFaultKind {
    match code {
        glow::INVALID_OPERATION => GpuFaultKind::InvalidOperation,
        glow::INVALID_ENUM => GpuFaultKind::InvalidEnum,
        glow::INVALID_VALUE => GpuFaultKind::InvalidValue,
        glow::OUT_OF_MEMORY => GpuFaultKind::OutOfMemory,
        other => GpuFaultKind::Unknown(other),
    }
}

/// Drains every pending code from the GL error queue, reporting each one.
///
/// The queue can hold several codes, so a single `get_error` call is not
/// enough. Returns the first drained fault; the caller decides what a fault
/// means (for the frame driver it is always fatal).
pub unsafe fn drain_gpu_faults(
    gl: &glow::Context,
    location: &'static str,
) -> Result<(), ViewerError> {
    let mut first: Option<GpuFaultKind> = None;
    loop {
        let code = gl.get_error();
        if code == glow::NO_ERROR {
            break;
        }
        let kind = classify_gl_error(code);
        error!(%kind, location, "GPU fault");
        if first.is_none() {
            first = Some(kind);
        }
    }
    match first {
        Some(kind) => Err(ViewerError::Gpu { kind, location }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn classify_covers_the_known_gl_codes() {
        assert_eq!(
            classify_gl_error(glow::INVALID_OPERATION),
            GpuFaultKind::InvalidOperation
        );
        assert_eq!(
            classify_gl_error(glow::INVALID_ENUM),
            GpuFaultKind::InvalidEnum
        );
        assert_eq!(
            classify_gl_error(glow::INVALID_VALUE),
            GpuFaultKind::InvalidValue
        );
        assert_eq!(
            classify_gl_error(glow::OUT_OF_MEMORY),
            GpuFaultKind::OutOfMemory
        );
        assert_eq!(classify_gl_error(0x9999), GpuFaultKind::Unknown(0x9999));
    }

    #[test]
    fn shader_source_read_keeps_text_and_origin() {
        let mut path = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        path.push(format!("fraglive_shader_source_{ts}.frag"));
        fs::write(&path, "void main() {}").expect("write shader");

        let source = ShaderSource::read(&path).expect("read shader");
        assert_eq!(source.text, "void main() {}");
        assert_eq!(source.origin, path);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn shader_source_read_missing_file_is_an_io_fault() {
        let err = ShaderSource::read(Path::new("/nonexistent/fraglive.frag"))
            .expect_err("missing file must fail");
        assert!(matches!(err, ViewerError::Io { .. }));
    }
}
