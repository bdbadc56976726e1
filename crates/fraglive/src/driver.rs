//! The per-frame loop: poll the watch, reload on change, gather inputs, draw.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use glow::HasContext;
use tracing::{info, warn};

use fraglive_core::{ProgramSlot, ShaderWatch, ViewerError};
use fraglive_runtime_glow::{
    compile_program, drain_gpu_faults, CompiledProgram, FullscreenQuad, ShaderSource, QUAD_VERT,
};

/// Per-frame snapshot of everything the uniform contract exposes.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs {
    /// Seconds since the viewer started.
    pub time: f32,
    /// Framebuffer size in pixels.
    pub width: u32,
    pub height: u32,
    /// Pointer position in window coordinates.
    pub pointer: [f32; 2],
}

/// Render-loop state that survives across frames.
///
/// The slot is only ever mutated here, from the host's single thread of
/// control; a reload fault leaves it untouched and the previous program keeps
/// rendering.
#[derive(Debug)]
pub struct FrameDriver {
    watch: ShaderWatch,
    slot: ProgramSlot<CompiledProgram>,
    quad: FullscreenQuad,
    started: Instant,
}

impl FrameDriver {
    /// Startup: static quad geometry plus the first compile of the watched
    /// shader. A fault here is fatal; there is no previous program to fall
    /// back to.
    pub unsafe fn new(gl: &glow::Context, shader_path: &Path) -> Result<Self, ViewerError> {
        let quad = FullscreenQuad::new(gl)?;
        drain_gpu_faults(gl, "quad setup")?;

        let source = ShaderSource::read(shader_path)?;
        let program = compile_program(gl, QUAD_VERT, &source.text)?;
        drain_gpu_faults(gl, "startup compile")?;

        let watch = ShaderWatch::new(shader_path);
        info!(shader = %shader_path.display(), "watching fragment shader");

        Ok(Self {
            watch,
            slot: ProgramSlot::new(program),
            quad,
            started: Instant::now(),
        })
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// One loop iteration: poll, reload if the file moved, then draw.
    pub unsafe fn frame(
        &mut self,
        gl: &glow::Context,
        inputs: FrameInputs,
    ) -> Result<(), ViewerError> {
        if self.watch.poll() {
            println!("shader modified: {}", self.watch.path().display());
            self.reload(gl);
        }
        self.draw(gl, inputs)
    }

    /// Reload step. Any fault (unreadable file, compile error, link error)
    /// is logged and the installed program keeps rendering.
    unsafe fn reload(&mut self, gl: &glow::Context) {
        let displaced = attempt_reload(&mut self.slot, || {
            let source = ShaderSource::read(self.watch.path())?;
            compile_program(gl, QUAD_VERT, &source.text)
        });
        if let Some(old) = displaced {
            old.release(gl);
        }
    }

    unsafe fn draw(&self, gl: &glow::Context, inputs: FrameInputs) -> Result<(), ViewerError> {
        gl.viewport(0, 0, inputs.width as i32, inputs.height as i32);
        gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        gl.enable(glow::BLEND);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(glow::COLOR_BUFFER_BIT);
        drain_gpu_faults(gl, "frame setup")?;

        let Some(program) = self.slot.current() else {
            return Ok(());
        };

        gl.use_program(Some(program.program));
        drain_gpu_faults(gl, "use_program")?;

        program.uniforms.write_time(gl, inputs.time);
        program
            .uniforms
            .write_resolution(gl, inputs.width as f32, inputs.height as f32);
        program
            .uniforms
            .write_pointer(gl, inputs.pointer[0], inputs.pointer[1]);

        self.quad.draw(gl);
        drain_gpu_faults(gl, "quad draw")?;

        Ok(())
    }

    /// Shutdown: release the live program and the quad geometry.
    pub unsafe fn shutdown(&mut self, gl: &glow::Context) {
        if let Some(program) = self.slot.take() {
            program.release(gl);
        }
        self.quad.destroy(gl);
    }
}

/// Applies a reload attempt to the slot: success installs the new program and
/// hands back the displaced one; failure leaves the slot untouched.
fn attempt_reload<P, E: fmt::Display>(
    slot: &mut ProgramSlot<P>,
    compile: impl FnOnce() -> Result<P, E>,
) -> Option<P> {
    match compile() {
        Ok(program) => {
            info!("shader reloaded");
            slot.install(program)
        }
        Err(fault) => {
            warn!("reload failed, keeping previous program: {fault}");
            None
        }
    }
}
