mod cli;
mod driver;
mod host;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use fraglive_core::{ViewerConfig, ViewerError};

use crate::cli::Cli;
use crate::driver::{FrameDriver, FrameInputs};
use crate::host::GlHost;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match cli.resolve() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cfg) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cfg: ViewerConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new();
    let host = GlHost::new(&event_loop, &cfg)?;

    let mut driver = unsafe { FrameDriver::new(&host.gl, &cfg.shader)? };
    let mut pointer = [0.0_f32; 2];

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::CursorMoved { position, .. } => {
                    pointer = [position.x as f32, position.y as f32];
                }
                WindowEvent::Resized(size) => {
                    host.resize(size.width, size.height);
                }
                _ => {}
            },

            Event::RedrawRequested(_) => {
                let size = host.window.inner_size();
                let inputs = FrameInputs {
                    time: driver.elapsed_seconds(),
                    width: size.width.max(1),
                    height: size.height.max(1),
                    pointer,
                };

                if let Err(fault) = unsafe { driver.frame(&host.gl, inputs) } {
                    error!("unrecoverable fault, shutting down: {fault}");
                    *control_flow = ControlFlow::ExitWithCode(1);
                    return;
                }
                if let Err(e) = host.present() {
                    error!("swap_buffers failed: {e}");
                    *control_flow = ControlFlow::ExitWithCode(1);
                }
            }

            Event::MainEventsCleared => host.window.request_redraw(),

            Event::LoopDestroyed => unsafe {
                driver.shutdown(&host.gl);
            },

            _ => {}
        }
    });
}
