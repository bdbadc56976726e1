//! Window + GL context glue. Thin wrappers with no policy of their own; every
//! failure maps to [`ViewerError::ContextCreation`].

use std::ffi::CString;
use std::num::NonZeroU32;

use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::prelude::GlSurface;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::HasRawWindowHandle;
use tracing::debug;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use fraglive_core::{ViewerConfig, ViewerError};

pub struct GlHost {
    pub window: Window,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    pub gl: glow::Context,
}

impl GlHost {
    pub fn new(event_loop: &EventLoop<()>, cfg: &ViewerConfig) -> Result<Self, ViewerError> {
        let window_builder = WindowBuilder::new()
            .with_title(&cfg.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                cfg.width as f64,
                cfg.height as f64,
            ));

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(0)
            .with_stencil_size(0)
            .with_transparency(false);

        let display_builder =
            glutin_winit::DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .unwrap()
            })
            .map_err(|e| ViewerError::ContextCreation(format!("DisplayBuilder.build: {e}")))?;

        let window = window.ok_or_else(|| {
            ViewerError::ContextCreation("DisplayBuilder did not create a window".into())
        })?;

        let raw_window_handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_window_handle));

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| ViewerError::ContextCreation(format!("create_context: {e}")))?;

        let (width, height): (u32, u32) = window.inner_size().into();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width.max(1)).unwrap(),
            NonZeroU32::new(height.max(1)).unwrap(),
        );

        let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .map_err(|e| ViewerError::ContextCreation(format!("create_window_surface: {e}")))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| ViewerError::ContextCreation(format!("make_current: {e}")))?;

        if cfg.vsync {
            if let Err(e) =
                surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()))
            {
                debug!("swap interval not honored: {e}");
            }
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                gl_display.get_proc_address(CString::new(s).unwrap().as_c_str()) as *const _
            })
        };

        Ok(Self {
            window,
            surface,
            context,
            gl,
        })
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.surface.resize(
            &self.context,
            NonZeroU32::new(width.max(1)).unwrap(),
            NonZeroU32::new(height.max(1)).unwrap(),
        );
    }

    pub fn present(&self) -> Result<(), glutin::error::Error> {
        self.surface.swap_buffers(&self.context)
    }
}
