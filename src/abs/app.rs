//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use glow::HasContext;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::{Keycode, Scancode},
    video::{GLProfile, SwapInterval},
};

use crate::{config::Config, other::WindowState};

/// Errors raised while bringing up SDL2, the window or the GL context.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("can't initialize SDL2: {0}")]
    Sdl(String),

    #[error("can't create window: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),

    #[error("can't create OpenGL context: {0}")]
    Context(String),
}

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
///
/// Fields are dropped top to bottom, so the GL context goes before the window and SDL2 itself
/// is shut down last.
pub struct App {
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
    pub gl_context: sdl2::video::GLContext,
    pub window: sdl2::video::Window,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub sdl: sdl2::Sdl,
}

impl App {
    /// Creates the window and a current GL context as described by `config`.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let sdl = sdl2::init().map_err(AppError::Sdl)?;
        let video_subsystem = sdl.video().map_err(AppError::Sdl)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(config.gl_version.0, config.gl_version.1);
        gl_attr.set_context_flags().forward_compatible().set();

        let mut builder = video_subsystem.window(&config.title, config.width, config.height);
        builder.opengl().resizable().position_centered();
        if config.hidden {
            builder.hidden();
        }
        let window = builder.build()?;

        let gl_context = window.gl_create_context().map_err(AppError::Context)?;
        window
            .gl_make_current(&gl_context)
            .map_err(AppError::Context)?;
        if config.vsync
            && let Err(e) = video_subsystem.gl_set_swap_interval(SwapInterval::VSync)
        {
            log::warn!("vsync unavailable: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(AppError::Sdl)?;

        let (w, h) = window.drawable_size();
        unsafe {
            gl.viewport(0, 0, w as i32, h as i32);
        }
        log::info!("OpenGL {}", unsafe { gl.get_parameter_string(glow::VERSION) });

        Ok(Self {
            gl: Arc::new(gl),
            event_pump,
            gl_context,
            window,
            video_subsystem,
            sdl,
        })
    }

    /// Drains pending events into `state`, then applies held mouse buttons and arrow keys.
    ///
    /// Returns `false` once the window has been asked to close.
    pub fn pump(&mut self, state: &mut WindowState) -> bool {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::Window {
                    win_event: WindowEvent::Close,
                    ..
                }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return false,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(width, height),
                    ..
                } => {
                    let (w, h) = self.window.drawable_size();
                    unsafe {
                        self.gl.viewport(0, 0, w as i32, h as i32);
                    }
                    state.resize(width.max(0) as u32, height.max(0) as u32);
                }
                Event::MouseWheel { precise_y, .. } => state.scroll(precise_y),
                _ => {}
            }
        }

        let mouse = self.event_pump.mouse_state();
        if mouse.left() {
            state.point_at(mouse.x() as f32, mouse.y() as f32);
        }

        let keys = self.event_pump.keyboard_state();
        let held = |code| keys.is_scancode_pressed(code) as i32 as f32;
        let dx = held(Scancode::Right) - held(Scancode::Left);
        let dy = held(Scancode::Up) - held(Scancode::Down);
        if dx != 0.0 || dy != 0.0 {
            state.nudge(dx, dy);
        }

        true
    }

    /// Presents the back buffer.
    pub fn swap_buffers(&self) {
        self.window.gl_swap_window();
    }
}
