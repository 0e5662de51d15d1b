//! Startup settings.
//!
//! Nothing is read from disk or the command line; [`Config::default`] is what the demo runs
//! with.

use std::path::PathBuf;

/// Settings for the window, the GL context and the shader program.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Requested OpenGL core profile version.
    pub gl_version: (u8, u8),
    pub vsync: bool,
    /// Creates the window without showing it.
    pub hidden: bool,
    pub clear_color: [f32; 4],
    pub vertex_shader: Option<PathBuf>,
    pub fragment_shader: Option<PathBuf>,
    /// Vertex input bound to attribute slot 0.
    pub attribute: String,
    /// Fragment output bound to color slot 0.
    pub output: String,
    /// Initial pixels per world unit.
    pub scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Hello!".to_string(),
            width: 640,
            height: 480,
            gl_version: (3, 2),
            vsync: true,
            hidden: false,
            clear_color: [1.0, 1.0, 1.0, 0.0],
            vertex_shader: Some(PathBuf::from("shaders/point.vert")),
            fragment_shader: Some(PathBuf::from("shaders/point.frag")),
            attribute: "pv".to_string(),
            output: "fc".to_string(),
            scale: 100.0,
        }
    }
}
