//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders,
//! along with [`ShaderSource`] for reading shader text from disk. The [`Uniform`] trait is used
//! for uploading uniform values to a program.

use std::{
    fmt,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::Vec2;
use glow::HasContext;

/// Errors produced while reading a shader source file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("can't open source file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read source file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced while loading, compiling or linking shaders.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to create GL object: {0}")]
    Create(String),

    #[error("compile error in {stage}: {log}")]
    Compile { stage: ShaderType, log: String },

    #[error("link error: {0}")]
    Link(String),
}

/// The kind of a shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderType {
    Vertex,
    Fragment,
}

impl ShaderType {
    fn gl_enum(self) -> u32 {
        match self {
            ShaderType::Vertex => glow::VERTEX_SHADER,
            ShaderType::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderType::Vertex => f.write_str("vertex shader"),
            ShaderType::Fragment => f.write_str("fragment shader"),
        }
    }
}

/// Shader text read from a file, kept with a trailing NUL terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    bytes: Vec<u8>,
}

impl ShaderSource {
    /// Reads the whole file at `path`.
    ///
    /// A read that fails partway discards whatever was already read.
    pub fn read(path: &Path) -> Result<Self, SourceError> {
        let mut file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let len = file.metadata().map(|m| m.len() as usize).unwrap_or(0);
        let mut bytes = Vec::with_capacity(len + 1);
        file.read_to_end(&mut bytes).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        bytes.push(0);

        Ok(Self { bytes })
    }

    /// The file contents without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }

    /// The file contents as text. Invalid UTF-8 is replaced rather than rejected, the driver
    /// reports anything it cannot parse as a compile error.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

/// Reads a shader source file, logging a single error naming the path on failure.
///
/// `None` as the path means there is no stage of this kind, and returns `None` quietly.
pub fn read_shader_source(path: Option<&Path>) -> Option<ShaderSource> {
    let path = path?;
    match ShaderSource::read(path) {
        Ok(source) => Some(source),
        Err(SourceError::Open { path, source }) => {
            log::error!("Can't open source file: {}: {source}", path.display());
            None
        }
        Err(SourceError::Read { path, source }) => {
            log::error!("Could not read source file: {}: {source}", path.display());
            None
        }
    }
}

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
    shader_type: ShaderType,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    ///
    /// The compile log is reported through `log`: as an error when compilation fails, as a
    /// warning when it succeeds with a non-empty log.
    pub fn new(
        gl: &Arc<glow::Context>,
        shader_type: ShaderType,
        source: &str,
    ) -> Result<Self, ShaderError> {
        unsafe {
            let shader = gl
                .create_shader(shader_type.gl_enum())
                .map_err(ShaderError::Create)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            let status = gl.get_shader_compile_status(shader);
            let log = gl.get_shader_info_log(shader);
            if !status {
                log::error!("Compile Error in {shader_type}");
            }
            print_info_log(&log, status);

            if !status {
                gl.delete_shader(shader);
                return Err(ShaderError::Compile {
                    stage: shader_type,
                    log,
                });
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
                shader_type,
            })
        }
    }

    pub fn shader_type(&self) -> ShaderType {
        self.shader_type
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

fn print_info_log(log: &str, ok: bool) {
    let log = log.trim_end();
    if log.is_empty() {
        return;
    }
    if ok {
        log::warn!("{log}");
    } else {
        log::error!("{log}");
    }
}

/// Represents a value that can be uploaded to a uniform variable.
pub trait Uniform {
    /// Sets the value of the uniform at `location` in the currently bound program.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_f32(Some(location), *self);
        }
    }
}

impl Uniform for Vec2 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_2_f32(Some(location), self.x, self.y);
        }
    }
}

/// Collects the stages and interface names of a program before linking it.
pub struct ShaderProgramBuilder<'a> {
    gl: Arc<glow::Context>,
    vertex: Option<&'a str>,
    fragment: Option<&'a str>,
    attribute: &'a str,
    output: &'a str,
}

impl<'a> ShaderProgramBuilder<'a> {
    /// Sets the vertex stage source. `None` leaves the stage out.
    pub fn vertex(mut self, source: Option<&'a str>) -> Self {
        self.vertex = source;
        self
    }

    /// Sets the fragment stage source. `None` leaves the stage out.
    pub fn fragment(mut self, source: Option<&'a str>) -> Self {
        self.fragment = source;
        self
    }

    /// Names the vertex input bound to attribute slot 0.
    pub fn attribute(mut self, name: &'a str) -> Self {
        self.attribute = name;
        self
    }

    /// Names the fragment output bound to color slot 0.
    pub fn output(mut self, name: &'a str) -> Self {
        self.output = name;
        self
    }

    /// Compiles the present stages, then binds, links and checks the program.
    ///
    /// A stage that fails to compile is left out and the link is still attempted so its
    /// diagnostics get reported; the first compile error is returned afterwards.
    pub fn build(self) -> Result<ShaderProgram, ShaderError> {
        let gl = &self.gl;
        let program = unsafe { gl.create_program().map_err(ShaderError::Create)? };

        let mut shaders = Vec::with_capacity(2);
        let mut compile_error = None;
        let stages = [
            (ShaderType::Vertex, self.vertex),
            (ShaderType::Fragment, self.fragment),
        ];
        for (shader_type, source) in stages {
            let Some(source) = source else { continue };
            match Shader::new(gl, shader_type, source) {
                Ok(shader) => {
                    log::debug!("attaching {}", shader.shader_type());
                    unsafe { gl.attach_shader(program, shader.id) };
                    shaders.push(shader);
                }
                Err(e) => {
                    compile_error.get_or_insert(e);
                }
            }
        }

        let linked = unsafe {
            gl.bind_attrib_location(program, 0, self.attribute);
            gl.bind_frag_data_location(program, 0, self.output);
            gl.link_program(program);

            let status = gl.get_program_link_status(program);
            if !status {
                log::error!("Link Error.");
            }
            let log = gl.get_program_info_log(program);
            print_info_log(&log, status);

            for shader in &shaders {
                gl.detach_shader(program, shader.id);
            }

            if status {
                Ok(())
            } else {
                Err(ShaderError::Link(log))
            }
        };
        drop(shaders);

        match (linked, compile_error) {
            (Ok(()), None) => Ok(ShaderProgram {
                gl: Arc::clone(gl),
                id: program,
            }),
            (_, Some(e)) | (Err(e), None) => {
                unsafe { gl.delete_program(program) };
                Err(e)
            }
        }
    }
}

/// Represents a linked OpenGL shader program.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Starts building a program. The interface names default to `pv` and `fc`.
    pub fn builder<'a>(gl: &Arc<glow::Context>) -> ShaderProgramBuilder<'a> {
        ShaderProgramBuilder {
            gl: Arc::clone(gl),
            vertex: None,
            fragment: None,
            attribute: "pv",
            output: "fc",
        }
    }

    /// Reads both stage sources from disk and builds a program from them.
    ///
    /// A path that cannot be read only drops that stage, see [`read_shader_source`].
    pub fn load(
        gl: &Arc<glow::Context>,
        vert: Option<&Path>,
        attribute: &str,
        frag: Option<&Path>,
        output: &str,
    ) -> Result<Self, ShaderError> {
        let vsrc = read_shader_source(vert);
        let fsrc = read_shader_source(frag);
        let vtext = vsrc.as_ref().map(ShaderSource::text);
        let ftext = fsrc.as_ref().map(ShaderSource::text);

        Self::builder(gl)
            .vertex(vtext.as_deref())
            .fragment(ftext.as_deref())
            .attribute(attribute)
            .output(output)
            .build()
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Looks up a uniform variable by name.
    pub fn uniform_location(&self, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(self.id, name) }
    }

    /// Sets a uniform variable in the bound program. A missing location is skipped.
    pub fn set_uniform<T: Uniform>(&self, location: Option<&glow::UniformLocation>, value: T) {
        if let Some(location) = location {
            value.set_uniform(&self.gl, location);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use log::Level;

    use super::*;
    use crate::testlog;

    fn fixture(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("glquad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_source_matches_file_bytes() {
        let contents = b"#version 150 core\nin vec4 pv;\nvoid main() { gl_Position = pv; }\n";
        let path = fixture("roundtrip.vert", contents);

        let source = ShaderSource::read(&path).unwrap();
        assert_eq!(source.as_bytes(), contents);
        assert_eq!(source.bytes.len(), contents.len() + 1);
        assert_eq!(source.bytes.last(), Some(&0));
        assert_eq!(source.text(), std::str::from_utf8(contents).unwrap());
    }

    #[test]
    fn test_empty_file_is_just_the_terminator() {
        let path = fixture("empty.frag", b"");
        let source = read_shader_source(Some(&path)).unwrap();
        assert_eq!(source.bytes, vec![0]);
        assert!(source.as_bytes().is_empty());
    }

    #[test]
    fn test_missing_file_logs_once() {
        let path = std::env::temp_dir().join("glquad-does-not-exist.vert");
        let (source, records) = testlog::capture(|| read_shader_source(Some(&path)));
        assert!(source.is_none());

        let errors: Vec<_> = records.iter().filter(|(l, _)| *l == Level::Error).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].1.starts_with("Can't open source file"));
        assert!(errors[0].1.contains(&*path.to_string_lossy()));

        match ShaderSource::read(&path) {
            Err(SourceError::Open { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected an open error, got {other:?}"),
        }
    }

    #[test]
    fn test_path_under_a_file_fails_to_open() {
        let file = fixture("plain.txt", b"not a directory");
        let path = file.join("point.vert");

        let (source, records) = testlog::capture(|| read_shader_source(Some(&path)));
        assert!(source.is_none());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, Level::Error);
        assert!(records[0].1.starts_with("Can't open source file"));
        assert!(records[0].1.contains(&*path.to_string_lossy()));
    }

    #[test]
    fn test_absent_path_is_not_an_error() {
        let (source, records) = testlog::capture(|| read_shader_source(None));
        assert!(source.is_none());
        assert!(records.is_empty());
    }

    #[test]
    fn test_directory_fails_while_reading() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            ShaderSource::read(&dir),
            Err(SourceError::Read { .. })
        ));

        let (source, records) = testlog::capture(|| read_shader_source(Some(&dir)));
        assert!(source.is_none());
        assert_eq!(records.len(), 1);
        assert!(records[0].1.starts_with("Could not read source file"));
    }

    #[test]
    fn test_error_messages_name_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderType::Fragment,
            log: "0:3: syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "compile error in fragment shader: 0:3: syntax error"
        );
        assert_eq!(ShaderType::Vertex.to_string(), "vertex shader");
    }

    const VERT: &str = include_str!("../../shaders/point.vert");
    const FRAG: &str = include_str!("../../shaders/point.frag");

    // SDL may only be initialised from one thread, so every context-dependent check lives here.
    #[test]
    #[ignore = "requires a display and an OpenGL 3.2 driver"]
    fn test_program_building_with_live_context() {
        let app = crate::abs::App::new(&crate::config::Config {
            hidden: true,
            ..Default::default()
        })
        .unwrap();
        let gl = &app.gl;

        let (renderer, records) = testlog::capture(|| {
            let program = ShaderProgram::builder(gl)
                .vertex(Some(VERT))
                .fragment(Some(FRAG))
                .attribute("pv")
                .output("fc")
                .build()
                .unwrap();
            assert!(program.uniform_location("size").is_some());
            assert!(program.uniform_location("scale").is_some());
            assert!(program.uniform_location("location").is_some());

            let renderer = crate::render::Renderer::new(gl, program).unwrap();
            renderer.render(&crate::other::WindowState::new(640, 480, 100.0));
            renderer
        });
        assert!(
            records.iter().all(|(l, _)| *l > Level::Warn),
            "unexpected diagnostics: {records:?}"
        );
        assert_eq!(unsafe { gl.get_error() }, glow::NO_ERROR);
        drop(renderer);

        let broken = "#version 150 core\nout vec4 fc;\nvoid main() { fc = vec4(1.0) }\n";
        let (result, records) = testlog::capture(|| {
            ShaderProgram::builder(gl)
                .vertex(Some(VERT))
                .fragment(Some(broken))
                .build()
        });
        match result {
            Err(ShaderError::Compile { stage, .. }) => assert_eq!(stage, ShaderType::Fragment),
            Err(e) => panic!("expected a fragment compile error, got {e}"),
            Ok(_) => panic!("broken fragment shader linked"),
        }
        assert!(records
            .iter()
            .any(|(l, m)| *l == Level::Error && m == "Compile Error in fragment shader"));

        let vert_path = fixture("point.vert", VERT.as_bytes());
        let missing = std::env::temp_dir().join("glquad-missing.frag");
        // Core profiles accept a program without a fragment stage.
        assert!(ShaderProgram::load(gl, Some(&vert_path), "pv", Some(&missing), "fc").is_ok());
    }
}
