//! Per-frame drawing of the quad.

use std::sync::Arc;

use glow::HasContext;

use crate::{
    abs::{ShaderProgram, Shape, Vertex2},
    other::WindowState,
};

/// Corners of the quad, drawn as a closed outline.
pub const QUAD: [Vertex2; 4] = [
    Vertex2::new(-0.5, -0.5),
    Vertex2::new(0.5, -0.5),
    Vertex2::new(0.5, 0.5),
    Vertex2::new(-0.5, 0.5),
];

/// Uniform locations looked up once after linking.
struct Uniforms {
    size: Option<glow::UniformLocation>,
    scale: Option<glow::UniformLocation>,
    location: Option<glow::UniformLocation>,
}

impl Uniforms {
    fn new(program: &ShaderProgram) -> Self {
        let lookup = |name: &str| {
            let location = program.uniform_location(name);
            if location.is_none() {
                log::warn!("uniform `{name}` is not active in the program");
            }
            location
        };

        Self {
            size: lookup("size"),
            scale: lookup("scale"),
            location: lookup("location"),
        }
    }
}

/// Owns the program and the shape, and draws one frame at a time.
pub struct Renderer {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    uniforms: Uniforms,
    shape: Shape,
}

impl Renderer {
    /// Uploads the quad and caches the uniform locations of `program`.
    pub fn new(gl: &Arc<glow::Context>, program: ShaderProgram) -> Result<Self, String> {
        let shape = Shape::new(gl, &QUAD[..], glow::LINE_LOOP)?;
        let uniforms = Uniforms::new(&program);
        log::debug!("quad uploaded with {} vertices", shape.vertex_count());

        Ok(Self {
            gl: Arc::clone(gl),
            program,
            uniforms,
            shape,
        })
    }

    /// Sets the color the frame is cleared to.
    pub fn set_clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe {
            self.gl.clear_color(r, g, b, a);
        }
    }

    /// Clears the color buffer and draws the quad with `state` as its uniforms.
    pub fn render(&self, state: &WindowState) {
        unsafe {
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        self.program.use_program();
        self.program
            .set_uniform(self.uniforms.size.as_ref(), state.size);
        self.program
            .set_uniform(self.uniforms.scale.as_ref(), state.scale);
        self.program
            .set_uniform(self.uniforms.location.as_ref(), state.location);

        self.shape.draw();
    }
}
