use crate::abs::{AppError, ShaderError};

/// Anything that stops the demo before or while it enters the render loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("can't build shader program: {0}")]
    Shader(#[from] ShaderError),

    #[error("can't upload shape: {0}")]
    Mesh(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::ShaderType;

    #[test]
    fn test_error_display() {
        let err: Error = AppError::Sdl("no video device".to_string()).into();
        assert_eq!(err.to_string(), "can't initialize SDL2: no video device");

        let err: Error = ShaderError::Link("missing main".to_string()).into();
        assert_eq!(
            err.to_string(),
            "can't build shader program: link error: missing main"
        );

        let err: Error = ShaderError::Compile {
            stage: ShaderType::Vertex,
            log: "bad".to_string(),
        }
        .into();
        assert!(err.to_string().contains("vertex shader"));
    }
}
