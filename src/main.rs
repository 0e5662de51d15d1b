use std::process::ExitCode;

use crate::{
    abs::{App, ShaderProgram},
    config::Config,
    error::Error,
    other::WindowState,
    render::Renderer,
};

mod abs;
mod config;
mod error;
mod logger;
mod other;
mod render;
#[cfg(test)]
mod testlog;

fn run(config: &Config) -> Result<(), Error> {
    let mut app = App::new(config)?;

    let program = ShaderProgram::load(
        &app.gl,
        config.vertex_shader.as_deref(),
        &config.attribute,
        config.fragment_shader.as_deref(),
        &config.output,
    )?;

    let renderer = Renderer::new(&app.gl, program).map_err(Error::Mesh)?;
    renderer.set_clear_color(config.clear_color);

    let (width, height) = app.window.size();
    let mut state = WindowState::new(width, height, config.scale);

    while app.pump(&mut state) {
        renderer.render(&state);
        app.swap_buffers();
    }

    log::info!("window closed");
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = logger::init() {
        eprintln!("can't install logger: {e}");
    }

    match run(&Config::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
