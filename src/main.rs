use std::process::ExitCode;

use nostalgia::{config::Config, engine::Engine};

fn main() -> ExitCode {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let mut engine = match Engine::new(Config::from_env()) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = engine.init() {
        log::error!("Initialization failed: {:#}", e);
        return ExitCode::FAILURE;
    }

    while engine.is_running() {
        engine.frame();
    }

    engine.finish();
    ExitCode::SUCCESS
}
