use std::io::{self, Write};

use clap::Parser;

use step_replay::app::ReplayApp;
use step_replay::config::{Cli, ReplayConfig, ScriptSource};
use step_replay::drivers::{ConsoleInputDriver, TerminalSession};
use step_replay::error::AppError;
use step_replay::runner::{dump_state, run_app};
use step_replay::script::Script;
use step_replay::tracing_sub;

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = ReplayConfig::try_from(&cli)?;
    tracing_sub::init(config.log_level, config.log_file.as_deref())?;

    let script = match &config.script {
        ScriptSource::Demo => Script::demo()?,
        ScriptSource::File(path) => Script::load(path)?,
    };
    tracing::info!(title = %script.title, "starting replay");

    if config.dump {
        let json = dump_state(script, &config)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        return Ok(());
    }

    let mut app = ReplayApp::new(script, &config);
    let mut session = TerminalSession::new()?;
    run_app(
        &mut session,
        ConsoleInputDriver::new(),
        &mut app,
        config.tick_interval,
    )?;
    Ok(())
}
