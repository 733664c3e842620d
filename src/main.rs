use clap::Parser;
use std::io;
use std::process::ExitCode;

use termreel::cli::Args;
use termreel::config::Config;
use termreel::error::PlayerError;
use termreel::frames::FrameList;
use termreel::input::CrosstermEvents;
use termreel::player::{play, PlayerOptions};
use termreel::rasterizer::{build_args, format_invocation, ExternalRasterizer};
use termreel::shutdown::{install_signal_handler, ShutdownSignal};
use termreel::terminal::CrosstermTerminal;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Usage errors exit here with clap's message and status 2
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), PlayerError> {
    let file = Config::load(args.config.as_deref())?;
    let config = args.render_config(&file);
    let program = args.rasterizer_program(&file);

    if args.print_args {
        let frames = FrameList::discover(&args.frame_dir)?;
        if let Some(first) = frames.iter().next() {
            println!("{}", format_invocation(program, &build_args(&config), first));
        }
        return Ok(());
    }

    let shutdown = ShutdownSignal::new();
    install_signal_handler(&shutdown)?;

    let options = PlayerOptions {
        frame_dir: args.frame_dir.clone(),
        config,
        interactive: args.interactive(&file),
        input_budget: file.player.input_budget(),
    };

    let reason = play(
        &options,
        CrosstermTerminal::new(),
        CrosstermEvents,
        ExternalRasterizer::new(program),
        io::stdout(),
        shutdown,
    )?;
    log::info!("Stopped: {:?}", reason);

    Ok(())
}
