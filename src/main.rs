//! stenciler's main application entry point.
//! Parses the command line, sets up logging and hands over to the engine.

use std::io::IsTerminal;

use stenciler::{
    cli::{get_args, Commands},
    engine,
    error::{default_error_handler, Result},
    logger::init_logger,
    prompt::{DialoguerPrompter, LinePrompter, Prompter},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: stenciler::cli::Args) -> Result<()> {
    let options = args.options(std::env::current_dir()?);

    let mut prompt: Box<dyn Prompter> = if std::io::stdin().is_terminal() {
        Box::new(DialoguerPrompter::new())
    } else {
        Box::new(LinePrompter::stdio())
    };

    let report = match &args.command {
        Commands::Init { repo_url } => engine::init(&options, repo_url, prompt.as_mut())?,
        Commands::Update => engine::update(&options, prompt.as_mut())?,
    };

    println!("Template applied to '{}': {}.", options.work_dir.display(), report);
    Ok(())
}
