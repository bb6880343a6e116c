// src/main.rs
use anyhow::Context;
use minish::readline::{EditorSource, LineSource, PlainSource};
use minish::{Config, Shell};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&config) {
        eprintln!("minish: {e:#}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut shell = Shell::new().context("cannot start shell")?;

    let mut source: Box<dyn LineSource> = if config.interactive {
        println!("\x1b[90mType 'help' for builtins.  Ctrl+D to exit\x1b[0m");
        Box::new(EditorSource::new(shell.builtins().names())?)
    } else {
        Box::new(PlainSource::stdin())
    };

    shell.run(source.as_mut())?;
    Ok(())
}
