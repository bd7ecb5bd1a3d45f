mod cli;
mod config;
mod engine;
mod error;
mod invocation;
mod path;

use std::env;
use std::process;

use anyhow::{Context, Result};
use log::debug;

use cli::ParseOutcome;
use engine::{Docker, Engine};
use invocation::Invocation;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("docker-here: {:#}", err);
            error::exit_code(&err)
        }
    };
    process::exit(code);
}

async fn run() -> Result<i32> {
    let cwd = env::current_dir().context("get current dir")?;

    let parsed = match cli::parse(env::args_os().skip(1))? {
        ParseOutcome::Run(parsed) => parsed,
        ParseOutcome::Help => {
            print!("{}", cli::help());
            return Ok(0);
        }
        ParseOutcome::Version => {
            print!("{}", cli::version());
            return Ok(0);
        }
    };
    debug!("parsed {:?}", parsed);

    let mount = path::resolve(parsed.source.as_deref(), parsed.dest.as_deref(), &cwd)?;
    debug!("mount {:?}", mount);

    let options = config::load()
        .await
        .runtime_options(env::var(config::RUNTIME_ENV).ok());
    let tty = nix::unistd::isatty(0).unwrap_or(false);
    let invocation = Invocation::build(&parsed, &mount, &options, tty);

    let engine = Docker::new(options.runtime.as_str());
    engine.check().await.context("check")?;

    // The terminal sends SIGINT to the runtime as well; stay alive to
    // report its exit code.
    ctrlc::set_handler(|| debug!("interrupted, waiting for the container"))
        .context("install SIGINT handler")?;

    let status = engine.run(&invocation).await?;
    Ok(engine::exit_code(status))
}
