use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::error;

use rtcoef::problem::Problem;
use rtcoef::settings::{self, CliArgs};

fn main() {
    let args = CliArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    if let Err(err) = run(&args) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let settings = settings::load_config_with(args)?;

    if args.dump_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    println!("{}", settings);

    let mut problem = Problem::new(settings);
    problem.solve()?.print();
    problem.writeup()
}
