use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::{run_http, run_load};
use netpulse::args::{CliArgs, Command};
use netpulse::config::{apply_config, load_config};
use netpulse::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let matches = CliArgs::command().get_matches();
    let args = CliArgs::from_arg_matches(&matches)?;

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

async fn run_async(args: CliArgs, matches: &ArgMatches) -> AppResult<()> {
    match args.command {
        Command::Load(mut load) => {
            let mut existing_users = Vec::new();
            if let Some(config) = load_config(load.config.as_deref())? {
                if let Some(sub) = matches.subcommand_matches("load") {
                    apply_config(&mut load, sub, &config)?;
                }
                existing_users = config.existing_users;
            }
            run_load(load, existing_users).await
        }
        Command::Http(http) => run_http(http).await,
    }
}
