//! Homeledger main entry point

use clap::Parser;
use homeledger_api::start_server;
use homeledger_config::Config;
use homeledger_core::models::Member;
use homeledger_core::Store;
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "homeledger")]
#[command(version = "0.1.0")]
#[command(about = "A household personal-finance tracker", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.clone())?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();

    log::info!(
        "config loaded: data path={}, {} household member(s)",
        config.data.path.to_string_lossy(),
        config.household.members.len()
    );

    let members: Vec<Member> = config
        .household
        .members
        .iter()
        .map(|m| Member {
            id: m.id.clone(),
            name: m.name.clone(),
        })
        .collect();
    let store = Store::open(&config.data.path, &members)?;

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, store))?;
    Ok(())
}
