//! snmp-sim: SNMP agent simulator.
//!
//! Loads the configuration, device description and custom OID files, builds
//! the OID store and answers requests until Ctrl-C.

use clap::Parser;
use std::process::ExitCode;

use snmp_sim::agent::Agent;
use snmp_sim::cli::Args;
use snmp_sim::config::{AppConfig, load_custom_dir, load_device};
use snmp_sim::store::{BuildReport, SharedStore, build_store};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(&args.config);
    args.apply(&mut config);
    args.init_tracing(&config.logging);

    match run(&args, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(target: "snmp_sim::agent", { error = %e }, "simulator stopped");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, config: &AppConfig) -> snmp_sim::Result<()> {
    let (device, _) = load_device(&config.paths.devices_directory, args.device.as_deref())?;
    let customs = load_custom_dir(&config.paths.custom_directory);

    let (store, report) = build_store(&device, &customs);
    log_report(&report);
    tracing::info!(target: "snmp_sim::store", { oids = store.len(), custom_files = customs.len() }, "OID store built");

    let mut builder = Agent::builder()
        .bind(config.server.bind_addr()?)
        .store(SharedStore::new(store))
        .missing_value(args.missing_value());
    if !config.server.community.is_empty() {
        builder = builder.community(config.server.community.as_bytes());
    }
    let agent = builder.build().await?;

    tracing::info!(
        target: "snmp_sim::agent",
        { addr = %agent.local_addr(), community = %config.server.community },
        "SNMP simulator started"
    );

    let cancel = agent.cancel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(target: "snmp_sim::agent", "received shutdown signal");
        }
        cancel.cancel();
    });

    agent.run().await?;

    let stats = agent.stats();
    tracing::info!(
        target: "snmp_sim::agent",
        {
            answered = stats.answered(),
            malformed = stats.malformed(),
            bad_community = stats.bad_community(),
        },
        "SNMP simulator stopped"
    );
    Ok(())
}

fn log_report(report: &BuildReport) {
    for skipped in report.skipped() {
        tracing::warn!(target: "snmp_sim::store", "skipped {}", skipped);
    }
}
