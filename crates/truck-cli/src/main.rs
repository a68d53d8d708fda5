//! `truck-cli` – entry point for the EV3 truck.
//!
//! This binary:
//!
//! 1. Initialises logging (see [`truck_runtime::telemetry`]).
//! 2. Loads `~/.ev3-truck/config.toml` if present, then applies `TRUCK_*`
//!    overrides.
//! 3. Builds a Tokio runtime with a fixed worker pool and deploys the four
//!    truck tasks onto it, reporting each deployment once.
//! 4. Runs until Ctrl-C, then aborts every task and exits with status 0.

mod config;

use std::process::ExitCode;
use std::sync::Arc;

use colored::Colorize;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use truck_middleware::EventBus;
use truck_runtime::{Scheduler, deploy_truck, init_tracing};

fn main() -> ExitCode {
    let _guard = init_tracing("ev3-truck");

    print_banner();

    let mut cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            println!("  No config file found; using stock tuning.");
            config::Config::default()
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using stock tuning.");
            config::Config::default()
        }
    };
    config::apply_env_overrides(&mut cfg);
    if let Err(e) = cfg.validate() {
        error!(error = %e, "refusing to start");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cfg.truck.worker_threads)
        .thread_name("truck-worker")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build the worker pool");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Arc::new(Notify::new());
    let on_ctrlc = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || on_ctrlc.notify_one()) {
        warn!(error = %e, "Failed to install Ctrl-C handler; stop the truck by killing the process");
    }

    runtime.block_on(async {
        let bus = EventBus::new();
        let mut scheduler = Scheduler::current();
        let (rig, _journals) = cfg.sim.builder().build();

        let report = deploy_truck(rig, &bus, &cfg.truck, &mut scheduler);
        println!();
        for name in &report.deployed {
            println!("  {} {} deployed", "✓".green().bold(), name.bold());
        }
        for (name, e) in &report.failed {
            println!("  {} {} failed: {}", "✗".red().bold(), name.bold(), e);
        }
        if report.all_deployed() {
            println!("\n  Truck running. Press Ctrl-C to stop.");
        } else {
            println!(
                "\n  {} Truck running degraded. Press Ctrl-C to stop.",
                "!".yellow().bold()
            );
        }
        println!();

        shutdown.notified().await;
        info!("Ctrl-C received; stopping every task");
        for task in scheduler.tasks() {
            info!(task = task.name(), ticks = task.ticks(), "stopping");
        }
        scheduler.shutdown();
        if let Some(motion) = report.motion {
            motion.detach(&bus);
        }
    });

    ExitCode::SUCCESS
}

fn print_banner() {
    println!();
    println!("{}", r#"  _____   _____   _                  _    "#.bold().cyan());
    println!("{}", r#" | __\ \ / /__ / | |_ _ _ _  _  __ _| |__ "#.bold().cyan());
    println!("{}", r#" | _| \ V / |_ \ |  _| '_| || |/ _| / / "#.bold().cyan());
    println!("{}", r#" |___| \_/ |___/  \__|_|  \_,_|\__|_\_\ "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "ev3-truck".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Obstacle-aware truck demo");
    println!();
}
