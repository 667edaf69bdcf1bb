// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use medorders_app::{ColumnVisibility, Location, TableState};
use medorders_client::Client;
use medorders_server::DemoServer;
use runtime::HttpRuntime;
use std::env;
use std::path::PathBuf;

const DEMO_ADDR: &str = "127.0.0.1:0";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    if options.print_location {
        println!("{}", options.location);
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `medorders --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let timeout = config.timeout()?;
    let search_debounce = config.search_debounce()?;
    let default_columns = config.default_columns()?;

    if options.check_only {
        Client::new(config.base_url(), timeout).with_context(|| {
            format!(
                "invalid [server] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
        return Ok(());
    }

    logging::init(&config.log_path()?, config.log_level()?)?;
    log::info!(
        "starting medorders: config={} base_url={} page_size={} demo={}",
        options.config_path.display(),
        config.base_url(),
        config.page_size(),
        options.demo
    );

    let demo_server = if options.demo {
        Some(DemoServer::start(
            DEMO_ADDR,
            medorders_testkit::demo_medications(),
        )?)
    } else {
        None
    };
    let base_url = demo_server
        .as_ref()
        .map_or(config.base_url(), DemoServer::base_url);

    let client = Client::new(base_url, timeout).with_context(|| {
        format!(
            "invalid [server] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;

    let mut state = TableState::new(
        config.page_size(),
        ColumnVisibility::with_defaults(&default_columns),
    )
    .with_search_debounce(search_debounce);
    let mut runtime = HttpRuntime::new(client);
    let result = medorders_tui::run_app(&mut state, &mut runtime, options.location);
    log::info!("medorders exiting");
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    location: Location,
    print_config_path: bool,
    print_location: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        location: Location::default(),
        print_config_path: false,
        print_location: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--location" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--location requires a query such as ?page=2"))?;
                options.location = Location::parse(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-location" => {
                options.print_location = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("medorders");
    println!("  --config <path>          Use a specific config path");
    println!("  --location <query>       Open at a page/search, e.g. '?page=3&search=ibu'");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-location         Print the normalized --location and exit");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Serve 200 seeded orders from an in-process server");
    println!("  --check                  Validate config and client settings");
    println!("  --help                   Show this help");
}
