/*
    SPDX-License-Identifier: AGPL-3.0-or-later
    SPDX-FileCopyrightText: 2025 Shomy
*/
use anyhow::{Context, Result};
use atecc::config::{DEFAULT_I2C_ADDRESS, DEFAULT_I2C_BUS};
use atecc::{Atecc, AteccConfig, get_i2c_connection};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{LevelFilter, debug};
use std::time::Duration;

/// USB armory Mk II hardware control tool.
#[derive(Parser, Debug)]
#[command(name = "armoryctl", version)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// ATECC608 I2C bus number.
    #[arg(short = 'i', long = "bus", default_value_t = DEFAULT_I2C_BUS)]
    bus: u8,

    /// ATECC608 I2C address.
    #[arg(short = 'l', long = "address", value_parser = parse_address, default_value_t = DEFAULT_I2C_ADDRESS)]
    address: u16,

    /// Wait between the wake pulse and reading the wake response.
    #[arg(long, value_parser = humantime::parse_duration)]
    wake_settle: Option<Duration>,

    /// Wait between issuing a command and reading its result.
    #[arg(long, value_parser = humantime::parse_duration)]
    exec_time: Option<Duration>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Secure Element (ATECC608A/ATECC608B).
    Atecc {
        #[command(subcommand)]
        action: AteccCmd,
    },
}

#[derive(Subcommand, Debug)]
enum AteccCmd {
    /// Read device information.
    Info,
    /// Execute self test procedure.
    #[command(alias = "self_test")]
    SelfTest,
    /// Put the device in sleep mode.
    Sleep,
}

fn parse_address(s: &str) -> std::result::Result<u16, String> {
    let res = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    res.map_err(|e| format!("invalid I2C address '{}': {}", s, e))
}

impl Cli {
    fn config(&self) -> AteccConfig {
        let mut config = AteccConfig::new(self.bus, self.address);
        if let Some(wake_settle) = self.wake_settle {
            config = config.with_wake_settle(wake_settle);
        }
        if let Some(exec_time) = self.exec_time {
            config = config.with_execution_time(exec_time);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info).parse_default_env();
    if cli.debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    let config = cli.config();
    debug!("Using {:?}", config);

    match cli.cmd {
        Cmd::Atecc { action } => {
            let connection = get_i2c_connection(&config)
                .await
                .context("failed to open secure element connection")?;
            let atecc = Atecc::new(connection, &config)?;

            match action {
                AteccCmd::Info => println!("{}", atecc.info().await?),
                AteccCmd::SelfTest => println!("{}", atecc.self_test().await?),
                AteccCmd::Sleep => atecc.sleep().await?,
            }

            atecc.close().await?;
        }
    }

    Ok(())
}
