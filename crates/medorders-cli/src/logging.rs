// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Routes `log` output to `path`. Stdout belongs to the terminal UI, so
/// nothing is written there.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }

    let file = open_log_file(path)?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();
    WriteLogger::init(level, config, file).with_context(|| {
        format!(
            "install logger for {}; a logger is already registered",
            path.display()
        )
    })
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- set [log].path or MEDORDERS_LOG_PATH to a writable location",
                path.display()
            )
        })
}
