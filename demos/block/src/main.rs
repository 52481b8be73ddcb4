// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Lab 1 - PID
// Edit solution.toml while the window is open; the exercise reloads on save.

mod exercise;
mod solution;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use exerciser::prelude::*;

use crate::solution::SolutionToml;

#[derive(Debug, Parser)]
#[command(version, about = "Steer a block to the centre line with a PID controller")]
struct Args {
    /// Solution file, reloaded whenever it changes.
    #[arg(long, default_value = "solution.toml")]
    solution: PathBuf,

    /// Engine configuration. Defaults to exerciser.toml next to the solution.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without a window.
    #[arg(long)]
    headless: bool,

    /// Stop a headless run after this many iterations.
    #[arg(long)]
    ticks: Option<u64>,
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => {
            let dir = args
                .solution
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            EngineConfig::discover(dir)?
        }
    };
    Ok(config)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("egui_glow", log::LevelFilter::Warn)
        .filter_module("eframe", log::LevelFilter::Warn)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let source = SolutionToml::new(&args.solution, config.delta());

    if args.headless {
        let limit = args.ticks.map_or(RunLimit::UntilTerminated, RunLimit::Iterations);
        let summary = exerciser::run_headless(config, source, limit)?;
        log::info!("{summary:?}");
        return Ok(());
    }
    exerciser::run_with_config(config, source)
}
