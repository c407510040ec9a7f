use galaxysim::{ScenarioConfig, Scenario};
use galaxysim::{RealTimeScheduler, Scheduler};
use galaxysim::{bench_step, bench_init};

use clap::Parser;
use anyhow::Result;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Colliding-galaxy gravity simulator")]
struct Args {
    /// Scenario YAML, looked up under scenarios/ unless the path exists
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without a window on the real-time scheduler
    #[arg(long)]
    headless: bool,

    /// Headless run length, overrides the scenario
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print step and init timings as CSV and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_config(args: &Args) -> Result<ScenarioConfig> {
    let given = PathBuf::from(&args.file_name);
    let config_path = if given.exists() {
        given
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(&args.file_name)
    };

    let mut cfg = ScenarioConfig::from_yaml_file(&config_path)?;
    if let Some(seed) = args.seed {
        cfg.parameters.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        cfg.engine.max_ticks = ticks;
    }
    log::debug!("{cfg:?}");

    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_step();
        bench_init();
        return Ok(());
    }

    let scenario_cfg = load_scenario_config(&args)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg);

    #[cfg(feature = "viewer")]
    {
        if !args.headless {
            galaxysim::run_3d(scenario);
            return Ok(());
        }
    }

    #[cfg(not(feature = "viewer"))]
    {
        if !args.headless {
            log::warn!("built without the `viewer` feature, running headless");
        }
    }

    let mut scheduler = RealTimeScheduler::new(scenario.tick_interval, scenario.max_ticks);
    scheduler.run(&mut scenario.engine);

    let engine = &scenario.engine;
    log::info!(
        "finished at t = {:.3} after {} ticks ({} black holes, {} particles)",
        engine.time(),
        engine.tick(),
        engine.store().bh_count(),
        engine.store().particle_count()
    );

    Ok(())
}
