//! Taylor-Green LBM CLI - Run a vortex decay from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use tgv_lbm::{
    compute::{CpuPropagator, MacroscopicFields, PerformanceReport},
    io::SnapshotWriter,
    schema::SimulationConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Simulate Taylor-Green vortex decay from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let propagator = CpuPropagator::new(config.clone()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("Simulating Taylor-Green vortex decay");
    println!("      domain size: {}x{}", config.nx, config.ny);
    println!("               nu: {}", config.nu);
    println!("              tau: {}", config.tau());
    println!("            u_max: {}", config.u_max);
    println!("             rho0: {}", config.rho0);
    println!("        timesteps: {}", config.steps);
    println!("       save every: {}", config.save_every);
    println!("    message every: {}", config.message_every);
    println!();

    // Initialize
    let mut state = propagator.initial_state();
    let snapshots = SnapshotWriter::new(&config.output_dir, config.steps);

    save_snapshots(&snapshots, &state.fields, 0, config.quiet);
    if config.compute_flow_properties {
        println!("{}", propagator.flow_properties(&state).csv_row(0));
    }

    // Run simulation
    let start = Instant::now();

    for n in 0..config.steps {
        let save = config.is_save_step(n);
        let msg = config.is_message_step(n);
        let need_scalars = save || (msg && config.compute_flow_properties);

        if let Err(e) = propagator.step(&mut state, need_scalars) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }

        if save {
            save_snapshots(&snapshots, &state.fields, n + 1, config.quiet);
        }

        if msg {
            if config.compute_flow_properties {
                println!("{}", propagator.flow_properties(&state).csv_row(n + 1));
            }
            if !config.quiet {
                println!("completed timestep {}", n + 1);
            }
        }
    }

    let report = PerformanceReport::new(&config, state.allocated_bytes(), start.elapsed());

    println!();
    println!("{}", report);
}

/// Write all macroscopic fields; failures are logged and the run continues.
fn save_snapshots(writer: &SnapshotWriter, fields: &MacroscopicFields, index: u64, quiet: bool) {
    for result in writer.write_fields(fields, index) {
        match result {
            Ok(path) => {
                if !quiet {
                    println!("Saved to {}", path.display());
                }
            }
            Err(e) => log::error!("{}", e),
        }
    }
}

fn print_example_config() {
    let config = SimulationConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
