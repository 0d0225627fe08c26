use std::error::Error;
use std::path::PathBuf;
use clap::{Parser, Subcommand};
use log::info;
use rs_nbody::driver::run_simulation;
use rs_nbody::particles::{compare_particles, generate_scene, load_from_file, save_to_file, SceneKind};
use rs_nbody::utils::StartupOptions;

#[derive(Parser, Debug)]
#[command(name = "rs_nbody", version, about = "Distributed cutoff-radius particle simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a particle file for a number of iterations.
    Simulate {
        /// Number of iterations.
        #[arg(short = 'i', long, default_value_t = 1)]
        iterations: usize,
        /// Side length of the scene; the cull radius is a quarter of it.
        #[arg(short = 's', long = "space-size", default_value_t = 10.0)]
        space_size: f32,
        #[arg(long = "in")]
        input: PathBuf,
        #[arg(short = 'o', long)]
        output: PathBuf,
        /// Balance strips by measured interaction cost instead of by space.
        #[arg(long = "lb")]
        load_balance: bool,
        /// Number of worker threads.
        #[arg(short = 'w', long, default_value_t = 1)]
        workers: usize,
    },
    /// Write a synthetic benchmark scene.
    Generate {
        #[arg(short = 'n', long, default_value_t = 1000)]
        count: usize,
        #[arg(short = 's', long = "space-size", default_value_t = 100.0)]
        space_size: f32,
        /// random, corner, repeat or sparse.
        #[arg(long, default_value = "random")]
        scene: SceneKind,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(short = 'o', long)]
        output: PathBuf,
    },
    /// Compare a simulation output with a reference output.
    Verify {
        actual: PathBuf,
        reference: PathBuf,
        #[arg(long, default_value_t = 0.1)]
        tolerance: f32,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Simulate { iterations, space_size, input, output, load_balance, workers } => {
            let options = StartupOptions {
                num_iterations: iterations,
                space_size,
                load_balance,
                workers,
                input_file: input,
                output_file: output,
            };
            let elapsed = run_simulation(&options)?;
            println!("total simulation time: {:.6}s", elapsed.as_secs_f64());
        }
        Command::Generate { count, space_size, scene, seed, output } => {
            let particles = generate_scene(scene, count, space_size, seed);
            save_to_file(&output, &particles)?;
            info!("Generated a {} scene of {} particles in {}", scene, count, output.display());
        }
        Command::Verify { actual, reference, tolerance } => {
            compare_particles(&load_from_file(&actual)?, &load_from_file(&reference)?, tolerance)?;
            println!("Correct");
        }
    }
    Ok(())
}
