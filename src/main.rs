use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::prelude::*;
use schedulix_model::{
    BankerState, CpuQuestion, DiskConfig, MemoryQuestion, check_safety, compare_all,
    compute_seek,
    core::SchedEvent,
    scheduler::{Algorithm, CpuConfig},
    verify::to_wire,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "schedulix",
    about = "Generate OS scheduling exercises and print their reference answers."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// CPU scheduling: FCFS, SJF, SRTF, Priority or RR
    Cpu {
        #[arg(long, default_value = "FCFS")]
        algorithm: String,

        /// Time quantum (required for RR)
        #[arg(long)]
        quantum: Option<u64>,

        /// Number of random processes to generate
        #[arg(long, default_value_t = 4)]
        processes: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Load the question from a JSON payload instead of generating one
        #[arg(long, value_name = "PATH", conflicts_with_all = ["algorithm", "quantum", "processes", "seed"])]
        question: Option<PathBuf>,

        /// Print every dispatch event
        #[arg(long, action = clap::ArgAction::SetTrue)]
        events: bool,

        /// Print the question payload as JSON
        #[arg(long, action = clap::ArgAction::SetTrue)]
        json: bool,
    },
    /// Memory allocation: FirstFit, BestFit or WorstFit
    Memory {
        #[arg(long, default_value = "FirstFit")]
        policy: String,

        #[arg(long, default_value_t = 5)]
        blocks: usize,

        #[arg(long, default_value_t = 4)]
        processes: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Load the question from a JSON payload instead of generating one
        #[arg(long, value_name = "PATH", conflicts_with_all = ["policy", "blocks", "processes", "seed"])]
        question: Option<PathBuf>,

        #[arg(long, action = clap::ArgAction::SetTrue)]
        json: bool,
    },
    /// Disk scheduling: FCFS, SSTF, SCAN, C-SCAN, LOOK or C-LOOK
    Disk {
        #[arg(long, default_value = "SSTF")]
        algorithm: String,

        /// Initial head cylinder
        #[arg(long)]
        head: u64,

        #[arg(long, default_value_t = 199)]
        last_cylinder: u64,

        #[arg(long, default_value = "up")]
        direction: String,

        /// Cylinder request queue
        #[arg(required = true)]
        requests: Vec<u64>,
    },
    /// Deadlock avoidance: banker's safety check
    Deadlock {
        #[arg(long, default_value_t = 5)]
        processes: usize,

        #[arg(long, default_value_t = 3)]
        resources: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Load resources, max and allocation from JSON instead of generating them
        #[arg(long, value_name = "PATH", conflicts_with_all = ["processes", "resources", "seed"])]
        state: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("schedulix: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Cpu {
            algorithm,
            quantum,
            processes,
            seed,
            question,
            events,
            json,
        } => {
            let question = match question {
                Some(path) => CpuQuestion::from_json(&read(&path)?)?,
                None => {
                    let config = CpuConfig::new(algorithm.parse::<Algorithm>()?, quantum)?;
                    let mut rng = StdRng::seed_from_u64(seed);
                    CpuQuestion::random(&mut rng, &config, processes)
                }
            };
            if json {
                println!("{}", question.to_json()?);
            }

            let schedule = question.schedule()?;
            if events {
                for event in &schedule.events {
                    println!("{}", describe(event, &question));
                }
                println!();
            }
            println!("{schedule}");
            println!("Average Response Time: {:.2}", schedule.average_response);
            println!("Answer: {:?}", to_wire(&schedule.canonical_answer()));
        }
        Command::Memory {
            policy,
            blocks,
            processes,
            seed,
            question,
            json,
        } => {
            let question = match question {
                Some(path) => MemoryQuestion::from_json(&read(&path)?)?,
                None => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    MemoryQuestion::random(&mut rng, policy.parse()?, blocks, processes)
                }
            };
            if json {
                println!("{}", question.to_json()?);
            }

            let allocation = question.allocation()?;
            println!("{allocation}");
            println!("Answer: {:?}", to_wire(&allocation.dense()));
        }
        Command::Disk {
            algorithm,
            head,
            last_cylinder,
            direction,
            requests,
        } => {
            let config =
                DiskConfig::new(algorithm.parse()?, head, last_cylinder).heading(direction.parse()?);
            let plan = compute_seek(&requests, &config)?;
            println!("{plan}");

            println!("\nAlgorithm Comparison (seek times):");
            for (algorithm, seek) in compare_all(&requests, &config)? {
                println!("  {algorithm}: {seek} cylinders");
            }
        }
        Command::Deadlock {
            processes,
            resources,
            seed,
            state,
        } => {
            let state = match state {
                Some(path) => BankerState::from_json(&read(&path)?)?,
                None => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    BankerState::random(&mut rng, processes, resources)
                }
            };
            println!("{}", check_safety(&state)?);
        }
    }
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn describe(event: &SchedEvent, question: &CpuQuestion) -> String {
    let pid = |task: usize| question.processes[task].pid.as_str();
    match *event {
        SchedEvent::Arrived { task, at } => format!("t={at} {} arrives", pid(task)),
        SchedEvent::Dispatched { task, at, ran_for } => {
            format!("t={at} {} runs for {ran_for}", pid(task))
        }
        SchedEvent::Preempted { task, at } => format!("t={at} {} preempted", pid(task)),
        SchedEvent::Completed { task, at } => format!("t={at} {} completes", pid(task)),
        SchedEvent::Idle { from, until } => format!("t={from} idle until t={until}"),
    }
}
