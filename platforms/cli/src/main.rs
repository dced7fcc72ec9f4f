use clap::{ArgGroup, Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ntm::loader::MachineLoader;
use ntm::programs::ProgramManager;
use ntm::simulator::{ConfigurationTree, Exploration, Simulator};
use ntm::types::{Limits, NtmError, DEFAULT_MAX_DEPTH, DEFAULT_MAX_TRANSITIONS};
use ntm::MachineDescription;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(group(ArgGroup::new("source").required(true).args(["machine", "builtin", "list"])))]
struct Cli {
    /// The machine description (CSV) to simulate
    #[clap(short, long)]
    machine: Option<PathBuf>,

    /// Simulate one of the bundled machines, by name
    #[clap(short, long)]
    builtin: Option<String>,

    /// List the bundled machines and exit
    #[clap(short, long)]
    list: bool,

    /// Input strings; each one is simulated independently. Defaults to the empty string
    #[clap(value_name = "INPUT")]
    inputs: Vec<String>,

    /// Maximum number of levels in the configuration tree
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum number of transitions generated across the whole search
    #[clap(long, default_value_t = DEFAULT_MAX_TRANSITIONS)]
    max_transitions: usize,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print every level of the configuration tree before the verdict (included in JSON output)
    #[clap(short = 't', long)]
    trace: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    machine: &'a str,
    input: &'a str,
    limits: Limits,
    transitions: usize,
    result: &'a ntm::SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a ConfigurationTree>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_machine(cli: &Cli) -> Result<MachineDescription, NtmError> {
    match (&cli.machine, &cli.builtin) {
        (Some(path), _) => MachineLoader::load_machine(path),
        (None, Some(name)) => ProgramManager::get_program_by_name(name),
        (None, None) => Err(NtmError::NotFound("No machine given".to_string())),
    }
}

fn list_programs() {
    for index in 0..ProgramManager::get_program_count() {
        if let Ok(info) = ProgramManager::get_program_info(index) {
            println!(
                "{:>2}  {:<16} start: {:<6} states: {:<3} transitions: {}",
                info.index, info.name, info.start_state, info.state_count, info.transition_count
            );
        }
    }
}

fn print_trace(exploration: &Exploration) {
    for (depth, level) in exploration.tree.levels().enumerate() {
        println!("Level {} ({} configurations)", depth, level.len());
        for node in level {
            println!("  {}", node.configuration);
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        list_programs();
        return ExitCode::SUCCESS;
    }

    let machine = match load_machine(&cli) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let limits = Limits::new(cli.max_depth, cli.max_transitions);
    let simulator = Simulator::new(&machine, limits);

    let inputs = if cli.inputs.is_empty() {
        vec![String::new()]
    } else {
        cli.inputs.clone()
    };

    tracing::debug!(
        machine = %machine.name,
        inputs = inputs.len(),
        max_depth = limits.max_depth,
        max_transitions = limits.max_transitions,
        "Simulating"
    );

    for (i, input) in inputs.iter().enumerate() {
        let exploration = simulator.explore(input);

        match cli.format {
            Format::Text => {
                if i > 0 {
                    println!();
                }
                if cli.trace {
                    print_trace(&exploration);
                }
                println!("{}", exploration.result);
            }
            Format::Json => {
                let report = Report {
                    machine: &machine.name,
                    input,
                    limits,
                    transitions: exploration.transitions,
                    result: &exploration.result,
                    tree: cli.trace.then_some(&exploration.tree),
                };

                match serde_json::to_string(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: failed to serialize result: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            }
        }
    }

    ExitCode::SUCCESS
}
