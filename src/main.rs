use std::io::Read;

use clap::Parser;
use cut_planner::instance::Instance;
use cut_planner::render;
use cut_planner::solver::Solver;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "cut_planner",
    about = "2D bin packing over costed rectangular bins (guillotine heuristic)"
)]
struct Cli {
    /// Instance file ('n m' header, n 'w h' item lines, m 'w h cost' bin
    /// lines); '-' reads stdin
    instance: String,

    /// Show ASCII layout of each used bin
    #[arg(long)]
    layout: bool,

    /// Emit the full solution as JSON instead of assignment lines
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log: tracing::Level,
}

fn read_instance(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(cli.log)
        .init();

    let text = read_instance(&cli.instance).unwrap_or_else(|e| {
        eprintln!("Error: cannot read {}: {}", cli.instance, e);
        std::process::exit(1);
    });
    let instance = Instance::parse(&text).unwrap_or_else(|e| {
        eprintln!("Error: invalid instance: {}", e);
        std::process::exit(1);
    });

    let solution = Solver::new(instance.items, instance.bins).solve();

    if cli.json {
        let json = serde_json::to_string_pretty(&solution).unwrap_or_else(|e| {
            eprintln!("Error: cannot serialize solution: {}", e);
            std::process::exit(1);
        });
        println!("{}", json);
    } else {
        print!("{}", solution.report());
    }

    if cli.layout {
        for bin in solution.bins.iter().filter(|b| !b.placed.is_empty()) {
            eprint!("{}", render::render_bin(bin));
        }
    }

    info!(
        bins_used = solution.bins_used(),
        total_cost = solution.total_cost(),
        waste_percent = solution.waste_percent(),
        "done"
    );
}
