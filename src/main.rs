use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::error;
use log::info;
use log::LevelFilter;
use u_tempo::consistency::VariableOrder;
use u_tempo::error::PlanResult;
use u_tempo::search::SearchConfig;
use u_tempo::temporal::loader;
use u_tempo::temporal::PlannerConfig;
use u_tempo::temporal::TemporalPlanner;
use u_tempo::temporal::DEFAULT_HORIZON;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The problem to plan. One statement per line:
    ///  * 'task <name> <duration>'
    ///  * 'constraint <t1> <relation> <t2>'
    ///  * 'domain <t> <bound> <d> [<d2>]'
    instance_path: PathBuf,

    /// Increases log detail on stderr. Once for a summary, twice for every
    /// expansion, three times for every generated node.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Start times range over 0..horizon (at most 100000).
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    horizon: i64,

    /// Which unfixed start variable to split next: 'first-unfixed' or
    /// 'smallest-domain'.
    #[arg(long = "variable-order", default_value_t = VariableOrder::FirstUnfixed)]
    variable_order: VariableOrder,

    /// Stop after this many expansions. By default the search runs until
    /// it finds a schedule or proves there is none.
    #[arg(long = "max-expansions")]
    max_expansions: Option<usize>,
}

fn configure_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "{} {}", record.level(), record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    configure_logging(args.verbose);

    match run(args) {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> PlanResult<()> {
    let problem = loader::read_problem(&args.instance_path)?;
    info!(
        "loaded {} tasks, {} relations, {} bounds from {}",
        problem.tasks().len(),
        problem.relations().len(),
        problem.bounds().len(),
        args.instance_path.display()
    );

    let mut search = SearchConfig::default().with_verbosity(args.verbose);
    if let Some(limit) = args.max_expansions {
        search = search.with_max_expansions(limit);
    }
    let config = PlannerConfig::default()
        .with_horizon(args.horizon)
        .with_variable_order(args.variable_order)
        .with_search(search);

    let outcome = TemporalPlanner::solve(&problem, &config)?;
    println!("{outcome}");
    Ok(())
}
