use chordsim_node::config::SimulationConfig;
use chordsim_node::config::DEFAULT_CONFIG_PATH;
use chordsim_node::logging::init_logging;
use chordsim_node::logging::LogLevel;
use chordsim_node::simulator::Simulator;
use chordsim_node::util::build_version;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[arg(long, default_value_t = LogLevel::Info, value_enum, env)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Write a default simulation config.
    Init(InitCommand),
    /// Build the ring, look up every key and write the report.
    Run(SimulationArgs),
    /// Build the ring and print it as JSON.
    Inspect(SimulationArgs),
}

#[derive(Args, Debug)]
struct InitCommand {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, help = "The location of config file")]
    location: String,
}

#[derive(Args, Debug)]
struct SimulationArgs {
    #[arg(long, short = 'c', env = "CHORDSIM_CONFIG", help = "YAML config file")]
    config: Option<String>,

    #[arg(long, short = 'n', help = "Number of nodes")]
    nodes: Option<usize>,

    #[arg(long, short = 'k', help = "Number of keys")]
    keys: Option<usize>,

    #[arg(long, short = 'm', help = "Identifier length in bits")]
    bits: Option<u32>,

    #[arg(long, short = 'o', help = "Directory of the report file")]
    output_dir: Option<String>,

    #[arg(long, help = "Peer every lookup starts from")]
    anchor: Option<String>,
}

impl SimulationArgs {
    /// Defaults, overridden by the config file, overridden by flags.
    fn config(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::read_fs(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(nodes) = self.nodes {
            config.node_count = nodes;
        }
        if let Some(keys) = self.keys {
            config.key_count = keys;
        }
        if let Some(bits) = self.bits {
            config.m = bits;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(anchor) = &self.anchor {
            config.anchor = Some(anchor.clone());
        }
        Ok(config)
    }

    fn simulator(&self) -> anyhow::Result<Simulator> {
        let mut sim = Simulator::new(self.config()?)?;
        sim.build()?;
        Ok(sim)
    }
}

fn run(args: SimulationArgs) -> anyhow::Result<()> {
    let sim = args.simulator()?;

    println!("{}", sim.ring_line()?);
    println!("{}", sim.inspect()?);

    let report = sim.run()?;
    print!("{}", report);
    let path = report.write_fs(sim.config().output_file()?)?;
    println!("report written to {}", path.display());

    if report.misses() > 0 {
        anyhow::bail!("{} of {} lookups missed", report.misses(), report.records.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    tracing::debug!("chordsim {}", build_version());

    match cli.command {
        Command::Init(args) => {
            let path = SimulationConfig::default().write_fs(&args.location)?;
            println!("Your config file has saved to: {}", path);
            Ok(())
        }
        Command::Run(args) => run(args),
        Command::Inspect(args) => {
            let sim = args.simulator()?;
            println!("{}", serde_json::to_string_pretty(&sim.inspect()?)?);
            Ok(())
        }
    }
}
