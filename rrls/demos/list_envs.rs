use anyhow::Result;
use clap::Parser;
use rrls::registry::EnvSpec;
use rrls_envs::Task;

/// List the registered environments and the bounds of their parameters
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// List the environments of this task only
    #[arg(long)]
    task: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let task = args.task.as_deref().map(str::parse::<Task>).transpose()?;

    for spec in EnvSpec::all() {
        if task.map_or(false, |t| t != spec.task) {
            continue;
        }
        match spec.bounds()? {
            None => println!("{}", spec),
            Some(bounds) => {
                let bounds = bounds
                    .iter()
                    .map(|b| format!("{} [{}, {}]", b.name, b.low, b.high))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{}: {}", spec, bounds);
            }
        }
    }

    Ok(())
}
