use chrono::Utc;
use smart_todo::cli::{
    Args, ConfigDiscovery, ExecutionMode, PlannerCommand, ReplCommand, ReplLine, execute,
};
use smart_todo::{PlannerError, TodoConfig, TodoSystem};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ConfigDiscovery::load(args.config.as_ref())?;
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = Some(data_dir.clone());
    }

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match mode {
        ExecutionMode::Command(command) => run_command(&config, command),
        ExecutionMode::Interactive => run_interactive_mode(&config).await,
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            println!();
            println!("Data directory: {}", config.resolved_data_dir().display());
            Ok(())
        }
        ExecutionMode::InitConfig => {
            let path = ConfigDiscovery::create_default_user_config()?;
            println!("Configuration file: {}", path.display());
            Ok(())
        }
    }
}

fn run_command(config: &TodoConfig, command: PlannerCommand) -> anyhow::Result<()> {
    let mut system = TodoSystem::open(config)?;

    match execute(&mut system, command, Utc::now()) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) if e.downcast_ref::<PlannerError>().is_some() => {
            eprintln!("⚠️ {}", e);
            std::process::exit(2);
        }
        Err(e) => Err(e),
    }
}

async fn run_interactive_mode(config: &TodoConfig) -> anyhow::Result<()> {
    info!("Running in interactive mode");

    let mut system = TodoSystem::open(config)?;
    let mut watcher = system.overdue_watcher(&config.notifications, Utc::now());
    let mut ticker = tokio::time::interval(config.notifications.check_interval());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("📝 Smart Todo. Type 'help' for commands, 'quit' to exit.");
    println!("{}", execute(&mut system, PlannerCommand::List, Utc::now())?);
    prompt();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if config.notifications.enabled {
                    let alerts = watcher.check(system.tasks(), Utc::now());
                    if !alerts.is_empty() {
                        prompt();
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    prompt();
                    continue;
                }

                match ReplLine::parse_line(line) {
                    Ok(ReplCommand::Quit) => break,
                    Ok(ReplCommand::Planner(command)) => {
                        match execute(&mut system, command, Utc::now()) {
                            Ok(output) => println!("{}", output),
                            Err(e) if e.downcast_ref::<PlannerError>().is_some() => {
                                warn!("{}", e);
                                println!("⚠️ {}", e);
                            }
                            Err(e) => {
                                error!("Command failed: {:#}", e);
                                println!("❌ {:#}", e);
                            }
                        }
                    }
                    Err(rendered) => print!("{}", rendered),
                }
                prompt();
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
