use std::error::Error as StdError;

use dotenv::dotenv;
use log::{info, warn};
use nanocmds::{
    console::{parse_console_line, strip_formatting, ConsoleEngine},
    consts::{CHEATS_ENABLED, OPERATOR_LEVEL, TICK_INTERVAL, WORLD_PATH},
    framework::{CommandResult, CommandStatus, Framework},
    models::storage::JsonFileStorage,
    origin::OriginResolver,
    utils::register_commands,
    Data,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::{interval, Duration, MissedTickBehavior},
};

type Error = Box<dyn StdError + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let env_loaded = dotenv().is_ok();

    env_logger::init();

    if !env_loaded {
        warn!("No .env file found, reading configuration from the environment only");
    }

    let storage = JsonFileStorage::open(&*WORLD_PATH)?;
    let mut data = Data::new(Box::new(storage), OriginResolver::default());

    let mut framework = Framework::new().cheats_enabled(*CHEATS_ENABLED);
    register_commands(&mut framework)?;
    framework.activate();

    let mut engine = ConsoleEngine::new();

    let mut ticker = interval(Duration::from_millis(*TICK_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!("Ready. Type `help` for a list of commands");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                data.scheduler.tick(&mut engine);
            }
            line = lines.next_line() => match line? {
                Some(line) => handle_line(&framework, &mut data, &mut engine, &line),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("Received terminate signal. Goodbye");
                break;
            }
        }
    }

    // Anything acknowledged before shutdown still runs.
    data.scheduler.tick(&mut engine);

    Ok(())
}

fn handle_line(framework: &Framework, data: &mut Data, engine: &mut ConsoleEngine, line: &str) {
    let line = line.trim();

    if line.is_empty() {
        return;
    }

    if line == "help" {
        for command in framework.commands() {
            println!("{}\n    {}", command.usage(), command.description);
        }

        return;
    }

    match parse_console_line(line, *OPERATOR_LEVEL) {
        Ok((source, command)) => {
            if let Some(entity) = &source.source_entity {
                engine.spawn(entity.clone());
            }

            show_result(&framework.invoke_text(data, &source, command));
        }

        Err(e) => println!("{}", e),
    }
}

fn show_result(result: &CommandResult) {
    let status = match result.status {
        CommandStatus::Success => "ok",
        CommandStatus::Failure => "failed",
    };

    match &result.message {
        Some(message) => println!("[{}] {}", status, strip_formatting(message)),
        None => println!("[{}]", status),
    }
}
