//! gather CLI
//!
//! Command-line driver for the fan-out/join coordinator.

use std::env;
use std::process;
use std::time::Duration;

use futures::StreamExt;
use tokio::runtime::Builder;

use coop_gather::async_runtime::{counter, AsyncResource};
use coop_gather::config::{parse_max_tasks, parse_unit_ms};
use coop_gather::error::Diagnostic;
use coop_gather::task::default_tasks;
use coop_gather::{gather, logging, GatherError, GatherResult, RuntimeConfig, TaskSpec, VERSION};

const TASK_HINT: &str = "tasks are written LABEL:DELAY, e.g. fetch:2";

#[derive(Debug, Default, PartialEq)]
struct Options {
    max_tasks: Option<usize>,
    unit: Option<Duration>,
    demo: bool,
    verbose: bool,
    tasks: Vec<String>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Run(Options),
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let options = match parse_args(skip_program_name(&args)) {
        Ok(Command::Help) => {
            print_help();
            return;
        }
        Ok(Command::Version) => {
            println!("gather {}", VERSION);
            return;
        }
        Ok(Command::Run(options)) => options,
        Err(e) => {
            eprint!("{}", Diagnostic::new(e));
            print_usage();
            process::exit(1);
        }
    };

    logging::init(options.verbose);

    if let Err(e) = run(&options) {
        let diagnostic = if e.position().is_some() {
            Diagnostic::with_arguments(e, &options.tasks).hint(TASK_HINT)
        } else {
            Diagnostic::new(e)
        };
        eprint!("{}", diagnostic);
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: gather [OPTIONS] [LABEL:DELAY ...]");
    eprintln!("       gather --help");
}

fn print_help() {
    println!("gather v{} - Run delayed fetch tasks concurrently", VERSION);
    println!();
    println!("USAGE:");
    println!("    gather [OPTIONS] [LABEL:DELAY ...]");
    println!();
    println!("OPTIONS:");
    println!("    -m, --max-tasks N   Maximum number of tasks in flight (default 64)");
    println!("    -u, --unit-ms MS    Length of one delay unit in milliseconds (default 1000)");
    println!("    -d, --demo          Also run the async counter and resource demos");
    println!("    -v, --verbose       Show debug logging");
    println!("    -h, --help          Show this help message");
    println!("    -V, --version       Show the version");
    println!();
    println!("ENVIRONMENT:");
    println!("    GATHER_MAX_TASKS    Default for --max-tasks");
    println!("    GATHER_UNIT_MS      Default for --unit-ms");
    println!("    GATHER_LOG          Log filter, e.g. debug or coop_gather=trace");
    println!();
    println!("EXAMPLES:");
    println!("    gather                     Run task1:2 and task2:1");
    println!("    gather a:3 b:1 c:2         Run three tasks, results in order a, b, c");
    println!("    gather -u 100 a:3 b:1      Same, with 100ms time units");
}

/// argv without the program name; argv may be empty
fn skip_program_name(args: &[String]) -> &[String] {
    args.get(1..).unwrap_or(&[])
}

fn parse_args(args: &[String]) -> GatherResult<Command> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--demo" | "-d" => options.demo = true,
            "--verbose" | "-v" => options.verbose = true,
            "--max-tasks" | "-m" => {
                let value = flag_value(arg, iter.next())?;
                options.max_tasks = Some(parse_max_tasks(value)?);
            }
            "--unit-ms" | "-u" => {
                let value = flag_value(arg, iter.next())?;
                options.unit = Some(parse_unit_ms(value)?);
            }
            _ if arg.starts_with('-') => {
                return Err(GatherError::config_error(format!("unknown flag: {}", arg)));
            }
            _ => options.tasks.push(arg.clone()),
        }
    }

    Ok(Command::Run(options))
}

fn flag_value<'a>(flag: &str, value: Option<&'a String>) -> GatherResult<&'a str> {
    value
        .map(String::as_str)
        .ok_or_else(|| GatherError::config_error(format!("{} expects a value", flag)))
}

/// Resolve the configuration, run the task batch and print its results
fn run(options: &Options) -> GatherResult<()> {
    let mut config = RuntimeConfig::from_env()?;
    if let Some(max_tasks) = options.max_tasks {
        config.max_tasks = max_tasks;
    }
    if let Some(unit) = options.unit {
        config.time_unit = unit;
    }
    config.validate()?;

    let tasks = if options.tasks.is_empty() {
        default_tasks(config.time_unit)
    } else {
        TaskSpec::parse_all(&options.tasks, config.time_unit)?
    };

    let results = gather(&tasks, &config)?;
    println!("{}", results);

    if options.demo {
        run_demos(&config)?;
    }

    Ok(())
}

/// Print a short async counter and use a scoped async resource
fn run_demos(config: &RuntimeConfig) -> GatherResult<()> {
    let runtime = Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| GatherError::scheduling_error(format!("failed to start scheduler: {}", e)))?;

    let tick = config.time_unit / 10;
    runtime.block_on(async {
        let numbers = counter(5, tick);
        futures::pin_mut!(numbers);
        while let Some(n) = numbers.next().await {
            println!("{}", n);
        }

        let mut resource = AsyncResource::new("resource", tick);
        resource
            .scope(|| async {
                println!("using resource");
            })
            .await;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse_args(&[]).unwrap(), Command::Run(Options::default()));
    }

    #[test]
    fn test_skip_program_name() {
        assert!(skip_program_name(&[]).is_empty());
        assert!(skip_program_name(&args(&["gather"])).is_empty());
        assert_eq!(skip_program_name(&args(&["gather", "a:1"])), args(&["a:1"]).as_slice());
    }

    #[test]
    fn test_parse_flags_and_tasks() {
        let command = parse_args(&args(&["-m", "4", "--unit-ms", "50", "-d", "a:1", "b:2"])).unwrap();

        assert_eq!(
            command,
            Command::Run(Options {
                max_tasks: Some(4),
                unit: Some(Duration::from_millis(50)),
                demo: true,
                verbose: false,
                tasks: args(&["a:1", "b:2"]),
            })
        );
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse_args(&args(&["a:1", "-h"])).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), Command::Version);
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_args(&args(&["--max-tasks"])).unwrap_err();
        assert_eq!(err.message(), "--max-tasks expects a value");

        let err = parse_args(&args(&["-x"])).unwrap_err();
        assert_eq!(err.kind(), "Config Error");

        assert!(parse_args(&args(&["-u", "0"])).is_err());
    }
}
