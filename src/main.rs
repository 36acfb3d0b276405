use apitest::{
    cli::Opts,
    errors::ApiTestError,
    executor::{
        results::{suite_verdict, Severity},
        Suite,
    },
    picker::toml::Config,
    printer::{self, PrintOpts},
};

use std::time::Duration;
use structopt::StructOpt;
use tokio::runtime;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn dry_run(suite: &Suite) {
    use colored::*;
    for (set_name, set) in suite.sets() {
        for (name, test) in set.tests() {
            println!(
                "{}{}{} ({:?}{})",
                set_name.blue(),
                ":".blue(),
                name.blue(),
                test.level,
                if test.check.is_async() { ", async" } else { "" }
            );
        }
    }
}

fn run() -> Result<i32, ApiTestError> {
    let opts = Opts::from_args();
    init_logging(opts.verbose);

    let (include, exclude) = opts.filters()?;
    let default_name = opts
        .dir
        .canonicalize()?
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "apitest".to_string());
    let mut suite = Config::from_path(&opts.dir)?
        .into_suite(&default_name)
        .with_filters(include.as_ref(), exclude.as_ref());
    if let Some(ms) = opts.timeout {
        suite = suite.with_timeout(Duration::from_millis(ms));
    }

    // Commands run relative to the directory containing apitest.toml.
    std::env::set_current_dir(&opts.dir)?;

    if opts.dry_run {
        dry_run(&suite);
        return Ok(0);
    }

    let runtime = runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let reports = runtime.block_on(suite.run());

    if opts.json {
        println!("{}", printer::suite_json(&suite.name, &reports)?);
    } else {
        let print_opts = PrintOpts {
            verbose: opts.verbose,
            only: opts.post_filter.map(Severity::from),
        };
        print!("{}", printer::suite_str(&suite.name, &reports, &print_opts));
    }

    // The renderer is done with every set.
    suite.hooks().iter().for_each(|hook| hook());

    Ok(match suite_verdict(&reports).severity() {
        Severity::Fail => 1,
        Severity::Pass | Severity::Partially => 0,
    })
}

fn main() {
    std::process::exit(match run() {
        Err(err) => {
            println!("error: {}", err);
            2
        }
        Ok(code) => code,
    })
}
