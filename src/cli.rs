use clap::{crate_authors, crate_description, crate_version, Arg, ArgAction, Command};
use pretty_env_logger::env_logger::Builder;
use std::env;
use std::fmt::Display;
use std::io::Write;
use std::process::exit;

use cfddns_rs::service::{Scheduler, Updater};
use cfddns_rs::Config;

fn set_logger_level(b: &mut Builder) {
    let mut b = b;
    if env::var("RUST_LOG").is_err() {
        b = b.filter_level(log::LevelFilter::Info)
    }
    b.init();
}

fn setup_logger() {
    // Adapted from env_logger examples. <3 Systemd support
    match std::env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let builder = &mut pretty_env_logger::env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            set_logger_level(builder);
        }
        _ => {
            let builder = &mut pretty_env_logger::formatted_builder();
            set_logger_level(builder);
        }
    };
}

/// Single exit point for fatal errors, which are logged here and nowhere else.
fn fail(err: impl Display) -> ! {
    tracing::error!("{err}");
    exit(1);
}

pub(crate) fn main() {
    let cli = Command::new("cfddns")
        .about(format!(
            "{}\n{} {}",
            crate_description!(),
            "Configuration is managed using environment variables.",
            "See the docs for more information.",
        ))
        .arg(
            Arg::new("check")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test")
                .help("Check the configuration"),
        )
        .arg(
            Arg::new("dry-run")
                .action(ArgAction::SetTrue)
                .long("dry-run")
                .help("Show changes without applying them"),
        )
        .arg(
            Arg::new("watch")
                .action(ArgAction::SetTrue)
                .short('w')
                .long("watch")
                .help("Keep running, updating every UPDATE_INTERVAL hours"),
        )
        .version(crate_version!())
        .author(crate_authors!("\n"));

    let args = cli.get_matches();

    setup_logger();

    let config = Config::from_env().unwrap_or_else(|err| fail(err));

    if args.get_flag("check") {
        tracing::info!(
            domain = %config.domain,
            name = %config.target_name(),
            interval_secs = config.update_interval.as_secs(),
            "Configuration is valid."
        );
        exit(0);
    }

    let updater = Updater::from(&config).dry_run(args.get_flag("dry-run"));

    if args.get_flag("watch") {
        let scheduler = Scheduler::new(updater, config.update_interval);
        if let Err(err) = scheduler.run() {
            fail(err);
        }
    } else {
        match updater.run() {
            Ok(outcome) => tracing::info!(
                address = %outcome.address,
                name = %outcome.target,
                created = outcome.changes.created,
                updated = outcome.changes.updated,
                failed = outcome.changes.failed_creates,
                "Update completed"
            ),
            Err(err) => fail(err),
        }
    }
}
