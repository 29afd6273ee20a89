//! rsync-enum: wordlist-driven path enumeration against rsync daemons
//! Probes each candidate with `rsync --list-only`, optionally downloads what it finds,
//! and saves the found paths.

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use std::io::Write;
use std::path::PathBuf;

use rsync_enum::commands::handle_enumerate_command;
use rsync_enum::core::{CliArgs, FileConfig, RunConfig};
use rsync_enum::EnumError;

fn build_cli() -> ClapCommand {
    ClapCommand::new("rsync-enum")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Enumerate paths on an rsync daemon from a wordlist")
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .visible_alias("target-ip")
                .required(true)
                .help("Target host or IP address"),
        )
        .arg(
            Arg::new("wordlist")
                .short('w')
                .long("wordlist")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Wordlist file, one entry per line"),
        )
        .arg(
            Arg::new("extensions")
                .short('e')
                .long("extensions")
                .num_args(0..)
                .action(ArgAction::Append)
                .help("Extensions to append to each entry (e.g. .zip bak)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(clap::value_parser!(PathBuf))
                .help("File to save found paths to"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Output format: plain, csv or json [default: plain]"),
        )
        .arg(
            Arg::new("download")
                .short('d')
                .long("download")
                .action(ArgAction::SetTrue)
                .help("Download found paths"),
        )
        .arg(
            Arg::new("download-dir")
                .long("download-dir")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory for downloaded paths [default: downloads]"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_parser(clap::value_parser!(u16))
                .help("rsync daemon port [default: 873]"),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Skip wordlist entries containing any of these substrings"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_parser(clap::value_parser!(f64))
                .help("Probe timeout in seconds [default: none]"),
        )
        .arg(
            Arg::new("download-timeout")
                .long("download-timeout")
                .value_parser(clap::value_parser!(f64))
                .help("Download timeout in seconds [default: none]"),
        )
        .arg(
            Arg::new("delay")
                .long("delay")
                .value_parser(clap::value_parser!(f64))
                .help("Pause after each candidate, in seconds [default: 0]"),
        )
        .arg(
            Arg::new("keep-blank")
                .long("keep-blank")
                .action(ArgAction::SetTrue)
                .help("Probe blank wordlist lines instead of skipping them"),
        )
        .arg(
            Arg::new("save-on-interrupt")
                .long("save-on-interrupt")
                .action(ArgAction::SetTrue)
                .help("Write paths found so far when interrupted"),
        )
        .arg(
            Arg::new("rsync-bin")
                .long("rsync-bin")
                .help("rsync executable to invoke [default: rsync]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML profile with default settings"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show detailed output"),
        )
}

fn collect_strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn cli_args(matches: &ArgMatches) -> CliArgs {
    CliArgs {
        target: matches.get_one::<String>("target").cloned().unwrap_or_default(),
        wordlist: matches.get_one::<PathBuf>("wordlist").cloned().unwrap_or_default(),
        extensions: collect_strings(matches, "extensions"),
        exclude: collect_strings(matches, "exclude"),
        output: matches.get_one::<PathBuf>("output").cloned(),
        download: matches.get_flag("download"),
        download_dir: matches.get_one::<PathBuf>("download-dir").cloned(),
        port: matches.get_one::<u16>("port").copied(),
        timeout: matches.get_one::<f64>("timeout").copied(),
        download_timeout: matches.get_one::<f64>("download-timeout").copied(),
        delay: matches.get_one::<f64>("delay").copied(),
        format: matches.get_one::<String>("format").cloned(),
        verbose: matches.get_flag("verbose"),
        keep_blank: matches.get_flag("keep-blank"),
        save_on_interrupt: matches.get_flag("save-on-interrupt"),
        rsync_bin: matches.get_one::<String>("rsync-bin").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
    }
}

/// Initializes logging to stderr with bare messages; verbosity is fixed here for the whole run
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

async fn run(args: CliArgs) -> rsync_enum::Result<()> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    let config = RunConfig::resolve(args, file_config)?;
    handle_enumerate_command(config).await?;
    log::info!("Enumeration complete.");
    Ok(())
}

fn main() {
    let matches = build_cli().get_matches();
    let args = cli_args(&matches);
    init_logging(args.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("❌ Error: {}", EnumError::Unclassified(e.into()));
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(args)) {
        log::error!("❌ Error: {e}");
        std::process::exit(e.exit_code());
    }
}
