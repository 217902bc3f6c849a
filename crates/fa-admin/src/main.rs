//! `fa-admin` command line

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use fa_admin::{logging, render_file, Config, Session, Verbosity};
use fa_prep::PrepMode;
use fa_render::Markup;
use std::io::Write;
use std::path::PathBuf;

fn files_arg() -> Arg {
    Arg::new("files")
        .num_args(0..)
        .value_parser(value_parser!(PathBuf))
        .help("EAD files; defaults to every .xml file in the configured source directories")
}

fn cli() -> Command {
    Command::new("fa-admin")
        .version(fa_admin::VERSION)
        .about("Prepare, check and publish EAD finding aids")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .env("FA_ADMIN_CONFIG")
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (default: fa-admin.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print batch details and debug logging"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only print errors and the summary"),
        )
        .subcommand(
            Command::new("prep")
                .about("Set ids and ARKs, check, and save EAD that changed")
                .arg(files_arg()),
        )
        .subcommand(
            Command::new("clean")
                .about("Set ids and trim whitespace, check, and save EAD that changed")
                .arg(files_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Run the publication checks without changing anything")
                .arg(files_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("load")
                .about("Check EAD and load passing files into the document store")
                .arg(files_arg())
                .arg(
                    Arg::new("preview")
                        .long("preview")
                        .action(ArgAction::SetTrue)
                        .help("Load into the preview collection"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Remove a published finding aid and leave a tombstone")
                .arg(Arg::new("eadid").required(true))
                .arg(
                    Arg::new("note")
                        .long("note")
                        .default_value("")
                        .help("Explanation shown to visitors"),
                ),
        )
        .subcommand(
            Command::new("check-eadids")
                .about("Report stored eadids that cannot be used in site URLs"),
        )
        .subcommand(
            Command::new("render")
                .about("Render one field of an EAD file as HTML")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("field")
                        .long("field")
                        .default_value("archdesc/did/unittitle")
                        .help("Element path below the root"),
                )
                .arg(
                    Arg::new("rdfa")
                        .long("rdfa")
                        .action(ArgAction::SetTrue)
                        .help("Include RDFa annotations"),
                ),
        )
}

fn files(args: &ArgMatches) -> Vec<PathBuf> {
    args.get_many::<PathBuf>("files")
        .map(|files| files.cloned().collect())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = Config::discover(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let verbose = matches.get_flag("verbose");
    logging::init(&config.logging, verbose)?;

    let verbosity = if verbose {
        Verbosity::All
    } else if matches.get_flag("quiet") {
        Verbosity::Minimal
    } else {
        Verbosity::Normal
    };
    let mut out = std::io::stdout().lock();

    if let Some(("render", args)) = matches.subcommand() {
        let markup = if args.get_flag("rdfa") {
            Markup::Rdfa
        } else {
            Markup::Html
        };
        let Some(file) = args.get_one::<PathBuf>("file") else {
            anyhow::bail!("no file to render");
        };
        let field = args
            .get_one::<String>("field")
            .map_or("archdesc/did/unittitle", String::as_str);
        render_file(file, field, markup, &mut out)?;
        return Ok(());
    }

    let session = Session::open(config)?.with_verbosity(verbosity);
    let success = match matches.subcommand() {
        Some(("prep", args)) => session
            .prep(PrepMode::Prep, &files(args), &mut out)
            .await?
            .is_success(),
        Some(("clean", args)) => session
            .prep(PrepMode::Clean, &files(args), &mut out)
            .await?
            .is_success(),
        Some(("check", args)) => session
            .check(&files(args), args.get_flag("json"), &mut out)
            .await?
            .is_success(),
        Some(("load", args)) => session
            .load(&files(args), args.get_flag("preview"), &mut out)
            .await?
            .is_success(),
        Some(("delete", args)) => {
            let eadid = args.get_one::<String>("eadid").map_or("", String::as_str);
            let note = args.get_one::<String>("note").map_or("", String::as_str);
            session.delete(eadid, note, &mut out).await?;
            true
        }
        Some(("check-eadids", _)) => session.check_eadids(&mut out).await? == 0,
        _ => unreachable!("subcommand_required"),
    };

    out.flush()?;
    std::process::exit(if success { 0 } else { 1 });
}
