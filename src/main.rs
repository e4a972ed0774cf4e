mod classify;
mod cleaner;
mod constants;
mod error;
mod group;
mod keeplist;
mod model;
mod portage;
mod scanner;
mod settings;
mod ui;

use anyhow::{Result, bail};
use clap::{ArgGroup, CommandFactory, Parser};
use keeplist::KeepList;
use portage::Object;
use settings::{RemovalMode, Settings};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const EXAMPLES: &str = "\
Examples:
  List all keywords stored in /etc/portage/package.keywords:
      kmu -lk
  Accept any keyword for a package:
      kmu -ak dev-libs/foo
  Delete keyword entries containing xxx:
      kmu -dk xxx
  Remove zh_CN linguas for man-pages:
      kmu -auL sys-apps/man-pages -zh_CN
  Remove old distfiles:
      kmu -c";

/// Simple tool to manage keywords, (un)masks and USE flags for Gentoo
#[derive(Parser)]
#[command(
    version,
    about,
    long_about = None,
    disable_version_flag = true,
    after_help = EXAMPLES,
    group(ArgGroup::new("action").args(["add", "delete", "list", "clean"]))
)]
struct Cli {
    /// Add content to OBJ
    #[arg(short = 'a', long, value_name = "OBJ")]
    add: Option<Object>,

    /// Delete content from OBJ
    #[arg(short = 'd', long, value_name = "OBJ")]
    delete: Option<Object>,

    /// List content of OBJ
    #[arg(short = 'l', long, value_name = "OBJ")]
    list: Option<Object>,

    /// Clean up OBJ (old distfiles by default)
    #[arg(short = 'c', long, value_name = "OBJ", num_args = 0..=1, default_missing_value = "p")]
    clean: Option<Object>,

    /// Move cleaned distfiles to the trash instead of deleting them
    #[arg(long)]
    trash: bool,

    /// Distfiles directory to clean
    #[arg(long, env = "DISTDIR", value_name = "DIR")]
    distdir: Option<PathBuf>,

    /// Gentoo Prefix root prepended to system paths
    #[arg(long, env = "EPREFIX", value_name = "DIR")]
    eprefix: Option<PathBuf>,

    /// Show debug output
    #[arg(short = 'D', long)]
    debug: bool,

    /// Print version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Content to add to, delete from or filter OBJ with
    #[arg(value_name = "CONTENT", trailing_var_arg = true, allow_hyphen_values = true)]
    content: Vec<String>,
}

fn main() -> ExitCode {
    if std::env::args_os().len() == 1 {
        println!("Missing arguments, showing help..\n");
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            let _ = ui::error(&mut io::stderr(), &format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let removal = if cli.trash {
        RemovalMode::Trash
    } else {
        RemovalMode::Unlink
    };
    let keep = KeepList::load();
    if !keep.is_empty() {
        log::debug!("keep list is active");
    }
    let settings = Settings::new(cli.eprefix, cli.distdir)
        .with_removal(removal)
        .with_keep(keep);
    log::debug!("settings: {settings:?}");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    if let Some(object) = cli.add {
        portage::add(&settings, object, &cli.content, &mut input, &mut out)?;
    } else if let Some(object) = cli.delete {
        portage::delete(&settings, object, &cli.content, &mut input, &mut out)?;
    } else if let Some(object) = cli.list {
        portage::list(&settings, object, &cli.content, &mut out)?;
    } else if let Some(object) = cli.clean {
        return clean(&settings, object, &mut input, &mut out);
    } else {
        println!("Wrong usage, showing help...\n");
        Cli::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn clean(
    settings: &Settings,
    object: Object,
    input: &mut dyn io::BufRead,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    if object != Object::Distfiles {
        bail!("{} entries cannot be cleaned, only distfiles (p)", object.name());
    }

    let root = object.path(settings);
    writeln!(out, "Checking old packages in {}....\n", root.display())?;

    let spinner = ui::scan_spinner();
    let tick = || spinner.inc(1);
    let plan = cleaner::plan(settings, &root, Some(&tick));
    spinner.finish_and_clear();

    let plan = plan?;
    log::debug!(
        "{} files in {} groups to remove",
        plan.files().len(),
        plan.groups().len()
    );

    let outcome = cleaner::execute(settings, &plan, input, out)?;
    log::debug!("clean finished: {outcome:?}");

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
