//! twig - a small single-user version control system

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use twig::ops::{self, MergeOutcome};
use twig::transport;
use twig::Session;

#[derive(Parser)]
#[command(name = "twig")]
#[command(about = "single-user version control: commits, branches, merges")]
#[command(version)]
struct Cli {
    /// working directory holding the .twig repository
    #[arg(short = 'C', long, default_value = ".", env = "TWIG_DIR")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// create a repository in the working directory
    Init,

    /// stage a file for the next commit
    Add { path: String },

    /// record the staged snapshot
    Commit { message: String },

    /// unstage a file, removing it if tracked
    Rm { path: String },

    /// show the active branch's history
    Log,

    /// show every commit ever made
    GlobalLog,

    /// print ids of commits whose message contains the text
    Find { message: String },

    /// show branches, staged, removed, modified and untracked files
    Status,

    /// restore a file (`-- <file>`, `<commit> -- <file>`) or switch branches (`<branch>`)
    Checkout {
        /// branch name, or commit id prefix when a file follows `--`
        target: Option<String>,

        /// file to restore
        #[arg(last = true)]
        file: Option<String>,
    },

    /// create a branch at the current head
    Branch { name: String },

    /// delete a branch
    RmBranch { name: String },

    /// move the active branch to a commit
    Reset { commit: String },

    /// merge a branch into the active one
    Merge { branch: String },

    /// register a remote repository directory
    AddRemote { name: String, path: PathBuf },

    /// forget a remote
    RmRemote { name: String },

    /// send the active branch to a remote branch
    Push { remote: String, branch: String },

    /// copy a remote branch to `remote/branch`
    Fetch { remote: String, branch: String },

    /// fetch, then merge `remote/branch`
    Pull { remote: String, branch: String },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> twig::Result<()> {
    match cli.command {
        Commands::Init => {
            ops::init(&cli.dir)?;
            Ok(())
        }
        command => {
            let mut session = Session::open(&cli.dir)?;
            dispatch(&mut session, command)?;
            session.save()
        }
    }
}

fn dispatch(session: &mut Session, command: Commands) -> twig::Result<()> {
    match command {
        // needs no session
        Commands::Init => {}

        Commands::Add { path } => ops::add(session, &path)?,

        Commands::Commit { message } => {
            ops::commit(session, &message)?;
        }

        Commands::Rm { path } => ops::rm(session, &path)?,

        Commands::Log => {
            for entry in ops::log(session)? {
                print!("{}", entry);
            }
        }

        Commands::GlobalLog => {
            for entry in ops::global_log(session)? {
                print!("{}", entry);
            }
        }

        Commands::Find { message } => {
            for hash in ops::find(session, &message)? {
                println!("{}", hash);
            }
        }

        Commands::Status => print!("{}", ops::status(session)?),

        Commands::Checkout { target, file } => match (target, file) {
            (None, Some(file)) => ops::checkout_file(session, &file)?,
            (Some(commit), Some(file)) => ops::checkout_file_at(session, &commit, &file)?,
            (Some(branch), None) => ops::checkout_branch(session, &branch)?,
            (None, None) => Cli::command()
                .error(
                    clap::error::ErrorKind::MissingRequiredArgument,
                    "checkout needs a branch, `-- <file>`, or `<commit> -- <file>`",
                )
                .exit(),
        },

        Commands::Branch { name } => {
            ops::create_branch(session, &name)?;
        }

        Commands::RmBranch { name } => ops::remove_branch(session, &name)?,

        Commands::Reset { commit } => {
            ops::reset(session, &commit)?;
        }

        Commands::Merge { branch } => report_merge(ops::merge(session, &branch)?),

        Commands::AddRemote { name, path } => transport::add_remote(session, &name, &path)?,

        Commands::RmRemote { name } => transport::remove_remote(session, &name)?,

        Commands::Push { remote, branch } => {
            transport::push(session, &remote, &branch)?;
        }

        Commands::Fetch { remote, branch } => {
            transport::fetch(session, &remote, &branch)?;
        }

        Commands::Pull { remote, branch } => {
            report_merge(transport::pull(session, &remote, &branch)?)
        }
    }
    Ok(())
}

fn report_merge(outcome: MergeOutcome) {
    match outcome {
        MergeOutcome::FastForward { .. } => println!("Current branch fast-forwarded."),
        MergeOutcome::Merged { conflict: true, .. } => println!("Encountered a merge conflict."),
        MergeOutcome::Merged { conflict: false, .. } => {}
    }
}
