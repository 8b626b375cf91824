#![allow(dead_code)]

use crate::areas::repository::Repository;
use crate::commands::plumbing::cat_file::CatFileMode;
use crate::errors::CoreError;
use anyhow::Result;
use clap::{Parser, Subcommand};

mod areas;
mod artifacts;
mod commands;
mod errors;

#[derive(Parser)]
#[command(
    name = "grit",
    version = "0.1.0",
    about = "A content-addressed version control system, compatible on-disk with git",
    long_about = "grit implements the local plumbing of git: the object \
    database, the index, refs, and the staging/commit pipeline. It is not a \
    replacement for git, but it reads and writes the same on-disk formats.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "Creates the control directory scaffold (objects, refs, HEAD, config) \
        in the current directory or at the specified path; reinitializes if it already exists."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Add files or directories to the index",
        long_about = "Stages the given paths. `add .` stages the whole working directory \
        and also removes index entries whose files are gone."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "Shows staged changes (HEAD vs index), unstaged changes (index vs \
        working tree) and untracked files."
    )]
    Status,
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "Writes the index as a tree, records a commit pointing at it and \
        advances the current branch (or the detached HEAD)."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "config",
        about = "Get or set configuration values",
        long_about = "Reads or writes dotted `section.name` keys in the repository config."
    )]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    #[command(
        name = "cat-file",
        about = "Print the content, type or size of an object",
        long_about = "Resolves the argument as a commit-ish, tree-ish or raw digest and \
        prints the requested property. Exactly one of -p, -t, -s must be given."
    )]
    CatFile {
        #[arg(short = 'p', help = "Pretty-print the object's content")]
        pretty: bool,
        #[arg(short = 't', help = "Show the object's type")]
        show_type: bool,
        #[arg(short = 's', help = "Show the object's payload size")]
        show_size: bool,
        #[arg(index = 1, help = "The object to inspect")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Compute an object ID, optionally writing the object",
        long_about = "Hashes the file's contents framed as the given type (blob by \
        default); with -w the object is also written to the database."
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(
            short = 't',
            default_value = "blob",
            help = "Object type: blob, tree or commit"
        )]
        object_type: String,
        #[arg(index = 1, help = "The file to hash")]
        file: String,
    },
    #[command(
        name = "update-index",
        about = "Register file information directly in the index",
        long_about = "With --cacheinfo, injects the given mode, object and path into the \
        index without touching the working tree."
    )]
    UpdateIndex {
        #[arg(long, help = "Insert the given mode, object and path directly")]
        cacheinfo: bool,
        #[arg(index = 1, help = "File mode (e.g. 100644)")]
        mode: String,
        #[arg(index = 2, help = "Object digest (40 hex characters)")]
        object: String,
        #[arg(index = 3, help = "Path to register")]
        path: String,
    },
    #[command(
        name = "write-tree",
        about = "Write the current index as a tree object",
        long_about = "Builds tree objects from the sorted index and prints the root tree's \
        digest."
    )]
    WriteTree,
    #[command(
        name = "read-tree",
        about = "Read a tree into the index",
        long_about = "Replaces the index with the blobs of the given tree-ish; the working \
        tree is left alone."
    )]
    ReadTree {
        #[arg(index = 1, help = "The tree-ish to read")]
        treeish: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "Lists one level of the given tree-ish; -r recurses into subtrees, \
        -t includes subtrees while recursing, -d lists only subtrees."
    )]
    LsTree {
        #[arg(short = 'd', help = "Show only subtrees")]
        dirs_only: bool,
        #[arg(short = 'r', help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(short = 't', help = "Include subtrees when recursing")]
        with_trees: bool,
        #[arg(index = 1, help = "The tree-ish to list")]
        treeish: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore working tree files",
        long_about = "Materializes a commit's tree into the working directory and index. \
        With -b, creates the branch first; with `-- <paths>`, restores only those paths \
        and leaves HEAD alone."
    )]
    Checkout {
        #[arg(short = 'b', help = "Create a new branch and switch to it")]
        new_branch: Option<String>,
        #[arg(index = 1, help = "The commit-ish to check out (defaults to HEAD with -b)")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "Restore only these paths, without moving HEAD")]
        paths: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    #[command(name = "get", about = "Print the value stored under a key")]
    Get {
        #[arg(index = 1, help = "Dotted key, e.g. user.name")]
        key: String,
    },
    #[command(name = "set", about = "Store a value under a key")]
    Set {
        #[arg(index = 1, help = "Dotted key, e.g. user.name")]
        key: String,
        #[arg(index = 2, help = "The value to store")]
        value: String,
    },
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(pwd, Box::new(std::io::stdout()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => {
                    Repository::new(path.into(), Box::new(std::io::stdout()))?
                }
                None => open_repository()?,
            };

            repository.init().await?
        }
        Commands::Add { paths } => open_repository()?.add(paths).await?,
        Commands::Status => open_repository()?.status().await?,
        Commands::Commit { message } => open_repository()?.commit(message).await?,
        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => open_repository()?.config_get(key)?,
            ConfigCommands::Set { key, value } => open_repository()?.config_set(key, value)?,
        },
        Commands::CatFile {
            pretty,
            show_type,
            show_size,
            object,
        } => {
            let mode = match (pretty, show_type, show_size) {
                (true, false, false) => CatFileMode::Pretty,
                (false, true, false) => CatFileMode::Type,
                (false, false, true) => CatFileMode::Size,
                _ => {
                    return Err(CoreError::InvalidArgument(
                        "cat-file needs exactly one of -p, -t, -s".into(),
                    )
                    .into());
                }
            };

            open_repository()?.cat_file(object, mode)?
        }
        Commands::HashObject {
            write,
            object_type,
            file,
        } => open_repository()?.hash_object(file, object_type, *write)?,
        Commands::UpdateIndex {
            cacheinfo,
            mode,
            object,
            path,
        } => {
            if !*cacheinfo {
                return Err(CoreError::InvalidArgument(
                    "update-index only supports --cacheinfo".into(),
                )
                .into());
            }

            open_repository()?
                .update_index_cacheinfo(mode, object, path)
                .await?
        }
        Commands::WriteTree => open_repository()?.write_tree().await?,
        Commands::ReadTree { treeish } => open_repository()?.read_tree(treeish).await?,
        Commands::LsTree {
            dirs_only,
            recursive,
            with_trees,
            treeish,
        } => open_repository()?.ls_tree(treeish, *dirs_only, *recursive, *with_trees)?,
        Commands::Checkout {
            new_branch,
            target,
            paths,
        } => {
            open_repository()?
                .checkout(new_branch.as_deref(), target.as_deref(), paths)
                .await?
        }
    }

    Ok(())
}
