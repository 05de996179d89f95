use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xedit::{Config, DisableParentRelativePath, InsertChild, Recipe};

#[derive(Debug, Parser)]
#[command(
    name = "xedit",
    version,
    about = "Apply format-preserving edits to XML build manifests"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Log decisions (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Maximum element nesting depth (0 or anything above 1024 means 1024)
    #[arg(long, default_value_t = Config::default().max_depth, global = true)]
    max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    #[arg(long, default_value_t = Config::default().max_size, global = true)]
    max_size: usize,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply a built-in recipe
    Apply {
        /// Recipe to apply
        #[arg(short, long, value_enum, default_value_t = RecipeArg::DisableParentRelativePath)]
        recipe: RecipeArg,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Append a child tag wherever a path matches and the child is missing
    Insert {
        /// Tag path selecting the tags to edit, e.g. /project/parent
        #[arg(short, long)]
        target: String,
        /// The tag to insert, e.g. '<relativePath/>'
        #[arg(short, long)]
        fragment: String,
        /// Only insert where this child exists, copying its indentation
        #[arg(short, long)]
        anchor: Option<String>,
        #[command(flatten)]
        io: IoArgs,
    },
    /// List built-in recipes
    List {
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, ClapArgs)]
struct IoArgs {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT", conflicts_with = "in_place")]
    output: Option<PathBuf>,
    /// Rewrite the input file
    #[arg(short, long, requires = "input")]
    in_place: bool,
    /// Exit with an error instead of writing when the document would change
    #[arg(long)]
    check: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RecipeArg {
    DisableParentRelativePath,
}

impl RecipeArg {
    fn recipe(self) -> DisableParentRelativePath {
        match self {
            Self::DisableParentRelativePath => DisableParentRelativePath::new(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::new(args.max_depth, args.max_size);
    match args.command {
        Command::Apply { recipe, io } => run(&recipe.recipe(), &io, config),
        Command::Insert {
            target,
            fragment,
            anchor,
            io,
        } => {
            let mut policy = InsertChild::new(&target, &fragment)?;
            if let Some(anchor) = anchor {
                policy = policy.with_anchor(anchor);
            }
            run(&policy, &io, config)
        }
        Command::List { json } => list(json),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(recipe: &impl Recipe, io: &IoArgs, config: Config) -> Result<()> {
    let input = read_input(&io.input)?;
    let output = recipe
        .apply_with_config(&input, config)
        .with_context(|| format!("failed to apply '{}'", recipe.name()))?;

    let changed = output != input;
    info!(changed, recipe = recipe.name(), "applied");
    if io.check {
        if changed {
            bail!("document would be changed by '{}'", recipe.name());
        }
        return Ok(());
    }

    let target = if io.in_place { &io.input } else { &io.output };
    if io.in_place && !changed {
        debug!("unchanged, not rewriting input");
        return Ok(());
    }
    write_output(target, output.as_bytes())
}

fn list(json: bool) -> Result<()> {
    let descriptors: Vec<_> = RecipeArg::value_variants()
        .iter()
        .map(|arg| {
            let name = arg
                .to_possible_value()
                .map(|v| v.get_name().to_string())
                .unwrap_or_default();
            (name, arg.recipe().descriptor())
        })
        .collect();

    let mut stdout = io::stdout();
    if json {
        let values: Vec<_> = descriptors.iter().map(|(_, d)| d).collect();
        serde_json::to_writer_pretty(&mut stdout, &values).context("failed to write stdout")?;
        writeln!(stdout).context("failed to write stdout")?;
    } else {
        for (name, descriptor) in &descriptors {
            writeln!(stdout, "{name}\n    {}\n    {}", descriptor.name, descriptor.description)
                .context("failed to write stdout")?;
        }
    }
    Ok(())
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
