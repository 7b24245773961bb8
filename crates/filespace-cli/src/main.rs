use filespace::{Filespace, FilespaceConfig, ItemKind, NodeId, TreeSpec};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FILESPACE_LOG";
const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Filespace(filespace::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Filespace(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<filespace::Error> for CliError {
    fn from(value: filespace::Error) -> Self {
        Self::Filespace(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Sample,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    steps: Option<usize>,
    pretty: bool,
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeOut<'a> {
    id: NodeId,
    name: &'a str,
    kind: ItemKind,
    depth: usize,
    parent: Option<NodeId>,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOut<'a> {
    steps: usize,
    settled: bool,
    alpha: f64,
    nodes: Vec<NodeOut<'a>>,
    links: Vec<[NodeId; 2]>,
}

fn usage() -> &'static str {
    "filespace\n\
\n\
USAGE:\n\
  filespace [layout] [--steps <n>] [--config <path>] [--pretty] [--verbose] [<tree.json>|-]\n\
  filespace sample [--pretty]\n\
\n\
NOTES:\n\
  - If <tree.json> is omitted the built-in sample tree is laid out; '-' reads it from stdin.\n\
  - A tree is {\"name\": ..., \"kind\": \"folder\"|\"file\", \"children\": [...]}; kind defaults to folder.\n\
  - Without --steps the layout runs until it settles.\n\
  - Log verbosity follows FILESPACE_LOG (default: warn); --verbose switches to debug.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "sample" => args.command = Command::Sample,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--steps" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.steps = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn read_tree(input: Option<&str>) -> Result<TreeSpec, CliError> {
    let text = match input {
        None => return Ok(TreeSpec::sample()),
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    Ok(serde_json::from_str(&text)?)
}

fn read_config(path: Option<&str>) -> Result<FilespaceConfig, CliError> {
    match path {
        None => Ok(FilespaceConfig::default()),
        Some(path) => Ok(FilespaceConfig::from_json_str(&std::fs::read_to_string(path)?)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Sample => write_json(&TreeSpec::sample(), args.pretty),
        Command::Layout => {
            let config = read_config(args.config.as_deref())?;
            let tree = read_tree(args.input.as_deref())?;

            let mut fs = Filespace::new(config)?;
            fs.load(None, &tree)?;
            tracing::info!(items = fs.len(), "tree loaded");

            let steps = match args.steps {
                Some(n) => {
                    for _ in 0..n {
                        fs.step();
                    }
                    n
                }
                None => fs.settle(DEFAULT_MAX_STEPS),
            };
            let sim = fs.simulation();
            tracing::info!(steps, alpha = sim.alpha(), settled = sim.is_settled(), "layout finished");

            let nodes = fs
                .tree()
                .iter()
                .filter_map(|item| {
                    let position = sim.position(item.id())?;
                    Some(NodeOut {
                        id: item.id(),
                        name: item.name(),
                        kind: item.item_kind(),
                        depth: item.depth(),
                        parent: item.parent(),
                        x: position.x,
                        y: position.y,
                    })
                })
                .collect();
            let links = sim.edges().iter().map(|e| [e.parent, e.child]).collect();

            write_json(
                &LayoutOut {
                    steps,
                    settled: sim.is_settled(),
                    alpha: sim.alpha(),
                    nodes,
                    links,
                },
                args.pretty,
            )
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    setup_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
