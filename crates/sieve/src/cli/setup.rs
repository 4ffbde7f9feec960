use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "sieve",
    bin_name = "sieve",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Filter collections of a JSON document by form fields", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging on stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, help_heading = "Options")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set form fields and run one filter pass
    Filter(FilterArgs),

    /// Add or remove the indexed text attribute on every item
    Index(IndexArgs),

    /// Show the selector that a set of fields compiles to
    Query(QueryArgs),

    /// Show the effective configuration
    Config,
}

/// Options shared by commands that resolve forms and targets.
#[derive(Args, Debug, Default)]
pub struct ComponentArgs {
    /// Component name: event name and attribute prefix
    #[arg(long)]
    pub tag: Option<String>,

    /// Collection the component lives in
    #[arg(long)]
    pub host: Option<String>,

    /// Target collection id (repeatable)
    #[arg(short, long = "target")]
    pub targets: Vec<String>,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// JSON document of forms and collections
    pub document: PathBuf,

    /// Field value as name=value, flags encoded in the name (status:not=urgent)
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Form supplying the field values
    #[arg(long)]
    pub form: Option<String>,

    #[command(flatten)]
    pub component: ComponentArgs,

    /// Space-separated field names to read exclusively
    #[arg(long)]
    pub include: Option<String>,

    /// Space-separated field names to ignore
    #[arg(long)]
    pub exclude: Option<String>,

    /// Index item text under this field name before filtering
    #[arg(long)]
    pub index: Option<String>,

    /// Write the resulting hidden state back to the document
    #[arg(short, long)]
    pub write: bool,

    /// Print the pass report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// JSON document of forms and collections
    pub document: PathBuf,

    /// Field name to index item text under
    pub field: String,

    /// Remove the attribute instead of adding it
    #[arg(long)]
    pub remove: bool,

    #[command(flatten)]
    pub component: ComponentArgs,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Field value as name=value, flags encoded in the name (status:not=urgent)
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Component name used as attribute prefix
    #[arg(long)]
    pub tag: Option<String>,

    /// Print the compiled query as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got \"{}\"", s))
}
