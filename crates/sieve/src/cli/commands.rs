use super::logging::{init_subscriber, Verbosity};
use super::render::{render_query, render_report};
use super::setup::{Cli, Commands, ComponentArgs, FilterArgs, IndexArgs, QueryArgs};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use sieveapp::api::SieveApi;
use sieveapp::commands::highlight::HighlightSheet;
use sieveapp::commands::index::{self, IndexMode};
use sieveapp::config::{load_config, FilterConfig};
use sieveapp::fields::read;
use sieveapp::model::Form;
use sieveapp::query::{Predicate, QueryCompiler, RejectedField, SelectorRenderer};
use sieveapp::store::fs::FileStore;
use sieveapp::store::DocumentStore;
use std::time::Instant;

/// Form created for `-f` fields when the document has none.
const CLI_FORM: &str = "filters";

/// Context under which the CLI attaches its component.
const CLI_CONTEXT: &str = "cli";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet), cli.no_color);
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let config = load_config(&cwd)?;

    match cli.command {
        Commands::Filter(args) => handle_filter(args, config),
        Commands::Index(args) => handle_index(args, config),
        Commands::Query(args) => handle_query(args, config),
        Commands::Config => handle_config(&config),
    }
}

fn apply_component(config: &mut FilterConfig, component: &ComponentArgs) {
    if let Some(tag) = &component.tag {
        config.tag = tag.clone();
    }
    if component.host.is_some() {
        config.host = component.host.clone();
    }
    if !component.targets.is_empty() {
        config.targets = Some(component.targets.join(" "));
    }
}

fn handle_filter(args: FilterArgs, mut config: FilterConfig) -> Result<()> {
    apply_component(&mut config, &args.component);
    if args.form.is_some() {
        config.form = args.form.clone();
    }
    if args.include.is_some() {
        config.include = args.include.clone();
    }
    if args.exclude.is_some() {
        config.exclude = args.exclude.clone();
    }
    if args.index.is_some() {
        config.index = args.index.clone();
    }

    let mut store = FileStore::open(&args.document)?;
    if store.document().forms.is_empty() && !args.fields.is_empty() {
        let name = config.form.clone().unwrap_or_else(|| CLI_FORM.to_string());
        store.document_mut().forms.push(Form::new(name));
    }

    let mut api = SieveApi::new(store, config)?;
    api.connect(CLI_CONTEXT, Instant::now())?;

    if !args.fields.is_empty() {
        let form_name = {
            let config = api.config();
            api.store()
                .document()
                .resolve_form_name(config.form.as_deref(), config.host.as_deref())
        }
        .context("No form to set fields on")?;
        let form = api
            .store_mut()
            .document_mut()
            .form_mut(&form_name)
            .context("No form to set fields on")?;
        for (name, value) in &args.fields {
            form.set_field(name, value);
        }
    }

    let report = api.refilter()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            render_report(&report, api.store().document(), api.highlight_sheet())
        );
    }

    if args.write {
        api.save()?;
    }
    Ok(())
}

fn handle_index(args: IndexArgs, mut config: FilterConfig) -> Result<()> {
    apply_component(&mut config, &args.component);

    let mut store = FileStore::open(&args.document)?;
    let targets = store.resolve_targets(&config.target_ids(), config.host.as_deref());
    if targets.is_empty() {
        anyhow::bail!("No target collections: pass --target or --host");
    }

    let mode = if args.remove {
        IndexMode::Remove
    } else {
        IndexMode::Add
    };
    let changed = index::run(&mut store, &targets, &args.field, mode)?;
    store.save()?;

    let verb = if args.remove { "Unindexed" } else { "Indexed" };
    println!("{} {} items under \"{}\"", verb, changed, args.field);
    Ok(())
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    selector: String,
    predicate: &'a Predicate,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlight_rule: Option<String>,
    rejected: &'a [RejectedField],
}

fn handle_query(args: QueryArgs, mut config: FilterConfig) -> Result<()> {
    if let Some(tag) = args.tag {
        config.tag = tag;
    }

    let pairs: Vec<(&str, &str)> = args
        .fields
        .iter()
        .map(|(n, v)| (n.as_str(), v.as_str()))
        .collect();
    let snapshot = read(pairs.as_slice(), &config.read_options());
    let compiled = QueryCompiler::new(config.delimiter()).compile_snapshot(&snapshot);

    let selector = SelectorRenderer::new(&config.tag).render(&compiled.predicate);
    let rule = HighlightSheet::new(&config.tag, &config.rows).render_rule(&compiled.highlights);

    if args.json {
        let output = QueryOutput {
            selector,
            predicate: &compiled.predicate,
            highlight_rule: rule,
            rejected: &compiled.rejected,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!(
            "{}",
            render_query(&selector, rule.as_deref(), &compiled.rejected)
        );
    }
    Ok(())
}

fn handle_config(config: &FilterConfig) -> Result<()> {
    let table = toml::Value::try_from(config).context("Failed to render configuration")?;
    if let toml::Value::Table(t) = table {
        for (k, v) in &t {
            println!("{} = {}", k, v);
        }
    }
    Ok(())
}
