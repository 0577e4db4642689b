//! `coopex` command-line front end
//!
//! Drives a cascade or a list table against a JSON fixture or the
//! cooperative API and prints the resulting state.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use coopex_cascade::{CascadeController, ChainRegistry, Selection};
use coopex_forms::{screens, DashboardConfig, MemoryBackend, OptionSource, RestClient};
use coopex_record::{Record, Value};
use coopex_table::{Page, TableSpec, TableState};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("coopex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Coopex dashboard core: cascading selections and list tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("fixture")
                .long("fixture")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("api")
                .help("Read lists from a JSON fixture {endpoint: [records]}"),
        )
        .arg(
            Arg::new("api")
                .long("api")
                .global(true)
                .help("API base URL (overrides the configuration)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("options")
                .about("Show the visible options of every level of a chain")
                .arg(
                    Arg::new("chain")
                        .long("chain")
                        .default_value("variety")
                        .help("Chain name (variety, orchard, culture_filter)"),
                )
                .arg(
                    Arg::new("select")
                        .long("select")
                        .action(ArgAction::Append)
                        .value_parser(parse_pair)
                        .help("level=value, applied in order; comma-separate multi values"),
                )
                .arg(
                    Arg::new("edit")
                        .long("edit")
                        .action(ArgAction::Append)
                        .value_parser(parse_pair)
                        .help("field=value of a stored record to initialize from"),
                ),
        )
        .subcommand(
            Command::new("table")
                .about("Search, sort and page an endpoint's records")
                .arg(
                    Arg::new("endpoint")
                        .long("endpoint")
                        .required(true)
                        .help("Endpoint to list"),
                )
                .arg(
                    Arg::new("spec")
                        .long("spec")
                        .help("Table preset (variety, export, producer)"),
                )
                .arg(Arg::new("search").long("search").help("Search term"))
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .action(ArgAction::Append)
                        .help("Header click on a column, repeatable"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_parser(value_parser!(usize))
                        .help("Page to show (1-based)"),
                )
                .arg(
                    Arg::new("per-page")
                        .long("per-page")
                        .value_parser(value_parser!(usize))
                        .help("Rows per page"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn pairs<'a>(args: &'a ArgMatches, id: &str) -> impl Iterator<Item = &'a (String, String)> {
    args.get_many::<(String, String)>(id).into_iter().flatten()
}

fn load_config(matches: &ArgMatches) -> Result<DashboardConfig> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    Ok(config.apply_env()?)
}

fn init_tracing(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_source(matches: &ArgMatches, config: &DashboardConfig) -> Result<Box<dyn OptionSource>> {
    if let Some(path) = matches.get_one::<PathBuf>("fixture") {
        let backend = MemoryBackend::from_file(path)
            .await
            .with_context(|| format!("loading fixture {}", path.display()))?;
        return Ok(Box::new(backend));
    }
    let mut api = config.api.clone();
    if let Some(url) = matches.get_one::<String>("api") {
        api.base_url.clone_from(url);
    }
    Ok(Box::new(RestClient::new(&api)?))
}

async fn run_options(args: &ArgMatches, source: &dyn OptionSource) -> Result<()> {
    let name = args.get_one::<String>("chain").map_or("variety", String::as_str);
    let binding = screens::chain_binding(name).with_context(|| {
        format!(
            "unknown chain '{name}' (known: {})",
            ChainRegistry::with_defaults().names().join(", ")
        )
    })?;

    let mut controller = CascadeController::new(binding.chain().clone());
    for level in binding.chain().levels() {
        let Some(endpoint) = binding.endpoint_of(level.name()) else {
            continue;
        };
        match source.fetch_all(endpoint).await {
            Ok(records) => controller.set_source(level.name(), records),
            Err(error) => tracing::warn!(level = level.name(), %error, "options unavailable"),
        }
    }

    let stored: Record = pairs(args, "edit")
        .map(|(field, value)| (field.clone(), Value::text(value.as_str())))
        .collect();
    if !stored.is_empty() {
        controller.initialize_from_record(&stored);
    }

    for (level, value) in pairs(args, "select") {
        if value.contains(',') {
            controller.set_selection(level, Selection::many(value.split(',').map(str::trim)));
        } else {
            controller.set_value(level, value.as_str());
        }
    }

    print!("{}", render_options(&controller)?);
    Ok(())
}

fn render_options(controller: &CascadeController) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for level in controller.chain().levels() {
        let name = level.name();
        let selection = controller.selection(name);
        let selected: Vec<String> = selection.values().iter().map(ToString::to_string).collect();
        let disabled = if controller.is_disabled(name) { " (disabled)" } else { "" };
        writeln!(out, "{name}{disabled}: [{}]", selected.join(", "))?;
        for option in controller.visible_options(name) {
            let mark = if selection.contains(&option.value) { '*' } else { ' ' };
            writeln!(out, "  {mark} {} {}", option.value, option.label)?;
        }
    }
    Ok(out)
}

async fn run_table(args: &ArgMatches, source: &dyn OptionSource, config: &DashboardConfig) -> Result<()> {
    let endpoint = args
        .get_one::<String>("endpoint")
        .context("missing --endpoint")?;
    let rows = source
        .fetch_all(endpoint)
        .await
        .with_context(|| format!("loading '{endpoint}'"))?;

    let spec = match args.get_one::<String>("spec") {
        Some(name) => screens::table_spec(name)
            .with_context(|| format!("unknown table spec '{name}'"))?,
        None => TableSpec::new(rows.first().map(|r| r.fields().collect::<Vec<_>>()).unwrap_or_default()),
    };
    let per_page = args
        .get_one::<usize>("per-page")
        .copied()
        .unwrap_or(config.table.items_per_page);

    let mut state = TableState::new(&spec.with_items_per_page(per_page));
    if let Some(term) = args.get_one::<String>("search") {
        state.set_search(term.as_str());
    }
    for key in args.get_many::<String>("sort").into_iter().flatten() {
        state.toggle_sort(key);
    }
    if let Some(page) = args.get_one::<usize>("page") {
        state.go_to_page(*page);
    }

    let page = state.view(&rows);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", render_page(&page)?);
    }
    Ok(())
}

fn render_page(page: &Page<'_, Record>) -> Result<String, std::fmt::Error> {
    let mut columns: Vec<&str> = Vec::new();
    for row in &page.rows {
        for field in row.fields() {
            if !columns.contains(&field) {
                columns.push(field);
            }
        }
    }
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| {
            page.rows
                .iter()
                .map(|r| r.value(c).to_string().chars().count())
                .fold(c.chars().count(), usize::max)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    writeln!(out, "{}", header.join("  ").trim_end())?;
    for row in &page.rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{:<w$}", row.value(c).to_string()))
            .collect();
        writeln!(out, "{}", cells.join("  ").trim_end())?;
    }
    writeln!(
        out,
        "page {}/{} ({} items, {} per page)",
        page.current_page, page.total_pages, page.total_items, page.items_per_page
    )?;
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config.log.filter, matches.get_flag("json-logs"));

    match matches.subcommand() {
        Some(("options", args)) => {
            let source = open_source(&matches, &config).await?;
            run_options(args, source.as_ref()).await
        }
        Some(("table", args)) => {
            let source = open_source(&matches, &config).await?;
            run_table(args, source.as_ref(), &config).await
        }
        _ => Ok(()),
    }
}
