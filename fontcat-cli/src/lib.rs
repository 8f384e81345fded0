//! fontcat CLI (made by FontLab https://www.fontlab.com/)

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use tracing_subscriber::EnvFilter;

use fontcat_core::catalog::{CatalogSet, FontRecord, WebfontsDocument};
use fontcat_core::css::{font_preview, generate_font_face_css};
use fontcat_core::fontid::family_to_id;
use fontcat_core::output::{write_json_pretty, write_ndjson};
use fontcat_core::search::{SearchParams, DEFAULT_LIMIT, DEFAULT_PAGE};
use fontcat_core::validate::{
    find_missing_previews, validate_tree, FamilyIndex, MissingPreview, ValidationReport,
};

pub mod server;

/// CLI entrypoint for fontcat.
#[derive(Debug, Parser)]
#[command(
    name = "fontcat",
    about = "Google Fonts catalog browser and API server (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    #[command(flatten)]
    catalogs: CatalogArgs,

    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Catalog of variable families (items carry `axes`)
    #[arg(
        long = "variable-catalog",
        env = "FONTCAT_VARIABLE_CATALOG",
        default_value = "webfonts-vf.json",
        global = true,
        value_hint = ValueHint::FilePath
    )]
    variable_catalog: PathBuf,

    /// Catalog of static families with per-weight files
    #[arg(
        long = "static-catalog",
        env = "FONTCAT_STATIC_CATALOG",
        default_value = "webfonts.json",
        global = true,
        value_hint = ValueHint::FilePath
    )]
    static_catalog: PathBuf,
}

impl CatalogArgs {
    fn load(&self) -> Result<CatalogSet> {
        CatalogSet::load(&self.variable_catalog, &self.static_catalog)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the JSON API over HTTP
    Serve(ServeArgs),
    /// Filter and page through the variable catalog
    Search(SearchArgs),
    /// Print one family with its static counterpart as JSON
    Show(ShowArgs),
    /// Print @font-face rules for one family
    Css(CssArgs),
    /// Check a local fonts tree's METADATA.pb files against the static catalog
    Validate(ValidateArgs),
    /// List variable-catalog families without an SVG preview
    MissingSvg(MissingSvgArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long = "bind", env = "FONTCAT_BIND", default_value = "127.0.0.1:3000")]
    bind: String,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Text matched against family, category and variant names
    query: Option<String>,

    /// Keep only `variable` or `static` families
    #[arg(short = 'p', long = "property", value_hint = ValueHint::Other)]
    property: Option<String>,

    /// Keep only this category (e.g. serif, monospace)
    #[arg(short = 'c', long = "category", value_hint = ValueHint::Other)]
    category: Option<String>,

    /// 1-based page number
    #[arg(long = "page", default_value_t = DEFAULT_PAGE, allow_negative_numbers = true)]
    page: i64,

    /// Families per page
    #[arg(long = "limit", default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
    limit: i64,

    /// Emit the full search response as JSON
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit one family record per line
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Format output as padded columns
    #[arg(long = "columns", action = ArgAction::SetTrue)]
    columns: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

impl SearchArgs {
    fn params(&self) -> SearchParams {
        SearchParams {
            query: self.query.clone(),
            property: self.property.clone(),
            category: self.category.clone(),
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Family identifier such as `open-sans`
    id: String,
}

#[derive(Debug, Args)]
struct CssArgs {
    /// Family identifier such as `open-sans`
    id: String,

    /// Emit the preview description (stylesheet id, faces, CSS) as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Args)]
struct MissingSvgArgs {
    /// Directory of pre-rendered `<family>.svg` previews
    #[arg(long = "svg-dir", default_value = "public/svg", value_hint = ValueHint::DirPath)]
    svg_dir: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Directory holding one subdirectory per family
    #[arg(long = "fonts-dir", default_value = "fonts/ofl", value_hint = ValueHint::DirPath)]
    fonts_dir: PathBuf,

    /// Where to write the CSV of failing families
    #[arg(short = 'o', long = "output", default_value = "invalid.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Serve(args) => run_serve(&cli.catalogs, args),
        Command::Search(args) => run_search(&cli.catalogs, args),
        Command::Show(args) => run_show(&cli.catalogs, args),
        Command::Css(args) => run_css(&cli.catalogs, args),
        Command::Validate(args) => run_validate(&cli.catalogs, args),
        Command::MissingSvg(args) => run_missing_svg(&cli.catalogs, args),
    }
}

fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "fontcat=info",
        1 => "fontcat=debug",
        _ => "fontcat=trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    // A second init (tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_serve(catalogs: &CatalogArgs, args: ServeArgs) -> Result<()> {
    let catalog = Arc::new(catalogs.load()?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    runtime.block_on(server::serve(&args.bind, catalog))
}

fn run_search(catalogs: &CatalogArgs, args: SearchArgs) -> Result<()> {
    let catalog = catalogs.load()?;
    let response = catalog.search(&args.params());

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let use_color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => handle.is_terminal(),
    };

    if args.ndjson {
        write_ndjson(&response.results.fonts, &mut handle)?;
    } else if args.json {
        write_json_pretty(&response, &mut handle)?;
    } else if args.columns {
        write_columns(&response.results.fonts, &mut handle, use_color)?;
    } else {
        write_plain(&response.results.fonts, &mut handle, use_color)?;
    }

    tracing::info!(
        total = response.results.total,
        page = response.results.page,
        total_pages = response.results.total_pages,
        "search finished"
    );
    Ok(())
}

fn run_show(catalogs: &CatalogArgs, args: ShowArgs) -> Result<()> {
    let catalog = catalogs.load()?;
    let font = catalog.lookup(&args.id)?;
    write_json_pretty(&font, io::stdout().lock())
}

fn run_css(catalogs: &CatalogArgs, args: CssArgs) -> Result<()> {
    let catalog = catalogs.load()?;
    let font = catalog.lookup(&args.id)?;
    if args.json {
        return write_json_pretty(&font_preview(&font), io::stdout().lock());
    }
    let css = generate_font_face_css(&font);

    let mut out = io::stdout().lock();
    if !css.is_empty() {
        writeln!(out, "{css}")?;
    }
    Ok(())
}

fn run_validate(catalogs: &CatalogArgs, args: ValidateArgs) -> Result<()> {
    let statics = WebfontsDocument::from_path(&catalogs.static_catalog)?;
    let index = FamilyIndex::new(&statics.items);
    let report = validate_tree(&args.fonts_dir, &index)?;

    if report.issues.is_empty() {
        return write_summary(&report, None, io::stdout().lock());
    }

    write_issues(&report, io::stderr().lock())?;

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    report.write_csv(&mut writer)?;
    writer
        .flush()
        .with_context(|| format!("writing {}", args.output.display()))?;

    write_summary(&report, Some(&args.output), io::stdout().lock())
}

fn run_missing_svg(catalogs: &CatalogArgs, args: MissingSvgArgs) -> Result<()> {
    let catalog = catalogs.load()?;
    let missing = find_missing_previews(catalog.variable_fonts(), &args.svg_dir)?;
    write_missing_previews(&missing, io::stdout().lock())
}

fn write_missing_previews(missing: &[MissingPreview], mut w: impl Write) -> Result<()> {
    if missing.is_empty() {
        writeln!(w, "All fonts are present.")?;
        return Ok(());
    }

    writeln!(w, "Missing previews:")?;
    for item in missing {
        writeln!(w, "{} ({})", item.family, item.svg)?;
    }
    writeln!(w)?;
    writeln!(w, "Total missing previews: {}", missing.len())?;
    Ok(())
}

fn write_issues(report: &ValidationReport, mut w: impl Write) -> Result<()> {
    for issue in &report.issues {
        writeln!(w, "[ERROR] {}: {}", issue.folder.display(), issue.message)?;
    }
    Ok(())
}

/// `csv_path` is `None` when every family passed and no report was written.
fn write_summary(
    report: &ValidationReport,
    csv_path: Option<&Path>,
    mut w: impl Write,
) -> Result<()> {
    writeln!(w, "Total fonts: {}", report.total_fonts)?;
    writeln!(w, "Valid fonts: {}", report.valid_fonts())?;
    writeln!(w, "Invalid fonts: {}", report.invalid_fonts())?;
    match csv_path {
        Some(path) => writeln!(w, "Report written to: {}", path.display())?,
        None => writeln!(w, "All fonts validated successfully!")?,
    }
    Ok(())
}

fn write_plain(fonts: &[FontRecord], mut w: impl Write, color: bool) -> Result<()> {
    for font in fonts {
        let rendered = apply_color(&font.family, color, AnsiColor::Cyan);
        writeln!(w, "{rendered}")?;
    }
    Ok(())
}

fn write_columns(fonts: &[FontRecord], mut w: impl Write, color: bool) -> Result<()> {
    let mut rows: Vec<(String, String, String)> = fonts
        .iter()
        .map(|font| {
            let tags = format!(
                "{:<12} variants:{:<2} subsets:{:<2}{}",
                font.category,
                font.variants.len(),
                font.subsets.len(),
                if font.is_variable() { " var" } else { "" },
            );
            (family_to_id(&font.family), font.family.clone(), tags)
        })
        .collect();

    let id_width = rows
        .iter()
        .map(|r| r.0.len())
        .max()
        .unwrap_or(0)
        .clamp(0, 60);
    let family_width = rows
        .iter()
        .map(|r| r.1.len())
        .max()
        .unwrap_or(0)
        .clamp(0, 60);

    for (id, family, tags) in rows.drain(..) {
        let padded_id = format!("{:<id_width$}", id);
        let padded_family = format!("{:<family_width$}", family);
        let rendered_id = apply_color(&padded_id, color, AnsiColor::Cyan);
        let rendered_family = apply_color(&padded_family, color, AnsiColor::Yellow);
        let rendered_tags = apply_color(&tags, color, AnsiColor::Green);

        writeln!(w, "{rendered_id}  {rendered_family}  {rendered_tags}")?;
    }

    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Yellow,
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Yellow => "33",
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
