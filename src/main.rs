use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashdeck::snapshot::capture;
use dashdeck::{ExportConfig, Exporter, NoopSnapshotter, SnapshotTree};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "dashdeck",
    version,
    about = "Rebuild an editable presentation slide from a captured dashboard"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// JSON capture, or HTML with data-rect attributes
    input: PathBuf,

    /// Treat the input as HTML regardless of its extension
    #[arg(long)]
    html: bool,

    /// CSS selector of the capture root (HTML input only)
    #[arg(long)]
    root: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct the capture and write a .pptx
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Document title (also names the output file)
        #[arg(long)]
        title: Option<String>,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Also write the slide model as JSON next to the .pptx
        #[arg(long)]
        json: bool,

        /// Draw blank placeholders for charts without metadata
        #[arg(long)]
        placeholders: bool,
    },
    /// Print text owners, groups and charts found in the capture
    Inspect {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Export { input, title, out, json, placeholders } => {
            let mut config = load_config(input.config.as_deref())?;
            if let Some(title) = title {
                config.title = title;
            }
            let tree = load_tree(&input, &config)?;
            let exporter = Exporter::new(config)?;
            let deck = if placeholders {
                exporter.export(&tree, &NoopSnapshotter).await?
            } else {
                exporter.reconstruct(&tree)?
            };

            fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
            let path = deck.write_pptx(&out)?;
            if json {
                let json_path = path.with_extension("json");
                fs::write(&json_path, deck.to_json()?)
                    .with_context(|| format!("writing {}", json_path.display()))?;
            }
            println!("{} {}", path.display(), deck.fingerprint()?);
        }
        Command::Inspect { input } => {
            let config = load_config(input.config.as_deref())?;
            let tree = load_tree(&input, &config)?;
            inspect(&tree, Exporter::new(config)?)?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ExportConfig> {
    match path {
        Some(p) => ExportConfig::from_file(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(ExportConfig::default()),
    }
}

fn load_tree(args: &InputArgs, config: &ExportConfig) -> Result<SnapshotTree> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let by_extension = matches!(
        args.input.extension().and_then(|e| e.to_str()),
        Some("html") | Some("htm")
    );
    if args.html || by_extension {
        return tree_from_html(&raw, args.root.as_deref(), config);
    }
    capture::from_json(&raw, &config.excluded_class).context("parsing JSON capture")
}

#[cfg(feature = "html")]
fn tree_from_html(raw: &str, root: Option<&str>, config: &ExportConfig) -> Result<SnapshotTree> {
    dashdeck::snapshot::html::from_html(raw, root, &config.excluded_class).context("parsing HTML capture")
}

#[cfg(not(feature = "html"))]
fn tree_from_html(_: &str, _: Option<&str>, _: &ExportConfig) -> Result<SnapshotTree> {
    anyhow::bail!("built without HTML support")
}

fn inspect(tree: &SnapshotTree, exporter: Exporter) -> Result<()> {
    let analysis = exporter.analyze(tree)?;
    println!("{} elements", analysis.ids.len());

    println!("texts:");
    for claim in analysis.claims.claims() {
        println!("  {:>6}  {:?}", claim.id.to_string(), claim.text);
    }
    println!("groups:");
    for g in &analysis.grouping.groups {
        println!(
            "  {:>6}  <{}> {} texts, {} charts",
            g.id.to_string(),
            tree.get(g.anchor).tag,
            g.texts.len(),
            g.charts.len()
        );
    }
    println!(
        "ungrouped: {} texts, {} charts",
        analysis.grouping.ungrouped_texts.len(),
        analysis.grouping.ungrouped_charts.len()
    );
    println!("fingerprint: {}", exporter.reconstruct(tree)?.fingerprint()?);
    Ok(())
}
