use clap::Parser;
use shiftdiff::io::load_gray_image;
use shiftdiff::{Inspector, MatchConfig, Params, RenderStyle, Session};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod interactive;
mod report;

use config::Config;
use report::{print_summary, write_previews, Report};

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Align two captures and highlight what differs")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Adjust parameters from a command prompt, refreshing after every change.
    #[arg(short, long)]
    interactive: bool,
    /// Directory for preview images; overrides `output_dir` from the config.
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the pipeline stages.
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("shiftdiff=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config: Config = if cli.config.exists() {
        let config_text = fs::read_to_string(&cli.config)?;
        serde_json::from_str(&config_text)?
    } else {
        tracing::info!(path = %cli.config.display(), "config not found, using defaults");
        Config::default()
    };

    let match_cfg: MatchConfig = config.match_cfg.into();
    if match_cfg.parallel && cfg!(not(feature = "rayon")) {
        tracing::warn!("parallel matching requested but shiftdiff was built without rayon");
    }
    let params: Params = config.params.into();
    let style: RenderStyle = config.render.into();
    let output_dir = cli.output_dir.or(config.output_dir);

    let reference = load_gray_image(&config.reference_path)?;
    let compare = load_gray_image(&config.compare_path)?;
    let inspector = Inspector::new(reference, compare, match_cfg);

    if cli.interactive {
        let session = Session::new(inspector, params, style);
        return interactive::run(session, output_dir);
    }

    let params = params.clamped();
    let inspection = inspector.run(&params)?;
    if let Some(dir) = &output_dir {
        let previews = inspector.render(&params, &inspection, &style)?;
        write_previews(dir, &previews)?;
    }

    let json = serde_json::to_string_pretty(&Report::from(&inspection))?;
    match config.report_path {
        Some(path) => {
            fs::write(path, json)?;
            print_summary(&inspection, params.min_area);
        }
        None => println!("{json}"),
    }

    Ok(())
}
