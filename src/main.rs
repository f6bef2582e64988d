// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

mod bar_chart;
mod chart_data;
mod config;
mod dashboard;
mod datasets;
mod interactive;
mod loader;
mod models;
mod ranking;
mod report;

use anyhow::Result;
use bar_chart::ImageFormat;
use clap::{Args, Parser, Subcommand};
use dashboard::{Dashboard, Selection};
use datasets::{DataSource, Dataset};
use dotenvy::dotenv;
use report::OutputOptions;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Top ranked mobile games by category, per country and region", long_about = None)]
struct Cli {
    /// Config file (defaults to $TOP_GAMES_CONFIG, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Which file to read: a bundled dataset or your own CSV.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Dataset whose default file is used when no --file is given
    #[arg(short, long, value_enum, default_value_t = Dataset::UnitedArabEmirates)]
    dataset: Dataset,

    /// Your own CSV file; replaces the dataset's default file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl SourceArgs {
    fn source(&self) -> Result<DataSource> {
        DataSource::select(self.dataset, self.file.clone())
    }
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = ImageFormat::Svg)]
    format: ImageFormat,

    /// Overrides output_dir from the config
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write each chart's data as JSON
    #[arg(long)]
    json: bool,
}

impl OutputArgs {
    fn options(&self, config: &config::Config) -> OutputOptions {
        OutputOptions {
            output_dir: self
                .output_dir
                .clone()
                .unwrap_or_else(|| config.output_dir.clone()),
            format: self.format,
            size: (config.chart_width, config.chart_height),
            json: self.json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the current settings to a config file
    InitConfig {
        #[arg(default_value = "config.toml")]
        path: PathBuf,
    },
    /// List the datasets and the files they read
    Datasets,
    /// List the regions found in a dataset
    Regions {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Build the Free / Paid / Grossing charts and print the page
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Region to show (defaults to the first one in the file)
        #[arg(short, long)]
        region: Option<String>,

        /// First position of the rank range (inclusive)
        #[arg(long)]
        start: Option<usize>,

        /// Last position of the rank range (exclusive)
        #[arg(long)]
        end: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,

        /// Skip the raw data table
        #[arg(long)]
        no_table: bool,
    },
    /// Print the raw data table
    Table {
        #[command(flatten)]
        source: SourceArgs,

        /// Only the first rows
        #[arg(long)]
        preview: bool,
    },
    /// Change dataset, region and range interactively; every change redraws
    Interactive {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::InitConfig { path } => {
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            config::save_config(&config, &path)?;
            println!("✅ Config written to {}", path.display());
            Ok(())
        }
        Commands::Datasets => list_datasets(&config),
        Commands::Regions { source } => list_regions(&config, &source),
        Commands::Render {
            source,
            region,
            start,
            end,
            output,
            no_table,
        } => {
            let mut selection = Selection::new(source.source()?, config.window_from(start, end)?);
            selection.region = region;
            render(&config, &selection, &output.options(&config), no_table)
        }
        Commands::Table { source, preview } => print_table(&config, &source, preview),
        Commands::Interactive { source, output } => {
            source.source()?;
            let mut session = interactive::Session::new(&config, source.dataset, source.file);
            let stdin = io::stdin();
            session.run(stdin.lock(), &mut io::stdout(), &output.options(&config))
        }
    }
}

fn list_datasets(config: &config::Config) -> Result<()> {
    for dataset in Dataset::ALL {
        let path = dataset.default_path(&config.data_dir);
        let status = if path.exists() { "✅" } else { "missing" };
        println!("{:<22} {} ({})", dataset.label(), path.display(), status);
    }
    Ok(())
}

fn list_regions(config: &config::Config, source: &SourceArgs) -> Result<()> {
    let data = Dashboard::new(config).load(&source.source()?)?;
    for region in ranking::regions(&data.listings) {
        println!("{}", region);
    }
    Ok(())
}

fn render(
    config: &config::Config,
    selection: &Selection,
    options: &OutputOptions,
    no_table: bool,
) -> Result<()> {
    let view = Dashboard::new(config).compute(selection)?;
    let written = report::write_charts(&view, options)?;
    print!(
        "{}",
        report::format_report(&view, &written, &config.attribution, !no_table)
    );
    Ok(())
}

fn print_table(config: &config::Config, source: &SourceArgs, preview: bool) -> Result<()> {
    let data = Dashboard::new(config).load(&source.source()?)?;
    let table = if preview {
        data.table.head(config.preview_rows)
    } else {
        data.table
    };
    print!("{}", report::format_table(&table));
    println!("{} rows", table.len());
    Ok(())
}
