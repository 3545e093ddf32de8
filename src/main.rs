//! orderscope - Customer & Order CSV Analysis
//!
//! Joins customers to orders, prints bounded tables and plots a scatter chart.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orderscope::data::CustomerKey;
use orderscope::{AnalysisConfig, Pipeline};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orderscope")]
#[command(about = "Customer & order CSV analysis with rolling sums and scatter charts", long_about = None)]
struct Cli {
    /// JSON config file; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Customers CSV
    #[arg(long, global = true)]
    customers: Option<PathBuf>,

    /// Orders CSV
    #[arg(long, global = true)]
    orders: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview both inputs, then run the rolling analysis (default)
    Run {
        #[command(flatten)]
        plot: PlotArgs,
    },

    /// Print the first rows of both inputs
    Preview {
        /// Rows per table
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Left join customers to orders for one customer
    Join {
        /// Numeric or text id, matched against the key column type
        #[arg(long)]
        customer_id: Option<CustomerKey>,
    },

    /// Rolling sum of order amounts in signup-date order, plotted
    Rolling {
        /// Rows before the current one in the window
        #[arg(long)]
        preceding: Option<usize>,

        #[command(flatten)]
        plot: PlotArgs,
    },

    /// Run SQL against the `customers` and `orders` tables
    Sql {
        query: String,
    },
}

#[derive(clap::Args, Default)]
struct PlotArgs {
    /// Save the scatter plot as PNG
    #[arg(long)]
    save: Option<PathBuf>,

    /// Do not open the plot window
    #[arg(long)]
    no_show: bool,

    /// X axis column
    #[arg(long)]
    x: Option<String>,

    /// Y axis column
    #[arg(long)]
    y: Option<String>,
}

impl PlotArgs {
    fn apply(self, config: &mut AnalysisConfig) {
        if let Some(path) = self.save {
            config.chart.save_path = Some(path);
        }
        if self.no_show {
            config.chart.show = false;
        }
        if let Some(x) = self.x {
            config.scatter_x = x;
        }
        if let Some(y) = self.y {
            config.scatter_y = y;
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AnalysisConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    if let Some(path) = cli.customers {
        config.customers = path;
    }
    if let Some(path) = cli.orders {
        config.orders = path;
    }

    let command = cli.command.unwrap_or(Commands::Run {
        plot: PlotArgs::default(),
    });
    match &command {
        Commands::Preview { limit: Some(n) } => config.preview_rows = *n,
        Commands::Join {
            customer_id: Some(id),
        } => config.customer_id = id.clone(),
        Commands::Rolling {
            preceding: Some(n), ..
        } => config.window_preceding = *n,
        _ => {}
    }

    config.display.apply();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Run { plot } => {
            plot.apply(&mut config);
            let pipeline = Pipeline::load(config).context("loading input files")?;
            pipeline.run(&mut out).context("running analysis")?;
        }
        Commands::Preview { .. } => {
            let pipeline = Pipeline::load(config).context("loading input files")?;
            pipeline.preview(&mut out).context("previewing inputs")?;
        }
        Commands::Join { .. } => {
            let pipeline = Pipeline::load(config).context("loading input files")?;
            pipeline.join(&mut out).context("running join")?;
        }
        Commands::Rolling { plot, .. } => {
            plot.apply(&mut config);
            let pipeline = Pipeline::load(config).context("loading input files")?;
            pipeline.rolling(&mut out).context("running rolling analysis")?;
        }
        Commands::Sql { query } => {
            let pipeline = Pipeline::load(config).context("loading input files")?;
            pipeline.sql(&mut out, &query).context("running sql")?;
        }
    }

    out.flush()?;
    Ok(())
}
