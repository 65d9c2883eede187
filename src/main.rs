use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod dashboard;
mod filter;
mod insights;
mod loader;
mod models;
mod report;
mod server;
mod stats;
mod synthetic;

use dashboard::{DashboardView, Theme};
use filter::{FilterSelection, FilterSpec};

#[derive(Parser)]
#[command(name = "sleep-health-dashboard")]
#[command(about = "Sleep and health metrics dashboard backend", long_about = None)]
struct Cli {
    /// CSV dataset; `data/<file>` is tried when this path is missing
    #[arg(long, env = "DATA_PATH", default_value = loader::DEFAULT_DATA_FILE, global = true)]
    data: PathBuf,
    /// Seed for the synthetic dataset generated when no file is found
    #[arg(long, default_value_t = synthetic::DEFAULT_SEED, global = true)]
    seed: u64,
    /// Bind settings used when no subcommand is given
    #[command(flatten)]
    serve: ServeArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

impl ServeArgs {
    fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard JSON API
    Serve(ServeArgs),
    /// Print the dashboard view for a filter selection as JSON
    Summary {
        #[command(flatten)]
        filters: FilterSelection,
        #[arg(long, default_value = "light")]
        theme: Theme,
    },
    /// Write a markdown report for a filter selection
    Report {
        #[command(flatten)]
        filters: FilterSelection,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let dataset = loader::load_or_generate(&cli.data, cli.seed)
        .with_context(|| format!("failed to load dataset from {}", cli.data.display()))?;

    match cli.command.unwrap_or(Commands::Serve(cli.serve)) {
        Commands::Serve(args) => {
            server::serve(server::AppState::new(dataset), args.addr()).await?;
        }
        Commands::Summary { filters, theme } => {
            let spec = FilterSpec::from_selection(&filters)?;
            let view = DashboardView::build(&dataset, &spec, theme);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Report { filters, out } => {
            let spec = FilterSpec::from_selection(&filters)?;
            let view = DashboardView::build(&dataset, &spec, Theme::default());
            std::fs::write(&out, report::build_report(&view))
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("sleep-health-dashboard").chain(args.iter().copied()))
    }

    #[test]
    fn bare_invocation_serves_with_bind_flags() {
        let cli = parse(&["--port", "9000"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.serve.addr(), "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn serve_subcommand_takes_host_and_port() {
        let cli = parse(&["serve", "--host", "127.0.0.1", "--port", "3000"]).unwrap();
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.addr(), "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(parse(&["--port", "notaport"]).is_err());
        assert!(parse(&["serve", "--port", "70000"]).is_err());
    }

    #[test]
    fn summary_accepts_filters_and_theme() {
        let cli = parse(&["summary", "--gender", "Male", "--theme", "dark"]).unwrap();
        let Some(Commands::Summary { filters, theme }) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(filters.gender.as_deref(), Some("Male"));
        assert_eq!(theme, Theme::Dark);
    }
}
