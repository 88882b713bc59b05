use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use scores_cli::{
    OutputFormat, Result, ScoresClient,
    render::{self, render},
};
use storage::models::TimeRange;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scores")]
#[command(about = "Ticket rating scores client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scores API address, either host:port or a full url
    #[arg(long, env = "SCORES_API_URL", default_value = "localhost:8080", global = true)]
    addr: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    out: OutputFormat,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct Period {
    /// First day of the period, YYYY-MM-DD
    #[arg(long, default_value = "2019-03-01")]
    from: String,

    /// Last day of the period, YYYY-MM-DD
    #[arg(long, default_value = "2019-04-01")]
    to: String,
}

impl Period {
    fn range(&self) -> Result<TimeRange> {
        Ok(TimeRange::parse(&self.from, &self.to)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Category scores per day or week, with rating counts
    CategoryScores {
        #[command(flatten)]
        period: Period,

        /// Max period columns for the table output
        #[arg(long, default_value_t = 5)]
        max_cols: usize,
    },
    /// Category scores per ticket
    TicketScores {
        #[command(flatten)]
        period: Period,

        /// Max ticket rows for the table output
        #[arg(long, default_value_t = 5)]
        max_rows: usize,
    },
    /// Overall quality score for a period
    OverallScore {
        #[command(flatten)]
        period: Period,
    },
    /// Score change per category between two periods
    PeriodDiff {
        #[command(flatten)]
        period: Period,

        #[arg(long, default_value = "2019-04-01")]
        second_from: String,

        #[arg(long, default_value = "2019-04-30")]
        second_to: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("scores={},scores_cli={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let client = ScoresClient::new(&cli.addr)?;

    match cli.command {
        Commands::CategoryScores { period, max_cols } => {
            let range = period.range()?;
            let response = client.category_scores(&range).await?;
            render(cli.out, &response, |response| {
                render::category_scores_table(response, max_cols)
            })
        }
        Commands::TicketScores { period, max_rows } => {
            let range = period.range()?;
            let response = client.ticket_scores(&range).await?;
            render(cli.out, &response, |response| {
                render::ticket_scores_table(response, max_rows)
            })
        }
        Commands::OverallScore { period } => {
            let range = period.range()?;
            let response = client.overall_score(&range).await?;
            render(cli.out, &response, render::overall_score_table)
        }
        Commands::PeriodDiff {
            period,
            second_from,
            second_to,
        } => {
            let first = period.range()?;
            let second = TimeRange::parse_fields(
                ("second-from", &second_from),
                ("second-to", &second_to),
            )?;
            let response = client.period_over_period(&first, &second).await?;
            render(cli.out, &response, render::period_diff_table)
        }
    }
}
