use crate::demo::{
    run_balance, run_demo, run_emergency, run_rank, BalanceArgs, DemoArgs, EmergencyArgs,
    RankArgs, RosterArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use staff_intel::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Guard Staffing Intelligence",
    about = "Score guards, rank shift candidates, and audit roster hours",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank the roster for a shift
    Rank(RankArgs),
    /// Report weekly hours per guard against the target
    Balance(BalanceArgs),
    /// Recommend cover for an urgent vacancy
    Emergency(EmergencyArgs),
    /// Walk through leaderboard, ranking, balance, and emergency fill on demo data
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) roster: RosterArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Balance(args) => run_balance(args),
        Command::Emergency(args) => run_emergency(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_flags_parse() {
        let cli = Cli::try_parse_from([
            "staff-intel-api",
            "rank",
            "--site",
            "site-docks",
            "--start",
            "23:00",
            "--end",
            "07:00",
            "--as-of",
            "2025-03-17",
            "--no-hour-balance",
            "--limit",
            "3",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.slot.site, "site-docks");
                assert!(args.no_hour_balance);
                assert!(!args.no_tier_bonus);
                assert_eq!(args.limit, Some(3));
                assert!(args.roster.as_of.is_some());
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let result = Cli::try_parse_from(["staff-intel-api", "balance", "--as-of", "tomorrow"]);
        assert!(result.is_err());
    }
}
