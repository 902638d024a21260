use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use mailfinder_lib::{Collection, EmailApi, HunterClient, Operation, Session, SessionError};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod args;
mod output;

use args::{Cli, Commands};
use output::OutputRow;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    output::check_format(&cli.format)?;

    let config = cli.api_config()?;
    let client = HunterClient::new(config).context("build HTTP client")?;
    let mut session = Session::new(client);

    let rows = match &cli.cmd {
        Commands::Verify { emails } => create_all(&mut session, Collection::Emails, emails),
        Commands::Search { domains } => create_all(&mut session, Collection::Domains, domains),
        Commands::Batch { file } => {
            let reader: Box<dyn BufRead> = match file {
                Some(path) => Box::new(BufReader::new(
                    std::fs::File::open(path)
                        .with_context(|| format!("open {}", path.display()))?,
                )),
                None => Box::new(io::stdin().lock()),
            };
            run_batch(&mut session, reader)?
        }
    };

    info!(
        operations = rows.len(),
        failed = rows.iter().filter(|r| r.failed()).count(),
        "run finished"
    );
    output::write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 operation failed, 1 fatal
    let code = output::exit_code(&rows);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn create_all<A: EmailApi>(
    session: &mut Session<A>,
    collection: Collection,
    keys: &[String],
) -> Vec<OutputRow> {
    keys.iter()
        .enumerate()
        .map(|(idx, key)| {
            let op = Operation::create(collection, key.as_str());
            let result = session.apply(&op).map_err(SessionError::from);
            OutputRow::new(idx + 1, op.to_string(), result)
        })
        .collect()
}

fn run_batch<A, R>(session: &mut Session<A>, reader: R) -> Result<Vec<OutputRow>>
where
    A: EmailApi,
    R: BufRead,
{
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("read operations")?;
        if let Some(result) = session.run_line(&line) {
            rows.push(OutputRow::new(idx + 1, line.trim(), result));
        }
    }
    Ok(rows)
}
