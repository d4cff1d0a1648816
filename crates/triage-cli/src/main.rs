use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dispatch::{InboundReply, PriorityOptimizer, TrackedReport, TriageSystem};
use knowledge_base::{Classifier, KnowledgeBase};
use triage_core::{InboundContent, ReportDraft};

mod batch;

/// Interval between polls while waiting for responders to answer.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "triage")]
#[command(about = "Classify, dispatch and rank emergency reports")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify free text without dispatching it
    Classify {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Submit one report and wait for the responders
    Submit {
        #[arg(required = true)]
        text: Vec<String>,

        /// Report id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Number of people affected
        #[arg(long)]
        affected: Option<u32>,

        /// How long to wait for responses before printing
        #[arg(long, default_value_t = 5)]
        wait_secs: u64,
    },

    /// Rank a batch of reports or drafts read from a JSON file
    Rank {
        #[arg(long)]
        file: PathBuf,
    },

    /// Answer a status query such as "shelter capacity"
    Status {
        query: Vec<String>,

        /// Print the structured report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Read citizen messages from stdin, one per line
    Run {
        /// Sender id used for the session
        #[arg(long, default_value = "stdin")]
        sender: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Classify { text } => {
            let classifier = Classifier::new(Arc::new(KnowledgeBase::from_env()?));
            print_json(&classifier.classify(&text.join(" ")))?;
        }
        Command::Submit {
            text,
            id,
            affected,
            wait_secs,
        } => {
            let mut draft = ReportDraft::text(text.join(" "));
            if let Some(id) = id {
                draft = draft.with_id(id);
            }
            if let Some(affected) = affected {
                draft = draft.with_affected_count(affected);
            }

            let system = TriageSystem::from_env()?;
            let receipt = system.coordinator().submit(draft).await?;
            info!(
                report_id = receipt.report.id(),
                dispatched = ?receipt.dispatched,
                "Report submitted"
            );

            let tracked = wait_settled(&system, receipt.report.id(), Duration::from_secs(wait_secs)).await?;
            match tracked {
                Some(tracked) => print_json(&tracked)?,
                None => print_json(&receipt)?,
            }
            system.shutdown().await?;
        }
        Command::Rank { file } => {
            let knowledge = Arc::new(KnowledgeBase::from_env()?);
            let classifier = Classifier::new(knowledge.clone());
            let reports = batch::load_batch(&file, &classifier)?;
            print_json(&PriorityOptimizer::new(knowledge).rank(&reports))?;
        }
        Command::Status { query, json } => {
            let system = TriageSystem::from_env()?;
            let report = system.coordinator().status_query(query.join(" ")).await?;
            if json {
                print_json(&report)?;
            } else {
                print!("{}", report.render());
            }
            system.shutdown().await?;
        }
        Command::Run { sender } => {
            let system = TriageSystem::from_env()?;
            run_session(&system, &sender).await?;
            system.shutdown().await?;
        }
    }

    Ok(())
}

/// Feed stdin lines to the coordinator as one citizen session.
async fn run_session(system: &TriageSystem, sender: &str) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = system.coordinator();

    if let InboundReply::Prompt(prompt) = coordinator.inbound(sender, InboundContent::SessionStart).await? {
        println!("{}", prompt);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(query) = line.strip_prefix("/status") {
            print!("{}", coordinator.status_query(query.trim()).await?.render());
            continue;
        }
        if line == "/rank" {
            print_json(&coordinator.rank_open().await?)?;
            continue;
        }

        match coordinator.inbound(sender, InboundContent::text(line)).await? {
            InboundReply::Submitted(receipt) => print_json(&receipt)?,
            other => warn!(reply = ?other, "Unexpected reply to text"),
        }
    }

    if let InboundReply::SessionEnded(Some(summary)) =
        coordinator.inbound(sender, InboundContent::SessionEnd).await?
    {
        print_json(&summary)?;
    }
    print_json(&coordinator.summary().await?)?;
    Ok(())
}

/// Poll the coordinator until the report stops waiting on responders.
///
/// Returns the last seen state when the wait runs out.
async fn wait_settled(
    system: &TriageSystem,
    report_id: &str,
    wait: Duration,
) -> Result<Option<TrackedReport>, Box<dyn std::error::Error>> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        let tracked = system.coordinator().report(report_id).await?;
        let awaiting = tracked.as_ref().is_some_and(|t| t.state.is_awaiting());
        if !awaiting || tokio::time::Instant::now() >= deadline {
            return Ok(tracked);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
