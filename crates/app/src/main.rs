//! TimeLoom - ticket time tracking from the command line
//!
//! Wires configuration, storage, and the timer engine together, runs the
//! crash-recovery prompt, then drops into an interactive command loop.
//! Every line typed counts as an activity signal, so an idle auto-pause
//! lifts as soon as the user comes back.

mod context;
mod observer;

use std::sync::Arc;

use anyhow::Result;
use timeloom_core::{RecoveryDecision, RecoveryPrompt};
use timeloom_domain::{TimerState, WorkLog};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;
use crate::observer::ConsoleObserver;

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading RUST_LOG, but report it only once the
    // subscriber is up.
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(_) => debug!("no .env file"),
    }

    let config = timeloom_infra::config::load()?;
    info!(data_dir = %config.storage.data_dir.display(), "starting timeloom");

    let ctx = AppContext::new(config);
    ctx.engine.subscribe(Arc::new(ConsoleObserver::default())).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    recover_interrupted_session(&ctx, &mut lines).await?;
    run_loop(&ctx, &mut lines).await
}

/// Offer the three resolutions for a session interrupted by a crash.
async fn recover_interrupted_session(ctx: &AppContext, lines: &mut InputLines) -> Result<()> {
    let Some(prompt) = ctx.recovery.inspect().await? else {
        return Ok(());
    };

    let ticket = prompt.state.current_ticket_id.as_deref().unwrap_or("?");
    println!(
        "Found an interrupted session on {ticket}: {} tracked, last checkpoint {}s ago.",
        fmt_hms(prompt.state.elapsed_secs),
        prompt.drift_secs
    );
    println!("  [r] resume where it left off");
    if prompt.offers_drift_credit {
        println!("  [c] resume and credit the {}s since the crash", prompt.drift_secs);
    }
    println!("  [d] discard the session");

    let decision = read_recovery_decision(lines, &prompt).await?;
    ctx.recovery.apply(&ctx.engine, prompt, decision).await?;
    Ok(())
}

async fn read_recovery_decision(
    lines: &mut InputLines,
    prompt: &RecoveryPrompt,
) -> Result<RecoveryDecision> {
    loop {
        let Some(line) = lines.next_line().await? else {
            // stdin closed; keep the session rather than lose tracked time
            return Ok(RecoveryDecision::Resume);
        };
        match line.trim() {
            "r" | "resume" | "" => return Ok(RecoveryDecision::Resume),
            "c" | "credit" if prompt.offers_drift_credit => {
                return Ok(RecoveryDecision::ResumeWithDrift);
            }
            "d" | "discard" => return Ok(RecoveryDecision::Discard),
            other => println!("unrecognized choice {other:?}; expected r, c, or d"),
        }
    }
}

async fn run_loop(ctx: &AppContext, lines: &mut InputLines) -> Result<()> {
    println!("timeloom ready; type 'help' for commands");
    while let Some(line) = lines.next_line().await? {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            ctx.tracker.activity().await;
            continue;
        };

        if matches!(command, "quit" | "exit") {
            break;
        }
        if let Err(err) = dispatch(ctx, command, args).await {
            println!("error: {err}");
        }
        // Typing a command is activity too; signalled after dispatch so an
        // explicit 'resume' keeps its credit choice.
        ctx.tracker.activity().await;
    }

    if let Some(log) = ctx.tracker.shutdown().await? {
        println!("saved {} on the way out", fmt_log(&log));
    }
    Ok(())
}

async fn dispatch(ctx: &AppContext, command: &str, args: &[&str]) -> Result<()> {
    match command {
        "start" => {
            let Some((&ticket_id, summary)) = args.split_first() else {
                println!("usage: start <ticket-id> [summary...]");
                return Ok(());
            };
            ctx.tracker.start_session(ticket_id, &summary.join(" "), &whoami()).await?;
        }
        "pause" => ctx.tracker.pause().await,
        "resume" => {
            let include_idle = args.first().is_some_and(|&arg| arg == "--credit");
            ctx.tracker.resume(include_idle).await;
        }
        "stop" => match ctx.tracker.stop_session().await? {
            Some(log) => println!("logged {}", fmt_log(&log)),
            None => println!("nothing is running"),
        },
        "status" => print_status(&ctx.tracker.state().await),
        "recent" => print_recent(ctx).await?,
        "stats" => print_stats(ctx).await?,
        "logs" => match args.first() {
            Some(&ticket_id) => print_unsynced(ctx, ticket_id).await?,
            None => println!("usage: logs <ticket-id>"),
        },
        "sync" => match args.first() {
            Some(&ticket_id) => {
                let ids: Vec<String> = ctx
                    .aggregator
                    .get_unsynced_logs(ticket_id)
                    .await?
                    .into_iter()
                    .map(|log| log.id)
                    .collect();
                let synced = ctx.aggregator.mark_logs_synced(ticket_id, &ids).await?;
                println!("marked {synced} log(s) synced on {ticket_id}");
            }
            None => println!("usage: sync <ticket-id>"),
        },
        "delete" => match args {
            [ticket_id, log_id] => {
                ctx.aggregator.delete_log(ticket_id, log_id).await?;
                println!("deleted log {log_id} from {ticket_id}");
            }
            _ => println!("usage: delete <ticket-id> <log-id>"),
        },
        "done" => match args.first() {
            Some(&ticket_id) => {
                ctx.aggregator.complete(ticket_id).await?;
                println!("{ticket_id} marked completed");
            }
            None => println!("usage: done <ticket-id>"),
        },
        "help" => print_help(),
        other => println!("unknown command {other:?}; type 'help'"),
    }
    Ok(())
}

fn print_status(state: &TimerState) {
    if !state.is_running {
        println!("stopped");
        return;
    }
    let ticket = state.current_ticket_id.as_deref().unwrap_or("?");
    let phase = if state.is_paused { "paused" } else { "running" };
    println!(
        "{phase} on {ticket}: {} tracked, {} paused",
        fmt_hms(state.elapsed_secs),
        fmt_hms(state.total_paused_secs)
    );
}

async fn print_recent(ctx: &AppContext) -> Result<()> {
    let tasks = ctx.aggregator.recent_tasks(10).await?;
    if tasks.is_empty() {
        println!("no tracked tickets yet");
        return Ok(());
    }
    for task in tasks {
        println!(
            "{:<12} {:>5} min  {:?}  {}",
            task.ticket_id, task.total_logged_time, task.status, task.ticket_summary
        );
    }
    Ok(())
}

async fn print_stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.aggregator.history_stats().await?;
    println!("today: {} min, this week: {} min", stats.today_minutes, stats.week_minutes);
    for total in stats.per_ticket {
        println!("  {:<12} {} min", total.ticket_id, total.total_minutes);
    }
    Ok(())
}

async fn print_unsynced(ctx: &AppContext, ticket_id: &str) -> Result<()> {
    let logs = ctx.aggregator.get_unsynced_logs(ticket_id).await?;
    if logs.is_empty() {
        println!("no unsynced logs on {ticket_id}");
        return Ok(());
    }
    for log in logs {
        println!("{}  {} min  {} .. {}", log.id, log.duration, log.start_time, log.end_time);
    }
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  start <ticket-id> [summary...]  begin tracking a ticket");
    println!("  pause                           pause the running session");
    println!("  resume [--credit]               resume; --credit counts the paused time");
    println!("  stop                            stop and write the work log");
    println!("  status                          show the current timer state");
    println!("  recent                          recently tracked tickets");
    println!("  stats                           today/week/per-ticket minutes");
    println!("  logs <ticket-id>                unsynced logs for a ticket");
    println!("  sync <ticket-id>                mark a ticket's logs as synced");
    println!("  delete <ticket-id> <log-id>     remove a log");
    println!("  done <ticket-id>                mark a ticket completed");
    println!("  quit                            save any running session and exit");
}

fn fmt_log(log: &WorkLog) -> String {
    format!("{} min (log {})", log.duration, log.id)
}

fn fmt_hms(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn whoami() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
