mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Cmd, Command, HELP, parse_command};
use onboarding_wizard::pricing::{self, CalculatorInputs, Tier};
use onboarding_wizard::{
    CompletionReport, Dispatched, FlowDefinition, NextOutcome, Notification, Notifier, Redirector,
    Runtime, Severity, SimulatedSubmitter, StepStatus, SubmissionOutcome, presets,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        let tag = match notification.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
            Severity::Info => "info",
        };
        println!("[{tag}] {}: {}", notification.title, notification.body);
    }
}

struct ConsoleRedirector;

impl Redirector for ConsoleRedirector {
    fn redirect(&mut self, target: &str) {
        println!("-> redirecting to {target}");
    }
}

type ConsoleRuntime = Runtime<SimulatedSubmitter, ConsoleNotifier, ConsoleRedirector>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("onboarding_wizard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match Cli::parse().cmd {
        Cmd::Run {
            flow,
            fail,
            delay_ms,
        } => run(&flow, fail, delay_ms).await,
        Cmd::Pricing {
            spend,
            platforms,
            campaigns,
            team,
        } => {
            print_estimate(CalculatorInputs {
                monthly_ad_spend: spend,
                platforms,
                campaigns,
                team_size: team,
            });
            Ok(())
        }
    }
}

fn load_flow(flow: &str) -> Result<FlowDefinition> {
    match presets::by_name(flow) {
        Some(definition) => Ok(definition),
        None => FlowDefinition::from_path(flow)
            .with_context(|| format!("'{flow}' is neither a preset nor a readable flow file")),
    }
}

async fn run(flow: &str, fail: bool, delay_ms: u64) -> Result<()> {
    let definition = load_flow(flow)?;
    let submitter = if fail {
        SimulatedSubmitter::failing("simulated backend error")
    } else {
        SimulatedSubmitter::succeeding()
    }
    .with_delay(Duration::from_millis(delay_ms));

    let mut runtime = Runtime::new(definition, submitter, ConsoleNotifier, ConsoleRedirector)
        .context("flow definition is inconsistent")?;
    render(&runtime);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => return Ok(()),
                    Ok(Command::Show) => render(&runtime),
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Event(event)) => match runtime.dispatch(event) {
                        Ok(dispatched) => report_dispatch(&runtime, dispatched),
                        Err(err) => println!("error: {err}"),
                    },
                    Err(message) => println!("{message}"),
                }
            }
            Some(report) = runtime.next_completion(), if runtime.wizard().is_submitting() => {
                report_completion(&report);
                if runtime.wizard().is_completed() {
                    return Ok(());
                }
            }
        }
    }

    // Input ended; let an outstanding submission finish before exiting.
    while runtime.wizard().is_submitting() {
        match runtime.next_completion().await {
            Some(report) => report_completion(&report),
            None => break,
        }
    }
    Ok(())
}

fn report_dispatch(runtime: &ConsoleRuntime, dispatched: Dispatched) {
    match dispatched {
        Dispatched::Updated | Dispatched::Toggled { .. } | Dispatched::Notified => {}
        Dispatched::Next(NextOutcome::Advanced { .. }) | Dispatched::Moved { .. } => {
            render(runtime)
        }
        Dispatched::Next(NextOutcome::Blocked(errors)) => {
            for (field, message) in &errors {
                println!("  ! {field}: {message}");
            }
        }
        Dispatched::Next(NextOutcome::SubmissionStarted(request)) => {
            println!("submitting (run {})...", request.run_id);
        }
        Dispatched::Next(NextOutcome::SubmissionPending) => {
            println!("still submitting, please wait");
        }
        Dispatched::Next(NextOutcome::AlreadyCompleted) => {
            println!("already completed");
        }
    }
}

fn report_completion(report: &CompletionReport) {
    match &report.outcome {
        SubmissionOutcome::Succeeded => println!("run {} succeeded", report.run_id),
        SubmissionOutcome::Failed(err) => {
            println!("run {} failed: {err}; fix anything and send 'next' to retry", report.run_id)
        }
        SubmissionOutcome::Stale => {}
    }
}

fn render(runtime: &ConsoleRuntime) {
    let wizard = runtime.wizard();
    let progress: Vec<String> = (0..wizard.step_count())
        .map(|index| {
            let marker = match wizard.status_at(index) {
                StepStatus::Done => "x",
                StepStatus::Active => ">",
                StepStatus::Pending => " ",
            };
            format!("[{marker}] {}", wizard.steps()[index].title)
        })
        .collect();
    println!("{}", progress.join("  "));

    let step = wizard.current_step();
    println!(
        "Step {} of {}: {} ({:.0}%)",
        wizard.current_index() + 1,
        wizard.step_count(),
        step.title,
        wizard.progress_percentage()
    );
    if let Some(description) = &step.description {
        println!("  {description}");
    }

    let errors = wizard.errors();
    for spec in &step.fields {
        let mut value = wizard
            .value(spec.name.as_str())
            .map(ToString::to_string)
            .unwrap_or_default();
        if spec.name.as_str().to_ascii_lowercase().contains("password") {
            value = "*".repeat(value.chars().count());
        }
        let optional = if spec.optional { " (optional)" } else { "" };
        println!("  {} [{}]{optional} = {value}", spec.label, spec.name);
        if !spec.options.is_empty() {
            println!("      options: {}", spec.options.join(", "));
        }
        if let Some(message) = errors.get(spec.name.as_str()) {
            println!("      ! {message}");
        }
    }
}

fn print_estimate(inputs: CalculatorInputs) {
    let result = pricing::estimate(inputs);
    let inputs = result.inputs;
    println!(
        "ad spend ${}/mo, {} platforms, {} campaigns, team of {}",
        inputs.monthly_ad_spend, inputs.platforms, inputs.campaigns, inputs.team_size
    );
    for tier in Tier::ALL {
        let marker = if tier == result.tier { "*" } else { " " };
        let badge = if tier.is_featured() { " (most popular)" } else { "" };
        println!(
            "{marker} {:<12} ${:>3}/mo{badge}  {}",
            tier.name(),
            tier.monthly_price(),
            tier.features().join(", ")
        );
    }
    println!("recommended: {}", result.tier);
    println!("potential annual savings: ${:.0}", result.annual_savings);
    println!("estimated ROI: {:.0}%", result.roi_percent);
}
