use colored::*;
use lostfound_conformance::{
    ConformanceRunner, HarnessConfig, HttpConnector, RunReport, Stage, TestResult,
};
use std::env;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let mut config = HarnessConfig::from_env()?;
    if let Some(base_url) = env::args().nth(1) {
        config = config.with_base_url(&base_url)?;
    }

    println!(
        "🧪 Running Lost & Found API conformance tests against: {}",
        config.base_url.cyan()
    );
    println!("Started at {}", chrono::Utc::now().to_rfc3339());
    println!();

    let connector = HttpConnector::new(&config.base_url);
    let report = ConformanceRunner::new(connector, config).run().await;

    print_results(&report);
    print_summary(&report);

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let level = match env::var("LOSTFOUND_LOG") {
        Ok(value) => Level::from_str(&value)?,
        Err(_) => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_results(report: &RunReport) {
    let mut current: Option<Stage> = None;
    for result in report.results() {
        if current != Some(result.stage) {
            if current.is_some() {
                println!();
            }
            println!("{}", format!("=== Testing {} ===", result.stage).bold());
            current = Some(result.stage);
        }
        print_result(result);
    }
    println!();
}

fn print_result(result: &TestResult) {
    let (status_icon, status_text) = if result.passed {
        ("✓".green(), "PASSED".green())
    } else {
        ("✗".red(), "FAILED".red())
    };

    println!(
        "{} {} - {} ({}ms)",
        status_icon, result.name, status_text, result.duration_ms
    );
    if !result.message.is_empty() {
        if result.passed {
            println!("  {}", result.message.dimmed());
        } else {
            println!("  {}: {}", "Error".red(), result.message);
        }
    }
}

fn print_summary(report: &RunReport) {
    println!("{}", "=== Test Summary ===".bold());
    println!("Tests passed: {}", report.passed().to_string().green());
    println!("Tests failed: {}", report.failed().to_string().red());

    if report.all_passed() {
        println!();
        println!("{}", "All tests passed! 🎉".green().bold());
        return;
    }

    println!();
    println!("{}", "Failed tests:".red().bold());
    for result in report.failures() {
        println!("  - {}", result.name);
        println!("    {}", result.message);
    }
}
