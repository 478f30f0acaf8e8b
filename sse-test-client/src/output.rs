use colored::*;
use std::time::Duration;

pub struct TestResult {
    pub scenario: String,
    pub passed: bool,
    pub message: Option<String>,
    pub duration: Duration,
}

impl TestResult {
    pub fn pass(scenario: &str, duration: Duration) -> Self {
        Self {
            scenario: scenario.to_string(),
            passed: true,
            message: None,
            duration,
        }
    }

    pub fn fail(scenario: &str, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            scenario: scenario.to_string(),
            passed: false,
            message: Some(message.into()),
            duration,
        }
    }
}

pub fn print_scenario_header(name: &str) {
    println!("\n{} {}", "SCENARIO:".bright_cyan().bold(), name);
}

pub fn print_step(message: &str) {
    println!("  {} {}", "→".blue(), message);
}

pub fn print_success(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

pub fn print_failure(message: &str) {
    println!("  {} {}", "✗".red(), message);
}

pub fn print_test_summary(results: &[TestResult]) {
    for result in results {
        let status = if result.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!(
            "{} {} ({}ms)",
            status,
            result.scenario,
            result.duration.as_millis()
        );

        if let Some(message) = &result.message {
            println!("     {}", message.dimmed());
        }
    }

    let passed = results.iter().filter(|r| r.passed).count();
    println!("\n{}/{} scenarios passed", passed, results.len());
}
