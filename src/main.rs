use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use ipdossier::cli::Cli;
use ipdossier::config::Config;
use ipdossier::errors::{IoResultExt, Result};
use ipdossier::investigate::{self, InvestigationRequest};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::from_args();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.error_enabled() {
                eprintln!("Error ({}): {e}", e.category());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::from_env();
    config.merge_with_cli(cli);
    config.validate()?;

    // Interactive prompting for whatever the flags did not supply.
    let ip = prompt_if_missing(cli.ip.as_deref(), "Enter the IP address: ")?;
    let investigator =
        prompt_if_missing(cli.investigator.as_deref(), "Enter the investigator's name: ")?;
    let case_number = prompt_if_missing(cli.case_number.as_deref(), "Enter the case number: ")?;

    let mut request = InvestigationRequest::new(ip, investigator, case_number);
    request.use_registration = !cli.no_registration;
    request.use_reverse_dns = !cli.no_reverse_dns;
    request.use_geolocation = !cli.no_geolocation;

    if cli.is_trace() {
        eprintln!("Investigating {} ...", request.ip);
    }

    let investigation = investigate::run(&request, &config).await?;

    if cli.warn_enabled() {
        for warning in &investigation.warnings {
            eprintln!("Warning: {warning}");
        }
    }

    if cli.verbose > 0 {
        println!("{}", investigation.text_report);
        println!();
    }

    // Report files are overwritten each run; only the audit log is append-only.
    let text_path = &config.report.text_report;
    std::fs::write(text_path, &investigation.text_report)
        .with_path(text_path.display().to_string(), "write")?;
    println!("Text report saved to {}", text_path.display());

    let html_path = &config.report.html_report;
    std::fs::write(html_path, &investigation.html_report)
        .with_path(html_path.display().to_string(), "write")?;
    println!("HTML report saved to {}", html_path.display());

    println!(
        "Case {} recorded in {}",
        investigation.record.case_number,
        config.storage.audit_log.display()
    );

    Ok(())
}

/// Use the flag value if given, otherwise prompt on stdin.
fn prompt_if_missing(value: Option<&str>, prompt: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v.to_string());
    }

    print!("{prompt}");
    io::stdout().flush().with_path("<stdout>", "flush")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .with_path("<stdin>", "read")?;
    Ok(line.trim().to_string())
}
