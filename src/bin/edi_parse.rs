//! Manual pipeline exerciser, not a product surface: reads a file path from
//! argv, runs parse -> validate, and prints a summary plus any findings.
//! The CLI surface proper (argument parsing, partner lookup, exit codes)
//! is an external collaborator per spec.md's scope.

use std::env;
use std::fs;
use std::process::ExitCode;

use edi_x12::{ack997, generate, parse, validate};

fn main() -> ExitCode {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: edi-parse <path-to-edi-file>");
            return ExitCode::FAILURE;
        }
    };

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error reading {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let interchange = match parse(&bytes) {
        Ok(interchange) => interchange,
        Err(e) => {
            eprintln!("parse failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let group_count = interchange.functional_groups.len();
    let transaction_count: usize = interchange.functional_groups.iter().map(|g| g.transactions.len()).sum();
    println!("parsed interchange {}: {group_count} functional group(s), {transaction_count} transaction(s)", interchange.control_number);

    let report = validate(&interchange, None);
    if report.findings.is_empty() {
        println!("no findings");
    } else {
        for finding in &report.findings {
            println!("{:?} {:?}: {}", finding.severity, finding.location, finding.kind);
        }
    }

    let ack = ack997(&interchange, &report);
    match generate(&ack, None) {
        Ok(bytes) => println!("--- 997 ---\n{}", String::from_utf8_lossy(&bytes)),
        Err(e) => eprintln!("failed to generate 997: {e}"),
    }

    if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
