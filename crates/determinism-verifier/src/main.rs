//! CLI for determinism-verifier
//!
//! Loads a JSON-serialized module (the output of the bytecode-introspection
//! layer) and reports every non-deterministic construct found.
//!
//! # Usage
//!
//! ```bash
//! # Verify against the baseline policy
//! determinism-verifier contract.json
//!
//! # Verify against a pinned policy file
//! determinism-verifier contract.json policy.json
//! ```
//!
//! Exits 0 when the contract is deterministic, 1 otherwise.

use std::{env, fs, process};

use contract_model::Module;
use determinism_verifier::{Policy, Verifier};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <module.json> [policy.json]", args[0]);
        process::exit(1);
    }

    let module_path = &args[1];
    let contents = fs::read_to_string(module_path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", module_path, e);
        process::exit(1);
    });

    let module: Module = serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Failed to parse module: {}", e);
        process::exit(1);
    });

    let policy = match args.get(2) {
        Some(path) => Policy::from_path(path).unwrap_or_else(|e| {
            eprintln!("Failed to load policy {}: {}", path, e);
            process::exit(1);
        }),
        None => Policy::baseline(),
    };

    let verifier = Verifier::with_policy(&module, &policy);
    let report = verifier.verify().unwrap_or_else(|e| {
        eprintln!("Malformed module: {}", e);
        process::exit(1);
    });

    println!(
        "Contract type: {} ({} known methods)",
        module.contract_type,
        module.methods.len()
    );

    if report.is_deterministic() {
        println!("Contract is deterministic");
        return;
    }

    println!("Found {} violation(s):", report.diagnostics().len());
    for diagnostic in report.diagnostics() {
        println!("  {}", diagnostic);
    }
    process::exit(1);
}
