//! # CRD Generator
//!
//! Prints the `EmailSenderConfig` and `Email` CustomResourceDefinitions as one
//! multi-document YAML stream.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/email-operator.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use email_operator::crd::{Email, EmailSenderConfig};
use kube::core::CustomResourceExt;

fn main() {
    let crds = [EmailSenderConfig::crd(), Email::crd()];

    println!("# This file is auto-generated by crdgen");
    println!("# DO NOT EDIT THIS FILE MANUALLY");
    println!("# Change the types in src/crd and regenerate instead");
    for crd in &crds {
        match serde_yaml::to_string(crd) {
            Ok(yaml) => {
                println!("---");
                print!("{yaml}");
            }
            Err(e) => {
                eprintln!("Failed to serialize CRD to YAML: {e}");
                std::process::exit(1);
            }
        }
    }
}
