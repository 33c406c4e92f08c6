//! CLI tool to generate API keys.
//!
//! Usage:
//!   cargo run --bin generate-api-key
//!   cargo run --bin generate-api-key -- --aes-secret "shared secret" --encoding base64

use std::env;

use secrecy::{ExposeSecret, SecretString};

use keygate::crypto::DigestEncoding;
use keygate::services::api_key;

fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut key: Option<String> = None;
    let mut aes_secret: Option<String> = env::var("KEYGATE_AES_SECRET").ok();
    let mut encoding = "hex".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--key" | "-k" => {
                i += 1;
                if i < args.len() {
                    key = Some(args[i].clone());
                }
            }
            "--aes-secret" | "-s" => {
                i += 1;
                if i < args.len() {
                    aes_secret = Some(args[i].clone());
                }
            }
            "--encoding" | "-e" => {
                i += 1;
                if i < args.len() {
                    encoding = args[i].clone();
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let encoding = match DigestEncoding::parse(&encoding) {
        Some(e) => e,
        None => {
            eprintln!("Error: Invalid encoding '{}'. Must be: hex, base64", encoding);
            std::process::exit(1);
        }
    };

    let api_key = match key {
        Some(k) if k.is_empty() => {
            eprintln!("Error: --key must not be empty");
            std::process::exit(1);
        }
        Some(k) => SecretString::from(k),
        None => api_key::generate_key(),
    };

    let aes_secret = match aes_secret {
        Some(s) if s.is_empty() => {
            eprintln!("Error: AES secret must not be empty");
            std::process::exit(1);
        }
        other => other.map(SecretString::from),
    };

    let issued = match api_key::issue_key(api_key, aes_secret.as_ref(), encoding) {
        Ok(issued) => issued,
        Err(e) => {
            eprintln!("Error encrypting key: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  API Key Generated");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  Key:       {}", issued.api_key.expose_secret());
    println!("  Digest:    {} ({})", issued.digest, encoding);
    if let Some(token) = &issued.encrypted_token {
        println!("  Token:     {}", token);
    }
    println!();
    println!("  Plain gate:      KEYGATE_API_KEY=<key>");
    println!("  Encrypted gate:  KEYGATE_API_KEY_DIGEST=<digest>");
    println!("                   KEYGATE_DIGEST_ENCODING={}", encoding);
    if issued.encrypted_token.is_some() {
        println!("  Clients send:    Authorization: <token>");
    }
    println!();
    println!("  ⚠️  Save this key! It cannot be retrieved later.");
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: generate-api-key [--key <key>] [--aes-secret <secret>] [--encoding <encoding>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --key, -k         Use this key instead of a random one");
    eprintln!("  --aes-secret, -s  AES secret for the encrypted token (default: $KEYGATE_AES_SECRET)");
    eprintln!("  --encoding, -e    Digest encoding: hex, base64 (default: hex)");
    eprintln!("  --help, -h        Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  generate-api-key");
    eprintln!("  generate-api-key --aes-secret \"shared secret\" --encoding base64");
    eprintln!();
}
