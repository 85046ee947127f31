//! # CLI - EmberKV Interactive Shell
//!
//! A REPL-style command-line interface for the EmberKV storage engine.
//! Reads commands from stdin, executes them against the store, and prints
//! results to stdout. Designed for both interactive use and scripted testing
//! (pipe commands via stdin).
//!
//! ## Commands
//!
//! ```text
//! SET key value   Insert or update a key-value pair
//! GET key         Look up a key (prints value, "(nil)", or "(deleted)")
//! DEL key         Delete a key (writes a tombstone)
//! ROTATE          Seal the active log; merge when the threshold is reached
//! STATS           Print store debug info
//! EXIT / QUIT     Shut down gracefully
//! ```
//!
//! ## Configuration
//!
//! ```text
//! EMBER_DIR   Store directory (default: "data")
//! ```
//!
//! ## Example
//!
//! ```text
//! $ cargo run -p cli
//! EmberKV started (dir=data, indexed_keys=0)
//! > SET name Alice
//! OK
//! > GET name
//! Alice
//! > ROTATE
//! OK
//! > EXIT
//! bye
//! ```

use anyhow::Result;
use engine::{Store, StoreError};
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let dir = std::env::var("EMBER_DIR").unwrap_or_else(|_| "data".to_string());
    let mut store = Store::open(&dir)?;

    println!("EmberKV started (dir={}, indexed_keys={})", dir, store.len());
    println!("Commands: SET key value | GET key | DEL key | ROTATE | STATS | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        if let Some(cmd) = parts.next() {
            match cmd.to_uppercase().as_str() {
                "SET" => {
                    if let Some(k) = parts.next() {
                        let v: String = parts.collect::<Vec<&str>>().join(" ");
                        if v.is_empty() {
                            println!("ERR usage: SET key value");
                        } else {
                            match store.put(k.as_bytes().to_vec(), v.into_bytes()) {
                                Ok(()) => println!("OK"),
                                Err(e) => println!("ERR set failed: {}", e),
                            }
                        }
                    } else {
                        println!("ERR usage: SET key value");
                    }
                }
                "GET" => {
                    if let Some(k) = parts.next() {
                        match store.get(k.as_bytes()) {
                            Ok(v) => println!("{}", String::from_utf8_lossy(&v)),
                            Err(StoreError::NotFound) => println!("(nil)"),
                            Err(StoreError::Deleted) => println!("(deleted)"),
                            Err(e) => println!("ERR read failed: {}", e),
                        }
                    } else {
                        println!("ERR usage: GET key");
                    }
                }
                "DEL" => {
                    if let Some(k) = parts.next() {
                        match store.delete(k.as_bytes().to_vec()) {
                            Ok(()) => println!("OK"),
                            Err(e) => println!("ERR del failed: {}", e),
                        }
                    } else {
                        println!("ERR usage: DEL key");
                    }
                }
                "ROTATE" => match store.rotate() {
                    Ok(()) => println!("OK (indexed_keys={})", store.len()),
                    Err(e) => println!("ERR rotate failed: {}", e),
                },
                "STATS" => {
                    println!("{:?}", store);
                }
                "EXIT" | "QUIT" => {
                    println!("bye");
                    break;
                }
                other => {
                    println!("unknown command: {}", other);
                }
            }
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    Ok(())
}
