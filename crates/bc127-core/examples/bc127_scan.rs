//! BC127 discovery demo
//!
//! Runs a classic inquiry on a live module and prints every device found.
//!
//! Usage:
//!   cargo run --example bc127_scan -- [OPTIONS]
//!
//! Options:
//!   --port PORT      Serial port (default: /dev/ttyUSB0)
//!   --baud RATE      Baud rate (default: 9600)
//!   --window UNITS   Scan window, 1-48 units of 1.28 s (default: 5)
//!   --ble            Run a BLE scan instead of a classic inquiry

use bc127_core::protocol::{open_port, Bc127, DEFAULT_BAUD_RATE};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut port_name = "/dev/ttyUSB0".to_string();
    let mut baud_rate = DEFAULT_BAUD_RATE;
    let mut window = 5u8;
    let mut ble = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                i += 1;
                if i < args.len() {
                    port_name = args[i].clone();
                }
            }
            "--baud" | "-b" => {
                i += 1;
                if i < args.len() {
                    baud_rate = args[i].parse().unwrap_or(DEFAULT_BAUD_RATE);
                }
            }
            "--window" | "-w" => {
                i += 1;
                if i < args.len() {
                    window = args[i].parse().unwrap_or(5);
                }
            }
            "--ble" => {
                ble = true;
            }
            other => {
                eprintln!("unknown option: {}", other);
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let transport = match open_port(&port_name, baud_rate) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("failed to open {}: {}", port_name, e);
            std::process::exit(1);
        }
    };

    let mut module = Bc127::new(transport);
    println!(
        "scanning on {} ({} baud, window {})...",
        port_name, baud_rate, window
    );

    let result = if ble {
        module.ble_scan(window)
    } else {
        module.inquiry(window)
    };

    match result {
        Ok(0) => println!("no devices found"),
        Ok(count) => {
            for index in 0..count {
                if let Ok(address) = module.discovered_address(index) {
                    println!("  {}: {}", index, address);
                }
            }
        }
        Err(e) => {
            eprintln!("scan failed: {}", e);
            std::process::exit(1);
        }
    }
}
