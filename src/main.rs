//! Nostr Vanity npub Miner CLI
//!
//! Usage:
//!   nostr_vanity sat                 # Find an npub starting with "sat"
//!   nostr_vanity sat,zap -e          # "sat" or "zap" at either end
//!   nostr_vanity sat -b q,w -j 8     # also report "q" and "w" hits on the way
//!   nostr_vanity sat -o matches.txt  # append every match to a file

use std::process;

use clap::Parser;
use log::{error, info, warn};

use nostr_vanity::worker::format_count;
use nostr_vanity::{Config, Coordinator, Found, MatchReporter, SearchOutcome};

/// Primary targets at least this long get a runtime warning.
const LONG_TARGET_LEN: usize = 6;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // Validate configuration
    let targets = match config.target_set() {
        Ok(targets) => targets,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    // Print startup info
    println!("Nostr Vanity npub Miner");
    println!("=======================");
    println!("Targets:    {}", targets.primary().join(", "));
    if !targets.bonus().is_empty() {
        println!("Bonus:      {}", targets.bonus().join(", "));
    }
    println!(
        "Position:   {}",
        if targets.include_end() { "start or end" } else { "start" }
    );
    println!("Difficulty: {}", targets.difficulty_description());
    println!("Workers:    {}", config.worker_count());
    if let Some(ref path) = config.output_file {
        println!("Output:     {}", path.display());
    }
    println!();

    if targets.longest_primary() >= LONG_TARGET_LEN {
        warn!("This will probably take a LONG time!");
        println!("\tTip: CTRL-C to abort.\n");
    }

    let reporter = match MatchReporter::new(config.output_file.as_deref()) {
        Ok(reporter) => reporter,
        Err(e) => {
            eprintln!("ERROR: cannot open output file: {}", e);
            process::exit(1);
        }
    };

    let coordinator = Coordinator::new(config.search_settings(), targets, reporter);

    // Set up ctrl-c handler
    let signal = coordinator.signal();
    if let Err(e) = ctrlc::set_handler(move || {
        signal.interrupt();
    }) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    info!("Starting search");

    let code = match coordinator.run() {
        Ok(SearchOutcome::Found(found)) => {
            print_result(&found);
            0
        }
        Ok(SearchOutcome::Interrupted) => {
            println!("\nStopped by user.");
            130
        }
        Err(e) => {
            error!("Search failed: {}", e);
            1
        }
    };

    // Print final stats
    let counter = coordinator.counter();
    println!("\n--- Final Statistics ---");
    println!("Total keys tried:     {}", format_count(counter.current()));
    println!("Matches reported:     {}", coordinator.reporter().total_reported());
    println!("Time elapsed:         {:.2}s", counter.elapsed().as_secs_f64());
    println!(
        "Average speed:        {}/s",
        format_count(counter.keys_per_second() as u64)
    );

    process::exit(code);
}

fn print_result(found: &Found) {
    let keypair = found.candidate.keypair();
    println!("=== Found '{}' ===", found.target);
    println!("npub:        {}", found.candidate.npub());
    println!("Public key:  {}", keypair.public_key_hex());
    println!("nsec:        {}", found.nsec);
    println!("Secret key:  {}", keypair.private_key_hex());
    println!("Worker:      {}", found.worker_id);
}
