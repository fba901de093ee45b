use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use triage_core::*;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Symptom triage and hospital bed booking system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a set of reported symptoms
    Check {
        /// A reported symptom (repeatable)
        #[arg(long = "symptom", value_name = "SYMPTOM")]
        symptoms: Vec<String>,

        /// List the recognized symptom vocabulary and exit
        #[arg(long)]
        list_symptoms: bool,
    },

    /// Classify symptoms, then book a bed at a matching hospital
    Book {
        /// A reported symptom (repeatable)
        #[arg(long = "symptom", value_name = "SYMPTOM")]
        symptoms: Vec<String>,

        /// Requester name recorded on the booking
        #[arg(long)]
        name: String,

        /// Book at this hospital instead of prompting
        #[arg(long, conflicts_with = "first_available")]
        hospital: Option<String>,

        /// Take the first hospital with a free bed (non-interactive)
        #[arg(long)]
        first_available: bool,
    },

    /// Operator dashboard
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List every hospital with its bed counts
    Status,

    /// List every booking
    Bookings,

    /// Reset every hospital to its seed bed count
    ///
    /// Destructive override: existing bookings are left in place, so a
    /// reset can advertise more beds than outstanding bookings account for.
    Reset,

    /// Withdraw a booking, restoring its bed
    Withdraw {
        /// Booking id (see `admin bookings`)
        #[arg(long)]
        booking: Uuid,
    },
}

fn main() {
    triage_core::logging::init();

    let cli = Cli::parse();

    // Report failures through their Display messages, not the Debug form
    // a Result-returning main would print.
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Check {
            symptoms,
            list_symptoms,
        } => cmd_check(symptoms, list_symptoms),
        Commands::Book {
            symptoms,
            name,
            hospital,
            first_available,
        } => {
            let store = open_store(&data_dir, &config)?;
            cmd_book(&store, symptoms, &name, hospital, first_available)
        }
        Commands::Admin(admin) => {
            let store = open_store(&data_dir, &config)?;
            match admin {
                AdminCommands::Status => cmd_status(&store),
                AdminCommands::Bookings => cmd_bookings(&store),
                AdminCommands::Reset => cmd_reset(&store),
                AdminCommands::Withdraw { booking } => cmd_withdraw(&store, booking),
            }
        }
    }
}

/// Open the capacity store, seeding the default directory on first use
fn open_store(data_dir: &std::path::Path, config: &Config) -> Result<CapacityStore> {
    let seeds = default_directory(config.capacity.default_beds);
    let errors = seed::validate_seeds(&seeds);
    if !errors.is_empty() {
        eprintln!("Hospital directory validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Store("Invalid hospital directory".into()));
    }

    let store = CapacityStore::open(data_dir)?;
    store.seed_if_empty(&seeds)?;
    Ok(store)
}

/// Refuse to classify against a rule table that fails validation
fn ensure_rules_valid() -> Result<()> {
    let errors = rules::validate_rules(rule_table());
    if errors.is_empty() {
        return Ok(());
    }
    eprintln!("Rule table validation errors:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    Err(Error::Config("Invalid rule table".into()))
}

/// Build a report from the CLI symptom flags, warning on unknown names
fn build_report(symptoms: &[String]) -> SymptomReport {
    let mut report = SymptomReport::new();
    for symptom in symptoms {
        let normalized = symptom.trim().to_lowercase();
        if SYMPTOM_VOCABULARY.contains(&normalized.as_str()) {
            report.set(&normalized, true);
        } else {
            eprintln!("Unknown symptom: {}. Ignoring.", symptom);
        }
    }
    report
}

fn cmd_check(symptoms: Vec<String>, list_symptoms: bool) -> Result<()> {
    if list_symptoms {
        println!("Recognized symptoms:");
        for symptom in SYMPTOM_VOCABULARY {
            println!("  - {}", symptom);
        }
        return Ok(());
    }

    ensure_rules_valid()?;
    let report = build_report(&symptoms);
    let diagnosis = classify(&report);
    print_diagnosis(diagnosis);
    Ok(())
}

fn cmd_book(
    store: &CapacityStore,
    symptoms: Vec<String>,
    name: &str,
    hospital: Option<String>,
    first_available: bool,
) -> Result<()> {
    ensure_rules_valid()?;
    let report = build_report(&symptoms);
    let diagnosis = classify(&report);
    print_diagnosis(diagnosis);

    let condition = match diagnosis {
        Diagnosis::Condition(c) => c,
        Diagnosis::Unknown => return Ok(()),
    };

    let candidates = list_candidates(store, condition)?;
    if candidates.is_empty() {
        println!("No hospitals currently have beds for {condition}. Try again later.");
        return Ok(());
    }

    if let Some(chosen) = hospital {
        // The requester may only pick from the diagnosed condition's
        // candidates; a full-but-matching hospital still goes through
        // `book` so the lost race is reported with the remaining options.
        let registry = store.read()?;
        let pool = registry
            .pools
            .get(&chosen)
            .ok_or_else(|| Error::PoolNotFound(chosen.clone()))?;
        if pool.condition != condition {
            println!(
                "{} treats {}, not {}. Hospitals with beds for {}:",
                chosen, pool.condition, condition, condition
            );
            for candidate in &candidates {
                println!("  - {}", candidate);
            }
            return Ok(());
        }
        return book_named(store, &chosen, name, &candidates);
    }

    if first_available {
        return match book_first_available(store, condition, name) {
            Ok(reservation) => {
                print_confirmation(&reservation);
                Ok(())
            }
            Err(Error::NoCapacity(c)) => {
                println!("No hospitals currently have beds for {c}. Try again later.");
                Ok(())
            }
            Err(e) => Err(e),
        };
    }

    book_interactive(store, name, candidates)
}

/// Book at an explicitly named hospital, reporting the remaining candidates
/// when the attempt loses the race
fn book_named(
    store: &CapacityStore,
    chosen: &str,
    name: &str,
    candidates: &[String],
) -> Result<()> {
    match book(store, chosen, name)? {
        BookOutcome::Confirmed(reservation) => {
            print_confirmation(&reservation);
        }
        BookOutcome::Conflict => {
            println!("No beds available at {chosen}. Please choose another:");
            for candidate in candidates.iter().filter(|c| c.as_str() != chosen) {
                println!("  - {}", candidate);
            }
        }
    }
    Ok(())
}

/// Prompt for a hospital; on a lost race, drop it and re-prompt with the rest
fn book_interactive(store: &CapacityStore, name: &str, mut candidates: Vec<String>) -> Result<()> {
    loop {
        if candidates.is_empty() {
            println!("Every candidate hospital has filled up. Try again later.");
            return Ok(());
        }

        let chosen = match prompt_pick(&candidates)? {
            Some(chosen) => chosen,
            None => {
                println!("Booking cancelled.");
                return Ok(());
            }
        };

        match book(store, &chosen, name)? {
            BookOutcome::Confirmed(reservation) => {
                print_confirmation(&reservation);
                return Ok(());
            }
            BookOutcome::Conflict => {
                println!("\nNo beds available at {chosen}. Please choose another.\n");
                candidates.retain(|c| c != &chosen);
            }
        }
    }
}

fn cmd_status(store: &CapacityStore) -> Result<()> {
    let registry = store.read()?;
    println!("Hospital bed availability:");
    for pool in registry.pools.values() {
        println!(
            "  {} ({}) → Beds available: {}/{}",
            pool.name, pool.condition, pool.available_beds, pool.initial_beds
        );
    }
    Ok(())
}

fn cmd_bookings(store: &CapacityStore) -> Result<()> {
    let registry = store.read()?;
    if registry.reservations.is_empty() {
        println!("No bookings yet.");
        return Ok(());
    }

    println!("Bookings:");
    for reservation in &registry.reservations {
        println!(
            "  {}  {} booked at {} ({})",
            reservation.id,
            reservation.requester,
            reservation.pool,
            reservation.booked_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    Ok(())
}

fn cmd_reset(store: &CapacityStore) -> Result<()> {
    reset_capacity(store)?;
    println!("✓ All hospital beds reset to their seed counts.");
    Ok(())
}

fn cmd_withdraw(store: &CapacityStore, booking: Uuid) -> Result<()> {
    let reservation = withdraw(store, booking)?;
    println!(
        "✓ Withdrew booking for {} at {}.",
        reservation.requester, reservation.pool
    );
    Ok(())
}

fn print_diagnosis(diagnosis: Diagnosis) {
    match diagnosis {
        Diagnosis::Condition(condition) => {
            println!("Diagnosis: {condition}");
        }
        Diagnosis::Unknown => {
            println!("Diagnosis: Unknown");
            println!("Unable to determine a condition. Please consult a healthcare professional.");
        }
    }
}

fn print_confirmation(reservation: &Reservation) {
    println!(
        "✓ Bed booked at {} for {}.",
        reservation.pool, reservation.requester
    );
    println!("  Booking id: {}", reservation.id);
}

fn prompt_pick(candidates: &[String]) -> Result<Option<String>> {
    println!("Hospitals with available beds:");
    for (i, candidate) in candidates.iter().enumerate() {
        println!("  {}) {}", i + 1, candidate);
    }
    print!("Pick a hospital (number, blank to cancel) > ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<usize>() {
        Ok(n) if n >= 1 && n <= candidates.len() => Ok(Some(candidates[n - 1].clone())),
        _ => {
            println!("Not a valid choice.");
            Ok(None)
        }
    }
}
