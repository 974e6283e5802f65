use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use healthboard_core::{
    appointments::AppointmentSource, is_still_current, refresh, role_label, AppointmentCache,
    CaptureRegistry, CoreConfig, FeatureFlags, FlagName, FlagResolver, LegacyFlagSource,
    LegacyGlobals, YamlAppointmentSource, APPOINTMENT_ROLES, DEFAULT_DATA_DIR,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "healthboard")]
#[command(about = "Healthboard flag and appointment inspection CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print the health-tracking flags from the legacy flags file
    Flags {
        /// Directory holding the data files
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Print the next upcoming appointment
    Next {
        /// Directory holding the data files
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
        /// Evaluate at this instant (RFC 3339) instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// List the appointment roles
    Roles,
    /// Check whether a scheduled time is still current under the grace window
    Check {
        /// Scheduled appointment time (RFC 3339)
        scheduled: String,
        /// Evaluate at this instant (RFC 3339) instead of now
        #[arg(long)]
        at: Option<String>,
    },
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

fn instant_or_now(at: Option<String>) -> Result<DateTime<Utc>, chrono::ParseError> {
    at.as_deref().map(parse_instant).unwrap_or_else(|| Ok(Utc::now()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Flags { data_dir }) => {
            let cfg = CoreConfig::new(data_dir, FeatureFlags::default())?;
            let globals = LegacyGlobals::load(&cfg.legacy_flags_file())?;
            let resolver =
                FlagResolver::from_registry(&CaptureRegistry::new(), LegacyFlagSource::new(globals));
            let snapshot = resolver.snapshot();
            for flag in FlagName::ALL {
                let mark = if snapshot.is_active(flag) { "x" } else { " " };
                println!("[{}] {}", mark, flag);
            }
        }
        Some(Commands::Next { data_dir, at }) => {
            let now = instant_or_now(at)?;
            let cfg = CoreConfig::new(data_dir, FeatureFlags::default())?;
            let source = YamlAppointmentSource::new(cfg.appointments_file());
            let mut cache = AppointmentCache::new();
            refresh(&mut cache, &source as &dyn AppointmentSource, now)?;
            match cache.next_at(now) {
                Some(next) => {
                    let label = role_label(&next.role).unwrap_or(next.role.as_str());
                    print!("{}: {}", label, next.time.to_rfc3339());
                    if let Some(location) = &next.location {
                        print!(" ({})", location);
                    }
                    println!();
                }
                None => println!("No upcoming appointment."),
            }
        }
        Some(Commands::Roles) => {
            for role in APPOINTMENT_ROLES {
                println!("{:<8} {}", role.code, role.label);
            }
        }
        Some(Commands::Check { scheduled, at }) => {
            let scheduled = parse_instant(&scheduled)?;
            let now = instant_or_now(at)?;
            if is_still_current(scheduled, now) {
                println!("current");
            } else {
                println!("passed");
            }
        }
        None => {
            println!("Use 'healthboard --help' for commands");
        }
    }

    Ok(())
}
