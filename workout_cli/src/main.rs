use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;
use workout_core::journal::events_for;
use workout_core::*;

#[derive(Parser)]
#[command(name = "fitcoach")]
#[command(about = "Workout template lifecycle and coaching adjustments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a workout template JSON document and add it to the store
    Import { file: PathBuf },

    /// List stored workouts by scheduled date
    List,

    /// Show a workout with its derived estimates
    Show { id: Uuid },

    /// Start a scheduled workout
    Start { id: Uuid },

    /// Mark a workout as completed
    Complete {
        id: Uuid,

        /// Identifier of the recorded workout session
        #[arg(long)]
        workout_id: String,
    },

    /// Skip a scheduled workout
    Skip {
        id: Uuid,

        #[arg(long)]
        reason: String,
    },

    /// Move a scheduled workout to another date (YYYY-MM-DD or RFC 3339)
    Reschedule {
        id: Uuid,

        #[arg(long, value_parser = parse_date)]
        to: DateTime<Utc>,
    },

    /// Make one activity easier (factor between 0 and 1)
    Easier {
        id: Uuid,

        #[arg(long)]
        order: u32,

        #[arg(long)]
        factor: f64,
    },

    /// Make one activity harder (factor above 1)
    Harder {
        id: Uuid,

        #[arg(long)]
        order: u32,

        #[arg(long)]
        factor: f64,
    },

    /// Scale every activity down for a fatigue level between 0 and 1
    Fatigue {
        id: Uuid,

        #[arg(long)]
        level: f64,
    },

    /// Show the lifecycle journal of a workout
    History { id: Uuid },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    workout_core::logging::init_from_config(&config.logging);

    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    let mut store = JsonFileStore::new(config.templates_dir());
    let journal_path = config.journal_path();
    let now = Utc::now();

    match cli.command {
        Commands::Import { file } => cmd_import(&mut store, &file),
        Commands::List => cmd_list(&store, now),
        Commands::Show { id } => {
            let template = store.load(id)?;
            display_template(&template, &config, now);
            Ok(())
        }
        Commands::Start { id } => {
            let started =
                apply_lifecycle(&mut store, &journal_path, id, LifecycleCommand::Start, now, |t| {
                    t.start(now)
                })?;
            println!("✓ Started '{}'", started.title());
            Ok(())
        }
        Commands::Complete { id, workout_id } => {
            let completed = apply_lifecycle(
                &mut store,
                &journal_path,
                id,
                LifecycleCommand::Complete,
                now,
                |t| t.mark_complete(&workout_id, now),
            )?;
            println!("✓ Completed '{}'", completed.title());
            Ok(())
        }
        Commands::Skip { id, reason } => {
            let skipped =
                apply_lifecycle(&mut store, &journal_path, id, LifecycleCommand::Skip, now, |t| {
                    t.skip(&reason)
                })?;
            println!("✓ Skipped '{}'", skipped.title());
            Ok(())
        }
        Commands::Reschedule { id, to } => {
            let moved = apply_lifecycle(
                &mut store,
                &journal_path,
                id,
                LifecycleCommand::Reschedule,
                now,
                |t| t.reschedule(to, now),
            )?;
            println!("✓ Rescheduled '{}' to {}", moved.title(), to.date_naive());
            Ok(())
        }
        Commands::Easier { id, order, factor } => {
            let adjusted = store.update(id, |t| t.adjust_activity(order, |a| a.make_easier(factor)))?;
            print_adjusted(&adjusted, order);
            Ok(())
        }
        Commands::Harder { id, order, factor } => {
            let adjusted = store.update(id, |t| t.adjust_activity(order, |a| a.make_harder(factor)))?;
            print_adjusted(&adjusted, order);
            Ok(())
        }
        Commands::Fatigue { id, level } => {
            let adjusted = store.update(id, |t| {
                let activities = t
                    .activities()
                    .iter()
                    .map(|a| a.adjust_for_fatigue(level))
                    .collect::<Result<Vec<_>>>()?;
                t.update_activities(activities)
            })?;
            println!(
                "✓ Adjusted '{}' for fatigue {:.0}%: ~{:.0} min",
                adjusted.title(),
                level * 100.0,
                adjusted.estimated_duration_minutes()
            );
            Ok(())
        }
        Commands::History { id } => cmd_history(&journal_path, id),
    }
}

/// Run a lifecycle command against the stored template and journal the transition
///
/// The journal entry is written while the template lock is still held. A
/// failed append is logged; the transition itself is already saved.
fn apply_lifecycle<F>(
    store: &mut JsonFileStore,
    journal_path: &Path,
    id: Uuid,
    command: LifecycleCommand,
    now: DateTime<Utc>,
    f: F,
) -> Result<WorkoutTemplate>
where
    F: FnOnce(&WorkoutTemplate) -> Result<WorkoutTemplate>,
{
    store.update_then(id, f, |before, after| {
        let mut journal = JsonlJournal::new(journal_path);
        let event = LifecycleEvent::between(before, after, command, now);
        if let Err(e) = journal.append(&event) {
            tracing::warn!("Failed to journal {} for {}: {}", command, id, e);
            eprintln!("Warning: {} was saved but not journaled: {}", command, e);
        }
    })
}

fn cmd_import(store: &mut JsonFileStore, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let template: WorkoutTemplate = serde_json::from_str(&contents)?;
    store.save(&template)?;

    println!("✓ Imported '{}' ({})", template.title(), template.id());
    Ok(())
}

fn cmd_list(store: &JsonFileStore, now: DateTime<Utc>) -> Result<()> {
    let templates = store.list()?;
    if templates.is_empty() {
        println!("No workouts stored.");
        return Ok(());
    }

    for template in templates {
        let flag = if template.is_past_due(now) { " (past due)" } else { "" };
        println!(
            "{}  {}  {:<12} {}{}",
            template.id(),
            template.scheduled_date().date_naive(),
            template.status().to_string(),
            template.title(),
            flag
        );
    }
    Ok(())
}

fn cmd_history(journal_path: &Path, id: Uuid) -> Result<()> {
    let events = events_for(journal_path, id)?;
    if events.is_empty() {
        println!("No lifecycle events recorded for {}", id);
        return Ok(());
    }

    for event in events {
        println!(
            "{}  {}: {} -> {}",
            event.at.format("%Y-%m-%d %H:%M"),
            event.command,
            event.from,
            event.to
        );
    }
    Ok(())
}

fn display_template(template: &WorkoutTemplate, config: &Config, now: DateTime<Utc>) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} [{}]", template.title(), template.status());
    println!("╰─────────────────────────────────────────╯");
    println!();

    let days = template.days_until_scheduled(now);
    let when = match days {
        0 => "today".to_string(),
        d if d > 0 => format!("in {} days", d),
        d => format!("{} days ago", -d),
    };
    println!(
        "  Scheduled: {} (week {}, day {}) - {}",
        template.scheduled_date().date_naive(),
        template.week_number(),
        template.day_of_week(),
        when
    );
    println!(
        "  Type: {:?} / {:?}, importance {:?}",
        template.workout_type(),
        template.category(),
        template.importance()
    );
    println!("  Goal: {}", template.goals().primary);
    println!(
        "  Estimated: ~{:.0} min, ~{} kcal",
        template.estimated_duration_minutes(),
        template.estimated_calories(config.athlete.body_weight_kg)
    );
    if template.requires_equipment() {
        println!("  Equipment required");
    }
    println!();

    for activity in template.activities() {
        println!(
            "  {}. {} ({})",
            activity.order(),
            activity.description(),
            activity.duration_summary()
        );
    }

    if let Some(notes) = template.user_notes() {
        println!();
        println!("  Notes: {}", notes);
    }
    if let Some(notes) = template.coach_notes() {
        println!("  Coach: {}", notes);
    }
    println!();
}

fn print_adjusted(template: &WorkoutTemplate, order: u32) {
    if let Some(activity) = template.activity(order) {
        println!("✓ Adjusted: {}", activity.description());
    }
}

/// Accept a calendar date (midnight UTC) or a full RFC 3339 timestamp
fn parse_date(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("invalid date: {}", raw));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid date {:?}: {}", raw, e))
}
