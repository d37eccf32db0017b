//! CBT Journal
//!
//! Interactive terminal journal:
//! - Guided new entry (event, thought, feeling wheel, distortion, reframe)
//! - Optional AI reflection before saving
//! - Journal history, deletion and CSV snapshot export

use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::info;

use cbt_journal::distortions::{all_distortions, distortion_description, distortion_names};
use cbt_journal::telemetry;
use cbt_journal::{EmotionWheel, JournalConfig, JournalEntry, JournalStore, ReflectionOutcome, Reflector};

const DEFAULT_INTENSITY: i64 = 3;

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    telemetry::init_logging()?;

    let config = JournalConfig::from_env();

    let wheel = match &config.feeling_wheel_path {
        Some(path) => EmotionWheel::load(path)?,
        None => EmotionWheel::builtin()?,
    };
    info!("Feeling wheel ready with {} primary emotions", wheel.primary_emotions().len());

    let store = JournalStore::open(config.clone())
        .context("Failed to prepare journal directories")?;

    let reflector = std::env::var("OPENAI_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .map(|key| Reflector::from_config(&config, key));

    println!("\n{}", "═".repeat(60));
    println!("📓 CBT Journal");
    println!("{}", "═".repeat(60));
    println!("Journal: {}", store.journal_path().display());
    match &reflector {
        Some(r) => println!("AI reflection: enabled ({})", r.model()),
        None => println!("AI reflection: disabled (set OPENAI_API_KEY to enable)"),
    }
    println!("{}\n", "═".repeat(60));
    print_help();

    loop {
        let input = ask("📓 > ")?;
        let mut parts = input.split_whitespace();
        let Some(command) = parts.next() else { continue };

        let result = match command.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("\n👋 Stay kind to yourself.\n");
                break;
            }
            "help" | "?" => {
                print_help();
                Ok(())
            }
            "new" => new_entry(&wheel, &store, reflector.as_ref()).await,
            "history" => show_history(&store),
            "delete" => delete_entry(&store, parts.next()),
            "export" => export_snapshot(&store),
            "distortions" => {
                show_distortions();
                Ok(())
            }
            "emotions" => {
                show_emotions(&wheel);
                Ok(())
            }
            other => {
                println!("Unknown command '{}'. Type 'help' for the list.\n", other);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("❌ Error: {:#}\n", e);
        }
    }

    Ok(())
}

fn print_help() {
    println!("💡 Commands:");
    println!("   new          write a journal entry");
    println!("   history      list every saved entry");
    println!("   delete <n>   remove entry number n");
    println!("   export       write a CSV snapshot");
    println!("   distortions  browse cognitive distortions");
    println!("   emotions     browse the feeling wheel");
    println!("   quit\n");
}

// ──────────────────────────────────────────────────────────────────────────────
// COMMANDS
// ──────────────────────────────────────────────────────────────────────────────

async fn new_entry(wheel: &EmotionWheel, store: &JournalStore, reflector: Option<&Reflector>) -> Result<()> {
    let today = JournalEntry::today();
    let date = ask(&format!("Date [{}]: ", today))?;
    let date = if date.is_empty() { today } else { date };

    let event = ask("What happened? * ")?;
    let thought = ask("Automatic thought * ")?;

    let Some(primary) = choose("Primary emotion *", &wheel.primary_emotions())? else {
        println!("❌ A primary emotion is required.\n");
        return Ok(());
    };
    let secondary = choose("Secondary emotion", &wheel.secondary_emotions(&primary))?;
    let tertiary = match &secondary {
        Some(secondary) => {
            let options: Vec<&str> = wheel
                .tertiary_emotions(&primary, secondary)
                .iter()
                .map(String::as_str)
                .collect();
            choose("Specific emotion", &options)?
        }
        None => None,
    };

    let intensity = ask_intensity()?;

    let distortion = choose("Cognitive distortion *", &distortion_names())?;
    if let Some(name) = &distortion {
        println!("   ℹ️  {}", distortion_description(name));
    }

    let reframing = ask("Balanced reframe * ")?;

    let mut entry = JournalEntry::new(date, event.trim(), thought.trim(), primary)
        .with_secondary(secondary.unwrap_or_default())
        .with_tertiary(tertiary.unwrap_or_default())
        .with_intensity(intensity)
        .with_distortion(distortion.unwrap_or_default())
        .with_reframing(reframing.trim());

    let missing = entry.missing_required_fields();
    if !missing.is_empty() {
        println!("❌ Please fill in all required fields: {}\n", missing.join(", "));
        return Ok(());
    }
    wheel.validate_entry(&entry)?;

    if let Some(reflector) = reflector {
        if confirm("Generate AI reflection? [y/N] ", false)? {
            println!("\n⚙️  Reflecting...\n");
            let tagged = reflector.reflect_tagged(&entry).await;
            match ReflectionOutcome::from_tagged(tagged) {
                ReflectionOutcome::Reflection(text) => {
                    println!("{}", "─".repeat(50));
                    println!("{}", text);
                    println!("{}\n", "─".repeat(50));
                    if confirm("Keep this reflection with the entry? [Y/n] ", true)? {
                        entry = entry.with_reflection(text);
                    }
                }
                failed @ ReflectionOutcome::Failed(_) => {
                    println!("⚠️  {}", failed.into_tagged());
                    println!("   The entry can still be saved without a reflection.\n");
                }
            }
        }
    }

    store.append(&entry)?;
    println!("✅ Journal entry saved.\n");
    Ok(())
}

fn show_history(store: &JournalStore) -> Result<()> {
    let entries = store.load_all()?;
    if entries.is_empty() {
        println!("📜 No entries yet. Type 'new' to write one.\n");
        return Ok(());
    }

    println!("\n📜 Journal History ({} entries):\n", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:>3}. {}  {}  ({}/7)",
            i + 1,
            entry.date,
            entry.emotion_path(),
            entry.emotion_intensity
        );
        println!("     Event:      {}", truncate(&entry.event, 70));
        println!("     Thought:    {}", truncate(&entry.thought, 70));
        println!("     Distortion: {}", entry.cbt_distortion);
        println!("     Reframe:    {}", truncate(&entry.reframing, 70));
        if let Some(reflection) = &entry.ai_reflection {
            println!("     Reflection: {}", truncate(reflection, 70));
        }
        println!();
    }
    Ok(())
}

fn delete_entry(store: &JournalStore, arg: Option<&str>) -> Result<()> {
    let number: usize = arg
        .context("Usage: delete <n>")?
        .parse()
        .context("Entry number must be a positive integer")?;
    anyhow::ensure!(number > 0, "Entry numbers start at 1");

    let removed = store.remove(number - 1)?;
    println!("🗑️  Removed entry {} ({}: {}).\n", number, removed.date, truncate(&removed.event, 40));
    Ok(())
}

fn export_snapshot(store: &JournalStore) -> Result<()> {
    let entries = store.load_all()?;
    if entries.is_empty() {
        println!("No entries to export.\n");
        return Ok(());
    }
    let path = store.export_snapshot(&entries)?;
    println!("✅ Journal exported: {}\n", path.display());
    Ok(())
}

fn show_distortions() {
    println!("\n🧠 Cognitive Distortions:\n");
    for (name, description) in all_distortions() {
        println!("   • {}: {}", name, description);
    }
    println!();
}

fn show_emotions(wheel: &EmotionWheel) {
    println!("\n🎡 Feeling Wheel:\n");
    for primary in wheel.entries() {
        println!("   {}", primary.name);
        for secondary in &primary.secondaries {
            println!("      {} → {}", secondary.name, secondary.tertiaries.join(", "));
        }
    }
    println!();
}

// ──────────────────────────────────────────────────────────────────────────────
// PROMPT HELPERS
// ──────────────────────────────────────────────────────────────────────────────

fn ask(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    anyhow::ensure!(read > 0, "input closed");
    Ok(input.trim().to_string())
}

/// Pick from `options` by number or exact name; blank skips.
fn choose(label: &str, options: &[&str]) -> Result<Option<String>> {
    if options.is_empty() {
        return Ok(None);
    }
    println!("{}:", label);
    for (i, option) in options.iter().enumerate() {
        println!("   {:>2}. {}", i + 1, option);
    }

    loop {
        let answer = ask("   choice (blank to skip): ")?;
        if answer.is_empty() {
            return Ok(None);
        }
        if let Ok(n) = answer.parse::<usize>() {
            if (1..=options.len()).contains(&n) {
                return Ok(Some(options[n - 1].to_string()));
            }
        }
        if let Some(found) = options.iter().find(|o| o.eq_ignore_ascii_case(&answer)) {
            return Ok(Some(found.to_string()));
        }
        println!("   Not one of the listed options.");
    }
}

fn ask_intensity() -> Result<i64> {
    loop {
        let answer = ask(&format!("Emotion intensity 1-7 [{}]: ", DEFAULT_INTENSITY))?;
        if answer.is_empty() {
            return Ok(DEFAULT_INTENSITY);
        }
        match answer.parse::<i64>() {
            Ok(n) if (1..=7).contains(&n) => return Ok(n),
            _ => println!("   Please enter a whole number from 1 to 7."),
        }
    }
}

fn confirm(label: &str, default: bool) -> Result<bool> {
    let answer = ask(label)?.to_lowercase();
    Ok(match answer.as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ");
    if s.len() <= max_len {
        s
    } else {
        let target_len = max_len.saturating_sub(3);
        let mut end = target_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
