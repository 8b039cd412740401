//! Expiry-band report.

use chrono::NaiveDate;
use shelfline_core::categorize;
use shelfline_store::JsonStore;

/// Print the expiry-band report to stdout.
#[allow(clippy::print_stdout)]
pub fn expiry_report(
    store: &JsonStore,
    as_of: Option<NaiveDate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = store.load()?;
    let as_of = as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let bands = categorize(&doc.items, as_of);

    println!("Expiry report as of {as_of}");
    for (band, entries) in &bands {
        println!("\n{} ({})", band.label(), entries.len());
        for entry in entries {
            println!(
                "  {:<12} {:<32} {}  qty {:>5}  ({} days)",
                entry.code, entry.description, entry.date, entry.quantity, entry.days_until
            );
        }
    }
    Ok(())
}
