//! `tenderlink show` and `tenderlink attachments`.

use anyhow::Result;
use tenderlink_core::attachment::resolve;
use tenderlink_core::normalize::CanonicalRecord;

use super::Context;

pub async fn run_show(ctx: &Context, id: &str, json: bool) -> Result<()> {
    let record = ctx.fetch_record(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }
    print_record(&record);
    Ok(())
}

fn print_record(r: &CanonicalRecord) {
    println!("{} ({})", r.title, r.id);
    if let Some(status) = &r.status {
        println!("  status:     {status}");
    }
    if let Some(deadline) = &r.deadline {
        println!("  deadline:   {deadline}");
    }
    if r.budget.min.is_some() || r.budget.max.is_some() {
        let fmt = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
        println!("  budget:     {} .. {}", fmt(r.budget.min), fmt(r.budget.max));
    }
    if !r.categories.is_empty() {
        println!("  categories: {}", r.categories.join(", "));
    }
    if r.bid.can_bid {
        println!("  bidding:    open");
    }
    if let Some(bid) = &r.bid.existing_bid_id {
        println!("  your bid:   {bid}");
    }
    if let Some(desc) = &r.description {
        println!();
        println!("{desc}");
    }
    println!();
    println!("{} attachment(s)", r.attachments.len());
}

pub async fn run_attachments(ctx: &Context, id: &str) -> Result<()> {
    let record = ctx.fetch_record(id).await?;
    if record.attachments.is_empty() {
        println!("No attachments.");
        return Ok(());
    }
    println!("{:<6} {:<40} {}", "INDEX", "NAME", "STORED AS");
    for (i, d) in record.attachments.iter().enumerate() {
        let resolved = resolve(d);
        let stored = if resolved.is_retrievable() {
            resolved.storage_name.as_str()
        } else {
            "-"
        };
        println!("{:<6} {:<40} {}", i, resolved.display_name, stored);
    }
    Ok(())
}
