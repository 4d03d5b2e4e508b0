//! Bucket status dashboard command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use weddingwall_core::storage::status::{StoreStatus, summarize};
use weddingwall_types::bucket::Bucket;
use weddingwall_types::image::StoredImage;

use crate::state::AppState;

/// Display bucket counts, the image on screen and the next one up.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let summary = summarize(&state.store).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status_json(state, &summary))?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Wedding wall v{}",
        style("📷").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("{}", bucket_table(&summary));
    println!();

    println!("  {}", style("── Slideshow ──").dim());
    println!("  On screen: {}", describe(summary.current.as_ref()));
    println!("  Next up:   {}", describe(summary.next_up.as_ref()));
    println!();

    println!("  {}", style("── System ──").dim());
    println!(
        "  Upload dir: {}",
        style(state.store.base_dir().display()).dim()
    );
    println!();

    Ok(())
}

fn status_json(state: &AppState, summary: &StoreStatus) -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "base_dir": state.store.base_dir().display().to_string(),
        "buckets": {
            "before": summary.pending,
            "displaying": summary.displaying,
            "done": summary.done,
        },
        "current": summary.current,
        "next_up": summary.next_up,
    })
}

fn bucket_table(summary: &StoreStatus) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Bucket").fg(Color::White),
        Cell::new("Directory").fg(Color::White),
        Cell::new("Images").fg(Color::White),
    ]);

    for bucket in Bucket::ALL {
        let count = summary.count(bucket);
        let color = match bucket {
            Bucket::Pending if count > 0 => Color::Yellow,
            Bucket::Displaying if count == 1 => Color::Green,
            Bucket::Displaying if count > 1 => Color::Red,
            _ => Color::DarkGrey,
        };
        table.add_row(vec![
            Cell::new(bucket_label(bucket)),
            Cell::new(format!("{}/", bucket.dir_name())),
            Cell::new(count).fg(color),
        ]);
    }
    table
}

fn bucket_label(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Pending => "pending",
        Bucket::Displaying => "displaying",
        Bucket::Done => "done",
    }
}

fn describe(image: Option<&StoredImage>) -> String {
    match image {
        Some(img) => format!(
            "{} ({} KB, {})",
            style(&img.name).cyan(),
            img.size_bytes.div_ceil(1024),
            img.created_at.format("%Y-%m-%d %H:%M:%S")
        ),
        None => format!("{}", style("none").dim()),
    }
}
