//! `feasai reclassify`: re-runs the classifier over every stored search and
//! rewrites categories that changed.

use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::classifier::{classify, Category};
use crate::models::search::SearchRow;
use crate::searches::store;

const EXCERPT_CHARS: usize = 100;
const UNKNOWN_OWNER: &str = "<unknown>";

#[derive(Args, Debug, Clone, Default)]
pub struct ReclassifyArgs {
    /// List pending changes without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Apply changes without asking for confirmation
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    pub id: Uuid,
    pub owner: String,
    pub excerpt: String,
    pub current: String,
    pub proposed: Category,
}

/// Rows whose stored category differs from what the classifier says now.
/// `owners` maps user ids to usernames; rows with no match show `<unknown>`.
pub fn plan_changes(rows: &[SearchRow], owners: &HashMap<Uuid, String>) -> Vec<PendingChange> {
    rows.iter()
        .filter_map(|row| {
            let proposed = classify(&row.problem_text);
            (Category::from_label(&row.category) != Some(proposed)).then(|| PendingChange {
                id: row.id,
                owner: owners
                    .get(&row.user_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_OWNER.to_string()),
                excerpt: excerpt(&row.problem_text),
                current: row.category.clone(),
                proposed,
            })
        })
        .collect()
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_CHARS {
        let head: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

async fn ask_confirmation() -> Result<bool> {
    print!("\nApply these changes? (y/N): ");
    std::io::stdout().flush()?;
    let answer = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await
    .context("confirmation prompt task failed")??;
    Ok(confirmed(&answer))
}

pub async fn run(pool: &PgPool, args: &ReclassifyArgs) -> Result<usize> {
    if args.dry_run {
        println!("Running in dry-run mode. No changes will be applied.");
    }

    let rows = store::list_all_searches(pool).await?;
    println!("Found {} searches to reclassify.", rows.len());

    let owners: HashMap<Uuid, String> = store::list_usernames(pool).await?.into_iter().collect();
    let changes = plan_changes(&rows, &owners);
    if changes.is_empty() {
        println!("No pending changes. Every category is up to date.");
        return Ok(0);
    }

    println!("{} searches have outdated categories.", changes.len());
    for change in &changes {
        println!(
            "ID: {} | User: {} | Current: {} -> New: {}\nText: {}\n",
            change.id, change.owner, change.current, change.proposed, change.excerpt
        );
    }

    if args.dry_run {
        println!("Dry run complete. {} changes pending.", changes.len());
        return Ok(0);
    }

    if !args.force && !ask_confirmation().await? {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for change in &changes {
        store::update_category(&mut *tx, change.id, change.proposed.label()).await?;
        info!(
            "Search {} reclassified: {} -> {}",
            change.id, change.current, change.proposed
        );
    }
    tx.commit().await?;

    println!("Reclassification complete. {} searches updated.", changes.len());
    Ok(changes.len())
}
