//! Sync command implementation
//!
//! Rewrites each repository's manifest so its pinned dependencies match the
//! Dependency Registry. Per-repository failures never abort the run; they
//! land in the report alongside the successes.

use crate::core::context::FleetContext;
use crate::core::error::FleetResult;
use crate::core::registry::RepositoryEntry;
use crate::sync::{RepoSyncReport, SyncStatus, sync_repository};
use crate::ui::progress::RepoProgress;
use std::env;

/// Run the sync command
pub fn run_sync(repo: Option<String>, dry_run: bool, verbose: bool, json: bool) -> FleetResult<()> {
  let workspace_root = env::current_dir()?;
  let fleet = FleetContext::load(&workspace_root)?;

  let targets: Vec<&RepositoryEntry> = match &repo {
    Some(name) => vec![fleet.repos.find(name)?],
    None => fleet.repos.repos.iter().collect(),
  };

  let label = if dry_run { "Planning sync" } else { "Syncing" };
  let mut progress = if json || verbose {
    None
  } else {
    Some(RepoProgress::new(targets.len(), label))
  };

  let mut reports = Vec::with_capacity(targets.len());
  for entry in targets {
    let report = sync_repository(&workspace_root, entry, &fleet.deps, dry_run)?;
    if verbose && !json {
      print_report(&report, dry_run, true);
    }
    if let Some(p) = progress.as_mut() {
      p.inc();
    }
    reports.push(report);
  }
  drop(progress);

  if json {
    println!("{}", serde_json::to_string_pretty(&reports)?);
    return Ok(());
  }

  if !verbose {
    println!();
    for report in &reports {
      print_report(report, dry_run, false);
    }
  }

  let updated = reports
    .iter()
    .filter(|r| matches!(r.status, SyncStatus::Updated))
    .count();
  let rolled_back = reports
    .iter()
    .filter(|r| matches!(r.status, SyncStatus::RolledBack { .. }))
    .count();

  println!();
  if dry_run {
    println!("🔍 Dry-run: {} repositories would change", updated);
  } else if rolled_back > 0 {
    println!("⚠️  Synced {} repositories, {} rolled back", updated, rolled_back);
  } else {
    println!("✅ Synced {} repositories", updated);
  }

  Ok(())
}

fn print_report(report: &RepoSyncReport, dry_run: bool, show_skipped: bool) {
  match &report.status {
    SyncStatus::MissingCheckout => {
      println!("  ⚠️  {}: not checked out, skipped", report.repository);
    }
    SyncStatus::NoManifest => {
      println!("  ⚠️  {}: manifest missing, skipped", report.repository);
    }
    SyncStatus::Unchanged => {
      println!("  ✅ {}: up to date", report.repository);
    }
    SyncStatus::Updated => {
      let verb = if dry_run { "would update" } else { "updated" };
      println!("  📦 {}: {} {} pin(s)", report.repository, verb, report.changes.len());
      for change in &report.changes {
        println!("       {} {} -> {}", change.package, change.old, change.new);
      }
    }
    SyncStatus::RolledBack { reason } => {
      println!("  ❌ {}: rolled back ({})", report.repository, reason);
    }
  }
  if show_skipped {
    for skipped in &report.skipped {
      println!("       skipped {}: {}", skipped.package, skipped.reason);
    }
  }
}
