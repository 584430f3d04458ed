//! Batch driver: resolve every item against one store and hand results to a sink.
//!
//! Items are independent, so workers share the store without locks. One
//! item's failure never aborts the others unless `fail_fast` is set.

use crate::error::ErrorReport;
use crate::resolve::{ItemResolver, Settings};
use crate::sink::{Sink, SinkParams};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Worker threads (1 resolves inline)
    pub jobs: usize,
    /// Stop issuing new items after the first failure
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            fail_fast: false,
        }
    }
}

/// What happened to one item.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Resolved {
        db: String,
        /// Redacted binding descriptor
        target: Value,
        governed_by: PathBuf,
        table: String,
        settings: Settings,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: ErrorReport,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemEntry {
    pub item: PathBuf,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub directories: usize,
    pub entries: Vec<ItemEntry>,
}

impl BatchReport {
    pub fn resolved_count(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Resolved { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Resolve one item and pass it to the sink.
fn process(resolver: &ItemResolver<'_>, item: &Path, sink: &dyn Sink) -> ItemEntry {
    let outcome = match resolver.resolve(item) {
        Err(e) => {
            warn!("{}", e);
            ItemOutcome::Failed {
                error: ErrorReport::from(&e),
            }
        }
        Ok(resolved) => match SinkParams::from_settings(&resolved.settings) {
            None => {
                debug!("Skipping {}: no table name", resolved.item.display());
                ItemOutcome::Skipped {
                    reason: "no table name in settings".to_string(),
                }
            }
            Some(params) => match sink.write(&resolved, &params) {
                Err(e) => {
                    warn!("Sink failed for {}: {:#}", resolved.item.display(), e);
                    ItemOutcome::Failed {
                        error: ErrorReport::sink(&e),
                    }
                }
                Ok(()) => ItemOutcome::Resolved {
                    db: resolved.binding_name.clone(),
                    target: resolved.binding.redacted(),
                    governed_by: resolved.governed_by.clone(),
                    table: params.table,
                    settings: resolved.settings,
                },
            },
        },
    };

    ItemEntry {
        item: resolver.store().relative(item),
        outcome,
    }
}

fn is_failure(entry: &ItemEntry) -> bool {
    matches!(entry.outcome, ItemOutcome::Failed { .. })
}

/// Resolve `items` and write each to `sink`. Entries come back in input order.
pub fn run_batch(
    resolver: &ItemResolver<'_>,
    items: &[PathBuf],
    sink: &dyn Sink,
    options: BatchOptions,
) -> BatchReport {
    let jobs = options.jobs.clamp(1, items.len().max(1));
    let stop = AtomicBool::new(false);

    let mut indexed: Vec<(usize, ItemEntry)> = if jobs == 1 {
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let entry = process(resolver, item, sink);
            let failed = is_failure(&entry);
            out.push((index, entry));
            if failed && options.fail_fast {
                break;
            }
        }
        out
    } else {
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();

        std::thread::scope(|scope| {
            for _ in 0..jobs {
                let tx = tx.clone();
                let (next, stop) = (&next, &stop);
                scope.spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(index) else {
                            break;
                        };
                        let entry = process(resolver, item, sink);
                        if is_failure(&entry) && options.fail_fast {
                            stop.store(true, Ordering::Relaxed);
                        }
                        if tx.send((index, entry)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tx);
        rx.into_iter().collect()
    };

    indexed.sort_by_key(|(index, _)| *index);

    BatchReport {
        root: resolver.store().root().to_path_buf(),
        directories: resolver.store().len(),
        entries: indexed.into_iter().map(|(_, entry)| entry).collect(),
    }
}
