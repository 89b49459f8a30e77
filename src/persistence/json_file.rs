// src/persistence/json_file.rs
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::{from_str, to_string};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task;

use super::in_memory::{InMemoryBidRepository, ItemEntry};
use super::{BidRepository, ItemSnapshot, RepositoryError};
use crate::domain::{Auctionable, BidRecord, ItemId, NewBid};

/// One line of the journal file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum JournalEntry {
    #[serde(rename = "AuctionableAdded")]
    AuctionableAdded { auctionable: Auctionable },

    #[serde(rename = "BidPlaced")]
    BidPlaced { bid: BidRecord },
}

pub fn read_journal<P: AsRef<Path>>(path: P) -> Result<Vec<JournalEntry>, RepositoryError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(from_str(&line)?);
    }

    Ok(entries)
}

/// Where journal lines go. Implemented for [`File`]; all calls block.
pub trait JournalWriter: Send {
    /// Length of everything written so far.
    fn committed_len(&mut self) -> io::Result<u64>;

    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn sync(&mut self) -> io::Result<()>;

    /// Cuts the journal back to `len` bytes and syncs.
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl JournalWriter for File {
    fn committed_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_data()
    }
}

struct Journal {
    writer: Box<dyn JournalWriter>,
    // Set when a failed write could not be cut back off the file.
    needs_recovery: bool,
}

impl Journal {
    /// Either the whole line is on disk, or the file is as it was before.
    fn append(&mut self, entry: &JournalEntry) -> Result<(), RepositoryError> {
        if self.needs_recovery {
            return Err(RepositoryError::Unavailable(
                "journal holds an unrecovered partial write, reopen it to continue".to_string(),
            ));
        }

        let mut line = to_string(entry)?;
        line.push('\n');

        let committed = self.writer.committed_len()?;
        if let Err(err) = self
            .writer
            .append_bytes(line.as_bytes())
            .and_then(|()| self.writer.sync())
        {
            if let Err(rollback) = self.writer.truncate_to(committed) {
                error!("Could not cut journal back to {} bytes: {}", committed, rollback);
                self.needs_recovery = true;
            }
            return Err(err.into());
        }
        Ok(())
    }
}

fn check_entry(items: &HashMap<ItemId, ItemEntry>, entry: &JournalEntry) -> Result<(), RepositoryError> {
    match entry {
        JournalEntry::AuctionableAdded { auctionable } => {
            InMemoryBidRepository::check_new_auctionable(items, auctionable)
        }
        JournalEntry::BidPlaced { bid } => InMemoryBidRepository::check_append(items, &bid.item_id, bid.sequence),
    }
}

fn apply_entry(items: &mut HashMap<ItemId, ItemEntry>, entry: JournalEntry) -> Result<(), RepositoryError> {
    match entry {
        JournalEntry::AuctionableAdded { auctionable } => {
            InMemoryBidRepository::insert_auctionable(items, auctionable);
            Ok(())
        }
        JournalEntry::BidPlaced { bid } => InMemoryBidRepository::insert_bid(items, bid),
    }
}

/// Append-only JSON-lines journal, replayed into memory on open.
///
/// Writers queue on the journal; each write runs on the blocking pool and is
/// acknowledged only after the line has been synced. The in-memory index is
/// write-locked only for the insert that follows a successful sync, so reads
/// never wait on the disk. A failed write is cut back off the file and leaves
/// the index untouched.
pub struct JsonFileBidRepository {
    path: PathBuf,
    index: Arc<InMemoryBidRepository>,
    journal: Arc<Mutex<Journal>>,
}

impl JsonFileBidRepository {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let journal_path = path.clone();
        let (file, entries) = task::spawn_blocking(move || {
            let file = OpenOptions::new().create(true).append(true).open(&journal_path)?;
            let entries = read_journal(&journal_path)?;
            Ok::<_, RepositoryError>((file, entries))
        })
        .await
        .map_err(|err| RepositoryError::Unavailable(err.to_string()))??;

        info!("Replaying {} journal entries from {}", entries.len(), path.display());
        Self::with_writer(path, entries, Box::new(file))
    }

    /// Builds the index from already read `entries` and appends through `writer`.
    pub(crate) fn with_writer(
        path: PathBuf,
        entries: Vec<JournalEntry>,
        writer: Box<dyn JournalWriter>,
    ) -> Result<Self, RepositoryError> {
        let mut index = InMemoryBidRepository::new();
        for entry in entries {
            check_entry(index.items_mut(), &entry)?;
            apply_entry(index.items_mut(), entry)?;
        }

        Ok(JsonFileBidRepository {
            path,
            index: Arc::new(index),
            journal: Arc::new(Mutex::new(Journal {
                writer,
                needs_recovery: false,
            })),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The blocking task owns the journal guard until the index is updated,
    // so the next writer checks against the new state even if our caller
    // has gone away.
    async fn commit(&self, entry: JournalEntry) -> Result<(), RepositoryError> {
        let mut journal = self.journal.clone().lock_owned().await;
        let index = self.index.clone();

        task::spawn_blocking(move || {
            check_entry(&index.items().blocking_read(), &entry)?;
            journal.append(&entry)?;
            apply_entry(&mut index.items().blocking_write(), entry)
        })
        .await
        .map_err(|err| RepositoryError::Unavailable(err.to_string()))?
    }
}

#[async_trait]
impl BidRepository for JsonFileBidRepository {
    async fn add_auctionable(&self, auctionable: Auctionable) -> Result<(), RepositoryError> {
        self.commit(JournalEntry::AuctionableAdded { auctionable }).await
    }

    async fn find_auctionable(&self, item_id: &str) -> Result<Option<Auctionable>, RepositoryError> {
        self.index.find_auctionable(item_id).await
    }

    async fn list_bids(&self, item_id: &str) -> Result<Vec<BidRecord>, RepositoryError> {
        self.index.list_bids(item_id).await
    }

    async fn load_item(&self, item_id: &str) -> Result<Option<ItemSnapshot>, RepositoryError> {
        self.index.load_item(item_id).await
    }

    async fn append(&self, bid: NewBid) -> Result<BidRecord, RepositoryError> {
        let record = bid.into_record(Utc::now());
        self.commit(JournalEntry::BidPlaced { bid: record.clone() }).await?;
        debug!("Journaled bid {} on {}", record.sequence, record.item_id);
        Ok(record)
    }
}
