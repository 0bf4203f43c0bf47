use crate::options::{Direction, QueryOptions, ScanStats};
use crate::page::PageToken;
use alloy_primitives::Address;
use anyhow::Context;
use axh_data::{Erc20Record, TxRecord, COLUMN_ERC20, COLUMN_TX};
use axh_primitives::{BlockNumber, ChainId};
use axh_storage::{ItemStore, KeySpace, ScanRange, CF_DATA};
use std::sync::Arc;
use tracing::debug;


#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Record {
    Tx(TxRecord),
    Erc20(Erc20Record)
}


impl Record {
    pub fn block_number(&self) -> BlockNumber {
        match self {
            Record::Tx(tx) => tx.block_number,
            Record::Erc20(transfer) => transfer.block_number
        }
    }

    pub fn from(&self) -> Address {
        match self {
            Record::Tx(tx) => tx.from,
            Record::Erc20(transfer) => transfer.from
        }
    }

    pub fn to(&self) -> Address {
        match self {
            Record::Tx(tx) => tx.to,
            Record::Erc20(transfer) => transfer.to
        }
    }
}


/// One history row: the queried address that produced it plus the record.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HistoryRecord {
    pub address: Address,
    pub record: Record
}


#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HistoryPage {
    pub records: Vec<HistoryRecord>,
    pub next_page_token: Option<PageToken>
}


/// Reads per-address history newest-first via address-prefixed range scans.
/// One instance serves one chain.
pub struct HistoryQuery {
    store: Arc<dyn ItemStore>,
    key_space: KeySpace,
    chain: ChainId
}


impl HistoryQuery {
    pub fn new(store: Arc<dyn ItemStore>, key_space: KeySpace, chain: ChainId) -> Self {
        Self {
            store,
            key_space,
            chain
        }
    }

    /// Scans each address range in turn, applying the options as a post-scan
    /// predicate and stopping once `limit` matching records are accumulated.
    /// Records arrive in strictly descending block order within each address
    /// range; a returned token resumes the same logical scan.
    pub fn get(
        &self,
        addresses: &[Address],
        page_token: Option<&PageToken>,
        limit: usize,
        mut options: QueryOptions<'_>
    ) -> anyhow::Result<HistoryPage>
    {
        let mut records = Vec::new();
        if limit == 0 {
            return Ok(HistoryPage {
                records,
                next_page_token: None
            })
        }

        let start_pos = page_token.map_or(0, |token| token.address_pos as usize);

        for (pos, address) in addresses.iter().enumerate().skip(start_pos) {
            let mut range = ScanRange::prefix(self.key_space.history_prefix(self.chain, address));
            if pos == start_pos {
                if let Some(token) = page_token {
                    range = range.after(token.last_row.clone());
                }
            }

            let mut stats = ScanStats {
                address: *address,
                rows_seen: 0,
                rows_returned: 0
            };

            for cell in self.store.scan(CF_DATA, range)? {
                let cell = cell?;
                stats.rows_seen += 1;

                let record = match cell.column.as_str() {
                    COLUMN_TX => Record::Tx(TxRecord::decode(&cell.value).with_context(|| {
                        format!("failed to decode transaction row {}", cell.row)
                    })?),
                    COLUMN_ERC20 => Record::Erc20(Erc20Record::decode(&cell.value).with_context(|| {
                        format!("failed to decode transfer row {}", cell.row)
                    })?),
                    _ => {
                        debug!(row = %cell.row, column = %cell.column, "skipping unknown history column");
                        continue
                    }
                };

                if !matches(&options, address, &record) {
                    continue
                }
                stats.rows_returned += 1;
                records.push(HistoryRecord {
                    address: *address,
                    record
                });

                if records.len() == limit {
                    emit_stats(&mut options, stats);
                    return Ok(HistoryPage {
                        records,
                        next_page_token: Some(PageToken {
                            address_pos: pos as u32,
                            last_row: cell.row
                        })
                    })
                }
            }

            emit_stats(&mut options, stats);
        }

        Ok(HistoryPage {
            records,
            next_page_token: None
        })
    }
}


fn emit_stats(options: &mut QueryOptions<'_>, stats: ScanStats) {
    if stats.rows_seen > stats.rows_returned {
        debug!(
            address = %stats.address,
            rows_seen = stats.rows_seen,
            rows_returned = stats.rows_returned,
            "history scan read more rows than it returned"
        );
    }
    if let Some(callback) = options.stats.as_mut() {
        callback(stats)
    }
}


fn matches(options: &QueryOptions<'_>, address: &Address, record: &Record) -> bool {
    if let Some(selector) = options.method {
        match record {
            Record::Tx(tx) if tx.method == Some(selector) => {},
            _ => return false
        }
    }

    if let Some(token) = options.asset {
        match record {
            Record::Erc20(transfer) if transfer.token_address == token => {},
            _ => return false
        }
    }

    match options.direction {
        Some(Direction::Sent) => record.from() == *address,
        Some(Direction::Received) => record.to() == *address,
        None => true
    }
}
