use alloy_primitives::{Address, Selector};


#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Sent,
    Received
}


/// Counters for one scanned address range.
///
/// Filters run after the scan, so a narrow filter against a dense range can
/// read far more rows than it returns; `efficiency` is how operators notice.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScanStats {
    pub address: Address,
    pub rows_seen: u64,
    pub rows_returned: u64
}


impl ScanStats {
    pub fn efficiency(&self) -> f64 {
        if self.rows_seen == 0 {
            1.0
        } else {
            self.rows_returned as f64 / self.rows_seen as f64
        }
    }
}


/// Composable, AND-combined post-scan filters for a history query.
pub struct QueryOptions<'a> {
    pub(crate) method: Option<Selector>,
    pub(crate) asset: Option<Address>,
    pub(crate) direction: Option<Direction>,
    pub(crate) stats: Option<Box<dyn FnMut(ScanStats) + 'a>>
}


impl<'a> QueryOptions<'a> {
    pub fn new() -> Self {
        Self {
            method: None,
            asset: None,
            direction: None,
            stats: None
        }
    }

    /// Keep only native-transaction records with this method selector.
    pub fn method(mut self, selector: Selector) -> Self {
        self.method = Some(selector);
        self
    }

    /// Keep only ERC-20 records for this token contract.
    pub fn asset(mut self, token: Address) -> Self {
        self.asset = Some(token);
        self
    }

    /// Keep only records where the queried address is the sender.
    pub fn only_sent(mut self) -> Self {
        self.direction = Some(Direction::Sent);
        self
    }

    /// Keep only records where the queried address is the recipient.
    pub fn only_received(mut self) -> Self {
        self.direction = Some(Direction::Received);
        self
    }

    /// Invoke `callback` with the counters of every scanned address range.
    pub fn stats(mut self, callback: impl FnMut(ScanStats) + 'a) -> Self {
        self.stats = Some(Box::new(callback));
        self
    }
}


impl<'a> Default for QueryOptions<'a> {
    fn default() -> Self {
        Self::new()
    }
}
