//! An in-memory [`Ledger`] for tests: ordered state, per-key history,
//! pinned transaction timestamps, and in-process service wiring so the
//! cross-ledger vote path runs without a real network.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::rc::Rc;

use ballot_ledger::error::{Error, Result};
use ballot_ledger::ledger::{Ledger, ScanPage};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Invoke entry of a wired service, driven against that service's own
/// ledger namespace.
pub type ServiceHandler = fn(&dyn Ledger, &[&str]) -> Result<Vec<u8>>;

struct MockService {
    ledger: Rc<MockLedger>,
    handler: ServiceHandler,
}

/// An ordered in-memory ledger. Single-threaded by design, like the
/// operations it backs.
pub struct MockLedger {
    state: RefCell<BTreeMap<String, Vec<u8>>>,
    history: RefCell<HashMap<String, Vec<Vec<u8>>>>,
    next_tx: Cell<u64>,
    timestamp: Cell<DateTime<Utc>>,
    services: RefCell<HashMap<String, MockService>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(BTreeMap::new()),
            history: RefCell::new(HashMap::new()),
            next_tx: Cell::new(0),
            timestamp: Cell::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            services: RefCell::new(HashMap::new()),
        }
    }

    /// Pin the transaction timestamp to noon on the given date.
    pub fn set_today(&self, date: NaiveDate) {
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        self.timestamp.set(Utc.from_utc_datetime(&noon));
    }

    /// Pin the full transaction timestamp.
    pub fn set_timestamp(&self, timestamp: DateTime<Utc>) {
        self.timestamp.set(timestamp);
    }

    /// Wire a service name to a handler over its own ledger namespace.
    pub fn register_service(&self, name: &str, ledger: Rc<MockLedger>, handler: ServiceHandler) {
        self.services
            .borrow_mut()
            .insert(name.to_string(), MockService { ledger, handler });
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for MockLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.state
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        self.history
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .push(value.to_vec());
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(self
            .state
            .borrow()
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn scan_prefix_page(&self, prefix: &str, page_size: u32, bookmark: &str) -> Result<ScanPage> {
        let lower = if bookmark.is_empty() {
            Bound::Included(prefix.to_string())
        } else {
            Bound::Excluded(bookmark.to_string())
        };

        let state = self.state.borrow();
        let mut entries = Vec::new();
        for (key, value) in state.range((lower, Bound::Unbounded)) {
            if !key.starts_with(prefix) || entries.len() as u32 == page_size {
                break;
            }
            entries.push((key.clone(), value.clone()));
        }

        let bookmark = if entries.len() as u32 == page_size {
            entries.last().map(|(key, _)| key.clone()).unwrap_or_default()
        } else {
            String::new()
        };
        Ok(ScanPage { entries, bookmark })
    }

    fn history(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        Ok(self.history.borrow().get(key).cloned().unwrap_or_default())
    }

    fn tx_id(&self) -> String {
        let id = self.next_tx.get();
        self.next_tx.set(id + 1);
        format!("tx{id:06}")
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp.get()
    }

    fn invoke_service(&self, service: &str, _channel: &str, args: &[&str]) -> Result<Vec<u8>> {
        let services = self.services.borrow();
        let wired = services
            .get(service)
            .ok_or_else(|| Error::Ledger(format!("no such service: {service}")))?;
        (wired.handler)(&*wired.ledger, args)
    }
}

/// A voting ledger wired to an in-process tally service, the way the
/// deployed pair is wired over a channel.
pub struct TestNetwork {
    pub voting: Rc<MockLedger>,
    pub tally: Rc<MockLedger>,
}

impl TestNetwork {
    pub fn new(config: &ballot_ledger::Config) -> Self {
        let voting = Rc::new(MockLedger::new());
        let tally = Rc::new(MockLedger::new());
        voting.register_service(
            config.tally_service(),
            Rc::clone(&tally),
            ballot_ledger::tally::dispatch,
        );
        Self { voting, tally }
    }

    /// Pin "today" on both ledgers.
    pub fn set_today(&self, date: NaiveDate) {
        self.voting.set_today(date);
        self.tally.set_today(date);
    }
}
