use chrono::NaiveDate;
use rentledger::application::engine::RentEngine;
use rentledger::domain::money::Balance;
use rentledger::domain::property::Property;
use rentledger::infrastructure::clock::FixedClock;
use rentledger::infrastructure::in_memory::{InMemoryLedgerStore, InMemoryPropertyDirectory};
use rust_decimal_macros::dec;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sample_property(code: &str, due_date: NaiveDate) -> Property {
    Property {
        id: format!("prop-{code}"),
        owner_id: "owner-1".into(),
        code: code.to_string(),
        due_date,
        rent_amount: Balance::new(dec!(1500)),
        security_deposit: Balance::new(dec!(5000)),
        owner_payout_id: "owner@bank".into(),
    }
}

/// Engine wired to in-memory stores and a pinned clock, with handles kept
/// for inspection and date stepping.
pub struct TestRig {
    pub engine: RentEngine,
    pub clock: FixedClock,
    pub ledgers: InMemoryLedgerStore,
}

pub async fn rig_with(property: Property, today: NaiveDate) -> TestRig {
    let ledgers = InMemoryLedgerStore::new();
    let directory = InMemoryPropertyDirectory::new();
    directory.seed(property).await;
    let clock = FixedClock::new(today);
    let engine = RentEngine::new(
        Box::new(ledgers.clone()),
        Box::new(directory),
        Box::new(clock.clone()),
    );
    TestRig {
        engine,
        clock,
        ledgers,
    }
}
