use chrono::NaiveDate;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rentledger::application::engine::RentEngine;
use rentledger::domain::money::Balance;
use rentledger::domain::ports::{
    ClockBox, LedgerStoreBox, PropertyDirectoryBox, PropertyRegistrar, PropertyRegistrarBox,
};
use rentledger::domain::property::{self, Property};
use rentledger::error::LedgerError;
use rentledger::infrastructure::clock::{FixedClock, SystemClock};
use rentledger::infrastructure::in_memory::{InMemoryLedgerStore, InMemoryPropertyDirectory};
#[cfg(feature = "storage-rocksdb")]
use rentledger::infrastructure::rocksdb::RocksDBStore;
use rentledger::interfaces::csv::operation_reader::{Operation, OperationKind, OperationReader};
use rentledger::interfaces::csv::report_writer::ReportWriter;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Evaluate every operation as of this calendar date instead of today.
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let clock: ClockBox = match cli.as_of {
        Some(date) => Box::new(FixedClock::new(date)),
        None => Box::new(SystemClock),
    };

    let (ledgers, properties, registrar): (LedgerStoreBox, PropertyDirectoryBox, PropertyRegistrarBox) =
        match cli.db_path {
            #[cfg(feature = "storage-rocksdb")]
            Some(db_path) => {
                // Persistent storage: one RocksDB instance serves both ports.
                let store = RocksDBStore::open(db_path).into_diagnostic()?;
                (
                    Box::new(store.clone()),
                    Box::new(store.clone()),
                    Box::new(store),
                )
            }
            #[cfg(not(feature = "storage-rocksdb"))]
            Some(_) => {
                return Err(miette::miette!(
                    "this binary was built without the storage-rocksdb feature"
                ));
            }
            None => {
                let directory = InMemoryPropertyDirectory::new();
                (
                    Box::new(InMemoryLedgerStore::new()),
                    Box::new(directory.clone()),
                    Box::new(directory),
                )
            }
        };

    let engine = RentEngine::new(ledgers, properties, clock);

    // Replay operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    let stdout = io::stdout();
    let mut report = ReportWriter::new(stdout.lock());

    for op_result in reader.operations() {
        match op_result {
            Ok(op) => {
                if let Err(e) = apply_operation(&engine, registrar.as_ref(), &mut report, op).await
                {
                    eprintln!("Error processing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final ledger state
    let ledgers = engine.into_ledgers().await.into_diagnostic()?;
    report.write_ledgers(ledgers).into_diagnostic()?;

    Ok(())
}

async fn apply_operation<W: Write>(
    engine: &RentEngine,
    registrar: &dyn PropertyRegistrar,
    report: &mut ReportWriter<W>,
    op: Operation,
) -> rentledger::error::Result<()> {
    match op.op {
        OperationKind::Register => {
            let due_date = op.due_date.ok_or_else(|| {
                LedgerError::InvalidOperation("register requires a due_date".into())
            })?;
            let rent = op.rent.ok_or_else(|| {
                LedgerError::InvalidOperation("register requires a rent amount".into())
            })?;
            let deposit = op.deposit.ok_or_else(|| {
                LedgerError::InvalidOperation("register requires a security deposit".into())
            })?;

            registrar
                .register(Property {
                    id: op.id,
                    owner_id: op.owner.unwrap_or_default(),
                    code: op.code.unwrap_or_else(property::generate_code),
                    due_date,
                    rent_amount: Balance::new(rent),
                    security_deposit: Balance::new(deposit),
                    owner_payout_id: op.payout.unwrap_or_default(),
                })
                .await
        }
        OperationKind::Link => {
            let code = op
                .code
                .ok_or_else(|| LedgerError::InvalidOperation("link requires a code".into()))?;
            engine.link(&op.id, &code).await?;
            Ok(())
        }
        OperationKind::Pay => {
            engine.process_payment(&op.id).await?;
            Ok(())
        }
        OperationKind::Estimate => {
            let estimate = engine.estimate_fine(&op.id).await?;
            report.write_estimate(&op.id, &estimate)
        }
        OperationKind::Unlink => engine.unlink(&op.id).await,
    }
}
