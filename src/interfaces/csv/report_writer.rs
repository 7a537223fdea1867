use std::io::Write;

use crate::domain::calculator::FineEstimate;
use crate::domain::ledger::TenantLedger;
use crate::error::Result;

/// Writes the host's stdout report.
///
/// Estimate rows are emitted as they happen; the final table lists every
/// ledger with its balance, last payment date and history counts. Balances
/// are normalized so `4600.00` prints as `4600`.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(target: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(target);
        Self { writer }
    }

    pub fn write_estimate(&mut self, tenant_id: &str, estimate: &FineEstimate) -> Result<()> {
        self.writer.write_record([
            "estimate",
            tenant_id,
            &estimate.fine.to_string(),
            &estimate.days_late.to_string(),
            &estimate.cycle_day.to_string(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_ledgers(&mut self, ledgers: Vec<TenantLedger>) -> Result<()> {
        self.writer.write_record([
            "tenant",
            "property",
            "deposit",
            "last_payment",
            "fines",
            "payments",
        ])?;
        for ledger in ledgers {
            self.writer.write_record([
                ledger.tenant_id.as_str(),
                ledger.property_id.as_str(),
                &ledger.current_deposit.to_string(),
                &ledger.last_payment_date.to_string(),
                &ledger.fine_history.len().to_string(),
                &ledger.payment_history.len().to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
