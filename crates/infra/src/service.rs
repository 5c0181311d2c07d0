//! Vending coordinator: the collaborator interface the presentation layer calls.
//!
//! `VendingService` composes a [`CatalogStore`] and an [`OrderLedger`] with the pure
//! catalog/sales domain. The domain decides, the service persists:
//!
//! ```text
//! confirm(Accept)
//!   ↓
//! 1. plan_commit: re-validate stock, build deducted catalog + record (no IO)
//!   ↓
//! 2. CatalogStore::save(deducted catalog)
//!   ↓
//! 3. OrderLedger::append(record)      (on failure: restore previous catalog file)
//!   ↓
//! 4. swap the in-memory catalog, mark the session committed
//! ```
//!
//! Success is only reported once both writes have completed. Any failure leaves the
//! in-memory catalog untouched and returns the session to `Populated`.

use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;

use vending_catalog::{Catalog, Item, ItemUpdate};
use vending_core::{DomainError, ErrorCategory, OrderId};
use vending_sales::{
    CheckoutSession, CommitPlan, Decision, OrderRecord, OrderSummary, Report, generate_report,
};

use crate::catalog_store::{CatalogStore, FileCatalogStore};
use crate::config::VendingConfig;
use crate::order_ledger::{FileOrderLedger, OrderLedger};
use crate::persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl ServiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::Domain(err) => err.category(),
            ServiceError::Persistence(_) => ErrorCategory::Persistence,
        }
    }
}

/// Result of answering a checkout proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Committed(OrderRecord),
    Declined,
}

/// Single-operator coordinator over the catalog and the ledger.
///
/// Mutating operations take `&mut self`; the one-active-session model means the
/// borrow checker is the only mutual exclusion the commit step needs.
#[derive(Debug)]
pub struct VendingService<C, L> {
    catalog_store: C,
    ledger: L,
    catalog: Catalog,
}

impl<C, L> VendingService<C, L>
where
    C: CatalogStore,
    L: OrderLedger,
{
    /// Load the catalog and wrap both stores.
    pub fn open(catalog_store: C, ledger: L) -> Result<Self, ServiceError> {
        let catalog = load_catalog(&catalog_store)?;
        tracing::info!(items = catalog.len(), "vending service opened");
        Ok(Self {
            catalog_store,
            ledger,
            catalog,
        })
    }

    /// Re-read the catalog store, discarding the in-memory view.
    pub fn reload_catalog(&mut self) -> Result<(), ServiceError> {
        self.catalog = load_catalog(&self.catalog_store)?;
        tracing::debug!(items = self.catalog.len(), "catalog reloaded");
        Ok(())
    }

    pub fn list_catalog(&self) -> &[Item] {
        self.catalog.items()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn find_item(&self, name: &str) -> Result<&Item, ServiceError> {
        Ok(self.catalog.find_by_name(name)?)
    }

    pub fn begin_checkout(&self) -> CheckoutSession {
        let session = CheckoutSession::new();
        tracing::debug!(session_id = %session.id(), "checkout session started");
        session
    }

    /// Add (or overwrite) a cart line after checking the item's current stock.
    pub fn add_to_cart(
        &self,
        session: &mut CheckoutSession,
        item_name: &str,
        quantity: i64,
    ) -> Result<(), ServiceError> {
        let item = self.catalog.find_by_name(item_name)?;
        session.add_to_cart(item, quantity)?;
        tracing::debug!(
            session_id = %session.id(),
            item = %item.name(),
            quantity,
            "cart line set"
        );
        Ok(())
    }

    /// Price the cart and hand back a summary awaiting [`VendingService::confirm`].
    pub fn checkout(&self, session: &mut CheckoutSession) -> Result<OrderSummary, ServiceError> {
        let summary = session.propose(&self.catalog)?;
        tracing::debug!(
            session_id = %session.id(),
            lines = summary.lines.len(),
            grand_total = %summary.grand_total,
            "checkout proposed"
        );
        Ok(summary)
    }

    /// Answer the pending proposal.
    pub fn confirm(
        &mut self,
        session: &mut CheckoutSession,
        decision: impl Into<Decision>,
    ) -> Result<CheckoutOutcome, ServiceError> {
        match decision.into() {
            Decision::Decline => {
                session.decline()?;
                tracing::debug!(session_id = %session.id(), "checkout declined");
                Ok(CheckoutOutcome::Declined)
            }
            Decision::Accept => {
                let plan = match session.plan_commit(&self.catalog, OrderId::new(), Utc::now()) {
                    Ok(plan) => plan,
                    Err(err) => {
                        session.abort_commit();
                        return Err(err.into());
                    }
                };

                if let Err(err) = self.persist(&plan) {
                    session.abort_commit();
                    return Err(err);
                }

                let CommitPlan { catalog, record } = plan;
                self.catalog = catalog;
                session.mark_committed()?;

                tracing::info!(
                    session_id = %session.id(),
                    order_id = ?record.order_id,
                    grand_total = %record.grand_total,
                    units = record.units(),
                    "order committed"
                );
                Ok(CheckoutOutcome::Committed(record))
            }
        }
    }

    pub fn get_orders(&self) -> Result<Vec<OrderRecord>, ServiceError> {
        Ok(self.ledger.read_all()?)
    }

    pub fn generate_report(&self) -> Result<Report, ServiceError> {
        let records = self.ledger.read_all()?;
        Ok(generate_report(&records))
    }

    /// Add a new item and persist the catalog.
    pub fn add_item(&mut self, item: Item) -> Result<(), ServiceError> {
        let mut updated = self.catalog.clone();
        let name = item.name().clone();
        updated.add_item(item)?;
        self.replace_catalog(updated)?;
        tracing::info!(item = %name, "catalog item added");
        Ok(())
    }

    /// Apply one administrative edit and persist the catalog.
    pub fn update_item(&mut self, name: &str, update: ItemUpdate) -> Result<Item, ServiceError> {
        let mut updated = self.catalog.clone();
        let item = updated.update_item(name, update)?.clone();
        self.replace_catalog(updated)?;
        tracing::info!(item = %name.trim(), now = %item.name(), "catalog item updated");
        Ok(item)
    }

    pub fn into_parts(self) -> (C, L) {
        (self.catalog_store, self.ledger)
    }

    fn replace_catalog(&mut self, updated: Catalog) -> Result<(), ServiceError> {
        self.catalog_store.save(updated.items())?;
        self.catalog = updated;
        Ok(())
    }

    fn persist(&self, plan: &CommitPlan) -> Result<(), ServiceError> {
        self.catalog_store.save(plan.catalog.items())?;

        if let Err(err) = self.ledger.append(&plan.record) {
            // The deducted catalog is already on disk; put the previous one back.
            match self.catalog_store.save(self.catalog.items()) {
                Ok(()) => tracing::warn!(error = %err, "ledger append failed; catalog restored"),
                Err(restore) => tracing::error!(
                    error = %err,
                    restore_error = %restore,
                    "ledger append failed and catalog restore failed"
                ),
            }
            return Err(err.into());
        }
        Ok(())
    }
}

fn load_catalog<C: CatalogStore>(store: &C) -> Result<Catalog, PersistenceError> {
    let mut seen = HashSet::new();
    let catalog = store
        .load()?
        .into_iter()
        .filter(|item| {
            let first = seen.insert(item.name().clone());
            if !first {
                tracing::warn!(item = %item.name(), "skipping duplicate catalog item");
            }
            first
        })
        .collect();
    Ok(catalog)
}

/// Wire the file-backed stores named by `config` into a service.
pub fn open_file_service(
    config: &VendingConfig,
) -> Result<VendingService<FileCatalogStore, FileOrderLedger>, ServiceError> {
    tracing::debug!(
        catalog = %config.catalog_path.display(),
        ledger = %config.ledger_path.display(),
        format = %config.ledger_format,
        "opening file-backed stores"
    );
    VendingService::open(
        FileCatalogStore::new(&config.catalog_path),
        FileOrderLedger::new(&config.ledger_path, config.ledger_format),
    )
}
