// Wallet & billing sidebar: wallet, ledger and bills for the selected user

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::BillingApi;
use crate::cost::format_money;
use crate::error::{ActionError, ApiError, PolicyError};
use crate::models::{
    Bill, ComputeBillOutcome, ComputeBillRequest, CreditRequest, Transaction, Wallet,
};
use crate::shell::{Loaded, Shell, UserContext};
use crate::wallet::WalletProvisioner;

#[derive(Debug, Clone, Serialize)]
pub struct SidebarView {
    pub user_id: String,
    pub generation: u64,
    /// Refresh counter value this view was loaded at.
    pub refresh: u64,
    pub wallet: Option<Wallet>,
    pub balance_display: Option<String>,
    pub wallet_provisioned: bool,
    /// Newest first.
    pub transactions: Vec<Transaction>,
    /// Newest period first.
    pub bills: Vec<Bill>,
    /// Wallet failure other than "not found".
    pub error: Option<String>,
}

/// Outcome of an on-demand bill run or retry, with the reloaded sidebar.
#[derive(Debug, Clone)]
pub struct BillRun<T> {
    pub result: T,
    pub sidebar: Loaded<SidebarView>,
}

pub struct Sidebar {
    api: Arc<BillingApi>,
    provisioner: WalletProvisioner,
    shell: Arc<Shell>,
}

impl Sidebar {
    pub fn new(api: Arc<BillingApi>, provisioner: WalletProvisioner, shell: Arc<Shell>) -> Self {
        Self {
            api,
            provisioner,
            shell,
        }
    }

    pub async fn load(&self, ctx: &UserContext) -> Loaded<SidebarView> {
        let refresh = self.shell.refresh().value();
        let user_id = ctx.user_id.as_str();
        let (wallet, transactions, bills) = futures_util::future::join3(
            self.provisioner.get_or_provision(user_id),
            self.api.list_transactions(user_id),
            self.api.list_bills(user_id),
        )
        .await;

        let (wallet, provisioned, error) = match wallet {
            Ok(lookup) => (Some(lookup.wallet), lookup.provisioned, None),
            Err(e) => {
                tracing::warn!(error = %e, operation = "get_wallet", user_id, "wallet unavailable");
                (None, false, Some(e.user_message()))
            }
        };
        // The ledger was requested before the wallet existed; read it again.
        let transactions = if provisioned {
            self.api.list_transactions(user_id).await
        } else {
            transactions
        };

        let mut transactions = or_empty(transactions, "list_transactions", user_id);
        transactions.reverse();
        let mut bills = or_empty(bills, "list_bills", user_id);
        bills.sort_by(|a, b| b.period_end.cmp(&a.period_end));

        let view = SidebarView {
            user_id: ctx.user_id.clone(),
            generation: ctx.generation,
            refresh,
            balance_display: wallet
                .as_ref()
                .map(|w| format_money(w.balance, &w.currency)),
            wallet,
            wallet_provisioned: provisioned,
            transactions,
            bills,
            error,
        };
        self.shell.settle(ctx, view).await
    }

    pub async fn add_credit(
        &self,
        ctx: &UserContext,
        amount: Decimal,
        reason: &str,
    ) -> Result<Loaded<SidebarView>, ActionError> {
        if amount <= Decimal::ZERO {
            return Err(PolicyError::InvalidInput("credit amount must be positive".into()).into());
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(PolicyError::InvalidInput("credit needs a reason".into()).into());
        }
        let body = CreditRequest {
            amount,
            reason: reason.to_string(),
        };
        self.mutate(ctx, "add_credit", self.api.add_credit(&ctx.user_id, &body))
            .await?;
        Ok(self.load(ctx).await)
    }

    /// Ask the billing API to bill usage up to `period_end` (now when `None`).
    pub async fn compute_bill(
        &self,
        ctx: &UserContext,
        period_end: Option<DateTime<Utc>>,
    ) -> Result<BillRun<ComputeBillOutcome>, ActionError> {
        let body = ComputeBillRequest {
            user_id: ctx.user_id.clone(),
            period_end,
        };
        let result = self
            .mutate(ctx, "compute_bill", self.api.compute_bill(&body))
            .await?;
        if let ComputeBillOutcome::NoUsage { message, .. } = &result {
            tracing::info!(user_id = %ctx.user_id, %message, "nothing to bill");
        }
        Ok(BillRun {
            result,
            sidebar: self.load(ctx).await,
        })
    }

    pub async fn retry_bill(
        &self,
        ctx: &UserContext,
        bill_id: &str,
    ) -> Result<BillRun<Bill>, ActionError> {
        let result = self
            .mutate(ctx, "retry_bill", self.api.retry_bill(bill_id))
            .await?;
        Ok(BillRun {
            result,
            sidebar: self.load(ctx).await,
        })
    }

    async fn mutate<T>(
        &self,
        ctx: &UserContext,
        operation: &str,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ActionError> {
        match call.await {
            Ok(value) => {
                let counter = self.shell.refresh().bump(&ctx.user_id);
                tracing::info!(operation, user_id = %ctx.user_id, counter, "sidebar mutation applied");
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, operation, user_id = %ctx.user_id, "sidebar mutation rejected");
                Err(e.into())
            }
        }
    }
}

fn or_empty<T>(result: Result<Vec<T>, ApiError>, operation: &str, user_id: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, operation, user_id, "read failed, showing empty list");
        Vec::new()
    })
}
