//! Per-line tax, discount and charge accounting.
//!
//! Amounts are rounded progressively: each intermediate value is rounded
//! to its field precision before it feeds the next step. This reproduces
//! the cent-level results official validators expect, drift included.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FacturaeError;
use super::item::{ItemTax, LineItem};
use super::precision::{Field, PrecisionPolicy};
use super::types::{Adjustment, ResolvedAdjustment, SchemaVersion};

/// A resolved tax entry of a computed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedTax {
    pub code: String,
    pub base: Decimal,
    pub rate: Decimal,
    pub surcharge: Decimal,
    pub amount: Decimal,
    pub surcharge_amount: Decimal,
}

/// Fully computed, rounded figures of one line item.
///
/// Derived on demand and never stored: recompute after any change to the
/// item or when switching schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedLineItem {
    pub quantity: Decimal,
    pub unit_price_without_tax: Decimal,
    pub total_amount_without_tax: Decimal,
    pub discounts: Vec<ResolvedAdjustment>,
    pub charges: Vec<ResolvedAdjustment>,
    pub gross_amount: Decimal,
    pub taxes_outputs: Vec<ComputedTax>,
    pub taxes_withheld: Vec<ComputedTax>,
    pub total_taxes_outputs: Decimal,
    pub total_taxes_withheld: Decimal,
}

impl LineItem {
    /// Compute this line under `version`. See [`compute`].
    pub fn compute(
        &self,
        version: SchemaVersion,
        policy: &PrecisionPolicy,
    ) -> Result<ComputedLineItem, FacturaeError> {
        compute(self, version, policy)
    }
}

/// Compute the rounded figures of `item` under `version`.
///
/// Pure and deterministic; the assembler calls it several times per
/// export and every call yields the same value.
pub fn compute(
    item: &LineItem,
    version: SchemaVersion,
    policy: &PrecisionPolicy,
) -> Result<ComputedLineItem, FacturaeError> {
    let round = |value: Decimal, field: Field| policy.round(value, field, version);

    let quantity = round(item.quantity, Field::ItemQuantity)?;
    let unit_price_without_tax = round(item.unit_price_without_tax, Field::ItemUnitPriceWithoutTax)?;

    // The rounded quantity is only what gets rendered.
    let mut total_amount_without_tax = round(
        checked_mul(item.quantity, unit_price_without_tax, "quantity")?,
        Field::ItemTotalCost,
    )?;
    if policy.total_cost_follows_taxable_base(version) {
        total_amount_without_tax = round(total_amount_without_tax, Field::TaxableBase)?;
    }

    // Discounts subtract, then charges add, each in declaration order.
    let mut gross_amount = total_amount_without_tax;
    let mut discounts = Vec::with_capacity(item.discounts.len());
    for adjustment in &item.discounts {
        let resolved = resolve_adjustment(adjustment, total_amount_without_tax, version, policy)?;
        gross_amount = checked_sub(gross_amount, resolved.amount, "discounts")?;
        discounts.push(resolved);
    }
    let mut charges = Vec::with_capacity(item.charges.len());
    for adjustment in &item.charges {
        let resolved = resolve_adjustment(adjustment, total_amount_without_tax, version, policy)?;
        gross_amount = checked_add(gross_amount, resolved.amount, "charges")?;
        charges.push(resolved);
    }
    let gross_amount = round(gross_amount, Field::ItemGrossAmount)?;

    let taxes_outputs = compute_taxes(&item.taxes_outputs, gross_amount, version, policy)?;
    let taxes_withheld = compute_taxes(&item.taxes_withheld, gross_amount, version, policy)?;
    let total_taxes_outputs = round(
        group_total(&taxes_outputs, "taxes_outputs")?,
        Field::TotalTaxOutputs,
    )?;
    let total_taxes_withheld = round(
        group_total(&taxes_withheld, "taxes_withheld")?,
        Field::TotalTaxesWithheld,
    )?;

    let computed = ComputedLineItem {
        quantity,
        unit_price_without_tax,
        total_amount_without_tax,
        discounts,
        charges,
        gross_amount,
        taxes_outputs,
        taxes_withheld,
        total_taxes_outputs,
        total_taxes_withheld,
    };
    tracing::trace!(
        item = %item.name,
        gross_amount = %computed.gross_amount,
        total_taxes_outputs = %computed.total_taxes_outputs,
        total_taxes_withheld = %computed.total_taxes_withheld,
        "computed line item"
    );
    Ok(computed)
}

/// Resolve a discount/charge against the line's total cost.
pub(crate) fn resolve_adjustment(
    adjustment: &Adjustment,
    base: Decimal,
    version: SchemaVersion,
    policy: &PrecisionPolicy,
) -> Result<ResolvedAdjustment, FacturaeError> {
    let (rate, amount) = match adjustment {
        Adjustment::Rate { rate, .. } => {
            let rate = policy.round(*rate, Field::DiscountChargeRate, version)?;
            (Some(rate), percent_of(base, rate, adjustment.reason())?)
        }
        Adjustment::Flat { amount, .. } => (None, *amount),
    };
    Ok(ResolvedAdjustment {
        reason: adjustment.reason().to_string(),
        rate,
        amount: policy.round(amount, Field::DiscountChargeAmount, version)?,
    })
}

fn compute_taxes(
    taxes: &[ItemTax],
    gross_amount: Decimal,
    version: SchemaVersion,
    policy: &PrecisionPolicy,
) -> Result<Vec<ComputedTax>, FacturaeError> {
    taxes
        .iter()
        .map(|tax| {
            let rate = policy.round(tax.rate, Field::TaxRate, version)?;
            let surcharge = policy.round(tax.surcharge, Field::EquivalenceSurcharge, version)?;
            let base = policy.round(gross_amount, Field::TaxableBase, version)?;
            let amount = policy.round(percent_of(base, rate, &tax.code)?, Field::TaxAmount, version)?;
            let surcharge_amount = policy.round(
                percent_of(base, surcharge, &tax.code)?,
                Field::EquivalenceSurchargeAmount,
                version,
            )?;
            Ok(ComputedTax {
                code: tax.code.clone(),
                base,
                rate,
                surcharge,
                amount,
                surcharge_amount,
            })
        })
        .collect()
}

fn out_of_range(what: &str) -> FacturaeError {
    FacturaeError::Validation(format!("{what}: amount out of range"))
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, FacturaeError> {
    a.checked_add(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn checked_sub(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, FacturaeError> {
    a.checked_sub(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, FacturaeError> {
    a.checked_mul(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn checked_div(a: Decimal, b: Decimal, what: &str) -> Result<Decimal, FacturaeError> {
    a.checked_div(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn checked_sum<I>(values: I, what: &str) -> Result<Decimal, FacturaeError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| checked_add(acc, value, what))
}

/// `Σ(amount + surcharge_amount)` over a tax group.
fn group_total(taxes: &[ComputedTax], what: &str) -> Result<Decimal, FacturaeError> {
    taxes.iter().try_fold(Decimal::ZERO, |acc, tax| {
        checked_add(checked_add(acc, tax.amount, what)?, tax.surcharge_amount, what)
    })
}

/// `base × percent / 100`.
fn percent_of(base: Decimal, percent: Decimal, what: &str) -> Result<Decimal, FacturaeError> {
    checked_div(checked_mul(base, percent, what)?, Decimal::ONE_HUNDRED, what)
}
