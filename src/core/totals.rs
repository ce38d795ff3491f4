//! Invoice-wide totals.
//!
//! The document assembler consumes an [`InvoiceTotals`] produced by a
//! [`TotalsAggregator`]. [`StandardTotals`] is the built-in aggregator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accountant::{
    ComputedLineItem, ComputedTax, checked_add, checked_sub, checked_sum, resolve_adjustment,
};
use super::error::FacturaeError;
use super::precision::{Field, PrecisionPolicy};
use super::types::{Adjustment, Invoice, ResolvedAdjustment, SchemaVersion};

/// Tax figures summed over every item sharing `(code, rate, surcharge)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub code: String,
    pub rate: Decimal,
    pub surcharge: Decimal,
    pub base: Decimal,
    pub amount: Decimal,
    pub surcharge_amount: Decimal,
}

/// Invoice-level aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of every item's gross amount.
    pub gross_amount: Decimal,
    /// `gross_amount - total_general_discounts + total_general_charges`.
    pub gross_amount_before_taxes: Decimal,
    pub general_discounts: Vec<ResolvedAdjustment>,
    pub general_charges: Vec<ResolvedAdjustment>,
    pub total_general_discounts: Decimal,
    pub total_general_charges: Decimal,
    pub taxes_outputs: Vec<TaxSummary>,
    pub taxes_withheld: Vec<TaxSummary>,
    pub total_taxes_outputs: Decimal,
    pub total_taxes_withheld: Decimal,
    /// `gross_amount_before_taxes + total_taxes_outputs - total_taxes_withheld`.
    pub invoice_amount: Decimal,
}

/// Produces the invoice-level aggregate for an export.
///
/// Implementations run synchronously; the exporter propagates their
/// errors without retrying.
pub trait TotalsAggregator {
    fn totals(
        &self,
        invoice: &Invoice,
        policy: &PrecisionPolicy,
    ) -> Result<InvoiceTotals, FacturaeError>;
}

/// Default aggregator built on the per-item accountant.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTotals;

impl TotalsAggregator for StandardTotals {
    fn totals(
        &self,
        invoice: &Invoice,
        policy: &PrecisionPolicy,
    ) -> Result<InvoiceTotals, FacturaeError> {
        let version = invoice.version;
        let items = invoice
            .items
            .iter()
            .map(|item| item.compute(version, policy))
            .collect::<Result<Vec<_>, _>>()?;

        let round = |value: Decimal, field: Field| policy.round(value, field, version);

        let gross_amount = round(
            checked_sum(items.iter().map(|i| i.gross_amount), "gross_amount")?,
            Field::TotalGrossAmount,
        )?;

        let general_discounts =
            resolve_general(&invoice.general_discounts, gross_amount, version, policy)?;
        let general_charges =
            resolve_general(&invoice.general_charges, gross_amount, version, policy)?;
        let total_general_discounts = round(
            checked_sum(general_discounts.iter().map(|d| d.amount), "general_discounts")?,
            Field::TotalGeneralDiscounts,
        )?;
        let total_general_charges = round(
            checked_sum(general_charges.iter().map(|c| c.amount), "general_charges")?,
            Field::TotalGeneralSurcharges,
        )?;
        let gross_amount_before_taxes = round(
            checked_add(
                checked_sub(gross_amount, total_general_discounts, "general_discounts")?,
                total_general_charges,
                "general_charges",
            )?,
            Field::TotalGrossAmountBeforeTaxes,
        )?;

        let taxes_outputs = summarize(&items, |i| &i.taxes_outputs)?;
        let taxes_withheld = summarize(&items, |i| &i.taxes_withheld)?;
        let total_taxes_outputs = round(
            checked_sum(items.iter().map(|i| i.total_taxes_outputs), "taxes_outputs")?,
            Field::TotalTaxOutputs,
        )?;
        let total_taxes_withheld = round(
            checked_sum(items.iter().map(|i| i.total_taxes_withheld), "taxes_withheld")?,
            Field::TotalTaxesWithheld,
        )?;
        let invoice_amount = round(
            checked_sub(
                checked_add(gross_amount_before_taxes, total_taxes_outputs, "taxes_outputs")?,
                total_taxes_withheld,
                "taxes_withheld",
            )?,
            Field::InvoiceTotal,
        )?;

        tracing::debug!(
            items = items.len(),
            %gross_amount,
            %gross_amount_before_taxes,
            %invoice_amount,
            "aggregated invoice totals"
        );

        Ok(InvoiceTotals {
            gross_amount,
            gross_amount_before_taxes,
            general_discounts,
            general_charges,
            total_general_discounts,
            total_general_charges,
            taxes_outputs,
            taxes_withheld,
            total_taxes_outputs,
            total_taxes_withheld,
            invoice_amount,
        })
    }
}

fn resolve_general(
    adjustments: &[Adjustment],
    gross_amount: Decimal,
    version: SchemaVersion,
    policy: &PrecisionPolicy,
) -> Result<Vec<ResolvedAdjustment>, FacturaeError> {
    adjustments
        .iter()
        .map(|a| resolve_adjustment(a, gross_amount, version, policy))
        .collect()
}

fn summarize<F>(items: &[ComputedLineItem], group: F) -> Result<Vec<TaxSummary>, FacturaeError>
where
    F: Fn(&ComputedLineItem) -> &Vec<ComputedTax>,
{
    let mut summaries: Vec<TaxSummary> = Vec::new();
    for tax in items.iter().flat_map(|i| group(i).iter()) {
        let existing = summaries
            .iter_mut()
            .find(|s| s.code == tax.code && s.rate == tax.rate && s.surcharge == tax.surcharge);
        match existing {
            Some(s) => {
                s.base = checked_add(s.base, tax.base, &tax.code)?;
                s.amount = checked_add(s.amount, tax.amount, &tax.code)?;
                s.surcharge_amount = checked_add(s.surcharge_amount, tax.surcharge_amount, &tax.code)?;
            }
            None => summaries.push(TaxSummary {
                code: tax.code.clone(),
                rate: tax.rate,
                surcharge: tax.surcharge,
                base: tax.base,
                amount: tax.amount,
                surcharge_amount: tax.surcharge_amount,
            }),
        }
    }
    Ok(summaries)
}
