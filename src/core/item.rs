//! Invoice line items and their construction-time tax reconciliation.
//!
//! A [`LineItem`] is only ever created through [`LineItem::from_input`]
//! (directly, via [`LineItemBuilder`](super::LineItemBuilder), from a
//! JSON document via [`LineItemInput::from_json`], or when deserializing,
//! which goes through [`LineItemInput`] with the default catalog). Construction normalizes
//! the tax entries into output/withheld groups and, when only a
//! tax-inclusive unit price is given, derives the tax-exclusive price and
//! pre-divides tax-inclusive flat discounts/charges by the same factor.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accountant::{checked_add, checked_div, checked_sub};
use super::error::{FacturaeError, ValidationError};
use super::taxes::WithholdingCatalog;
use super::types::{Adjustment, Period};
use super::units::UNIT_DEFAULT;

/// A tax entry on a line item: type code, rate and equivalence surcharge
/// (both in percent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTax {
    pub code: String,
    pub rate: Decimal,
    pub surcharge: Decimal,
}

/// Optional reference fields rendered at the start of `<InvoiceLine>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReferences {
    pub issuer_contract_reference: Option<String>,
    pub issuer_contract_date: Option<NaiveDate>,
    pub issuer_transaction_reference: Option<String>,
    pub issuer_transaction_date: Option<NaiveDate>,
    pub receiver_contract_reference: Option<String>,
    pub receiver_contract_date: Option<NaiveDate>,
    pub receiver_transaction_reference: Option<String>,
    pub receiver_transaction_date: Option<NaiveDate>,
    pub file_reference: Option<String>,
    pub file_date: Option<NaiveDate>,
    pub sequence_number: Option<String>,
}

/// A normalized invoice line.
///
/// Serializes as a [`LineItemInput`] with a tax-exclusive price, so the
/// output deserializes back into an equal item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LineItemInput", into = "LineItemInput")]
pub struct LineItem {
    pub(crate) article_code: Option<String>,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) quantity: Decimal,
    pub(crate) unit_of_measure: String,
    pub(crate) unit_price: Option<Decimal>,
    pub(crate) unit_price_without_tax: Decimal,
    pub(crate) taxes_percent: Decimal,
    pub(crate) discounts: Vec<Adjustment>,
    pub(crate) charges: Vec<Adjustment>,
    pub(crate) taxes_outputs: Vec<ItemTax>,
    pub(crate) taxes_withheld: Vec<ItemTax>,
    pub(crate) references: ItemReferences,
    pub(crate) period_start: Option<NaiveDate>,
    pub(crate) period_end: Option<NaiveDate>,
}

impl LineItem {
    pub fn article_code(&self) -> Option<&str> {
        self.article_code.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_of_measure(&self) -> &str {
        &self.unit_of_measure
    }

    /// Tax-inclusive unit price, if the item was given one.
    pub fn unit_price(&self) -> Option<Decimal> {
        self.unit_price
    }

    /// Tax-exclusive unit price, unrounded.
    pub fn unit_price_without_tax(&self) -> Decimal {
        self.unit_price_without_tax
    }

    /// Discounts in declaration order. Flat amounts are already tax-exclusive.
    pub fn discounts(&self) -> &[Adjustment] {
        &self.discounts
    }

    /// Charges in declaration order. Flat amounts are already tax-exclusive.
    pub fn charges(&self) -> &[Adjustment] {
        &self.charges
    }

    pub fn taxes_outputs(&self) -> &[ItemTax] {
        &self.taxes_outputs
    }

    pub fn taxes_withheld(&self) -> &[ItemTax] {
        &self.taxes_withheld
    }

    pub fn references(&self) -> &ItemReferences {
        &self.references
    }

    /// Line period, only when both ends are set.
    pub fn period(&self) -> Option<Period> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some(Period { start, end }),
            _ => None,
        }
    }

    /// `1 + Σ(output rate + surcharge)/100 − Σ(withheld rate + surcharge)/100`.
    pub fn taxes_percent(&self) -> Decimal {
        self.taxes_percent
    }

    /// Validate and normalize caller input into a line item.
    pub fn from_input(
        input: LineItemInput,
        catalog: &WithholdingCatalog,
    ) -> Result<Self, FacturaeError> {
        let mut errors = Vec::new();

        let name = input.name.unwrap_or_default();
        if name.trim().is_empty() {
            errors.push(ValidationError::new("name", "item name must not be empty"));
        }

        let mut taxes_outputs = Vec::new();
        let mut taxes_withheld = Vec::new();
        for (i, tax) in input.taxes.into_iter().enumerate() {
            let field = format!("taxes[{i}]");
            let withheld = tax.is_withheld.unwrap_or_else(|| catalog.is_withheld(&tax.code));
            let group = if withheld {
                &mut taxes_withheld
            } else {
                &mut taxes_outputs
            };
            normalize_tax(tax, &field, group, &mut errors);
        }
        for (i, tax) in input.taxes_outputs.into_iter().enumerate() {
            let field = format!("taxes_outputs[{i}]");
            if tax.is_withheld == Some(true) {
                errors.push(ValidationError::new(field, "output tax marked as withheld"));
                continue;
            }
            normalize_tax(tax, &field, &mut taxes_outputs, &mut errors);
        }
        for (i, tax) in input.taxes_withheld.into_iter().enumerate() {
            let field = format!("taxes_withheld[{i}]");
            if tax.is_withheld == Some(false) {
                errors.push(ValidationError::new(field, "withheld tax marked as output"));
                continue;
            }
            normalize_tax(tax, &field, &mut taxes_withheld, &mut errors);
        }

        let mut discounts = resolve_adjustments(input.discounts, "discounts", &mut errors);
        let mut charges = resolve_adjustments(input.charges, "charges", &mut errors);

        if input.unit_price.is_none() && input.unit_price_without_tax.is_none() {
            errors.push(ValidationError::new(
                "unit_price",
                "either a tax-inclusive or a tax-exclusive unit price is required",
            ));
        }

        if !errors.is_empty() {
            return Err(FacturaeError::from_validation(&errors));
        }

        let percent = taxes_percent(&taxes_outputs, &taxes_withheld)?;
        let unit_price_without_tax = match input.unit_price_without_tax {
            Some(without_tax) => without_tax,
            None => {
                if percent.is_zero() {
                    return Err(FacturaeError::Validation(
                        "taxes: withheld taxes cancel the whole price, cannot derive a tax-exclusive price"
                            .into(),
                    ));
                }
                for (adjustment, has_taxes) in discounts.iter_mut().chain(charges.iter_mut()) {
                    if let (Adjustment::Flat { reason, amount }, true) = (adjustment, *has_taxes) {
                        *amount = checked_div(*amount, percent, reason)?;
                    }
                }
                checked_div(input.unit_price.unwrap_or_default(), percent, "unit_price")?
            }
        };

        Ok(Self {
            article_code: input.article_code,
            name,
            description: input.description,
            quantity: input.quantity.unwrap_or(Decimal::ONE),
            unit_of_measure: input
                .unit_of_measure
                .unwrap_or_else(|| UNIT_DEFAULT.to_string()),
            unit_price: input.unit_price,
            unit_price_without_tax,
            taxes_percent: percent,
            discounts: discounts.into_iter().map(|(a, _)| a).collect(),
            charges: charges.into_iter().map(|(a, _)| a).collect(),
            taxes_outputs,
            taxes_withheld,
            references: ItemReferences {
                issuer_contract_reference: input.issuer_contract_reference,
                issuer_contract_date: input.issuer_contract_date,
                issuer_transaction_reference: input.issuer_transaction_reference,
                issuer_transaction_date: input.issuer_transaction_date,
                receiver_contract_reference: input.receiver_contract_reference,
                receiver_contract_date: input.receiver_contract_date,
                receiver_transaction_reference: input.receiver_transaction_reference,
                receiver_transaction_date: input.receiver_transaction_date,
                file_reference: input.file_reference,
                file_date: input.file_date,
                sequence_number: input.sequence_number,
            },
            period_start: input.period_start,
            period_end: input.period_end,
        })
    }
}

fn taxes_percent(outputs: &[ItemTax], withheld: &[ItemTax]) -> Result<Decimal, FacturaeError> {
    let share = |tax: &ItemTax| -> Result<Decimal, FacturaeError> {
        let percent = checked_add(tax.rate, tax.surcharge, &tax.code)?;
        checked_div(percent, Decimal::ONE_HUNDRED, &tax.code)
    };
    let mut percent = Decimal::ONE;
    for tax in outputs {
        percent = checked_add(percent, share(tax)?, "taxes")?;
    }
    for tax in withheld {
        percent = checked_sub(percent, share(tax)?, "taxes")?;
    }
    Ok(percent)
}

fn normalize_tax(
    tax: TaxInput,
    field: &str,
    group: &mut Vec<ItemTax>,
    errors: &mut Vec<ValidationError>,
) {
    // Entries without a type code carry nothing to render.
    if tax.code.trim().is_empty() {
        return;
    }
    let Some(rate) = tax.rate else {
        errors.push(ValidationError::new(field, "tax entry has no rate"));
        return;
    };
    let entry = ItemTax {
        code: tax.code,
        rate,
        surcharge: tax.surcharge.unwrap_or(Decimal::ZERO),
    };
    match group.iter_mut().find(|t| t.code == entry.code) {
        Some(existing) => *existing = entry,
        None => group.push(entry),
    }
}

fn resolve_adjustments(
    inputs: Vec<AdjustmentInput>,
    group: &str,
    errors: &mut Vec<ValidationError>,
) -> Vec<(Adjustment, bool)> {
    let mut resolved = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.into_iter().enumerate() {
        match (input.rate, input.amount) {
            (Some(rate), _) => resolved.push((
                Adjustment::Rate {
                    reason: input.reason,
                    rate,
                },
                false,
            )),
            (None, Some(amount)) => resolved.push((
                Adjustment::Flat {
                    reason: input.reason,
                    amount,
                },
                input.has_taxes.unwrap_or(true),
            )),
            (None, None) => errors.push(ValidationError::new(
                format!("{group}[{i}]"),
                "discount/charge needs either a rate or an amount",
            )),
        }
    }
    resolved
}

/// A tax entry as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxInput {
    pub code: String,
    pub rate: Option<Decimal>,
    pub surcharge: Option<Decimal>,
    /// Group override; when absent the [`WithholdingCatalog`] decides.
    pub is_withheld: Option<bool>,
}

impl TaxInput {
    pub fn new(code: impl Into<String>, rate: Decimal) -> Self {
        Self {
            code: code.into(),
            rate: Some(rate),
            surcharge: None,
            is_withheld: None,
        }
    }
}

/// A discount or charge as supplied by the caller.
///
/// `rate` takes precedence over `amount`. Flat amounts are tax-inclusive
/// unless `has_taxes` is `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdjustmentInput {
    pub reason: String,
    pub rate: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub has_taxes: Option<bool>,
}

/// Raw line item fields. Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LineItemInput {
    pub article_code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_of_measure: Option<String>,
    pub unit_price: Option<Decimal>,
    pub unit_price_without_tax: Option<Decimal>,
    pub discounts: Vec<AdjustmentInput>,
    pub charges: Vec<AdjustmentInput>,
    /// Combined tax list, classified by `is_withheld` or the catalog.
    pub taxes: Vec<TaxInput>,
    pub taxes_outputs: Vec<TaxInput>,
    pub taxes_withheld: Vec<TaxInput>,
    pub issuer_contract_reference: Option<String>,
    pub issuer_contract_date: Option<NaiveDate>,
    pub issuer_transaction_reference: Option<String>,
    pub issuer_transaction_date: Option<NaiveDate>,
    pub receiver_contract_reference: Option<String>,
    pub receiver_contract_date: Option<NaiveDate>,
    pub receiver_transaction_reference: Option<String>,
    pub receiver_transaction_date: Option<NaiveDate>,
    pub file_reference: Option<String>,
    pub file_date: Option<NaiveDate>,
    pub sequence_number: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

impl TryFrom<LineItemInput> for LineItem {
    type Error = FacturaeError;

    fn try_from(input: LineItemInput) -> Result<Self, Self::Error> {
        LineItem::from_input(input, &WithholdingCatalog::default())
    }
}

impl From<LineItem> for LineItemInput {
    fn from(item: LineItem) -> Self {
        let tax_input = |tax: ItemTax| TaxInput {
            code: tax.code,
            rate: Some(tax.rate),
            surcharge: Some(tax.surcharge),
            is_withheld: None,
        };
        // Flat amounts are stored tax-exclusive already.
        let adjustment_input = |adjustment: Adjustment| match adjustment {
            Adjustment::Rate { reason, rate } => AdjustmentInput {
                reason,
                rate: Some(rate),
                amount: None,
                has_taxes: None,
            },
            Adjustment::Flat { reason, amount } => AdjustmentInput {
                reason,
                rate: None,
                amount: Some(amount),
                has_taxes: Some(false),
            },
        };
        let references = item.references;
        Self {
            article_code: item.article_code,
            name: Some(item.name),
            description: item.description,
            quantity: Some(item.quantity),
            unit_of_measure: Some(item.unit_of_measure),
            unit_price: item.unit_price,
            unit_price_without_tax: Some(item.unit_price_without_tax),
            discounts: item.discounts.into_iter().map(adjustment_input).collect(),
            charges: item.charges.into_iter().map(adjustment_input).collect(),
            taxes: Vec::new(),
            taxes_outputs: item.taxes_outputs.into_iter().map(tax_input).collect(),
            taxes_withheld: item.taxes_withheld.into_iter().map(tax_input).collect(),
            issuer_contract_reference: references.issuer_contract_reference,
            issuer_contract_date: references.issuer_contract_date,
            issuer_transaction_reference: references.issuer_transaction_reference,
            issuer_transaction_date: references.issuer_transaction_date,
            receiver_contract_reference: references.receiver_contract_reference,
            receiver_contract_date: references.receiver_contract_date,
            receiver_transaction_reference: references.receiver_transaction_reference,
            receiver_transaction_date: references.receiver_transaction_date,
            file_reference: references.file_reference,
            file_date: references.file_date,
            sequence_number: references.sequence_number,
            period_start: item.period_start,
            period_end: item.period_end,
        }
    }
}

impl LineItemInput {
    /// Parse a JSON object and build the line item from it.
    pub fn from_json(json: &str, catalog: &WithholdingCatalog) -> Result<LineItem, FacturaeError> {
        let input: Self = serde_json::from_str(json)
            .map_err(|e| FacturaeError::Validation(format!("invalid line item: {e}")))?;
        LineItem::from_input(input, catalog)
    }
}
