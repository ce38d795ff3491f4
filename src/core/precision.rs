//! Decimal precision table for rendered Facturae fields.
//!
//! Every amount, rate and quantity placed in a document goes through
//! [`PrecisionPolicy`] first: it is rounded half-away-from-zero to the
//! field's `max` decimals and rendered with at least `min` decimals.
//! The table is keyed by schema version because the 3.2 schema allows
//! six decimals on some line-level figures where later versions use two.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::FacturaeError;
use super::types::SchemaVersion;

/// Identifier of a numeric field in the Facturae schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "InvoiceTotal")]
    InvoiceTotal,
    #[serde(rename = "TotalGrossAmount")]
    TotalGrossAmount,
    #[serde(rename = "TotalGrossAmountBeforeTaxes")]
    TotalGrossAmountBeforeTaxes,
    #[serde(rename = "TotalGeneralDiscounts")]
    TotalGeneralDiscounts,
    #[serde(rename = "TotalGeneralSurcharges")]
    TotalGeneralSurcharges,
    #[serde(rename = "TotalTaxOutputs")]
    TotalTaxOutputs,
    #[serde(rename = "TotalTaxesWithheld")]
    TotalTaxesWithheld,
    #[serde(rename = "Tax/TaxRate")]
    TaxRate,
    #[serde(rename = "Tax/TaxableBase")]
    TaxableBase,
    #[serde(rename = "Tax/TaxAmount")]
    TaxAmount,
    #[serde(rename = "Tax/EquivalenceSurcharge")]
    EquivalenceSurcharge,
    #[serde(rename = "Tax/EquivalenceSurchargeAmount")]
    EquivalenceSurchargeAmount,
    #[serde(rename = "DiscountCharge/Rate")]
    DiscountChargeRate,
    #[serde(rename = "DiscountCharge/Amount")]
    DiscountChargeAmount,
    #[serde(rename = "Item/Quantity")]
    ItemQuantity,
    #[serde(rename = "Item/UnitPriceWithoutTax")]
    ItemUnitPriceWithoutTax,
    #[serde(rename = "Item/TotalCost")]
    ItemTotalCost,
    #[serde(rename = "Item/GrossAmount")]
    ItemGrossAmount,
}

impl Field {
    /// Every field the document assembler renders.
    pub const ALL: [Field; 18] = [
        Field::InvoiceTotal,
        Field::TotalGrossAmount,
        Field::TotalGrossAmountBeforeTaxes,
        Field::TotalGeneralDiscounts,
        Field::TotalGeneralSurcharges,
        Field::TotalTaxOutputs,
        Field::TotalTaxesWithheld,
        Field::TaxRate,
        Field::TaxableBase,
        Field::TaxAmount,
        Field::EquivalenceSurcharge,
        Field::EquivalenceSurchargeAmount,
        Field::DiscountChargeRate,
        Field::DiscountChargeAmount,
        Field::ItemQuantity,
        Field::ItemUnitPriceWithoutTax,
        Field::ItemTotalCost,
        Field::ItemGrossAmount,
    ];

    /// Schema path used as the field identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Self::InvoiceTotal => "InvoiceTotal",
            Self::TotalGrossAmount => "TotalGrossAmount",
            Self::TotalGrossAmountBeforeTaxes => "TotalGrossAmountBeforeTaxes",
            Self::TotalGeneralDiscounts => "TotalGeneralDiscounts",
            Self::TotalGeneralSurcharges => "TotalGeneralSurcharges",
            Self::TotalTaxOutputs => "TotalTaxOutputs",
            Self::TotalTaxesWithheld => "TotalTaxesWithheld",
            Self::TaxRate => "Tax/TaxRate",
            Self::TaxableBase => "Tax/TaxableBase",
            Self::TaxAmount => "Tax/TaxAmount",
            Self::EquivalenceSurcharge => "Tax/EquivalenceSurcharge",
            Self::EquivalenceSurchargeAmount => "Tax/EquivalenceSurchargeAmount",
            Self::DiscountChargeRate => "DiscountCharge/Rate",
            Self::DiscountChargeAmount => "DiscountCharge/Amount",
            Self::ItemQuantity => "Item/Quantity",
            Self::ItemUnitPriceWithoutTax => "Item/UnitPriceWithoutTax",
            Self::ItemTotalCost => "Item/TotalCost",
            Self::ItemGrossAmount => "Item/GrossAmount",
        }
    }

    /// Parse a schema path identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Decimal places for one field: round to `max`, render at least `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPrecision {
    pub min: u32,
    pub max: u32,
}

impl FieldPrecision {
    pub const fn fixed(decimals: u32) -> Self {
        Self {
            min: decimals,
            max: decimals,
        }
    }

    pub const fn up_to(max: u32) -> Self {
        Self { min: 0, max }
    }

    /// Round half away from zero to `max` decimals.
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.max, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Round, then render with at least `min` decimals and no trailing
    /// zeros beyond that.
    pub fn format(&self, value: Decimal) -> String {
        let mut d = self.round(value).normalize();
        if d.scale() < self.min {
            d.rescale(self.min);
        }
        d.to_string()
    }
}

/// Precision entries and version-specific exceptions for one schema version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionPrecision {
    #[serde(default)]
    pub fields: BTreeMap<Field, FieldPrecision>,
    /// Round an item's total cost to the taxable-base precision before it is
    /// reused as the base for discounts, charges and taxes.
    #[serde(default)]
    pub total_cost_follows_taxable_base: bool,
}

/// Lookup table `(field, schema version) → decimals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecisionPolicy {
    versions: BTreeMap<SchemaVersion, VersionPrecision>,
}

impl Default for PrecisionPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl PrecisionPolicy {
    /// Built-in table: two decimals everywhere, up to six on quantities,
    /// and six on unit price / total cost / gross amount under 3.2.
    pub fn standard() -> Self {
        let mut versions = BTreeMap::new();
        for version in SchemaVersion::ALL {
            let mut fields: BTreeMap<Field, FieldPrecision> = Field::ALL
                .into_iter()
                .map(|f| (f, FieldPrecision::fixed(2)))
                .collect();
            fields.insert(Field::ItemQuantity, FieldPrecision::up_to(6));

            let mut total_cost_follows_taxable_base = false;
            if version == SchemaVersion::V3_2 {
                for f in [
                    Field::ItemUnitPriceWithoutTax,
                    Field::ItemTotalCost,
                    Field::ItemGrossAmount,
                ] {
                    fields.insert(f, FieldPrecision::fixed(6));
                }
                total_cost_follows_taxable_base = true;
            }

            versions.insert(
                version,
                VersionPrecision {
                    fields,
                    total_cost_follows_taxable_base,
                },
            );
        }
        Self { versions }
    }

    /// A policy with no entries at all; every lookup fails until populated.
    pub fn empty() -> Self {
        Self {
            versions: BTreeMap::new(),
        }
    }

    /// Load a table from JSON, e.g.
    /// `{"versions": {"3.2.2": {"fields": {"InvoiceTotal": {"min": 2, "max": 2}}}}}`.
    pub fn from_json(json: &str) -> Result<Self, FacturaeError> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| FacturaeError::Configuration(format!("invalid precision table: {e}")))?;
        for (version, table) in &policy.versions {
            for (field, p) in &table.fields {
                if p.min > p.max {
                    return Err(FacturaeError::Configuration(format!(
                        "{field} for schema {version}: min decimals {} exceed max {}",
                        p.min, p.max
                    )));
                }
            }
        }
        Ok(policy)
    }

    /// Override (or add) a single entry.
    pub fn with_field(
        mut self,
        version: SchemaVersion,
        field: Field,
        precision: FieldPrecision,
    ) -> Self {
        self.versions
            .entry(version)
            .or_default()
            .fields
            .insert(field, precision);
        self
    }

    pub fn lookup(
        &self,
        field: Field,
        version: SchemaVersion,
    ) -> Result<FieldPrecision, FacturaeError> {
        self.versions
            .get(&version)
            .and_then(|t| t.fields.get(&field))
            .copied()
            .ok_or_else(|| {
                FacturaeError::Configuration(format!(
                    "no precision entry for {field} in schema {version}"
                ))
            })
    }

    pub fn round(
        &self,
        value: Decimal,
        field: Field,
        version: SchemaVersion,
    ) -> Result<Decimal, FacturaeError> {
        Ok(self.lookup(field, version)?.round(value))
    }

    pub fn format(
        &self,
        value: Decimal,
        field: Field,
        version: SchemaVersion,
    ) -> Result<String, FacturaeError> {
        Ok(self.lookup(field, version)?.format(value))
    }

    pub fn total_cost_follows_taxable_base(&self, version: SchemaVersion) -> bool {
        self.versions
            .get(&version)
            .is_some_and(|t| t.total_cost_follows_taxable_base)
    }
}
