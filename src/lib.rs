//! # facturae
//!
//! Spanish Facturae e-invoicing: line-item tax accounting and schema-exact
//! XML assembly for Facturae 3.2, 3.2.1 and 3.2.2.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Amounts are rounded progressively, field by field, with the precision
//! table in [`PrecisionPolicy`](crate::core::PrecisionPolicy); the cent-level
//! drift this produces is what official validators expect.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use facturae::core::*;
//! use rust_decimal_macros::dec;
//!
//! let address = AddressBuilder::new("Calle Mayor 1", "28013", "Madrid", "Madrid").build();
//! let invoice = InvoiceBuilder::new("0001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .series("2024")
//!     .seller(PartyBuilder::legal_entity("A00000000", "Proveedor SL", address.clone()).build())
//!     .buyer(PartyBuilder::legal_entity("B00000000", "Cliente SL", address).build())
//!     .add_item(LineItemBuilder::new("Consultoría", dec!(100))
//!         .output_tax(TAX_IVA, dec!(21))
//!         .build()
//!         .unwrap())
//!     .build()
//!     .unwrap();
//!
//! let line = invoice.items[0].compute(invoice.version, &PrecisionPolicy::standard()).unwrap();
//! assert_eq!(line.unit_price_without_tax, dec!(82.64));
//! assert_eq!(line.total_taxes_outputs, dec!(17.35));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Invoice model, builders, validation, precision table, item accounting, totals |
//! | `export` | Facturae XML assembly, extension hooks, signer contract |
//! | `face` | FACe / FACeB2B endpoint selection |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "export")]
pub mod export;

#[cfg(feature = "face")]
pub mod face;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
