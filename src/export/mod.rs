//! Facturae XML export.
//!
//! [`Exporter`] runs the full pipeline for one invoice: extension hooks,
//! validation, totals, document assembly, signing and the XML
//! declaration. The result is a [`Document`] that can be returned as a
//! string or persisted atomically.

mod assembler;
mod extension;
mod party;
mod signer;
mod xml;

pub use extension::Extension;
pub use signer::{Signer, Unsigned};

use std::path::Path;

use crate::core::{
    FacturaeError, Invoice, PrecisionPolicy, StandardTotals, TotalsAggregator, validate_invoice,
};
use assembler::Assembler;

/// Prepended after signing.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Document assembler with its collaborators.
///
/// ```
/// use facturae::core::*;
/// use facturae::export::Exporter;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let address = AddressBuilder::new("Calle Mayor 1", "28013", "Madrid", "Madrid").build();
/// let mut invoice = InvoiceBuilder::new("0001", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///     .seller(PartyBuilder::legal_entity("A00000000", "Proveedor SL", address.clone()).build())
///     .buyer(PartyBuilder::legal_entity("B00000000", "Cliente SL", address).build())
///     .add_item(LineItemBuilder::new("Consultoría", dec!(100))
///         .output_tax(TAX_IVA, dec!(21))
///         .build()
///         .unwrap())
///     .build()
///     .unwrap();
///
/// let document = Exporter::new().export(&mut invoice).unwrap();
/// assert!(document.as_str().contains("<InvoiceTotal>99.99</InvoiceTotal>"));
/// ```
pub struct Exporter {
    policy: PrecisionPolicy,
    aggregator: Box<dyn TotalsAggregator>,
    signer: Box<dyn Signer>,
    extensions: Vec<Box<dyn Extension>>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    /// Standard precision table, [`StandardTotals`], no signature, no extensions.
    pub fn new() -> Self {
        Self {
            policy: PrecisionPolicy::standard(),
            aggregator: Box::new(StandardTotals),
            signer: Box::new(Unsigned),
            extensions: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: PrecisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_aggregator(mut self, aggregator: impl TotalsAggregator + 'static) -> Self {
        self.aggregator = Box::new(aggregator);
        self
    }

    pub fn with_signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Box::new(signer);
        self
    }

    /// Register an extension; hooks run in registration order.
    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    pub fn policy(&self) -> &PrecisionPolicy {
        &self.policy
    }

    /// Export `invoice` as a signed Facturae document.
    ///
    /// Extensions may edit the invoice in their `on_before_export` hook,
    /// which is why it is taken mutably. Nothing is returned on error.
    pub fn export(&mut self, invoice: &mut Invoice) -> Result<Document, FacturaeError> {
        for ext in &mut self.extensions {
            ext.on_before_export(invoice)?;
        }
        let invoice = &*invoice;

        let errors = validate_invoice(invoice);
        if !errors.is_empty() {
            return Err(FacturaeError::from_validation(&errors));
        }

        tracing::debug!(
            version = %invoice.version,
            items = invoice.items.len(),
            factoring = invoice.assignee.is_some(),
            corrective = invoice.corrective.is_some(),
            payment = invoice.payment.is_some(),
            "assembling document"
        );

        let totals = self.aggregator.totals(invoice, &self.policy)?;
        let extension_data: Vec<String> = self
            .extensions
            .iter()
            .filter_map(|ext| ext.additional_data(invoice))
            .filter(|fragment| !fragment.is_empty())
            .collect();

        let mut content =
            Assembler::new(invoice, &totals, &self.policy, &extension_data).render()?;

        for ext in &mut self.extensions {
            content = ext.on_before_sign(content)?;
        }
        let signed = self.signer.sign(&content)?;
        let mut content = signed.clone();
        for ext in &mut self.extensions {
            content = ext.on_after_sign(content)?;
        }
        if content != signed {
            tracing::warn!("extension rewrote the signed document");
        }

        let document = Document {
            content: format!("{XML_DECLARATION}{content}"),
        };
        tracing::info!(
            version = %invoice.version,
            number = %invoice.number,
            bytes = document.len(),
            "exported invoice"
        );
        Ok(document)
    }
}

/// A finished Facturae document, declaration included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    content: String,
}

// Never empty: the XML declaration is always present.
#[allow(clippy::len_without_is_empty)]
impl Document {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn into_string(self) -> String {
        self.content
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Persist to `path` and return the number of bytes written.
    ///
    /// The content goes to a sibling temporary file which is then renamed
    /// over `path`, so readers never observe a partial document. On
    /// failure the document itself stays usable.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<usize, FacturaeError> {
        let path = path.as_ref();
        let tmp = temp_path(path);
        let result = std::fs::write(&tmp, self.content.as_bytes())
            .and_then(|()| std::fs::rename(&tmp, path));
        if let Err(source) = result {
            tracing::warn!(path = %path.display(), error = %source, "failed to persist document");
            let _ = std::fs::remove_file(&tmp);
            return Err(FacturaeError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(self.content.len())
    }
}

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.content)
    }
}

fn temp_path(path: &Path) -> std::path::PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
