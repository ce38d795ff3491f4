use crate::core::{FacturaeError, Invoice};

/// Lifecycle hooks invoked by [`Exporter`](super::Exporter), in
/// registration order.
///
/// Every hook has a no-op default, so an extension only overrides the
/// stages it cares about. Returning an error aborts the export.
pub trait Extension {
    /// Runs before anything is computed; may edit the invoice.
    fn on_before_export(&mut self, _invoice: &mut Invoice) -> Result<(), FacturaeError> {
        Ok(())
    }

    /// Receives the complete unsigned document and returns its replacement.
    fn on_before_sign(&mut self, content: String) -> Result<String, FacturaeError> {
        Ok(content)
    }

    /// Receives the signed document (without XML declaration) and returns
    /// its replacement.
    fn on_after_sign(&mut self, content: String) -> Result<String, FacturaeError> {
        Ok(content)
    }

    /// XML fragment placed verbatim inside `<AdditionalData><Extensions>`.
    fn additional_data(&self, _invoice: &Invoice) -> Option<String> {
        None
    }
}
