use crate::core::SigningError;

/// Injects an XAdES signature into an assembled document.
///
/// Key material belongs to the implementation. The exporter calls
/// `sign` once per export and aborts on error without retrying.
pub trait Signer {
    fn sign(&self, unsigned: &str) -> Result<String, SigningError>;
}

/// Leaves the document unsigned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsigned;

impl Signer for Unsigned {
    fn sign(&self, unsigned: &str) -> Result<String, SigningError> {
        Ok(unsigned.to_string())
    }
}

impl<F> Signer for F
where
    F: Fn(&str) -> Result<String, SigningError>,
{
    fn sign(&self, unsigned: &str) -> Result<String, SigningError> {
        self(unsigned)
    }
}
