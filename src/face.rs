//! Submission endpoints of the Spanish public invoicing hubs.
//!
//! Only endpoint selection lives here; transport and SOAP envelopes are
//! left to the caller.

use serde::{Deserialize, Serialize};

/// Staging or production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Staging,
    Production,
}

/// Receiving service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Service {
    /// FACe, invoices addressed to public administrations.
    Face,
    /// FACeB2B, invoices between businesses.
    FaceB2b,
}

impl Service {
    pub fn endpoint_url(&self, environment: Environment) -> &'static str {
        match (self, environment) {
            (Self::Face, Environment::Production) => "https://webservice.face.gob.es/facturasspp2",
            (Self::Face, Environment::Staging) => {
                "https://se-face-webservice.redsara.es/facturasspp2"
            }
            (Self::FaceB2b, Environment::Production) => "https://ws.faceb2b.gob.es/sv1/invoice",
            (Self::FaceB2b, Environment::Staging) => {
                "https://se-ws-faceb2b.redsara.es/sv1/invoice"
            }
        }
    }
}
