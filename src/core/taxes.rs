//! Facturae tax type codes and the withheld-tax classification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// IVA: value added tax.
pub const TAX_IVA: &str = "01";
/// IPSI: Ceuta and Melilla production, services and import tax.
pub const TAX_IPSI: &str = "02";
/// IGIC: Canary Islands general indirect tax.
pub const TAX_IGIC: &str = "03";
/// IRPF: personal income tax withholding.
pub const TAX_IRPF: &str = "04";
/// Other taxes.
pub const TAX_OTHER: &str = "05";
/// ITPAJD: transfer and stamp duty.
pub const TAX_ITPAJD: &str = "06";
/// IE: excise duties.
pub const TAX_IE: &str = "07";
/// RA: customs-rent.
pub const TAX_RA: &str = "08";
/// IGTECM: Ceuta and Melilla general business traffic tax.
pub const TAX_IGTECM: &str = "09";
/// IECDPCAC: Canary Islands special fuel tax.
pub const TAX_IECDPCAC: &str = "10";
/// IIIMAB: tax on facilities affecting the environment (Balearic Islands).
pub const TAX_IIIMAB: &str = "11";
/// ICIO: construction, installation and works tax.
pub const TAX_ICIO: &str = "12";
/// IMVDN: municipal tax on unoccupied dwellings (Navarre).
pub const TAX_IMVDN: &str = "13";
/// IMSN: municipal tax on land (Navarre).
pub const TAX_IMSN: &str = "14";
/// IMGSN: municipal tax on sumptuary expenses (Navarre).
pub const TAX_IMGSN: &str = "15";
/// IMPN: municipal tax on advertising (Navarre).
pub const TAX_IMPN: &str = "16";
/// REIVA: special IVA regime for travel agencies.
pub const TAX_REIVA: &str = "17";
/// REIGIC: special IGIC regime for travel agencies.
pub const TAX_REIGIC: &str = "18";
/// REIPSI: special IPSI regime for travel agencies.
pub const TAX_REIPSI: &str = "19";
/// IPS: insurance premium tax.
pub const TAX_IPS: &str = "20";
/// RLEA: surcharge financing liquidation of insurance entities.
pub const TAX_RLEA: &str = "21";
/// IVPEE: tax on electric energy production value.
pub const TAX_IVPEE: &str = "22";
/// IPCNG: tax on spent nuclear fuel production.
pub const TAX_IPCNG: &str = "23";
/// IACNG: tax on storage of spent nuclear fuel.
pub const TAX_IACNG: &str = "24";
/// IDEC: tax on deposits of credit institutions.
pub const TAX_IDEC: &str = "25";
/// ILTCAC: tax on tobacco products (Canary Islands).
pub const TAX_ILTCAC: &str = "26";
/// IGFEI: tax on fluorinated greenhouse gases.
pub const TAX_IGFEI: &str = "27";
/// IRNR: non-resident income tax.
pub const TAX_IRNR: &str = "28";
/// ISS: corporate income tax.
pub const TAX_ISS: &str = "29";

/// Tax type codes that belong to the withheld group when an entry does not
/// say which group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingCatalog {
    codes: BTreeSet<String>,
}

impl Default for WithholdingCatalog {
    fn default() -> Self {
        Self::new([TAX_IRPF])
    }
}

impl WithholdingCatalog {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_withheld(&self, tax_code: &str) -> bool {
        self.codes.contains(tax_code)
    }
}
