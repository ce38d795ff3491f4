use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::LineItem;

/// Facturae schema version; selects namespace and precision exceptions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum SchemaVersion {
    #[serde(rename = "3.2")]
    V3_2,
    #[serde(rename = "3.2.1")]
    V3_2_1,
    #[default]
    #[serde(rename = "3.2.2")]
    V3_2_2,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 3] = [Self::V3_2, Self::V3_2_1, Self::V3_2_2];

    /// Value of `<SchemaVersion>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V3_2 => "3.2",
            Self::V3_2_1 => "3.2.1",
            Self::V3_2_2 => "3.2.2",
        }
    }

    /// Namespace URI bound to the `fe` prefix.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::V3_2 => "http://www.facturae.es/Facturae/2009/v3.2/Facturae",
            Self::V3_2_1 => "http://www.facturae.es/Facturae/2014/v3.2.1/Facturae",
            Self::V3_2_2 => "http://www.facturae.gob.es/formato/Versiones/Facturaev3_2_2.xml",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The invoice aggregate read by one export pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub version: SchemaVersion,
    /// ISO 4217 currency code, used for both invoice and tax currency.
    pub currency: String,
    /// ISO 639-1 language of the document texts.
    pub language: String,
    pub number: String,
    pub series: String,
    pub issue_date: NaiveDate,
    /// Installment due date; falls back to the issue date when rendered.
    pub due_date: Option<NaiveDate>,
    pub invoicing_period: Option<Period>,
    pub document_type: DocumentType,
    pub invoice_class: InvoiceClass,
    pub payment: Option<PaymentDetails>,
    pub description: Option<String>,
    pub receiver_transaction_reference: Option<String>,
    pub file_reference: Option<String>,
    pub receiver_contract_reference: Option<String>,
    pub related_invoice: Option<String>,
    pub additional_information: Option<String>,
    /// Free-text clause of the factoring assignment block.
    pub assignment_clauses: Option<String>,
    pub corrective: Option<Corrective>,
    pub seller: Option<Party>,
    pub buyer: Option<Party>,
    /// Factoring assignee.
    pub assignee: Option<Party>,
    pub items: Vec<LineItem>,
    /// Invoice-level discounts, applied by the totals aggregator.
    pub general_discounts: Vec<Adjustment>,
    /// Invoice-level charges, applied by the totals aggregator.
    pub general_charges: Vec<Adjustment>,
    pub legal_literals: Vec<String>,
    pub attachments: Vec<Attachment>,
}

/// Start/end date pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// `<InvoiceDocumentType>` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentType {
    /// FC: complete invoice.
    #[default]
    Complete,
    /// FA: abbreviated (simplified) invoice.
    Abbreviated,
    /// AF: self-invoice.
    SelfInvoice,
}

impl DocumentType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Complete => "FC",
            Self::Abbreviated => "FA",
            Self::SelfInvoice => "AF",
        }
    }
}

/// `<InvoiceClass>` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvoiceClass {
    /// OO: original.
    #[default]
    Original,
    /// OR: corrective original.
    Corrective,
    /// OC: summary original.
    Summary,
    /// CO: copy of original.
    CopyOriginal,
    /// CR: copy of corrective.
    CopyCorrective,
    /// CC: copy of summary.
    CopySummary,
}

impl InvoiceClass {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Original => "OO",
            Self::Corrective => "OR",
            Self::Summary => "OC",
            Self::CopyOriginal => "CO",
            Self::CopyCorrective => "CR",
            Self::CopySummary => "CC",
        }
    }
}

/// Payment means catalog (`<PaymentMeans>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// 01
    Cash,
    /// 02: the buyer's account is debited.
    Debit,
    /// 03
    Receipt,
    /// 04
    Transfer,
    /// 05
    AcceptedBillOfExchange,
    /// 06
    DocumentaryCredit,
    /// 07
    ContractAward,
    /// 08
    BillOfExchange,
    /// 09
    TransferableIou,
    /// 10
    Iou,
    /// 11
    Cheque,
    /// 12
    Reimbursement,
    /// 13
    Special,
    /// 14
    Setoff,
    /// 15
    Postgiro,
    /// 16
    CertifiedCheque,
    /// 17
    BankersDraft,
    /// 18
    CashOnDelivery,
    /// 19
    Card,
}

impl PaymentMethod {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cash => "01",
            Self::Debit => "02",
            Self::Receipt => "03",
            Self::Transfer => "04",
            Self::AcceptedBillOfExchange => "05",
            Self::DocumentaryCredit => "06",
            Self::ContractAward => "07",
            Self::BillOfExchange => "08",
            Self::TransferableIou => "09",
            Self::Iou => "10",
            Self::Cheque => "11",
            Self::Reimbursement => "12",
            Self::Special => "13",
            Self::Setoff => "14",
            Self::Postgiro => "15",
            Self::CertifiedCheque => "16",
            Self::BankersDraft => "17",
            Self::CashOnDelivery => "18",
            Self::Card => "19",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let m = match code {
            "01" => Self::Cash,
            "02" => Self::Debit,
            "03" => Self::Receipt,
            "04" => Self::Transfer,
            "05" => Self::AcceptedBillOfExchange,
            "06" => Self::DocumentaryCredit,
            "07" => Self::ContractAward,
            "08" => Self::BillOfExchange,
            "09" => Self::TransferableIou,
            "10" => Self::Iou,
            "11" => Self::Cheque,
            "12" => Self::Reimbursement,
            "13" => Self::Special,
            "14" => Self::Setoff,
            "15" => Self::Postgiro,
            "16" => Self::CertifiedCheque,
            "17" => Self::BankersDraft,
            "18" => Self::CashOnDelivery,
            "19" => Self::Card,
            _ => return None,
        };
        Some(m)
    }
}

/// Payment instructions of the single installment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub iban: Option<String>,
    pub bic: Option<String>,
}

/// A discount or charge, either a percentage of its base or a flat amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Adjustment {
    Rate { reason: String, rate: Decimal },
    Flat { reason: String, amount: Decimal },
}

impl Adjustment {
    pub fn reason(&self) -> &str {
        match self {
            Self::Rate { reason, .. } | Self::Flat { reason, .. } => reason,
        }
    }
}

/// A resolved discount/charge as rendered: amount always set, rate only
/// for percentage-based entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAdjustment {
    pub reason: String,
    pub rate: Option<Decimal>,
    pub amount: Decimal,
}

/// File attached under `<RelatedDocuments>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Full MIME type, e.g. "application/pdf".
    pub mime_type: String,
    pub description: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, description: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            description: description.into(),
            data,
        }
    }

    /// MIME subtype used as `<AttachmentFormat>` ("pdf" for "application/pdf").
    pub fn format(&self) -> &str {
        self.mime_type
            .rsplit('/')
            .next()
            .unwrap_or(self.mime_type.as_str())
    }
}

/// Corrective descriptor for invoices amending a previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corrective {
    pub invoice_number: Option<String>,
    pub invoice_series_code: Option<String>,
    pub reason: CorrectiveReason,
    /// Overrides the catalog description of `reason`.
    pub reason_description: Option<String>,
    pub tax_period_start: Option<NaiveDate>,
    pub tax_period_end: Option<NaiveDate>,
    pub correction_method: CorrectionMethod,
    /// Overrides the catalog description of `correction_method`.
    pub correction_method_description: Option<String>,
    pub additional_reason_description: Option<String>,
    pub invoice_issue_date: Option<NaiveDate>,
}

impl Corrective {
    pub fn new(reason: CorrectiveReason, correction_method: CorrectionMethod) -> Self {
        Self {
            invoice_number: None,
            invoice_series_code: None,
            reason,
            reason_description: None,
            tax_period_start: None,
            tax_period_end: None,
            correction_method,
            correction_method_description: None,
            additional_reason_description: None,
            invoice_issue_date: None,
        }
    }

    pub fn reason_description(&self) -> &str {
        self.reason_description
            .as_deref()
            .unwrap_or(self.reason.description())
    }

    pub fn correction_method_description(&self) -> &str {
        self.correction_method_description
            .as_deref()
            .unwrap_or(self.correction_method.description())
    }

    /// Tax period, only when both ends are set.
    pub fn tax_period(&self) -> Option<Period> {
        match (self.tax_period_start, self.tax_period_end) {
            (Some(start), Some(end)) => Some(Period { start, end }),
            _ => None,
        }
    }
}

/// Facturae corrective reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectiveReason {
    InvoiceNumber,
    InvoiceSeries,
    IssueDate,
    SellerName,
    BuyerName,
    SellerTaxId,
    BuyerTaxId,
    SellerAddress,
    BuyerAddress,
    OperationDetail,
    TaxRate,
    TaxAmount,
    TaxPeriod,
    InvoiceClass,
    LegalLiterals,
    TaxableBase,
    OutputTaxCalculation,
    WithheldTaxCalculation,
    BaseReturnedContainers,
    BaseDiscounts,
    BaseFinalResolution,
    BaseUnpaidInsolvency,
}

impl CorrectiveReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvoiceNumber => "01",
            Self::InvoiceSeries => "02",
            Self::IssueDate => "03",
            Self::SellerName => "04",
            Self::BuyerName => "05",
            Self::SellerTaxId => "06",
            Self::BuyerTaxId => "07",
            Self::SellerAddress => "08",
            Self::BuyerAddress => "09",
            Self::OperationDetail => "10",
            Self::TaxRate => "11",
            Self::TaxAmount => "12",
            Self::TaxPeriod => "13",
            Self::InvoiceClass => "14",
            Self::LegalLiterals => "15",
            Self::TaxableBase => "16",
            Self::OutputTaxCalculation => "80",
            Self::WithheldTaxCalculation => "81",
            Self::BaseReturnedContainers => "82",
            Self::BaseDiscounts => "83",
            Self::BaseFinalResolution => "84",
            Self::BaseUnpaidInsolvency => "85",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::InvoiceNumber => "Número de la factura",
            Self::InvoiceSeries => "Serie de la factura",
            Self::IssueDate => "Fecha expedición",
            Self::SellerName => "Nombre y apellidos/Razón Social-Emisor",
            Self::BuyerName => "Nombre y apellidos/Razón Social-Receptor",
            Self::SellerTaxId => "Identificación fiscal Emisor/obligado",
            Self::BuyerTaxId => "Identificación fiscal Receptor",
            Self::SellerAddress => "Domicilio Emisor/Obligado",
            Self::BuyerAddress => "Domicilio Receptor",
            Self::OperationDetail => "Detalle Operación",
            Self::TaxRate => "Porcentaje impositivo a aplicar",
            Self::TaxAmount => "Cuota tributaria a aplicar",
            Self::TaxPeriod => "Fecha/Periodo a aplicar",
            Self::InvoiceClass => "Clase de factura",
            Self::LegalLiterals => "Literales legales",
            Self::TaxableBase => "Base imponible",
            Self::OutputTaxCalculation => "Cálculo de cuotas repercutidas",
            Self::WithheldTaxCalculation => "Cálculo de cuotas retenidas",
            Self::BaseReturnedContainers => {
                "Base imponible modificada por devolución de envases / embalajes"
            }
            Self::BaseDiscounts => "Base imponible modificada por descuentos y bonificaciones",
            Self::BaseFinalResolution => {
                "Base imponible modificada por resolución firme, judicial o administrativa"
            }
            Self::BaseUnpaidInsolvency => {
                "Base imponible modificada cuotas repercutidas no satisfechas. Auto de declaración de concurso"
            }
        }
    }
}

/// Facturae correction method codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionMethod {
    /// 01: full replacement.
    Full,
    /// 02: differences only.
    Differences,
    /// 03: volume discount over a period.
    VolumeDiscounts,
    /// 04: authorized by the tax agency.
    TaxAgencyAuthorized,
}

impl CorrectionMethod {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Full => "01",
            Self::Differences => "02",
            Self::VolumeDiscounts => "03",
            Self::TaxAgencyAuthorized => "04",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Full => "Rectificación íntegra",
            Self::Differences => "Rectificación por diferencias",
            Self::VolumeDiscounts => {
                "Rectificación por descuento por volumen de operaciones durante un periodo"
            }
            Self::TaxAgencyAuthorized => "Autorizadas por la Agencia Tributaria",
        }
    }
}

/// Trading party: seller, buyer or factoring assignee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub kind: PartyKind,
    pub tax_number: String,
    /// Legal entity name, or given name of an individual.
    pub name: String,
    pub first_surname: Option<String>,
    pub second_surname: Option<String>,
    pub address: Address,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// `J` (legal entity) or `F` (individual).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyKind {
    LegalEntity,
    Individual,
}

impl PartyKind {
    pub fn person_type_code(&self) -> &'static str {
        match self {
            Self::LegalEntity => "J",
            Self::Individual => "F",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub postal_code: String,
    pub town: String,
    pub province: String,
    /// ISO 3166-1 alpha-3, e.g. "ESP".
    pub country_code: String,
}

impl Address {
    pub fn is_in_spain(&self) -> bool {
        self.country_code == "ESP"
    }
}

impl Party {
    /// `R` resident in Spain, `U` resident elsewhere in the EU, `E` foreign.
    pub fn residence_type_code(&self) -> &'static str {
        if self.address.is_in_spain() {
            "R"
        } else if is_eu_country(&self.address.country_code) {
            "U"
        } else {
            "E"
        }
    }
}

fn is_eu_country(alpha3: &str) -> bool {
    EU_COUNTRIES.binary_search(&alpha3).is_ok()
}

/// EU member states other than Spain, ISO 3166-1 alpha-3 (sorted).
static EU_COUNTRIES: &[&str] = &[
    "AUT", "BEL", "BGR", "CYP", "CZE", "DEU", "DNK", "EST", "FIN", "FRA", "GRC", "HRV", "HUN",
    "IRL", "ITA", "LTU", "LUX", "LVA", "MLT", "NLD", "POL", "PRT", "ROU", "SVK", "SVN", "SWE",
];
