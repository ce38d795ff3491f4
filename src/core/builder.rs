use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::FacturaeError;
use super::item::{AdjustmentInput, LineItem, LineItemInput, TaxInput};
use super::taxes::WithholdingCatalog;
use super::types::*;
use super::validation;

/// Builder for constructing invoices.
///
/// ```
/// use facturae::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let address = AddressBuilder::new("Calle Mayor 1", "28013", "Madrid", "Madrid").build();
/// let invoice = InvoiceBuilder::new("0001", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///     .series("A")
///     .seller(PartyBuilder::legal_entity("A00000000", "Proveedor SL", address.clone()).build())
///     .buyer(PartyBuilder::individual("00000000T", "Ana", "García", address).build())
///     .add_item(LineItemBuilder::new("Consultoría", dec!(121))
///         .output_tax(TAX_IVA, dec!(21))
///         .build()
///         .unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(invoice.items.len(), 1);
/// ```
pub struct InvoiceBuilder {
    version: SchemaVersion,
    currency: String,
    language: String,
    number: String,
    series: String,
    issue_date: NaiveDate,
    due_date: Option<NaiveDate>,
    invoicing_period: Option<Period>,
    document_type: DocumentType,
    invoice_class: InvoiceClass,
    payment_method: Option<PaymentMethod>,
    iban: Option<String>,
    bic: Option<String>,
    description: Option<String>,
    receiver_transaction_reference: Option<String>,
    file_reference: Option<String>,
    receiver_contract_reference: Option<String>,
    related_invoice: Option<String>,
    additional_information: Option<String>,
    assignment_clauses: Option<String>,
    corrective: Option<Corrective>,
    seller: Option<Party>,
    buyer: Option<Party>,
    assignee: Option<Party>,
    items: Vec<LineItem>,
    general_discounts: Vec<Adjustment>,
    general_charges: Vec<Adjustment>,
    legal_literals: Vec<String>,
    attachments: Vec<Attachment>,
}

impl InvoiceBuilder {
    pub fn new(number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self {
            version: SchemaVersion::default(),
            currency: "EUR".to_string(),
            language: "es".to_string(),
            number: number.into(),
            series: String::new(),
            issue_date,
            due_date: None,
            invoicing_period: None,
            document_type: DocumentType::default(),
            invoice_class: InvoiceClass::default(),
            payment_method: None,
            iban: None,
            bic: None,
            description: None,
            receiver_transaction_reference: None,
            file_reference: None,
            receiver_contract_reference: None,
            related_invoice: None,
            additional_information: None,
            assignment_clauses: None,
            corrective: None,
            seller: None,
            buyer: None,
            assignee: None,
            items: Vec::new(),
            general_discounts: Vec::new(),
            general_charges: Vec::new(),
            legal_literals: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn version(mut self, version: SchemaVersion) -> Self {
        self.version = version;
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.language = code.into();
        self
    }

    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.series = series.into();
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn invoicing_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.invoicing_period = Some(Period { start, end });
        self
    }

    pub fn document_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = document_type;
        self
    }

    pub fn invoice_class(mut self, class: InvoiceClass) -> Self {
        self.invoice_class = class;
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Bank account for the payment; ignored unless a payment method is set.
    pub fn payment_account(mut self, iban: impl Into<String>, bic: Option<String>) -> Self {
        self.iban = Some(iban.into());
        self.bic = bic;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn receiver_transaction_reference(mut self, reference: impl Into<String>) -> Self {
        self.receiver_transaction_reference = Some(reference.into());
        self
    }

    pub fn file_reference(mut self, reference: impl Into<String>) -> Self {
        self.file_reference = Some(reference.into());
        self
    }

    pub fn receiver_contract_reference(mut self, reference: impl Into<String>) -> Self {
        self.receiver_contract_reference = Some(reference.into());
        self
    }

    pub fn related_invoice(mut self, reference: impl Into<String>) -> Self {
        self.related_invoice = Some(reference.into());
        self
    }

    pub fn additional_information(mut self, text: impl Into<String>) -> Self {
        self.additional_information = Some(text.into());
        self
    }

    pub fn assignment_clauses(mut self, text: impl Into<String>) -> Self {
        self.assignment_clauses = Some(text.into());
        self
    }

    pub fn corrective(mut self, corrective: Corrective) -> Self {
        self.corrective = Some(corrective);
        self
    }

    pub fn seller(mut self, party: Party) -> Self {
        self.seller = Some(party);
        self
    }

    pub fn buyer(mut self, party: Party) -> Self {
        self.buyer = Some(party);
        self
    }

    /// Factoring assignee.
    pub fn assignee(mut self, party: Party) -> Self {
        self.assignee = Some(party);
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn general_discount_rate(mut self, reason: impl Into<String>, rate: Decimal) -> Self {
        self.general_discounts.push(Adjustment::Rate {
            reason: reason.into(),
            rate,
        });
        self
    }

    pub fn general_discount_amount(mut self, reason: impl Into<String>, amount: Decimal) -> Self {
        self.general_discounts.push(Adjustment::Flat {
            reason: reason.into(),
            amount,
        });
        self
    }

    pub fn general_charge_rate(mut self, reason: impl Into<String>, rate: Decimal) -> Self {
        self.general_charges.push(Adjustment::Rate {
            reason: reason.into(),
            rate,
        });
        self
    }

    pub fn general_charge_amount(mut self, reason: impl Into<String>, amount: Decimal) -> Self {
        self.general_charges.push(Adjustment::Flat {
            reason: reason.into(),
            amount,
        });
        self
    }

    pub fn legal_literal(mut self, text: impl Into<String>) -> Self {
        self.legal_literals.push(text.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Build the invoice and run [`validate_invoice`](validation::validate_invoice).
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Invoice, FacturaeError> {
        let invoice = self.build_unchecked();
        let errors = validation::validate_invoice(&invoice);
        if !errors.is_empty() {
            return Err(FacturaeError::from_validation(&errors));
        }
        Ok(invoice)
    }

    /// Build without validation; the exporter still validates before rendering.
    pub fn build_unchecked(self) -> Invoice {
        let payment = self.payment_method.map(|method| PaymentDetails {
            method,
            iban: self.iban,
            bic: self.bic,
        });
        Invoice {
            version: self.version,
            currency: self.currency,
            language: self.language,
            number: self.number,
            series: self.series,
            issue_date: self.issue_date,
            due_date: self.due_date,
            invoicing_period: self.invoicing_period,
            document_type: self.document_type,
            invoice_class: self.invoice_class,
            payment,
            description: self.description,
            receiver_transaction_reference: self.receiver_transaction_reference,
            file_reference: self.file_reference,
            receiver_contract_reference: self.receiver_contract_reference,
            related_invoice: self.related_invoice,
            additional_information: self.additional_information,
            assignment_clauses: self.assignment_clauses,
            corrective: self.corrective,
            seller: self.seller,
            buyer: self.buyer,
            assignee: self.assignee,
            items: self.items,
            general_discounts: self.general_discounts,
            general_charges: self.general_charges,
            legal_literals: self.legal_literals,
            attachments: self.attachments,
        }
    }
}

/// Builder for Party (seller, buyer or assignee).
pub struct PartyBuilder {
    kind: PartyKind,
    tax_number: String,
    name: String,
    first_surname: Option<String>,
    second_surname: Option<String>,
    address: Address,
    email: Option<String>,
    phone: Option<String>,
}

impl PartyBuilder {
    pub fn legal_entity(
        tax_number: impl Into<String>,
        corporate_name: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            kind: PartyKind::LegalEntity,
            tax_number: tax_number.into(),
            name: corporate_name.into(),
            first_surname: None,
            second_surname: None,
            address,
            email: None,
            phone: None,
        }
    }

    pub fn individual(
        tax_number: impl Into<String>,
        name: impl Into<String>,
        first_surname: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            kind: PartyKind::Individual,
            first_surname: Some(first_surname.into()),
            ..Self::legal_entity(tax_number, name, address)
        }
    }

    pub fn second_surname(mut self, surname: impl Into<String>) -> Self {
        self.second_surname = Some(surname.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn build(self) -> Party {
        Party {
            kind: self.kind,
            tax_number: self.tax_number,
            name: self.name,
            first_surname: self.first_surname,
            second_surname: self.second_surname,
            address: self.address,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Builder for Address. Country defaults to Spain ("ESP").
pub struct AddressBuilder {
    street: String,
    postal_code: String,
    town: String,
    province: String,
    country_code: String,
}

impl AddressBuilder {
    pub fn new(
        street: impl Into<String>,
        postal_code: impl Into<String>,
        town: impl Into<String>,
        province: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            postal_code: postal_code.into(),
            town: town.into(),
            province: province.into(),
            country_code: "ESP".to_string(),
        }
    }

    /// ISO 3166-1 alpha-3 country code.
    pub fn country(mut self, code: impl Into<String>) -> Self {
        self.country_code = code.into();
        self
    }

    pub fn build(self) -> Address {
        Address {
            street: self.street,
            postal_code: self.postal_code,
            town: self.town,
            province: self.province,
            country_code: self.country_code,
        }
    }
}

/// Builder for LineItem.
///
/// Collects a [`LineItemInput`] and hands it to [`LineItem::from_input`]
/// on `build()`, so both construction paths share the same validation.
pub struct LineItemBuilder {
    input: LineItemInput,
    catalog: WithholdingCatalog,
}

impl LineItemBuilder {
    /// Item priced tax-inclusive; the tax-exclusive price is derived.
    pub fn new(name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            input: LineItemInput {
                name: Some(name.into()),
                unit_price: Some(unit_price),
                ..Default::default()
            },
            catalog: WithholdingCatalog::default(),
        }
    }

    /// Item priced tax-exclusive.
    pub fn without_tax(name: impl Into<String>, unit_price_without_tax: Decimal) -> Self {
        Self {
            input: LineItemInput {
                name: Some(name.into()),
                unit_price_without_tax: Some(unit_price_without_tax),
                ..Default::default()
            },
            catalog: WithholdingCatalog::default(),
        }
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.input.quantity = Some(quantity);
        self
    }

    /// Facturae unit-of-measure code, see [`units`](super::units).
    pub fn unit(mut self, code: impl Into<String>) -> Self {
        self.input.unit_of_measure = Some(code.into());
        self
    }

    pub fn article_code(mut self, code: impl Into<String>) -> Self {
        self.input.article_code = Some(code.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.input.description = Some(description.into());
        self
    }

    /// Tax entry whose group is decided by the withholding catalog.
    pub fn tax(mut self, code: impl Into<String>, rate: Decimal) -> Self {
        self.input.taxes.push(TaxInput::new(code, rate));
        self
    }

    pub fn output_tax(mut self, code: impl Into<String>, rate: Decimal) -> Self {
        self.input.taxes_outputs.push(TaxInput::new(code, rate));
        self
    }

    /// Output tax with an equivalence surcharge.
    pub fn output_tax_with_surcharge(
        mut self,
        code: impl Into<String>,
        rate: Decimal,
        surcharge: Decimal,
    ) -> Self {
        self.input.taxes_outputs.push(TaxInput {
            surcharge: Some(surcharge),
            ..TaxInput::new(code, rate)
        });
        self
    }

    pub fn withheld_tax(mut self, code: impl Into<String>, rate: Decimal) -> Self {
        self.input.taxes_withheld.push(TaxInput::new(code, rate));
        self
    }

    pub fn discount_rate(mut self, reason: impl Into<String>, rate: Decimal) -> Self {
        self.input.discounts.push(rate_input(reason, rate));
        self
    }

    /// Flat discount; `has_taxes` marks the amount as tax-inclusive.
    pub fn discount_amount(
        mut self,
        reason: impl Into<String>,
        amount: Decimal,
        has_taxes: bool,
    ) -> Self {
        self.input.discounts.push(amount_input(reason, amount, has_taxes));
        self
    }

    pub fn charge_rate(mut self, reason: impl Into<String>, rate: Decimal) -> Self {
        self.input.charges.push(rate_input(reason, rate));
        self
    }

    /// Flat charge; `has_taxes` marks the amount as tax-inclusive.
    pub fn charge_amount(
        mut self,
        reason: impl Into<String>,
        amount: Decimal,
        has_taxes: bool,
    ) -> Self {
        self.input.charges.push(amount_input(reason, amount, has_taxes));
        self
    }

    pub fn issuer_contract(mut self, reference: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.input.issuer_contract_reference = Some(reference.into());
        self.input.issuer_contract_date = date;
        self
    }

    pub fn issuer_transaction(
        mut self,
        reference: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        self.input.issuer_transaction_reference = Some(reference.into());
        self.input.issuer_transaction_date = date;
        self
    }

    pub fn receiver_contract(
        mut self,
        reference: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        self.input.receiver_contract_reference = Some(reference.into());
        self.input.receiver_contract_date = date;
        self
    }

    pub fn receiver_transaction(
        mut self,
        reference: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        self.input.receiver_transaction_reference = Some(reference.into());
        self.input.receiver_transaction_date = date;
        self
    }

    pub fn file_reference(mut self, reference: impl Into<String>, date: Option<NaiveDate>) -> Self {
        self.input.file_reference = Some(reference.into());
        self.input.file_date = date;
        self
    }

    pub fn sequence_number(mut self, sequence: impl Into<String>) -> Self {
        self.input.sequence_number = Some(sequence.into());
        self
    }

    pub fn period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.input.period_start = Some(start);
        self.input.period_end = Some(end);
        self
    }

    /// Replace the catalog used to classify entries added with [`tax`](Self::tax).
    pub fn catalog(mut self, catalog: WithholdingCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn build(self) -> Result<LineItem, FacturaeError> {
        LineItem::from_input(self.input, &self.catalog)
    }
}

fn rate_input(reason: impl Into<String>, rate: Decimal) -> AdjustmentInput {
    AdjustmentInput {
        reason: reason.into(),
        rate: Some(rate),
        amount: None,
        has_taxes: None,
    }
}

fn amount_input(reason: impl Into<String>, amount: Decimal, has_taxes: bool) -> AdjustmentInput {
    AdjustmentInput {
        reason: reason.into(),
        rate: None,
        amount: Some(amount),
        has_taxes: Some(has_taxes),
    }
}
