#![cfg(feature = "export")]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use facturae::core::*;
use facturae::export::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn address() -> Address {
    AddressBuilder::new("Calle Mayor 1", "28013", "Madrid", "Madrid").build()
}

fn seller() -> Party {
    PartyBuilder::legal_entity("A00000000", "Proveedor SL", address()).build()
}

fn buyer() -> Party {
    PartyBuilder::legal_entity("B00000000", "Cliente SL", address()).build()
}

fn base_invoice() -> InvoiceBuilder {
    InvoiceBuilder::new("0001", date(2024, 6, 15))
        .series("FAC")
        .seller(seller())
        .buyer(buyer())
}

fn consulting() -> LineItem {
    LineItemBuilder::new("Consultoria", dec!(100))
        .output_tax(TAX_IVA, dec!(21))
        .build()
        .unwrap()
}

fn export(invoice: &mut Invoice) -> String {
    Exporter::new().export(invoice).unwrap().into_string()
}

/// Text between the first `<open>` and its matching close tag.
fn section<'a>(xml: &'a str, tag: &str) -> &'a str {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open).unwrap() + open.len();
    let end = start + xml[start..].find(&close).unwrap();
    &xml[start..end]
}

// ---------------------------------------------------------------------------
// Rounding scenarios
// ---------------------------------------------------------------------------

#[test]
fn tax_inclusive_price_drifts_one_cent() {
    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let xml = export(&mut invoice);

    let line = section(&xml, "InvoiceLine");
    assert!(line.contains("<UnitPriceWithoutTax>82.64</UnitPriceWithoutTax>"));
    assert!(line.contains("<TotalCost>82.64</TotalCost>"));
    assert!(line.contains("<GrossAmount>82.64</GrossAmount>"));
    assert!(line.contains("<TaxAmount><TotalAmount>17.35</TotalAmount></TaxAmount>"));

    let totals = section(&xml, "InvoiceTotals");
    assert!(totals.contains("<TotalGrossAmountBeforeTaxes>82.64</TotalGrossAmountBeforeTaxes>"));
    assert!(totals.contains("<TotalTaxOutputs>17.35</TotalTaxOutputs>"));
    assert!(totals.contains("<InvoiceTotal>99.99</InvoiceTotal>"));
}

#[test]
fn tax_inclusive_flat_charge_is_divided_before_gross() {
    let item = LineItemBuilder::new("Consultoria", dec!(100))
        .output_tax(TAX_IVA, dec!(21))
        .charge_amount("Desplazamiento", dec!(10), true)
        .build()
        .unwrap();
    let mut invoice = base_invoice().add_item(item).build().unwrap();
    let xml = export(&mut invoice);

    let line = section(&xml, "InvoiceLine");
    assert!(line.contains(
        "<Charges><Charge><ChargeReason>Desplazamiento</ChargeReason>\
         <ChargeAmount>8.26</ChargeAmount></Charge></Charges>"
    ));
    assert!(line.contains("<GrossAmount>90.90</GrossAmount>"));
    assert!(line.contains("<TaxAmount><TotalAmount>19.09</TotalAmount></TaxAmount>"));
    assert!(xml.contains("<InvoiceTotal>109.99</InvoiceTotal>"));
}

#[test]
fn general_discount_reduces_total_before_taxes() {
    let item = LineItemBuilder::without_tax("Licencia", dec!(200))
        .output_tax(TAX_IVA, dec!(21))
        .build()
        .unwrap();
    let mut invoice = base_invoice()
        .add_item(item)
        .general_discount_rate("Pronto pago", dec!(5))
        .build()
        .unwrap();
    let xml = export(&mut invoice);

    let totals = section(&xml, "InvoiceTotals");
    assert!(totals.contains(
        "<GeneralDiscounts><Discount><DiscountReason>Pronto pago</DiscountReason>\
         <DiscountRate>5.00</DiscountRate><DiscountAmount>10.00</DiscountAmount>\
         </Discount></GeneralDiscounts>"
    ));
    assert!(totals.contains("<TotalGeneralDiscounts>10.00</TotalGeneralDiscounts>"));
    assert!(totals.contains("<TotalGrossAmountBeforeTaxes>190.00</TotalGrossAmountBeforeTaxes>"));
    // Tax stays on the line's own base.
    assert!(totals.contains("<TotalTaxOutputs>42.00</TotalTaxOutputs>"));
    assert!(totals.contains("<InvoiceTotal>232.00</InvoiceTotal>"));
}

#[test]
fn equivalence_surcharge_stays_on_the_line() {
    let item = LineItemBuilder::without_tax("Mercancia", dec!(100))
        .output_tax_with_surcharge(TAX_IVA, dec!(21), dec!(5.2))
        .build()
        .unwrap();
    let mut invoice = base_invoice().add_item(item).build().unwrap();
    let xml = export(&mut invoice);

    let (head, lines) = xml.split_once("<Items>").unwrap();
    assert!(!head.contains("EquivalenceSurcharge"));
    assert!(lines.contains(
        "<EquivalenceSurcharge>5.20</EquivalenceSurcharge>\
         <EquivalenceSurchargeAmount><TotalAmount>5.20</TotalAmount></EquivalenceSurchargeAmount>"
    ));

    let totals = section(&xml, "InvoiceTotals");
    assert!(totals.contains("<TotalTaxOutputs>21.00</TotalTaxOutputs>"));
    assert!(totals.contains("<InvoiceTotal>121.00</InvoiceTotal>"));
    assert_eq!(section(&xml, "Batch").matches("<TotalAmount>121.00</TotalAmount>").count(), 3);
}

#[test]
fn withheld_tax_is_reported_but_not_subtracted() {
    let item = LineItemBuilder::without_tax("Honorarios", dec!(1000))
        .output_tax(TAX_IVA, dec!(21))
        .withheld_tax(TAX_IRPF, dec!(15))
        .build()
        .unwrap();
    let mut invoice = base_invoice().add_item(item).build().unwrap();
    let xml = export(&mut invoice);

    let totals = section(&xml, "InvoiceTotals");
    assert!(totals.contains("<TotalTaxesWithheld>150.00</TotalTaxesWithheld>"));
    assert!(totals.contains("<InvoiceTotal>1210.00</InvoiceTotal>"));
}

#[test]
fn schema_3_2_keeps_six_decimals_on_line_figures() {
    let item = LineItemBuilder::without_tax("Tornillo", dec!(0.123456))
        .quantity(dec!(7))
        .output_tax(TAX_IVA, dec!(21))
        .build()
        .unwrap();
    let mut invoice = base_invoice()
        .version(SchemaVersion::V3_2)
        .add_item(item)
        .build()
        .unwrap();
    let xml = export(&mut invoice);

    assert!(xml.contains("<SchemaVersion>3.2</SchemaVersion>"));
    assert!(xml.contains("xmlns:fe=\"http://www.facturae.es/Facturae/2009/v3.2/Facturae\""));
    let line = section(&xml, "InvoiceLine");
    assert!(line.contains("<Quantity>7</Quantity>"));
    assert!(line.contains("<UnitPriceWithoutTax>0.123456</UnitPriceWithoutTax>"));
    // 0.864192 re-rounded to the taxable-base precision
    assert!(line.contains("<TotalCost>0.860000</TotalCost>"));
    assert!(line.contains("<GrossAmount>0.860000</GrossAmount>"));
}

// ---------------------------------------------------------------------------
// Element order and omission
// ---------------------------------------------------------------------------

#[test]
fn corrective_without_tax_period_omits_the_period_only() {
    let mut corrective = Corrective::new(CorrectiveReason::TaxAmount, CorrectionMethod::Differences);
    corrective.invoice_number = Some("0000".into());
    corrective.tax_period_start = Some(date(2024, 1, 1));
    let mut invoice = base_invoice()
        .invoice_class(InvoiceClass::Corrective)
        .corrective(corrective)
        .add_item(consulting())
        .build()
        .unwrap();
    let xml = export(&mut invoice);

    let block = section(&xml, "Corrective");
    assert!(!block.contains("<TaxPeriod>"));
    assert!(block.contains("<InvoiceNumber>0000</InvoiceNumber>"));
    assert!(block.contains("<ReasonCode>12</ReasonCode>"));
    assert!(block.contains("<ReasonDescription>Cuota tributaria a aplicar</ReasonDescription>"));
    assert!(block.contains("<CorrectionMethod>02</CorrectionMethod>"));
    assert!(block.contains(
        "<CorrectionMethodDescription>Rectificación por diferencias</CorrectionMethodDescription>"
    ));
    assert!(xml.contains("<InvoiceClass>OR</InvoiceClass>"));
}

#[test]
fn corrective_with_tax_period_renders_it_before_method() {
    let mut corrective = Corrective::new(CorrectiveReason::TaxRate, CorrectionMethod::Full);
    corrective.tax_period_start = Some(date(2024, 1, 1));
    corrective.tax_period_end = Some(date(2024, 3, 31));
    let mut invoice = base_invoice()
        .corrective(corrective)
        .add_item(consulting())
        .build()
        .unwrap();
    let xml = export(&mut invoice);

    assert!(section(&xml, "Corrective").contains(
        "<TaxPeriod><StartDate>2024-01-01</StartDate><EndDate>2024-03-31</EndDate></TaxPeriod>\
         <CorrectionMethod>01</CorrectionMethod>"
    ));
}

#[test]
fn tax_groups_are_ordered_differently_per_level() {
    let item = LineItemBuilder::without_tax("Honorarios", dec!(100))
        .output_tax(TAX_IVA, dec!(21))
        .withheld_tax(TAX_IRPF, dec!(15))
        .build()
        .unwrap();
    let mut invoice = base_invoice().add_item(item).build().unwrap();
    let xml = export(&mut invoice);

    let (invoice_level, _) = xml.split_once("<InvoiceTotals>").unwrap();
    let outputs = invoice_level.find("<TaxesOutputs>").unwrap();
    let withheld = invoice_level.find("<TaxesWithheld>").unwrap();
    assert!(outputs < withheld, "invoice level: outputs first");

    let line = section(&xml, "InvoiceLine");
    let outputs = line.find("<TaxesOutputs>").unwrap();
    let withheld = line.find("<TaxesWithheld>").unwrap();
    assert!(withheld < outputs, "line level: withheld first");
}

#[test]
fn optional_blocks_are_omitted() {
    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let xml = export(&mut invoice);

    for tag in [
        "<PaymentDetails>",
        "<AdditionalData>",
        "<LegalLiterals>",
        "<Corrective>",
        "<FactoringAssignmentData>",
        "<GeneralDiscounts>",
        "<TaxesWithheld>",
        "<InvoicingPeriod>",
        "<ContactDetails>",
        "<LineItemPeriod>",
    ] {
        assert!(!xml.contains(tag), "unexpected {tag}");
    }
}

#[test]
fn line_references_precede_description() {
    let item = LineItemBuilder::new("Consultoria", dec!(100))
        .output_tax(TAX_IVA, dec!(21))
        .issuer_contract("CT-9", Some(date(2024, 2, 1)))
        .file_reference("EXP-1", None)
        .sequence_number("3")
        .period(date(2024, 5, 1), date(2024, 5, 31))
        .description("Mayo")
        .article_code("SRV-01")
        .build()
        .unwrap();
    let mut invoice = base_invoice().add_item(item).build().unwrap();
    let xml = export(&mut invoice);

    let line = section(&xml, "InvoiceLine");
    assert!(line.starts_with(
        "<IssuerContractReference>CT-9</IssuerContractReference>\
         <IssuerContractDate>2024-02-01</IssuerContractDate>\
         <FileReference>EXP-1</FileReference>\
         <SequenceNumber>3</SequenceNumber>\
         <ItemDescription>Consultoria</ItemDescription>"
    ));
    assert!(line.ends_with(
        "<LineItemPeriod><StartDate>2024-05-01</StartDate><EndDate>2024-05-31</EndDate></LineItemPeriod>\
         <AdditionalLineItemInformation>Mayo</AdditionalLineItemInformation>\
         <ArticleCode>SRV-01</ArticleCode>"
    ));
}

// ---------------------------------------------------------------------------
// Payment, factoring, additional data
// ---------------------------------------------------------------------------

#[test]
fn debit_payment_uses_account_to_be_debited() {
    let mut invoice = base_invoice()
        .payment_method(PaymentMethod::Debit)
        .payment_account("ES9121000418450200051332", Some("CAIXESBBXXX".into()))
        .due_date(date(2024, 7, 15))
        .add_item(consulting())
        .build()
        .unwrap();
    let xml = export(&mut invoice);

    assert!(xml.contains(
        "<PaymentDetails><Installment><InstallmentDueDate>2024-07-15</InstallmentDueDate>\
         <InstallmentAmount>99.99</InstallmentAmount><PaymentMeans>02</PaymentMeans>\
         <AccountToBeDebited><IBAN>ES9121000418450200051332</IBAN><BIC>CAIXESBBXXX</BIC>\
         </AccountToBeDebited></Installment></PaymentDetails>"
    ));
}

#[test]
fn transfer_payment_uses_account_to_be_credited() {
    let mut invoice = base_invoice()
        .payment_method(PaymentMethod::Transfer)
        .payment_account("ES9121000418450200051332", None)
        .add_item(consulting())
        .build()
        .unwrap();
    let xml = export(&mut invoice);

    let payment = section(&xml, "Installment");
    assert!(payment.contains("<InstallmentDueDate>2024-06-15</InstallmentDueDate>"));
    assert!(payment.contains(
        "<AccountToBeCredited><IBAN>ES9121000418450200051332</IBAN></AccountToBeCredited>"
    ));
    assert!(!payment.contains("<BIC>"));
}

#[test]
fn factoring_block_sits_in_file_header() {
    let assignee = PartyBuilder::legal_entity("C00000000", "Factor SA", address())
        .email("cesion@factor.example")
        .build();
    let mut invoice = base_invoice()
        .assignee(assignee)
        .assignment_clauses("Cesion de credito")
        .payment_method(PaymentMethod::Transfer)
        .payment_account("ES9121000418450200051332", None)
        .add_item(consulting())
        .build()
        .unwrap();
    let xml = export(&mut invoice);

    let header = section(&xml, "FileHeader");
    let factoring = section(header, "FactoringAssignmentData");
    assert!(factoring.contains("<TaxIdentificationNumber>C00000000</TaxIdentificationNumber>"));
    assert!(factoring.contains("<ElectronicMail>cesion@factor.example</ElectronicMail>"));
    assert!(factoring.contains("<PaymentMeans>04</PaymentMeans>"));
    assert!(factoring.ends_with(
        "<FactoringAssignmentClauses>Cesion de credito</FactoringAssignmentClauses>"
    ));
}

#[test]
fn attachments_are_base64_encoded() {
    let mut invoice = base_invoice()
        .add_item(consulting())
        .related_invoice("0000")
        .additional_information("Gracias")
        .attachment(Attachment::new("application/pdf", "Albaran", b"hello".to_vec()))
        .build()
        .unwrap();
    let xml = export(&mut invoice);

    assert_eq!(
        section(&xml, "AdditionalData"),
        "<RelatedInvoice>0000</RelatedInvoice>\
         <RelatedDocuments><Attachment>\
         <AttachmentCompressionAlgorithm>NONE</AttachmentCompressionAlgorithm>\
         <AttachmentFormat>pdf</AttachmentFormat>\
         <AttachmentEncoding>BASE64</AttachmentEncoding>\
         <AttachmentDescription>Albaran</AttachmentDescription>\
         <AttachmentData>aGVsbG8=</AttachmentData>\
         </Attachment></RelatedDocuments>\
         <InvoiceAdditionalInformation>Gracias</InvoiceAdditionalInformation>"
    );
}

#[test]
fn overseas_individual_buyer() {
    let abroad = AddressBuilder::new("Rue de Rivoli 1", "75001", "Paris", "Paris")
        .country("FRA")
        .build();
    let buyer = PartyBuilder::individual("FR00000000000", "Jean", "Martin", abroad).build();
    let mut invoice = base_invoice().buyer(buyer).add_item(consulting()).build().unwrap();
    let xml = export(&mut invoice);

    let party = section(&xml, "BuyerParty");
    assert!(party.contains("<PersonTypeCode>F</PersonTypeCode><ResidenceTypeCode>U</ResidenceTypeCode>"));
    assert!(party.contains("<Individual><Name>Jean</Name><FirstSurname>Martin</FirstSurname>"));
    assert!(party.contains("<PostCodeAndTown>75001 Paris</PostCodeAndTown>"));
}

// ---------------------------------------------------------------------------
// Extensions and signing
// ---------------------------------------------------------------------------

type Log = Rc<RefCell<Vec<String>>>;

struct Disclaimer;

impl Extension for Disclaimer {
    fn on_before_export(&mut self, invoice: &mut Invoice) -> Result<(), FacturaeError> {
        invoice
            .legal_literals
            .push("Factura exenta de IVA segun art. 20".into());
        Ok(())
    }

    fn additional_data(&self, invoice: &Invoice) -> Option<String> {
        Some(format!("<Disclaimer><Lines>{}</Lines></Disclaimer>", invoice.items.len()))
    }
}

struct Recorder {
    name: &'static str,
    log: Log,
}

impl Extension for Recorder {
    fn on_before_export(&mut self, _invoice: &mut Invoice) -> Result<(), FacturaeError> {
        self.log.borrow_mut().push(format!("{}:before_export", self.name));
        Ok(())
    }

    fn on_before_sign(&mut self, content: String) -> Result<String, FacturaeError> {
        self.log.borrow_mut().push(format!("{}:before_sign", self.name));
        Ok(content)
    }

    fn on_after_sign(&mut self, content: String) -> Result<String, FacturaeError> {
        self.log.borrow_mut().push(format!("{}:after_sign", self.name));
        Ok(content)
    }
}

#[test]
fn extension_edits_invoice_and_contributes_data() {
    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let xml = Exporter::new()
        .with_extension(Disclaimer)
        .export(&mut invoice)
        .unwrap()
        .into_string();

    assert!(xml.contains(
        "<LegalLiterals><LegalReference>Factura exenta de IVA segun art. 20</LegalReference></LegalLiterals>"
    ));
    assert!(xml.contains(
        "<AdditionalData><Extensions><Disclaimer><Lines>1</Lines></Disclaimer></Extensions></AdditionalData>"
    ));
    assert_eq!(invoice.legal_literals.len(), 1);
}

#[test]
fn hooks_run_in_stage_then_registration_order() {
    let log = Log::default();
    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let signer_log = log.clone();
    Exporter::new()
        .with_extension(Recorder {
            name: "a",
            log: log.clone(),
        })
        .with_extension(Recorder {
            name: "b",
            log: log.clone(),
        })
        .with_signer(move |doc: &str| -> Result<String, SigningError> {
            signer_log.borrow_mut().push("sign".into());
            Ok(doc.to_string())
        })
        .export(&mut invoice)
        .unwrap();

    assert_eq!(
        *log.borrow(),
        [
            "a:before_export",
            "b:before_export",
            "a:before_sign",
            "b:before_sign",
            "sign",
            "a:after_sign",
            "b:after_sign",
        ]
    );
}

#[test]
fn signer_output_is_returned_after_the_declaration() {
    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let doc = Exporter::new()
        .with_signer(|doc: &str| -> Result<String, SigningError> {
            Ok(doc.replace("</fe:Facturae>", "<ds:Signature/></fe:Facturae>"))
        })
        .export(&mut invoice)
        .unwrap();

    assert!(doc.as_str().starts_with(XML_DECLARATION));
    assert_eq!(doc.as_str().matches("<?xml").count(), 1);
    assert!(doc.as_str().ends_with("<ds:Signature/></fe:Facturae>"));
}

#[test]
fn empty_signer_output_still_carries_the_declaration() {
    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let doc = Exporter::new()
        .with_signer(|_: &str| -> Result<String, SigningError> { Ok(String::new()) })
        .export(&mut invoice)
        .unwrap();

    assert_eq!(doc.as_str(), XML_DECLARATION);
    assert_eq!(doc.len(), XML_DECLARATION.len());
}

#[test]
fn signing_failure_aborts_without_output() {
    let log = Log::default();
    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let err = Exporter::new()
        .with_extension(Recorder {
            name: "a",
            log: log.clone(),
        })
        .with_signer(|_: &str| -> Result<String, SigningError> {
            Err(SigningError::new("certificate expired"))
        })
        .export(&mut invoice)
        .unwrap_err();

    assert!(matches!(err, FacturaeError::Signing(_)));
    assert!(err.to_string().contains("certificate expired"));
    assert!(!log.borrow().iter().any(|entry| entry.ends_with("after_sign")));
}

#[test]
fn validation_runs_before_any_rendering() {
    let log = Log::default();
    let mut invoice = InvoiceBuilder::new("0001", date(2024, 6, 15))
        .seller(seller())
        .add_item(consulting())
        .build_unchecked();
    let err = Exporter::new()
        .with_extension(Recorder {
            name: "a",
            log: log.clone(),
        })
        .export(&mut invoice)
        .unwrap_err();

    assert!(matches!(err, FacturaeError::Validation(_)));
    assert!(err.to_string().contains("buyer"));
    assert_eq!(*log.borrow(), ["a:before_export"]);
}

#[test]
fn failing_extension_aborts_export() {
    struct Veto;
    impl Extension for Veto {
        fn on_before_sign(&mut self, _content: String) -> Result<String, FacturaeError> {
            Err(FacturaeError::Extension("rejected by policy".into()))
        }
    }

    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let err = Exporter::new()
        .with_extension(Veto)
        .export(&mut invoice)
        .unwrap_err();
    assert!(matches!(err, FacturaeError::Extension(_)));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn written_file_matches_returned_document() {
    let mut invoice = base_invoice().add_item(consulting()).build().unwrap();
    let doc = Exporter::new().export(&mut invoice).unwrap();

    let path = std::env::temp_dir().join(format!("facturae-parity-{}.xml", std::process::id()));
    let written = doc.write_to(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written, doc.len());
    assert_eq!(bytes, doc.as_str().as_bytes());
}

#[test]
fn export_is_deterministic() {
    let mut first = base_invoice().add_item(consulting()).build().unwrap();
    let mut second = first.clone();
    let mut exporter = Exporter::new();
    assert_eq!(
        exporter.export(&mut first).unwrap(),
        exporter.export(&mut second).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Snapshot tests (insta)
// ---------------------------------------------------------------------------

#[test]
fn minimal_document_snapshot() {
    let item = LineItemBuilder::without_tax("Servicio", dec!(50))
        .quantity(dec!(2))
        .output_tax(TAX_IVA, dec!(21))
        .build()
        .unwrap();
    let mut invoice = InvoiceBuilder::new("7", date(2024, 3, 1))
        .series("A")
        .seller(seller())
        .buyer(buyer())
        .add_item(item)
        .build()
        .unwrap();
    let doc = Exporter::new().export(&mut invoice).unwrap();

    insta::assert_snapshot!(doc.as_str(), @r##"
    <?xml version="1.0" encoding="UTF-8"?>
    <fe:Facturae xmlns:ds="http://www.w3.org/2000/09/xmldsig#" xmlns:fe="http://www.facturae.gob.es/formato/Versiones/Facturaev3_2_2.xml"><FileHeader><SchemaVersion>3.2.2</SchemaVersion><Modality>I</Modality><InvoiceIssuerType>EM</InvoiceIssuerType><Batch><BatchIdentifier>A000000007A</BatchIdentifier><InvoicesCount>1</InvoicesCount><TotalInvoicesAmount><TotalAmount>121.00</TotalAmount></TotalInvoicesAmount><TotalOutstandingAmount><TotalAmount>121.00</TotalAmount></TotalOutstandingAmount><TotalExecutableAmount><TotalAmount>121.00</TotalAmount></TotalExecutableAmount><InvoiceCurrencyCode>EUR</InvoiceCurrencyCode></Batch></FileHeader><Parties><SellerParty><TaxIdentification><PersonTypeCode>J</PersonTypeCode><ResidenceTypeCode>R</ResidenceTypeCode><TaxIdentificationNumber>A00000000</TaxIdentificationNumber></TaxIdentification><LegalEntity><CorporateName>Proveedor SL</CorporateName><AddressInSpain><Address>Calle Mayor 1</Address><PostCode>28013</PostCode><Town>Madrid</Town><Province>Madrid</Province><CountryCode>ESP</CountryCode></AddressInSpain></LegalEntity></SellerParty><BuyerParty><TaxIdentification><PersonTypeCode>J</PersonTypeCode><ResidenceTypeCode>R</ResidenceTypeCode><TaxIdentificationNumber>B00000000</TaxIdentificationNumber></TaxIdentification><LegalEntity><CorporateName>Cliente SL</CorporateName><AddressInSpain><Address>Calle Mayor 1</Address><PostCode>28013</PostCode><Town>Madrid</Town><Province>Madrid</Province><CountryCode>ESP</CountryCode></AddressInSpain></LegalEntity></BuyerParty></Parties><Invoices><Invoice><InvoiceHeader><InvoiceNumber>7</InvoiceNumber><InvoiceSeriesCode>A</InvoiceSeriesCode><InvoiceDocumentType>FC</InvoiceDocumentType><InvoiceClass>OO</InvoiceClass></InvoiceHeader><InvoiceIssueData><IssueDate>2024-03-01</IssueDate><InvoiceCurrencyCode>EUR</InvoiceCurrencyCode><TaxCurrencyCode>EUR</TaxCurrencyCode><LanguageName>es</LanguageName></InvoiceIssueData><TaxesOutputs><Tax><TaxTypeCode>01</TaxTypeCode><TaxRate>21.00</TaxRate><TaxableBase><TotalAmount>100.00</TotalAmount></TaxableBase><TaxAmount><TotalAmount>21.00</TotalAmount></TaxAmount></Tax></TaxesOutputs><InvoiceTotals><TotalGrossAmount>100.00</TotalGrossAmount><TotalGeneralDiscounts>0.00</TotalGeneralDiscounts><TotalGeneralSurcharges>0.00</TotalGeneralSurcharges><TotalGrossAmountBeforeTaxes>100.00</TotalGrossAmountBeforeTaxes><TotalTaxOutputs>21.00</TotalTaxOutputs><TotalTaxesWithheld>0.00</TotalTaxesWithheld><InvoiceTotal>121.00</InvoiceTotal><TotalOutstandingAmount>121.00</TotalOutstandingAmount><TotalExecutableAmount>121.00</TotalExecutableAmount></InvoiceTotals><Items><InvoiceLine><ItemDescription>Servicio</ItemDescription><Quantity>2</Quantity><UnitOfMeasure>01</UnitOfMeasure><UnitPriceWithoutTax>50.00</UnitPriceWithoutTax><TotalCost>100.00</TotalCost><GrossAmount>100.00</GrossAmount><TaxesOutputs><Tax><TaxTypeCode>01</TaxTypeCode><TaxRate>21.00</TaxRate><TaxableBase><TotalAmount>100.00</TotalAmount></TaxableBase><TaxAmount><TotalAmount>21.00</TotalAmount></TaxAmount></Tax></TaxesOutputs></InvoiceLine></Items></Invoice></Invoices></fe:Facturae>
    "##);
}
