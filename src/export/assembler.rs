//! Facturae document body.
//!
//! Element order follows the Facturae XSD sequence exactly; validators
//! reject documents whose elements are merely reordered. Numbers go
//! through [`PrecisionPolicy::format`] right before they are written.

use base64::{Engine as _, engine::general_purpose};
use rust_decimal::Decimal;

use super::party::write_party;
use super::xml::XmlWriter;
use crate::core::accountant::{checked_add, checked_sum};
use crate::core::{
    ComputedLineItem, ComputedTax, FacturaeError, Field, Invoice, InvoiceTotals, LineItem,
    Party, PaymentMethod, PrecisionPolicy, ResolvedAdjustment, SchemaVersion,
};

const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";
const ROOT: &str = "fe:Facturae";

/// Renders one invoice into an unsigned document (no XML declaration).
pub(crate) struct Assembler<'a> {
    invoice: &'a Invoice,
    totals: &'a InvoiceTotals,
    policy: &'a PrecisionPolicy,
    version: SchemaVersion,
    extension_data: &'a [String],
}

impl<'a> Assembler<'a> {
    pub fn new(
        invoice: &'a Invoice,
        totals: &'a InvoiceTotals,
        policy: &'a PrecisionPolicy,
        extension_data: &'a [String],
    ) -> Self {
        Self {
            invoice,
            totals,
            policy,
            version: invoice.version,
            extension_data,
        }
    }

    pub fn render(&self) -> Result<String, FacturaeError> {
        let invoice = self.invoice;
        let seller = required_party(invoice.seller.as_ref(), "seller")?;
        let buyer = required_party(invoice.buyer.as_ref(), "buyer")?;

        // Tax-group pass: the rendered total is built from the items' own
        // output tax amounts rather than the aggregate. Surcharges stay out.
        let items = self.compute_items()?;
        let output_contributions = checked_sum(
            items.iter().flat_map(|i| i.taxes_outputs.iter()).map(|t| t.amount),
            "taxes_outputs",
        )?;
        let invoice_total = checked_add(
            self.totals.gross_amount_before_taxes,
            output_contributions,
            "invoice_total",
        )?;

        let mut w = XmlWriter::new();
        w.start_element_with_attrs(
            ROOT,
            &[
                ("xmlns:ds", XMLDSIG_NS),
                ("xmlns:fe", self.version.namespace()),
            ],
        )?;

        self.write_file_header(&mut w, seller, invoice_total)?;

        w.start_element("Parties")?;
        w.start_element("SellerParty")?;
        write_party(&mut w, seller)?;
        w.end_element("SellerParty")?;
        w.start_element("BuyerParty")?;
        write_party(&mut w, buyer)?;
        w.end_element("BuyerParty")?;
        w.end_element("Parties")?;

        w.start_element("Invoices")?;
        w.start_element("Invoice")?;
        self.write_invoice_header(&mut w)?;
        self.write_issue_data(&mut w)?;
        self.write_invoice_taxes(&mut w, &items)?;
        self.write_invoice_totals(&mut w, output_contributions, invoice_total)?;
        self.write_items(&mut w)?;
        self.write_payment_details(&mut w, invoice_total)?;
        if !invoice.legal_literals.is_empty() {
            w.start_element("LegalLiterals")?;
            for literal in &invoice.legal_literals {
                w.text_element("LegalReference", literal)?;
            }
            w.end_element("LegalLiterals")?;
        }
        self.write_additional_data(&mut w)?;
        w.end_element("Invoice")?;
        w.end_element("Invoices")?;

        w.end_element(ROOT)?;
        w.into_string()
    }

    fn compute_items(&self) -> Result<Vec<ComputedLineItem>, FacturaeError> {
        self.invoice
            .items
            .iter()
            .map(|item| item.compute(self.version, self.policy))
            .collect()
    }

    fn number(
        &self,
        w: &mut XmlWriter,
        name: &str,
        value: Decimal,
        field: Field,
    ) -> Result<(), FacturaeError> {
        let text = self.policy.format(value, field, self.version)?;
        w.text_element(name, &text)?;
        Ok(())
    }

    /// `<name><TotalAmount>value</TotalAmount></name>`.
    fn total_amount(
        &self,
        w: &mut XmlWriter,
        name: &str,
        value: Decimal,
        field: Field,
    ) -> Result<(), FacturaeError> {
        w.start_element(name)?;
        self.number(w, "TotalAmount", value, field)?;
        w.end_element(name)?;
        Ok(())
    }

    fn write_file_header(
        &self,
        w: &mut XmlWriter,
        seller: &Party,
        invoice_total: Decimal,
    ) -> Result<(), FacturaeError> {
        let invoice = self.invoice;
        w.start_element("FileHeader")?;
        w.text_element("SchemaVersion", self.version.as_str())?;
        w.text_element("Modality", "I")?;
        w.text_element("InvoiceIssuerType", "EM")?;

        w.start_element("Batch")?;
        let batch_identifier = format!("{}{}{}", seller.tax_number, invoice.number, invoice.series);
        w.text_element("BatchIdentifier", &batch_identifier)?;
        w.text_element("InvoicesCount", "1")?;
        self.total_amount(w, "TotalInvoicesAmount", invoice_total, Field::InvoiceTotal)?;
        self.total_amount(w, "TotalOutstandingAmount", invoice_total, Field::InvoiceTotal)?;
        self.total_amount(w, "TotalExecutableAmount", invoice_total, Field::InvoiceTotal)?;
        w.text_element("InvoiceCurrencyCode", &invoice.currency)?;
        w.end_element("Batch")?;

        if let Some(assignee) = &invoice.assignee {
            tracing::debug!("rendering factoring assignment");
            w.start_element("FactoringAssignmentData")?;
            w.start_element("Assignee")?;
            write_party(w, assignee)?;
            w.end_element("Assignee")?;
            self.write_payment_details(w, invoice_total)?;
            w.optional_element(
                "FactoringAssignmentClauses",
                invoice.assignment_clauses.as_deref(),
            )?;
            w.end_element("FactoringAssignmentData")?;
        }

        w.end_element("FileHeader")?;
        Ok(())
    }

    fn write_invoice_header(&self, w: &mut XmlWriter) -> Result<(), FacturaeError> {
        let invoice = self.invoice;
        w.start_element("InvoiceHeader")?;
        w.text_element("InvoiceNumber", &invoice.number)?;
        w.text_element("InvoiceSeriesCode", &invoice.series)?;
        w.text_element("InvoiceDocumentType", invoice.document_type.code())?;
        w.text_element("InvoiceClass", invoice.invoice_class.code())?;

        if let Some(corrective) = &invoice.corrective {
            tracing::debug!(reason = corrective.reason.code(), "rendering corrective block");
            w.start_element("Corrective")?;
            w.optional_element("InvoiceNumber", corrective.invoice_number.as_deref())?;
            w.optional_element(
                "InvoiceSeriesCode",
                corrective.invoice_series_code.as_deref(),
            )?;
            w.text_element("ReasonCode", corrective.reason.code())?;
            w.text_element("ReasonDescription", corrective.reason_description())?;
            if let Some(period) = corrective.tax_period() {
                w.period_element("TaxPeriod", period.start, period.end)?;
            }
            w.text_element("CorrectionMethod", corrective.correction_method.code())?;
            w.text_element(
                "CorrectionMethodDescription",
                corrective.correction_method_description(),
            )?;
            w.optional_element(
                "AdditionalReasonDescription",
                corrective.additional_reason_description.as_deref(),
            )?;
            if let Some(date) = corrective.invoice_issue_date {
                w.date_element("InvoiceIssueDate", date)?;
            }
            w.end_element("Corrective")?;
        }

        w.end_element("InvoiceHeader")?;
        Ok(())
    }

    fn write_issue_data(&self, w: &mut XmlWriter) -> Result<(), FacturaeError> {
        let invoice = self.invoice;
        w.start_element("InvoiceIssueData")?;
        w.date_element("IssueDate", invoice.issue_date)?;
        if let Some(period) = &invoice.invoicing_period {
            w.period_element("InvoicingPeriod", period.start, period.end)?;
        }
        w.text_element("InvoiceCurrencyCode", &invoice.currency)?;
        w.text_element("TaxCurrencyCode", &invoice.currency)?;
        w.text_element("LanguageName", &invoice.language)?;
        w.optional_element("InvoiceDescription", invoice.description.as_deref())?;
        w.optional_element(
            "ReceiverTransactionReference",
            invoice.receiver_transaction_reference.as_deref(),
        )?;
        w.optional_element("FileReference", invoice.file_reference.as_deref())?;
        w.optional_element(
            "ReceiverContractReference",
            invoice.receiver_contract_reference.as_deref(),
        )?;
        w.end_element("InvoiceIssueData")?;
        Ok(())
    }

    /// One `<Tax>` per (item, tax code), outputs before withheld. These
    /// entries never carry the equivalence surcharge pair.
    fn write_invoice_taxes(
        &self,
        w: &mut XmlWriter,
        items: &[ComputedLineItem],
    ) -> Result<(), FacturaeError> {
        for (tag, group) in [
            ("TaxesOutputs", TaxGroup::Outputs),
            ("TaxesWithheld", TaxGroup::Withheld),
        ] {
            if items.iter().all(|i| group.of(i).is_empty()) {
                continue;
            }
            w.start_element(tag)?;
            for item in items {
                for tax in group.of(item) {
                    w.start_element("Tax")?;
                    self.write_tax_figures(w, tax)?;
                    w.end_element("Tax")?;
                }
            }
            w.end_element(tag)?;
        }
        Ok(())
    }

    fn write_tax_figures(&self, w: &mut XmlWriter, tax: &ComputedTax) -> Result<(), FacturaeError> {
        w.text_element("TaxTypeCode", &tax.code)?;
        self.number(w, "TaxRate", tax.rate, Field::TaxRate)?;
        self.total_amount(w, "TaxableBase", tax.base, Field::TaxableBase)?;
        self.total_amount(w, "TaxAmount", tax.amount, Field::TaxAmount)?;
        Ok(())
    }

    /// Line-level `<Tax>`, with the surcharge pair when it is set.
    fn write_tax(&self, w: &mut XmlWriter, tax: &ComputedTax) -> Result<(), FacturaeError> {
        w.start_element("Tax")?;
        self.write_tax_figures(w, tax)?;
        if !tax.surcharge.is_zero() {
            self.number(
                w,
                "EquivalenceSurcharge",
                tax.surcharge,
                Field::EquivalenceSurcharge,
            )?;
            self.total_amount(
                w,
                "EquivalenceSurchargeAmount",
                tax.surcharge_amount,
                Field::EquivalenceSurchargeAmount,
            )?;
        }
        w.end_element("Tax")?;
        Ok(())
    }

    fn write_invoice_totals(
        &self,
        w: &mut XmlWriter,
        output_contributions: Decimal,
        invoice_total: Decimal,
    ) -> Result<(), FacturaeError> {
        let totals = self.totals;
        w.start_element("InvoiceTotals")?;
        self.number(
            w,
            "TotalGrossAmount",
            totals.gross_amount,
            Field::TotalGrossAmount,
        )?;
        self.write_adjustments(w, "GeneralDiscounts", "Discount", &totals.general_discounts)?;
        self.write_adjustments(w, "GeneralSurcharges", "Charge", &totals.general_charges)?;
        self.number(
            w,
            "TotalGeneralDiscounts",
            totals.total_general_discounts,
            Field::TotalGeneralDiscounts,
        )?;
        self.number(
            w,
            "TotalGeneralSurcharges",
            totals.total_general_charges,
            Field::TotalGeneralSurcharges,
        )?;
        self.number(
            w,
            "TotalGrossAmountBeforeTaxes",
            totals.gross_amount_before_taxes,
            Field::TotalGrossAmountBeforeTaxes,
        )?;
        self.number(
            w,
            "TotalTaxOutputs",
            output_contributions,
            Field::TotalTaxOutputs,
        )?;
        self.number(
            w,
            "TotalTaxesWithheld",
            totals.total_taxes_withheld,
            Field::TotalTaxesWithheld,
        )?;
        self.number(w, "InvoiceTotal", invoice_total, Field::InvoiceTotal)?;
        self.number(w, "TotalOutstandingAmount", invoice_total, Field::InvoiceTotal)?;
        self.number(w, "TotalExecutableAmount", invoice_total, Field::InvoiceTotal)?;
        w.end_element("InvoiceTotals")?;
        Ok(())
    }

    /// Discount/charge list; skipped entirely when empty.
    fn write_adjustments(
        &self,
        w: &mut XmlWriter,
        wrapper: &str,
        tag: &str,
        entries: &[ResolvedAdjustment],
    ) -> Result<(), FacturaeError> {
        if entries.is_empty() {
            return Ok(());
        }
        w.start_element(wrapper)?;
        for entry in entries {
            w.start_element(tag)?;
            w.text_element(&format!("{tag}Reason"), &entry.reason)?;
            if let Some(rate) = entry.rate {
                self.number(w, &format!("{tag}Rate"), rate, Field::DiscountChargeRate)?;
            }
            self.number(
                w,
                &format!("{tag}Amount"),
                entry.amount,
                Field::DiscountChargeAmount,
            )?;
            w.end_element(tag)?;
        }
        w.end_element(wrapper)?;
        Ok(())
    }

    fn write_items(&self, w: &mut XmlWriter) -> Result<(), FacturaeError> {
        w.start_element("Items")?;
        for item in &self.invoice.items {
            let computed = item.compute(self.version, self.policy)?;
            self.write_item(w, item, &computed)?;
        }
        w.end_element("Items")?;
        Ok(())
    }

    fn write_item(
        &self,
        w: &mut XmlWriter,
        item: &LineItem,
        computed: &ComputedLineItem,
    ) -> Result<(), FacturaeError> {
        let refs = item.references();
        w.start_element("InvoiceLine")?;

        w.optional_element(
            "IssuerContractReference",
            refs.issuer_contract_reference.as_deref(),
        )?;
        optional_date(w, "IssuerContractDate", refs.issuer_contract_date)?;
        w.optional_element(
            "IssuerTransactionReference",
            refs.issuer_transaction_reference.as_deref(),
        )?;
        optional_date(w, "IssuerTransactionDate", refs.issuer_transaction_date)?;
        w.optional_element(
            "ReceiverContractReference",
            refs.receiver_contract_reference.as_deref(),
        )?;
        optional_date(w, "ReceiverContractDate", refs.receiver_contract_date)?;
        w.optional_element(
            "ReceiverTransactionReference",
            refs.receiver_transaction_reference.as_deref(),
        )?;
        optional_date(w, "ReceiverTransactionDate", refs.receiver_transaction_date)?;
        w.optional_element("FileReference", refs.file_reference.as_deref())?;
        optional_date(w, "FileDate", refs.file_date)?;
        w.optional_element("SequenceNumber", refs.sequence_number.as_deref())?;

        w.text_element("ItemDescription", item.name())?;
        self.number(w, "Quantity", computed.quantity, Field::ItemQuantity)?;
        w.text_element("UnitOfMeasure", item.unit_of_measure())?;
        self.number(
            w,
            "UnitPriceWithoutTax",
            computed.unit_price_without_tax,
            Field::ItemUnitPriceWithoutTax,
        )?;
        self.number(
            w,
            "TotalCost",
            computed.total_amount_without_tax,
            Field::ItemTotalCost,
        )?;
        self.write_adjustments(w, "DiscountsAndRebates", "Discount", &computed.discounts)?;
        self.write_adjustments(w, "Charges", "Charge", &computed.charges)?;
        self.number(
            w,
            "GrossAmount",
            computed.gross_amount,
            Field::ItemGrossAmount,
        )?;

        // Withheld before outputs at line level, the reverse of the
        // invoice-level order.
        for (tag, taxes) in [
            ("TaxesWithheld", &computed.taxes_withheld),
            ("TaxesOutputs", &computed.taxes_outputs),
        ] {
            if taxes.is_empty() {
                continue;
            }
            w.start_element(tag)?;
            for tax in taxes {
                self.write_tax(w, tax)?;
            }
            w.end_element(tag)?;
        }

        if let Some(period) = item.period() {
            w.period_element("LineItemPeriod", period.start, period.end)?;
        }
        w.optional_element("AdditionalLineItemInformation", item.description())?;
        w.optional_element("ArticleCode", item.article_code())?;

        w.end_element("InvoiceLine")?;
        Ok(())
    }

    fn write_payment_details(
        &self,
        w: &mut XmlWriter,
        invoice_total: Decimal,
    ) -> Result<(), FacturaeError> {
        let invoice = self.invoice;
        let Some(payment) = &invoice.payment else {
            return Ok(());
        };
        w.start_element("PaymentDetails")?;
        w.start_element("Installment")?;
        w.date_element(
            "InstallmentDueDate",
            invoice.due_date.unwrap_or(invoice.issue_date),
        )?;
        self.number(w, "InstallmentAmount", invoice_total, Field::InvoiceTotal)?;
        w.text_element("PaymentMeans", payment.method.code())?;
        if let Some(iban) = &payment.iban {
            let account = if payment.method == PaymentMethod::Debit {
                "AccountToBeDebited"
            } else {
                "AccountToBeCredited"
            };
            w.start_element(account)?;
            w.text_element("IBAN", iban)?;
            w.optional_element("BIC", payment.bic.as_deref())?;
            w.end_element(account)?;
        }
        w.end_element("Installment")?;
        w.end_element("PaymentDetails")?;
        Ok(())
    }

    fn write_additional_data(&self, w: &mut XmlWriter) -> Result<(), FacturaeError> {
        let invoice = self.invoice;
        let related = invoice.related_invoice.as_deref().filter(|s| !s.is_empty());
        let information = invoice
            .additional_information
            .as_deref()
            .filter(|s| !s.is_empty());
        let has_data = related.is_some()
            || information.is_some()
            || !invoice.attachments.is_empty()
            || !self.extension_data.is_empty();
        if !has_data {
            return Ok(());
        }

        tracing::debug!(
            attachments = invoice.attachments.len(),
            extensions = self.extension_data.len(),
            "rendering additional data"
        );
        w.start_element("AdditionalData")?;
        w.optional_element("RelatedInvoice", related)?;
        if !invoice.attachments.is_empty() {
            w.start_element("RelatedDocuments")?;
            for attachment in &invoice.attachments {
                w.start_element("Attachment")?;
                w.text_element("AttachmentCompressionAlgorithm", "NONE")?;
                w.text_element("AttachmentFormat", attachment.format())?;
                w.text_element("AttachmentEncoding", "BASE64")?;
                w.text_element("AttachmentDescription", &attachment.description)?;
                w.text_element(
                    "AttachmentData",
                    &general_purpose::STANDARD.encode(&attachment.data),
                )?;
                w.end_element("Attachment")?;
            }
            w.end_element("RelatedDocuments")?;
        }
        w.optional_element("InvoiceAdditionalInformation", information)?;
        if !self.extension_data.is_empty() {
            w.start_element("Extensions")?;
            w.raw(&self.extension_data.concat())?;
            w.end_element("Extensions")?;
        }
        w.end_element("AdditionalData")?;
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum TaxGroup {
    Outputs,
    Withheld,
}

impl TaxGroup {
    fn of(self, item: &ComputedLineItem) -> &[ComputedTax] {
        match self {
            Self::Outputs => &item.taxes_outputs,
            Self::Withheld => &item.taxes_withheld,
        }
    }
}

fn required_party<'p>(party: Option<&'p Party>, role: &str) -> Result<&'p Party, FacturaeError> {
    party.ok_or_else(|| FacturaeError::Validation(format!("{role}: {role} is required")))
}

fn optional_date(
    w: &mut XmlWriter,
    name: &str,
    date: Option<chrono::NaiveDate>,
) -> Result<(), FacturaeError> {
    if let Some(date) = date {
        w.date_element(name, date)?;
    }
    Ok(())
}
