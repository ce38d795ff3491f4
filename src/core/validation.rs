use super::error::ValidationError;
use super::types::*;
use super::units::is_known_unit_code;

/// Check the fields a Facturae document cannot be rendered without.
/// Returns all validation errors found (not just the first).
pub fn validate_invoice(invoice: &Invoice) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if invoice.number.trim().is_empty() {
        errors.push(ValidationError::new(
            "number",
            "invoice number must not be empty",
        ));
    }

    if !is_alpha_code(&invoice.currency, 3) {
        errors.push(ValidationError::new(
            "currency",
            format!(
                "currency '{}' must be a 3-letter ISO 4217 code",
                invoice.currency
            ),
        ));
    }

    if invoice.language.len() != 2 || !invoice.language.chars().all(|c| c.is_ascii_lowercase()) {
        errors.push(ValidationError::new(
            "language",
            format!(
                "language '{}' must be a 2-letter ISO 639-1 code",
                invoice.language
            ),
        ));
    }

    match &invoice.seller {
        Some(seller) => validate_party(seller, "seller", &mut errors),
        None => errors.push(ValidationError::new("seller", "seller is required")),
    }
    match &invoice.buyer {
        Some(buyer) => validate_party(buyer, "buyer", &mut errors),
        None => errors.push(ValidationError::new("buyer", "buyer is required")),
    }
    if let Some(assignee) = &invoice.assignee {
        validate_party(assignee, "assignee", &mut errors);
    }

    if invoice
        .invoicing_period
        .is_some_and(|period| period.start > period.end)
    {
        errors.push(ValidationError::new(
            "invoicing_period",
            "start date must not be after end date",
        ));
    }

    if invoice
        .payment
        .as_ref()
        .and_then(|p| p.iban.as_deref())
        .is_some_and(|iban| iban.trim().is_empty())
    {
        errors.push(ValidationError::new(
            "payment.iban",
            "IBAN must not be empty when given",
        ));
    }

    if invoice.items.is_empty() {
        errors.push(ValidationError::new(
            "items",
            "at least one line item is required",
        ));
    }
    for (i, item) in invoice.items.iter().enumerate() {
        if !is_known_unit_code(item.unit_of_measure()) {
            errors.push(ValidationError::new(
                format!("items[{i}].unit_of_measure"),
                format!(
                    "'{}' is not a Facturae unit-of-measure code",
                    item.unit_of_measure()
                ),
            ));
        }
        if item.period().is_some_and(|period| period.start > period.end) {
            errors.push(ValidationError::new(
                format!("items[{i}].period"),
                "start date must not be after end date",
            ));
        }
    }

    for (i, attachment) in invoice.attachments.iter().enumerate() {
        if attachment.format().is_empty() {
            errors.push(ValidationError::new(
                format!("attachments[{i}].mime_type"),
                "MIME type must not be empty",
            ));
        }
    }

    errors
}

fn validate_party(party: &Party, prefix: &str, errors: &mut Vec<ValidationError>) {
    if party.tax_number.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.tax_number"),
            "tax identification number must not be empty",
        ));
    }
    if party.name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.name"),
            "name must not be empty",
        ));
    }
    if party.kind == PartyKind::Individual
        && party
            .first_surname
            .as_deref()
            .is_none_or(|s| s.trim().is_empty())
    {
        errors.push(ValidationError::new(
            format!("{prefix}.first_surname"),
            "individuals need a first surname",
        ));
    }
    if !is_alpha_code(&party.address.country_code, 3) {
        errors.push(ValidationError::new(
            format!("{prefix}.address.country_code"),
            format!(
                "country code '{}' must be ISO 3166-1 alpha-3",
                party.address.country_code
            ),
        ));
    }
}

fn is_alpha_code(code: &str, len: usize) -> bool {
    code.len() == len && code.chars().all(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn address() -> Address {
        AddressBuilder::new("Gran Vía 1", "28013", "Madrid", "Madrid").build()
    }

    fn seller() -> Party {
        PartyBuilder::legal_entity("B12345678", "Proveedor SL", address()).build()
    }

    fn buyer() -> Party {
        PartyBuilder::individual("12345678Z", "Lucía", "Pérez", address()).build()
    }

    fn item() -> LineItem {
        LineItemBuilder::new("Producto", dec!(121))
            .tax(TAX_IVA, dec!(21))
            .build()
            .unwrap()
    }

    fn valid() -> InvoiceBuilder {
        InvoiceBuilder::new("0001", date(2024, 2, 1))
            .seller(seller())
            .buyer(buyer())
            .add_item(item())
    }

    #[test]
    fn valid_invoice() {
        assert!(validate_invoice(&valid().build_unchecked()).is_empty());
        assert!(valid().build().is_ok());
    }

    #[test]
    fn missing_items() {
        let invoice = InvoiceBuilder::new("0001", date(2024, 2, 1))
            .seller(seller())
            .buyer(buyer())
            .build_unchecked();
        let errors = validate_invoice(&invoice);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "items");
    }

    #[test]
    fn bad_currency_and_language() {
        let invoice = valid().currency("eur").language("ESP").build_unchecked();
        let fields: Vec<_> = validate_invoice(&invoice)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, ["currency", "language"]);
    }

    #[test]
    fn individual_without_surname() {
        let mut party = buyer();
        party.first_surname = None;
        let invoice = valid().buyer(party).build_unchecked();
        let errors = validate_invoice(&invoice);
        assert!(errors.iter().any(|e| e.field == "buyer.first_surname"));
    }

    #[test]
    fn unknown_unit_code() {
        let line = LineItemBuilder::new("Cable", dec!(10))
            .unit("MTR")
            .build()
            .unwrap();
        let invoice = valid().add_item(line).build_unchecked();
        let errors = validate_invoice(&invoice);
        assert_eq!(errors[0].field, "items[1].unit_of_measure");
    }

    #[test]
    fn inverted_periods() {
        let line = LineItemBuilder::new("Alquiler", dec!(500))
            .period(date(2024, 2, 1), date(2024, 1, 1))
            .build()
            .unwrap();
        let invoice = valid()
            .invoicing_period(date(2024, 3, 1), date(2024, 2, 1))
            .add_item(line)
            .build_unchecked();
        let fields: Vec<_> = validate_invoice(&invoice)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, ["invoicing_period", "items[1].period"]);
    }

    #[test]
    fn overseas_country_code_must_be_alpha3() {
        let address = AddressBuilder::new("1 Main St", "10001", "New York", "NY")
            .country("US")
            .build();
        let invoice = valid()
            .buyer(PartyBuilder::legal_entity("US123", "Acme Inc", address).build())
            .build_unchecked();
        let errors = validate_invoice(&invoice);
        assert_eq!(errors[0].field, "buyer.address.country_code");
    }
}
