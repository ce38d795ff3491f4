//! `<SellerParty>`, `<BuyerParty>` and `<Assignee>` contents.

use super::xml::XmlWriter;
use crate::core::{Address, FacturaeError, Party, PartyKind};

/// Write the body of a party element (the caller opens and closes the
/// wrapping tag).
pub(crate) fn write_party(w: &mut XmlWriter, party: &Party) -> Result<(), FacturaeError> {
    w.start_element("TaxIdentification")?;
    w.text_element("PersonTypeCode", party.kind.person_type_code())?;
    w.text_element("ResidenceTypeCode", party.residence_type_code())?;
    w.text_element("TaxIdentificationNumber", &party.tax_number)?;
    w.end_element("TaxIdentification")?;

    match party.kind {
        PartyKind::LegalEntity => {
            w.start_element("LegalEntity")?;
            w.text_element("CorporateName", &party.name)?;
            write_address(w, &party.address)?;
            write_contact(w, party)?;
            w.end_element("LegalEntity")?;
        }
        PartyKind::Individual => {
            w.start_element("Individual")?;
            w.text_element("Name", &party.name)?;
            w.text_element(
                "FirstSurname",
                party.first_surname.as_deref().unwrap_or_default(),
            )?;
            w.optional_element("SecondSurname", party.second_surname.as_deref())?;
            write_address(w, &party.address)?;
            write_contact(w, party)?;
            w.end_element("Individual")?;
        }
    }
    Ok(())
}

fn write_address(w: &mut XmlWriter, address: &Address) -> Result<(), FacturaeError> {
    if address.is_in_spain() {
        w.start_element("AddressInSpain")?;
        w.text_element("Address", &address.street)?;
        w.text_element("PostCode", &address.postal_code)?;
        w.text_element("Town", &address.town)?;
        w.text_element("Province", &address.province)?;
        w.text_element("CountryCode", &address.country_code)?;
        w.end_element("AddressInSpain")?;
    } else {
        w.start_element("OverseasAddress")?;
        w.text_element("Address", &address.street)?;
        w.text_element(
            "PostCodeAndTown",
            &format!("{} {}", address.postal_code, address.town),
        )?;
        w.text_element("Province", &address.province)?;
        w.text_element("CountryCode", &address.country_code)?;
        w.end_element("OverseasAddress")?;
    }
    Ok(())
}

fn write_contact(w: &mut XmlWriter, party: &Party) -> Result<(), FacturaeError> {
    let phone = party.phone.as_deref().filter(|p| !p.is_empty());
    let email = party.email.as_deref().filter(|e| !e.is_empty());
    if phone.is_none() && email.is_none() {
        return Ok(());
    }
    w.start_element("ContactDetails")?;
    w.optional_element("Telephone", phone)?;
    w.optional_element("ElectronicMail", email)?;
    w.end_element("ContactDetails")?;
    Ok(())
}
