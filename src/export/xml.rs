use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::core::FacturaeError;

fn xml_io(e: std::io::Error) -> FacturaeError {
    FacturaeError::Xml(format!("XML write error: {e}"))
}

/// Compact streaming writer: no declaration, no indentation.
///
/// Facturae validators are sensitive to element order, not whitespace,
/// but the signed bytes must be reproducible, so nothing is pretty-printed.
pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    pub fn into_string(self) -> Result<String, FacturaeError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| FacturaeError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, FacturaeError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, FacturaeError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, FacturaeError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    /// `<name>text</name>` with `text` escaped.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, FacturaeError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write the element only when `text` is present and non-empty.
    pub fn optional_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, FacturaeError> {
        match text {
            Some(t) if !t.is_empty() => self.text_element(name, t),
            _ => Ok(self),
        }
    }

    /// `YYYY-MM-DD`.
    pub fn date_element(&mut self, name: &str, date: NaiveDate) -> Result<&mut Self, FacturaeError> {
        self.text_element(name, &date.format("%Y-%m-%d").to_string())
    }

    /// `<StartDate>`/`<EndDate>` pair wrapped in `name`.
    pub fn period_element(
        &mut self,
        name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<&mut Self, FacturaeError> {
        self.start_element(name)?;
        self.date_element("StartDate", start)?;
        self.date_element("EndDate", end)?;
        self.end_element(name)
    }

    /// Write a pre-serialized fragment verbatim.
    pub fn raw(&mut self, fragment: &str) -> Result<&mut Self, FacturaeError> {
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(fragment)))
            .map_err(xml_io)?;
        Ok(self)
    }
}
