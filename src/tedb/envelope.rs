//! SOAP request envelope for `retrieveVatRates`.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use super::{FetchError, RatesQuery};
use crate::core::countries::to_tedb_code;

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SERVICE_NS: &str = "urn:ec.europa.eu:taxud:tedb:services:v1:IVatRetrievalService";
const TYPES_NS: &str = "urn:ec.europa.eu:taxud:tedb:services:v1:IVatRetrievalService:types";

/// `SOAPAction` header value for the operation.
pub(crate) const SOAP_ACTION: &str = "urn:ec.europa.eu:taxud:tedb:services:v1:IVatRetrievalService/RetrieveVatRates";

fn xml_io(e: std::io::Error) -> FetchError {
    FetchError::Request(format!("XML write error: {e}"))
}

struct EnvelopeWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl EnvelopeWriter {
    fn new() -> Result<Self, FetchError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    fn into_string(self) -> Result<String, FetchError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| FetchError::Request(format!("XML UTF-8 error: {e}")))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self, FetchError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    fn empty(&mut self, name: &str) -> Result<&mut Self, FetchError> {
        self.writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    fn end(&mut self, name: &str) -> Result<&mut Self, FetchError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, FetchError> {
        self.start(name, &[])?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end(name)
    }
}

/// Build the SOAP 1.1 envelope for a `retrieveVatRatesReqMsg`.
///
/// `memberStates` is omitted when the query has no filter; TEDB then answers
/// for every member state.
pub(crate) fn request_envelope(query: &RatesQuery) -> Result<String, FetchError> {
    let mut w = EnvelopeWriter::new()?;
    w.start(
        "soapenv:Envelope",
        &[
            ("xmlns:soapenv", SOAP_ENV_NS),
            ("xmlns:urn", SERVICE_NS),
            ("xmlns:urn1", TYPES_NS),
        ],
    )?;
    w.empty("soapenv:Header")?;
    w.start("soapenv:Body", &[])?;
    w.start("urn:retrieveVatRatesReqMsg", &[])?;

    if !query.member_states.is_empty() {
        w.start("urn1:memberStates", &[])?;
        for iso in &query.member_states {
            w.text_element("urn1:isoCode", to_tedb_code(iso))?;
        }
        w.end("urn1:memberStates")?;
    }
    w.text_element("urn1:from", &query.date_from.format("%Y-%m-%d").to_string())?;
    w.text_element("urn1:to", &query.date_to.format("%Y-%m-%d").to_string())?;

    w.end("urn:retrieveVatRatesReqMsg")?;
    w.end("soapenv:Body")?;
    w.end("soapenv:Envelope")?;
    w.into_string()
}
