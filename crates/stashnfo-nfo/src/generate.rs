//! NFO XML serialization.
//!
//! Scenes and galleries are written as `<movie>` documents, performers as
//! `<actor>` documents. Both output modes emit the same elements and text;
//! pretty mode only adds indentation between elements.

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use stashnfo_common::{Error, RecordKind, Result};

use crate::model::{NfoEntry, NfoRecord, NfoValue};

/// XML declaration written at the top of every document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Indentation width used in pretty mode.
const INDENT: usize = 2;

/// Serialization settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Indent nested elements instead of writing the body on one line.
    pub pretty: bool,
}

impl GenerateOptions {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

/// Root element name for a record kind.
///
/// Galleries share the movie schema because NFO has no gallery document.
pub fn root_element(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Scene | RecordKind::Gallery => "movie",
        RecordKind::Performer => "actor",
    }
}

/// Serialize `record` as an NFO document.
///
/// The output always starts with [`XML_DECLARATION`] and ends with a
/// newline.
pub fn generate(kind: RecordKind, record: &NfoRecord, options: GenerateOptions) -> Result<Vec<u8>> {
    let mut writer = if options.pretty {
        Writer::new_with_indent(Vec::new(), b' ', INDENT)
    } else {
        Writer::new(Vec::new())
    };

    write_document(&mut writer, root_element(kind), record, options).map_err(xml_error)?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    Ok(xml)
}

/// Serialize a record for a kind given by name, e.g. from configuration.
///
/// # Errors
///
/// [`Error::UnsupportedKind`] for anything other than scene, performer or
/// gallery.
pub fn generate_named(kind: &str, record: &NfoRecord, options: GenerateOptions) -> Result<Vec<u8>> {
    generate(kind.parse()?, record, options)
}

fn write_document(
    writer: &mut Writer<Vec<u8>>,
    root: &str,
    record: &NfoRecord,
    options: GenerateOptions,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    if !options.pretty {
        // The indenting writer breaks the line itself.
        writer.get_mut().push(b'\n');
    }

    writer.write_event(Event::Start(BytesStart::new(root)))?;
    for entry in record.entries() {
        write_entry(writer, entry)?;
    }
    writer.write_event(Event::End(BytesEnd::new(root)))?;
    Ok(())
}

fn write_entry(writer: &mut Writer<Vec<u8>>, entry: &NfoEntry) -> quick_xml::Result<()> {
    let start = BytesStart::new(entry.tag.as_str()).with_attributes(
        entry
            .attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    writer.write_event(Event::Start(start))?;

    match &entry.value {
        // Always emit a text event, even when empty, so the closing tag stays
        // on the same line in pretty mode and the text never gains whitespace.
        // Quotes are left alone; only markup characters need escaping in text.
        NfoValue::Text(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?
        }
        NfoValue::Nested(children) => {
            for child in children {
                write_entry(writer, child)?;
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new(entry.tag.as_str())))?;
    Ok(())
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::output("<memory>", std::io::Error::other(e.to_string()))
}
