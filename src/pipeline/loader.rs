//! Engine-list document loader
//!
//! Every vendor publishes the same schema:
//!
//! ```text
//! <engine-database>
//!   <engine-list>
//!     <engine code="..." Type="..." dia="..." ...>
//!       <data>
//!         <eng-data t="0.0" f="0.0"/>
//!       </data>
//!     </engine>
//!   </engine-list>
//! </engine-database>
//! ```
//!
//! The loader only captures raw attribute strings; converting them is the
//! normalizer's job. Captured values are decoded with the encoding named in
//! the XML declaration (UTF-8 when there is none); bytes that do not decode
//! make the document malformed.

use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{CatalogError, Result};

const ENTRY_LIST: &[u8] = b"engine-list";
const DATA_LIST: &[u8] = b"data";

// Element depths, counting the document root as 1
const LIST_DEPTH: usize = 2;
const ENTRY_DEPTH: usize = 3;
const DATA_DEPTH: usize = 4;
const SAMPLE_DEPTH: usize = 5;

/// One thrust-curve sample exactly as published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSample {
    pub t: Option<String>,
    pub f: Option<String>,
}

/// One motor entry exactly as published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Position of the entry within its document's entry list
    pub position: usize,
    pub attributes: BTreeMap<String, String>,
    pub samples: Vec<RawSample>,
}

impl RawEntry {
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes.get(attribute).map(|v| v.as_str())
    }
}

/// Parse a document into its entries, in document order.
pub fn parse_entries(document: &str, content: &[u8]) -> Result<Vec<RawEntry>> {
    let mut reader = Reader::from_reader(content);
    let mut collector = EntryCollector::default();
    let mut depth = 0usize;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                collector
                    .open(&e, depth, reader.decoder())
                    .map_err(|err| malformed(document, format!("at byte {}: {}", position, err)))?;
            }
            Ok(Event::Empty(e)) => {
                collector
                    .open(&e, depth + 1, reader.decoder())
                    .map_err(|err| malformed(document, format!("at byte {}: {}", position, err)))?;
                collector.close(depth + 1);
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    return Err(malformed(
                        document,
                        format!("unexpected closing tag at byte {}", position),
                    ));
                }
                collector.close(depth);
                depth -= 1;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(malformed(
                    document,
                    format!("XML error at byte {}: {}", reader.buffer_position(), err),
                ));
            }
        }
    }

    if depth != 0 {
        return Err(malformed(
            document,
            format!("document ended with {} unclosed element(s)", depth),
        ));
    }
    if !collector.list_seen {
        return Err(malformed(
            document,
            "no engine-list element under the document root".to_string(),
        ));
    }

    debug!(document, entries = collector.entries.len(), "parsed engine list");
    Ok(collector.entries)
}

fn malformed(document: &str, reason: String) -> CatalogError {
    CatalogError::MalformedDocument {
        document: document.to_string(),
        reason,
    }
}

/// Tracks where the reader is relative to the entry list while events stream by.
#[derive(Default)]
struct EntryCollector {
    in_list: bool,
    list_seen: bool,
    current: Option<RawEntry>,
    data_seen: bool,
    in_data: bool,
    entries: Vec<RawEntry>,
}

impl EntryCollector {
    fn open(
        &mut self,
        element: &BytesStart<'_>,
        depth: usize,
        decoder: Decoder,
    ) -> std::result::Result<(), quick_xml::Error> {
        match depth {
            LIST_DEPTH if !self.list_seen && element.name().as_ref() == ENTRY_LIST => {
                self.in_list = true;
            }
            ENTRY_DEPTH if self.in_list => {
                self.current = Some(RawEntry {
                    position: self.entries.len(),
                    attributes: attributes_of(element, decoder)?,
                    samples: Vec::new(),
                });
                self.data_seen = false;
            }
            DATA_DEPTH
                if self.current.is_some()
                    && !self.data_seen
                    && element.name().as_ref() == DATA_LIST =>
            {
                self.in_data = true;
                self.data_seen = true;
            }
            SAMPLE_DEPTH if self.in_data => {
                let mut attributes = attributes_of(element, decoder)?;
                if let Some(entry) = self.current.as_mut() {
                    entry.samples.push(RawSample {
                        t: attributes.remove("t"),
                        f: attributes.remove("f"),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, depth: usize) {
        match depth {
            LIST_DEPTH if self.in_list => {
                self.in_list = false;
                self.list_seen = true;
            }
            ENTRY_DEPTH => {
                if let Some(entry) = self.current.take() {
                    self.entries.push(entry);
                }
            }
            DATA_DEPTH if self.in_data => self.in_data = false,
            _ => {}
        }
    }
}

fn attributes_of(
    element: &BytesStart<'_>,
    decoder: Decoder,
) -> std::result::Result<BTreeMap<String, String>, quick_xml::Error> {
    let mut out = BTreeMap::new();
    for attribute in element.attributes() {
        let attribute = attribute?;
        let key = decoder.decode(attribute.key.as_ref())?.into_owned();
        let raw_value = decoder.decode(&attribute.value)?;
        let value = unescape(&raw_value)?.into_owned();
        out.insert(key, value);
    }
    Ok(out)
}
