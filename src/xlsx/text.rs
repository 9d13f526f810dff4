//! Text collection helpers shared by the shared-string and worksheet readers.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Collect the text of every `<t>` element nested under the element that
/// was just opened, up to and including its matching end tag.
///
/// `<t>` elements may sit at any depth (`<si><t>`, `<si><r><t>`,
/// `<is><r><t>`); their text is concatenated in document order with no
/// separator. Text outside `<t>` (such as formatting whitespace) is ignored.
///
/// The reader must be positioned just after the `Start` event of the
/// enclosing element.
pub(crate) fn collect_text_runs(reader: &mut Reader<&[u8]>, buf: &mut Vec<u8>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;
    let mut in_t = 0usize;

    loop {
        match reader.read_event_into(buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                if e.name().local_name().as_ref() == b"t" {
                    in_t += 1;
                }
            }
            Ok(Event::End(e)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if e.name().local_name().as_ref() == b"t" {
                    in_t = in_t.saturating_sub(1);
                }
            }
            Ok(Event::Text(e)) if in_t > 0 => {
                text.push_str(&e.unescape()?);
            }
            Ok(Event::CData(e)) if in_t > 0 => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::Eof) => {
                return Err(Error::XmlParse(
                    "unexpected end of document inside text element".to_string(),
                ))
            }
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    buf.clear();

    Ok(text)
}

/// Read the direct text content of the element that was just opened, up to
/// its matching end tag. Nested markup is skipped but its text is kept.
pub(crate) fn read_element_text(reader: &mut Reader<&[u8]>, buf: &mut Vec<u8>) -> Result<String> {
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Text(e)) => text.push_str(&e.unescape()?),
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::Eof) => {
                return Err(Error::XmlParse(
                    "unexpected end of document inside value element".to_string(),
                ))
            }
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    buf.clear();

    Ok(text)
}

/// Create a reader over `xml` that keeps whitespace intact.
pub(crate) fn reader_for(xml: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    reader
}
