use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// A saved host page turned into UTF-8 markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("page bytes are not valid {encoding}")]
    Malformed { encoding: String },
}

/// Decodes page bytes: byte order mark first, then the `charset` of the
/// Content-Type, then a `chardetng` guess over the whole buffer.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedPage, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_as(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return decode_as(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_as(bytes, detector.guess(None, true))
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn decode_as(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedPage, DecodeError> {
    // Strips a matching BOM; a BOM for another encoding wins over `encoding`.
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: used.name().to_string(),
        });
    }
    Ok(DecodedPage {
        html: text.into_owned(),
        encoding_label: used.name().to_string(),
    })
}
