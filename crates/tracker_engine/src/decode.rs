use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// A saved page decoded to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub html: String,
    pub encoding: &'static str,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("page bytes are not valid {encoding}")]
    Malformed { encoding: &'static str },
}

/// Decodes saved page bytes. A byte-order mark wins, then the declared
/// charset label, then statistical detection.
pub fn decode_page(bytes: &[u8], declared_charset: Option<&str>) -> Result<DecodedPage, DecodeError> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            declared_charset
                .map(|label| label.trim().trim_matches(['"', '\'']))
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: used.name(),
        });
    }
    Ok(DecodedPage {
        html: text.into_owned(),
        encoding: used.name(),
    })
}
