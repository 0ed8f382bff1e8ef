//! 字段清单令牌的编码与解码。
//!
//! 令牌格式：数据字段按分隔符拼接，做标准 base64 编码，再把字符顺序倒过来。
//! 倒序只是混淆，不提供完整性或保密性，令牌可以被客户端任意伪造，
//! 调用方不能据此信任令牌内容。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashSet;
use std::fmt;

use crate::error::DecodeError;
use crate::models::field_set::{FieldName, RecordFields};

/// 放在隐藏字段里的字段清单令牌，只含 base64 字母表字符
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedFieldToken(String);

impl EncodedFieldToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedFieldToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 编码一种记录类型的数据字段集合
pub fn encode(fields: &RecordFields) -> EncodedFieldToken {
    encode_fields(fields.data_fields(), fields.separator())
}

pub fn encode_fields(fields: &[FieldName], separator: char) -> EncodedFieldToken {
    let separator = separator.to_string();
    let joined = fields
        .iter()
        .map(FieldName::as_str)
        .collect::<Vec<_>>()
        .join(separator.as_str());

    EncodedFieldToken(STANDARD.encode(joined.as_bytes()).chars().rev().collect())
}

/// 把令牌还原为有序的字段列表。
///
/// 空令牌对应空字段集合。拆分后出现空字段名或重复字段说明令牌不是由
/// `encode` 生成的，同样视为解码失败。
pub fn decode(token: &str, separator: char) -> Result<Vec<FieldName>, DecodeError> {
    let restored: String = token.chars().rev().collect();
    let bytes = STANDARD
        .decode(restored.as_bytes())
        .map_err(|_| DecodeError::InvalidBase64)?;
    let joined = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;

    if joined.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    for part in joined.split(separator) {
        if part.is_empty() {
            return Err(DecodeError::EmptyFieldName);
        }
        if !seen.insert(part) {
            return Err(DecodeError::DuplicateField(part.to_string()));
        }
        fields.push(FieldName::new(part));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_fields() -> RecordFields {
        RecordFields::new(["id", "idk", "grupo", "numero"], ["id", "idk"], ' ').unwrap()
    }

    fn names(fields: &[FieldName]) -> Vec<&str> {
        fields.iter().map(FieldName::as_str).collect()
    }

    #[test]
    fn roundtrip_sample_record() {
        let fields = sample_fields();
        let token = encode(&fields);
        let decoded = decode(token.as_str(), ' ').unwrap();
        assert_eq!(names(&decoded), ["grupo", "numero"]);
    }

    #[test]
    fn token_is_reversed_base64() {
        let token = encode(&sample_fields());
        // base64("grupo numero") == "Z3J1cG8gbnVtZXJv"
        assert_eq!(token.as_str(), "vJXZtVnbg8Gc1J3Z");
    }

    #[test]
    fn token_is_safe_inside_html_attribute() {
        let token = encode(&sample_fields());
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')));
    }

    #[test]
    fn empty_field_set_roundtrips() {
        let fields = RecordFields::new(["id"], ["id"], ' ').unwrap();
        let token = encode(&fields);
        assert_eq!(token.as_str(), "");
        assert!(decode(token.as_str(), ' ').unwrap().is_empty());
    }

    #[test]
    fn non_ascii_field_names_roundtrip() {
        let fields = RecordFields::new(["año", "número"], Vec::<String>::new(), ' ').unwrap();
        let decoded = decode(encode(&fields).as_str(), ' ').unwrap();
        assert_eq!(names(&decoded), ["año", "número"]);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(decode("!!no es base64!!", ' '), Err(DecodeError::InvalidBase64));
    }

    #[test]
    fn rejects_truncated_token() {
        let token = encode(&sample_fields());
        let truncated = &token.as_str()[1..];
        assert_eq!(decode(truncated, ' '), Err(DecodeError::InvalidBase64));
    }

    #[test]
    fn rejects_unreversed_token() {
        // 直接提交未倒序的 base64 不应被接受为同一字段集合
        let plain = STANDARD.encode("grupo numero");
        match decode(&plain, ' ') {
            Err(_) => {}
            Ok(fields) => assert_ne!(names(&fields), ["grupo", "numero"]),
        }
    }

    #[test]
    fn rejects_non_utf8_payload() {
        let token: String = STANDARD.encode([0xff, 0xfe]).chars().rev().collect();
        assert_eq!(decode(&token, ' '), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn rejects_empty_segments_and_duplicates() {
        let forge = |plain: &str| -> String { STANDARD.encode(plain).chars().rev().collect() };

        assert_eq!(decode(&forge("grupo  numero"), ' '), Err(DecodeError::EmptyFieldName));
        assert_eq!(decode(&forge("grupo "), ' '), Err(DecodeError::EmptyFieldName));
        assert_eq!(
            decode(&forge("grupo numero grupo"), ' '),
            Err(DecodeError::DuplicateField("grupo".into()))
        );
    }

    #[test]
    fn decoding_with_another_separator_changes_the_set() {
        let token = encode(&sample_fields());
        let decoded = decode(token.as_str(), ',').unwrap();
        assert_eq!(names(&decoded), ["grupo numero"]);
    }

    fn arb_master() -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set("[a-z][a-z0-9_]{0,11}", 1..12)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    }

    fn arb_record() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
        arb_master().prop_flat_map(|master| {
            let len = master.len();
            (Just(master.clone()), prop::sample::subsequence(master, 0..=len))
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode((master, ignored) in arb_record(), separator in prop_oneof![Just(' '), Just(','), Just('|')]) {
            let fields = RecordFields::new(master.clone(), ignored.clone(), separator).unwrap();
            let decoded = decode(encode(&fields).as_str(), separator).unwrap();

            let expected: Vec<&str> = master
                .iter()
                .filter(|field| !ignored.contains(*field))
                .map(String::as_str)
                .collect();
            prop_assert_eq!(names(&decoded), expected);
        }

        #[test]
        fn decoded_set_never_contains_ignored((master, ignored) in arb_record()) {
            let fields = RecordFields::new(master, ignored.clone(), ' ').unwrap();
            let decoded = decode(encode(&fields).as_str(), ' ').unwrap();
            for field in &decoded {
                prop_assert!(!ignored.iter().any(|ignored| ignored == field.as_str()));
            }
        }

        #[test]
        fn corrupted_token_never_yields_original((master, ignored) in arb_record(), index in any::<prop::sample::Index>(), replacement in prop::char::range('+', 'z')) {
            let fields = RecordFields::new(master, ignored, ' ').unwrap();
            let token = encode(&fields);
            prop_assume!(!token.as_str().is_empty());

            let mut chars: Vec<char> = token.as_str().chars().collect();
            let at = index.index(chars.len());
            prop_assume!(chars[at] != replacement);
            chars[at] = replacement;
            let corrupted: String = chars.into_iter().collect();

            match decode(&corrupted, ' ') {
                Err(_) => {}
                Ok(decoded) => {
                    prop_assert_ne!(&decoded, &fields.data_fields().to_vec());
                    prop_assert_ne!(&decoded, &fields.master().to_vec());
                }
            }
        }
    }
}
