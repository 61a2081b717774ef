use crate::domain::model::{NumberList, PhoneNumber};
use std::collections::HashSet;

const COUNTRY_CODE: &str = "62";

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == ';'
}

/// 把單一號碼轉成 62 開頭的格式：0 開頭換成 62，8 開頭補上 62，其餘原樣保留
fn canonicalize(digits: &str) -> String {
    if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{}", COUNTRY_CODE, rest)
    } else if digits.starts_with('8') {
        format!("{}{}", COUNTRY_CODE, digits)
    } else {
        digits.to_string()
    }
}

/// 將使用者輸入的文字拆成號碼、清除非數字字元、補上國碼並去重。
///
/// 空白、逗號與分號都視為分隔符號。空輸入回傳空序列。
pub fn normalize<'a>(raw: impl Into<Option<&'a str>>) -> NumberList {
    let Some(raw) = raw.into() else {
        return NumberList::default();
    };

    let mut seen = HashSet::new();
    let mut numbers = Vec::new();

    for token in raw.split(is_separator) {
        let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }

        let canonical = canonicalize(&digits);
        if seen.insert(canonical.clone()) {
            numbers.push(PhoneNumber::from_canonical(canonical));
        }
    }

    tracing::debug!("Normalized input into {} unique numbers", numbers.len());
    NumberList::new(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &NumberList) -> Vec<&str> {
        list.iter().map(|n| n.as_str()).collect()
    }

    #[test]
    fn test_duplicates_collapse_to_first() {
        let list = normalize("0812, 0812");
        assert_eq!(strings(&list), vec!["62812"]);
    }

    #[test]
    fn test_prefix_rules_apply_once_per_token() {
        let list = normalize("81234567890 0081234567890");
        assert_eq!(strings(&list), vec!["6281234567890", "62081234567890"]);
    }

    #[test]
    fn test_leading_zero_replaced() {
        assert_eq!(strings(&normalize("08123")), vec!["628123"]);
    }

    #[test]
    fn test_other_prefixes_pass_through() {
        let list = normalize("6281234 12345 +1 (555) 0100");
        assert_eq!(strings(&list), vec!["6281234", "12345", "1", "555", "62100"]);
    }

    #[test]
    fn test_empty_and_absent_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("  ,;\n\t ").is_empty());
        assert!(normalize(None).is_empty());
    }

    #[test]
    fn test_non_digit_characters_are_stripped() {
        let list = normalize("+62-812-3456;0812 3456\n(0812)3456");
        assert_eq!(strings(&list), vec!["628123456", "62812", "3456"]);
    }

    #[test]
    fn test_tokens_without_digits_are_dropped() {
        let list = normalize("abc, 0812, n/a;;;0813");
        assert_eq!(strings(&list), vec!["62812", "62813"]);
    }

    #[test]
    fn test_first_seen_order_preserved_across_forms() {
        // 0812 與 812 與 62812 正規化後是同一個號碼
        let list = normalize("0813 0812 812 62812 0813");
        assert_eq!(strings(&list), vec!["62813", "62812"]);
    }
}
