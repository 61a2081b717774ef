use crate::domain::model::CheckResult;
use crate::utils::error::{CheckError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

pub const EXPORT_FILENAME: &str = "whatsapp_results.csv";
pub const HTML_FILENAME: &str = "whatsapp_results.html";

const HEADER: [&str; 2] = ["number", "status"];

/// 將結果轉成 CSV。
///
/// 欄位不加引號也不跳脫，行與行之間以 `\n` 連接，最後一筆資料後面不加換行。
pub fn encode(rows: &[CheckResult]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record([row.number.as_str(), row.status.as_str()])?;
    }

    let mut payload = writer
        .into_inner()
        .map_err(|e| CheckError::IoError(e.into_error()))?;

    if !rows.is_empty() && payload.last() == Some(&b'\n') {
        payload.pop();
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::normalize;
    use crate::domain::model::{ACTIVE_STATUS, ERROR_STATUS};

    fn result(raw: &str, status: &str) -> CheckResult {
        CheckResult::new(normalize(raw).as_slice()[0].clone(), status)
    }

    #[test]
    fn test_single_row() {
        let payload = encode(&[result("62812", ACTIVE_STATUS)]).unwrap();
        assert_eq!(payload, b"number,status\n62812,Aktif".to_vec());
    }

    #[test]
    fn test_multiple_rows_keep_order() {
        let rows = vec![
            result("0812", ACTIVE_STATUS),
            result("0813", ERROR_STATUS),
            result("0814", "Tidak Aktif"),
        ];
        let payload = String::from_utf8(encode(&rows).unwrap()).unwrap();
        assert_eq!(
            payload,
            "number,status\n62812,Aktif\n62813,Error\n62814,Tidak Aktif"
        );
    }

    #[test]
    fn test_empty_rows_only_header() {
        let payload = encode(&[]).unwrap();
        assert_eq!(payload, b"number,status\n".to_vec());
    }

    #[test]
    fn test_values_are_not_quoted() {
        let payload = String::from_utf8(encode(&[result("0812", "Status \"x\"")]).unwrap()).unwrap();
        assert_eq!(payload, "number,status\n62812,Status \"x\"");
    }
}
