use std::path::Path;

use chrono::{DateTime, Local};
use log::info;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::state::{display_value, ResultRecord};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no records to export")]
    NoData,
    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Writes the full current result set into one worksheet. The header row is
/// the first record's field set in wire order; records missing a field get a
/// blank cell there. Extra fields on later records are not exported, same as
/// they are not rendered.
pub fn write_records(
    records: &[ResultRecord],
    sheet_name: &str,
    path: &Path,
) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    let fields: Vec<&str> = records[0].keys().map(String::as_str).collect();
    for (col, field) in fields.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *field, &header_format)?;
    }

    for (row, record) in records.iter().enumerate() {
        for (col, field) in fields.iter().enumerate() {
            let value = display_value(record.get(*field));
            if !value.is_empty() {
                sheet.write_string((row + 1) as u32, col as u16, &value)?;
            }
        }
    }

    workbook.save(path)?;
    info!("exported {} records to {:?}", records.len(), path);
    Ok(())
}

/// Default file name offered in the save dialog, e.g.
/// `产品查询结果_2025-03-01_093000.xlsx`.
pub fn suggested_filename(stem: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.xlsx", stem, now.format("%Y-%m-%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Reader, Xlsx};
    use chrono::TimeZone;

    fn record(pairs: &[(&str, &str)]) -> ResultRecord {
        let mut map = ResultRecord::new();
        for (k, v) in pairs {
            map.insert(k.to_string(), serde_json::Value::String(v.to_string()));
        }
        map
    }

    fn cell(range: &calamine::Range<calamine::Data>, row: u32, col: u32) -> String {
        range
            .get_value((row, col))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_export_round_trip() {
        let records = vec![
            record(&[("登记编码", "C101"), ("产品名称", "稳健增利"), ("风险等级", "二级")]),
            record(&[("登记编码", "C202"), ("产品名称", "安盈六号"), ("风险等级", "三级")]),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        write_records(&records, "查询结果", &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("查询结果").unwrap();

        assert_eq!(cell(&range, 0, 0), "登记编码");
        assert_eq!(cell(&range, 0, 1), "产品名称");
        assert_eq!(cell(&range, 0, 2), "风险等级");
        assert_eq!(cell(&range, 1, 0), "C101");
        assert_eq!(cell(&range, 2, 1), "安盈六号");
        assert_eq!(cell(&range, 2, 2), "三级");
    }

    #[test]
    fn test_export_header_set_comes_from_first_record() {
        // The second record misses one field and carries an extra one; the
        // missing field becomes a blank cell, the extra field is dropped.
        let records = vec![
            record(&[("编码", "A"), ("名称", "第一")]),
            record(&[("编码", "B"), ("发行机构", "某银行")]),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.xlsx");
        write_records(&records, "Results", &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Results").unwrap();

        assert_eq!(cell(&range, 0, 0), "编码");
        assert_eq!(cell(&range, 0, 1), "名称");
        assert_eq!(range.width(), 2, "extra field must not widen the sheet");
        assert_eq!(cell(&range, 2, 0), "B");
        assert_eq!(cell(&range, 2, 1), "");
    }

    #[test]
    fn test_export_empty_set_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.xlsx");
        let result = write_records(&[], "Results", &path);
        assert!(matches!(result, Err(ExportError::NoData)));
        assert!(!path.exists(), "no file may be produced for an empty set");
    }

    #[test]
    fn test_suggested_filename_embeds_timestamp() {
        let now = Local.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(
            suggested_filename("产品查询结果", now),
            "产品查询结果_2025-03-01_093000.xlsx"
        );
    }
}
