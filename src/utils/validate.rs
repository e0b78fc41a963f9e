use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{PortalError, Result};

static FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/\\\x00-\x1f]+$").expect("Invalid filename regex"));

/// 校验作业标题：去除首尾空白后不能为空，长度不超过 256
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(PortalError::validation("Title must not be empty"));
    }
    if trimmed.len() > 256 {
        return Err(PortalError::validation(
            "Title must not exceed 256 characters",
        ));
    }
    Ok(trimmed.to_string())
}

/// 解析截止时间：必须是带时区偏移的 RFC 3339 时间串
///
/// 服务不替调用方猜测时区，缺失偏移即拒绝。
pub fn parse_deadline(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PortalError::validation("Deadline is required"));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            PortalError::validation(format!(
                "Deadline must be an RFC 3339 timestamp with timezone offset: {e}"
            ))
        })
}

/// 清洗上传文件名：只保留最后一段路径，拒绝空名与控制字符
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    if name.is_empty() || name == "." || name == ".." {
        return Err(PortalError::validation("File name must not be empty"));
    }
    if name.len() > 255 {
        return Err(PortalError::validation(
            "File name must not exceed 255 characters",
        ));
    }
    if !FILENAME_RE.is_match(&name) {
        return Err(PortalError::validation(format!(
            "File name contains invalid characters: {name}"
        )));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_valid_title() {
        assert_eq!(validate_title("  Lab 1  ").unwrap(), "Lab 1");
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn test_parse_deadline_with_offset() {
        let dt = parse_deadline("2025-01-10T23:59:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 1, 10, 23, 59, 0).unwrap());

        let dt = parse_deadline("2025-01-11T07:59:00+08:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 1, 10, 23, 59, 0).unwrap());
    }

    #[test]
    fn test_parse_deadline_rejects_naive() {
        assert!(parse_deadline("2025-01-10T23:59:00").is_err());
        assert!(parse_deadline("").is_err());
        assert!(parse_deadline("tomorrow").is_err());
    }

    #[test]
    fn test_sanitize_filename_strips_path() {
        assert_eq!(sanitize_filename("report.pdf").unwrap(), "report.pdf");
        assert_eq!(
            sanitize_filename("/tmp/upload/report.pdf").unwrap(),
            "report.pdf"
        );
        assert_eq!(
            sanitize_filename("C:\\Users\\alice\\report.pdf").unwrap(),
            "report.pdf"
        );
    }

    #[test]
    fn test_sanitize_filename_rejects_bad_names() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("dir/").is_err());
        assert!(sanitize_filename("bad\x00name").is_err());
    }
}
