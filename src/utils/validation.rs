use crate::utils::error::{TransformError, Result};
use std::collections::HashSet;
use std::path::{Component, Path};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 只接受單一檔名，不可包含目錄或 `..`
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\', '\0']) => Ok(()),
        _ => Err(TransformError::InvalidPath {
            path: name.to_string(),
            reason: format!("{} must be a plain file name", field_name),
        }),
    }
}

pub fn validate_file_extensions(field_name: &str, files: &[String], allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = Path::new(file).extension().and_then(|ext| ext.to_str()) {
            if !allowed_set.contains(extension.to_ascii_lowercase().as_str()) {
                return Err(TransformError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(TransformError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Excel 工作表名稱限制：1..=31 字元，不可含 `[]:*?/\`
pub fn validate_sheet_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;
    validate_range(field_name, name.chars().count(), 1, 31)?;

    if let Some(bad) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!("Sheet name cannot contain '{}'", bad),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("output.file_name", "data.xlsx").is_ok());
        assert!(validate_file_name("output.file_name", "").is_err());
        assert!(validate_file_name("output.file_name", "../data.xlsx").is_err());
        assert!(validate_file_name("output.file_name", "out/data.xlsx").is_err());
        assert!(validate_file_name("output.file_name", "..").is_err());
        assert!(validate_file_name("output.file_name", "/etc/passwd").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["data.xlsx".to_string(), "DATA.XLSX".to_string()];
        assert!(validate_file_extensions("output.file_name", &files, &["xlsx"]).is_ok());

        let invalid_files = vec!["data.csv".to_string()];
        assert!(validate_file_extensions("output.file_name", &invalid_files, &["xlsx"]).is_err());

        let no_extension = vec!["data".to_string()];
        assert!(validate_file_extensions("output.file_name", &no_extension, &["xlsx"]).is_err());
    }

    #[test]
    fn test_validate_sheet_name() {
        assert!(validate_sheet_name("output.sheet_name", "Sheet1").is_ok());
        assert!(validate_sheet_name("output.sheet_name", "").is_err());
        assert!(validate_sheet_name("output.sheet_name", "a/b").is_err());
        assert!(validate_sheet_name("output.sheet_name", &"x".repeat(32)).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("server.port", 8050u16, 1, u16::MAX).is_ok());
        assert!(validate_range("server.port", 0u16, 1, u16::MAX).is_err());
    }
}
