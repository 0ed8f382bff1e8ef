use std::collections::HashMap;

use crate::error::AppError;
use crate::models::field_set::{FieldName, RecordFields};
use crate::models::submission::HarvestedField;

/// 按解码得到的字段顺序，从提交参数中取值。
/// 字段名区分大小写，精确匹配；没有提交的字段记为 `None`。
pub fn harvest(fields: &[FieldName], submitted: &HashMap<String, String>) -> Vec<HarvestedField> {
    fields
        .iter()
        .map(|field| HarvestedField::new(field.clone(), submitted.get(field.as_str()).cloned()))
        .collect()
}

/// 令牌来自客户端，字段名最终会成为 SQL 列名，只接受该记录类型的数据字段
pub fn ensure_known(record: &RecordFields, fields: &[FieldName]) -> Result<(), AppError> {
    match fields.iter().find(|field| !record.is_data_field(field.as_str())) {
        Some(unknown) => Err(AppError::UnknownField(unknown.to_string())),
        None => Ok(()),
    }
}
