use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use std::collections::HashMap;

use crate::error::AppError;
use crate::models::field_set::FieldName;
use crate::models::invoice::PRIMARY_KEY;
use crate::models::submission::HarvestedField;
use crate::services::listing::SortKey;

/// 列名和表名只来自校验过的配置，统一加双引号；所有取值一律绑定参数
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// 表结构不在本服务管理范围内，读取时统一转成文本
fn push_text_columns<'a>(qb: &mut QueryBuilder<'static, Postgres>, columns: impl IntoIterator<Item = &'a str>) {
    let mut columns = columns.into_iter().peekable();
    if columns.peek().is_none() {
        qb.push("1");
        return;
    }

    let mut separated = qb.separated(", ");
    for column in columns {
        let quoted = quote_ident(column);
        separated.push(format!("CAST({quoted} AS TEXT) AS {quoted}"));
    }
}

pub fn select_by_id_query(table: &str, fields: &[FieldName], id: i32) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    push_text_columns(&mut qb, fields.iter().map(FieldName::as_str));
    qb.push(" FROM ")
        .push(quote_ident(table))
        .push(" WHERE ")
        .push(quote_ident(PRIMARY_KEY))
        .push(" = ")
        .push_bind(id);
    qb
}

/// 没有提交的字段以 NULL 写入
pub fn insert_query(table: &str, values: &[HarvestedField]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("INSERT INTO ");
    qb.push(quote_ident(table));

    if values.is_empty() {
        qb.push(" DEFAULT VALUES");
    } else {
        qb.push(" (");
        {
            let mut columns = qb.separated(", ");
            for field in values {
                columns.push(quote_ident(field.name.as_str()));
            }
        }
        qb.push(") VALUES (");
        {
            let mut binds = qb.separated(", ");
            for field in values {
                binds.push_bind(field.value.clone());
            }
        }
        qb.push(")");
    }

    // 主键按 INTEGER 读回，不依赖 serial / bigserial
    qb.push(" RETURNING CAST(")
        .push(quote_ident(PRIMARY_KEY))
        .push(" AS INTEGER)");
    qb
}

/// 只更新提交了的字段，全部缺失时返回 `None`
pub fn update_query(table: &str, id: i32, values: &[HarvestedField]) -> Option<QueryBuilder<'static, Postgres>> {
    let present: Vec<(&FieldName, &String)> = values
        .iter()
        .filter_map(|field| field.value.as_ref().map(|value| (&field.name, value)))
        .collect();

    if present.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE ");
    qb.push(quote_ident(table)).push(" SET ");
    {
        let mut assignments = qb.separated(", ");
        for (name, value) in present {
            assignments.push(format!("{} = ", quote_ident(name.as_str())));
            assignments.push_bind_unseparated(value.clone());
        }
    }
    qb.push(" WHERE ")
        .push(quote_ident(PRIMARY_KEY))
        .push(" = ")
        .push_bind(id);
    Some(qb)
}

pub fn list_query(table: &str, columns: &[&str], order: &[SortKey]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    push_text_columns(&mut qb, columns.iter().copied());
    qb.push(" FROM ").push(quote_ident(table));

    if !order.is_empty() {
        qb.push(" ORDER BY ");
        let mut keys = qb.separated(", ");
        for key in order {
            keys.push(format!("{} {}", quote_ident(key.column), key.direction.as_sql()));
        }
    }
    qb
}

/// 读取一条发票记录，NULL 列不出现在结果中
pub async fn fetch_invoice(
    pool: &PgPool,
    table: &str,
    fields: &[FieldName],
    id: i32,
) -> Result<Option<HashMap<String, String>>, sqlx::Error> {
    let mut qb = select_by_id_query(table, fields, id);
    let row = qb.build().fetch_optional(pool).await?;

    row.map(|row| stored_values(&row, fields)).transpose()
}

fn stored_values(row: &PgRow, fields: &[FieldName]) -> Result<HashMap<String, String>, sqlx::Error> {
    let mut values = HashMap::new();
    for (index, field) in fields.iter().enumerate() {
        if let Some(value) = row.try_get::<Option<String>, _>(index)? {
            values.insert(field.to_string(), value);
        }
    }
    Ok(values)
}

pub async fn insert_invoice(pool: &PgPool, table: &str, values: &[HarvestedField]) -> Result<i32, sqlx::Error> {
    let mut qb = insert_query(table, values);
    let row = qb.build().fetch_one(pool).await?;
    row.try_get::<i32, _>(0)
}

/// 返回受影响的行数
pub async fn update_invoice(
    pool: &PgPool,
    table: &str,
    id: i32,
    values: &[HarvestedField],
) -> Result<u64, AppError> {
    let mut qb = update_query(table, id, values).ok_or(AppError::EmptySubmission)?;
    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn list_invoices(
    pool: &PgPool,
    table: &str,
    columns: &[&str],
    order: &[SortKey],
) -> Result<Vec<Vec<Option<String>>>, sqlx::Error> {
    let mut qb = list_query(table, columns, order);
    let rows = qb.build().fetch_all(pool).await?;

    rows.iter()
        .map(|row| {
            (0..columns.len())
                .map(|index| row.try_get::<Option<String>, _>(index))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}
