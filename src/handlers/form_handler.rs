use axum::{
    extract::{Query, State},
    response::Html,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::invoice::INVOICE_DATE_FIELD;
use crate::models::submission::FormAction;
use crate::services::{field_codec, invoice_store, render};
use crate::AppState;

/// 1. 发票编辑表单
/// 带 `id` 时读取已有记录进入修改模式，否则生成新建表单
pub async fn invoice_form(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, AppError> {
    let data_fields = state.fields.data_fields();

    let (stored, action, id) = match params.get("id") {
        Some(raw) => {
            let id: i32 = raw.trim().parse().map_err(|_| AppError::InvalidId(raw.clone()))?;
            tracing::info!(">>> 打开发票修改表单: id={}", id);

            let stored = invoice_store::fetch_invoice(&state.db, &state.config.table, data_fields, id)
                .await?
                .ok_or(AppError::NotFound(id))?;
            (stored, FormAction::Modificar, Some(id))
        }
        None => {
            tracing::info!(">>> 打开发票新建表单");
            // 新建时发票日期默认取当前时间
            let now = chrono::Local::now().format("%Y%m%d %H:%M:%S").to_string();
            let defaults = HashMap::from([(INVOICE_DATE_FIELD.to_string(), now)]);
            (defaults, FormAction::Grabar, None)
        }
    };

    // 取值顺序：已存数据/默认值 -> 同名请求参数 -> 空
    let inputs = render::render_inputs(data_fields.iter().map(|field| {
        let value = stored
            .get(field.as_str())
            .or_else(|| params.get(field.as_str()))
            .map(String::as_str)
            .unwrap_or("");
        (field, value)
    }));

    let token = field_codec::encode(&state.fields);
    tracing::debug!("<<< 表单字段令牌: {}", token);

    Ok(Html(render::render_invoice_form(&inputs, action, &token, id)))
}

/// 2. 字段清单页，请求参数用来预填输入框
pub async fn field_list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    tracing::debug!(">>> 生成字段清单, 预填参数数量: {}", params.len());

    let inputs = render::render_inputs(state.fields.data_fields().iter().map(|field| {
        let value = params.get(field.as_str()).map(String::as_str).unwrap_or("");
        (field, value)
    }));

    Html(render::render_field_list(&inputs))
}
