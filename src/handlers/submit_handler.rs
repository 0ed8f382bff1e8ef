use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::submission::{FormAction, SubmitResponse, ACTION_FIELD, RECORD_ID_FIELD, TOKEN_FIELD};
use crate::services::{field_codec, harvest, invoice_store};
use crate::AppState;

/// 接收发票表单。
///
/// 先从隐藏字段还原字段清单，令牌无效时直接拒绝，不会退回到完整字段列表；
/// 之后只按清单中的字段取值，交给数据库层用绑定参数写入。
pub async fn submit_invoice(
    State(state): State<Arc<AppState>>,
    Form(params): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(">>> 收到发票表单提交: 参数数量={}", params.len());

    let token = params.get(TOKEN_FIELD).ok_or(AppError::MissingField(TOKEN_FIELD))?;
    let fields = field_codec::decode(token, state.fields.separator())?;
    harvest::ensure_known(&state.fields, &fields)?;

    let action = match params.get(ACTION_FIELD) {
        Some(raw) => raw.parse::<FormAction>()?,
        None => FormAction::Grabar,
    };

    let harvested = harvest::harvest(&fields, &params);
    tracing::debug!("--- 解析出字段: {:?}", harvested);

    match action {
        FormAction::Grabar => {
            let id = invoice_store::insert_invoice(&state.db, &state.config.table, &harvested).await?;
            tracing::info!("<<< 发票已新建: id={}, 字段数={}", id, harvested.len());

            Ok((
                StatusCode::CREATED,
                Json(SubmitResponse {
                    id,
                    action,
                    fields: harvested,
                }),
            ))
        }
        FormAction::Modificar => {
            let raw = params.get(RECORD_ID_FIELD).ok_or(AppError::MissingField(RECORD_ID_FIELD))?;
            let id: i32 = raw.trim().parse().map_err(|_| AppError::InvalidId(raw.clone()))?;

            let affected = invoice_store::update_invoice(&state.db, &state.config.table, id, &harvested).await?;
            if affected == 0 {
                return Err(AppError::NotFound(id));
            }
            tracing::info!("<<< 发票已更新: id={}", id);

            Ok((
                StatusCode::OK,
                Json(SubmitResponse {
                    id,
                    action,
                    fields: harvested,
                }),
            ))
        }
    }
}
