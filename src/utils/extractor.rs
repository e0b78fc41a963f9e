//! 路径参数提取器
//!
//! 对路径中的 `{id}` 做严格的 i64 解析，非法输入直接以 400 拒绝，
//! 不进入业务层。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 路径参数 `{id}` 的安全提取器
pub struct SafeIdI64(pub i64);

impl FromRequest for SafeIdI64 {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().query("id");
        let parsed = raw.parse::<i64>();

        ready(match parsed {
            Ok(id) if id > 0 => Ok(SafeIdI64(id)),
            _ => {
                let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
                    ErrorCode::BadRequest,
                    format!("Invalid id in path: {raw}"),
                ));
                Err(InternalError::from_response("invalid path id", response).into())
            }
        })
    }
}
