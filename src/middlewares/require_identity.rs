/*!
 * 身份解析中间件
 *
 * 登录、会话与令牌校验由外部网关完成，网关将解析结果以受信头部传入：
 *
 * - `X-Portal-User-Id`: 用户 ID（整数）
 * - `X-Portal-User-Role`: 用户角色（faculty / student）
 *
 * 此中间件将两者解析为 [`Identity`] 写入请求扩展；头部缺失或非法时
 * 返回 401。处理程序通过 `RequireIdentity::extract_identity` 读取。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use crate::models::ErrorCode;
use crate::models::users::entities::{Identity, UserRole};

use super::create_error_response;

const USER_ID_HEADER: &str = "X-Portal-User-Id";
const USER_ROLE_HEADER: &str = "X-Portal-User-Role";

#[derive(Clone)]
pub struct RequireIdentity;

// 辅助函数：从受信头部解析身份
fn resolve_identity(req: &ServiceRequest) -> Result<Identity, String> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| format!("Missing {USER_ID_HEADER} header"))?
        .parse::<i64>()
        .map_err(|_| format!("Invalid {USER_ID_HEADER} header"))?;

    let role = req
        .headers()
        .get(USER_ROLE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| format!("Missing {USER_ROLE_HEADER} header"))?
        .parse::<UserRole>()
        .map_err(|e| format!("Invalid {USER_ROLE_HEADER} header: {e}"))?;

    Ok(Identity { user_id, role })
}

impl<S, B> Transform<S, ServiceRequest> for RequireIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireIdentityMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireIdentityMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match resolve_identity(&req) {
                Ok(identity) => {
                    debug!(
                        "Identity resolved: user_id={}, role={}",
                        identity.user_id, identity.role
                    );
                    req.extensions_mut().insert(identity);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "Identity resolution failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取身份信息
impl RequireIdentity {
    /// 从请求扩展中提取完整身份
    /// 此函数应该在应用了 RequireIdentity 中间件的路由处理程序中使用
    pub fn extract_identity(req: &actix_web::HttpRequest) -> Option<Identity> {
        req.extensions().get::<Identity>().copied()
    }

    /// 从请求扩展中提取用户 ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        Self::extract_identity(req).map(|identity| identity.user_id)
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        Self::extract_identity(req).map(|identity| identity.role)
    }
}
