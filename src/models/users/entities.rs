use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 用户角色
///
/// 身份与会话由外部网关管理，本服务只消费解析后的 (user_id, role)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Faculty,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Faculty => "faculty",
            UserRole::Student => "student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "faculty" => Ok(UserRole::Faculty),
            "student" => Ok(UserRole::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// 已解析的请求身份，由身份中间件写入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("faculty".parse::<UserRole>().unwrap(), UserRole::Faculty);
        assert_eq!("Student".parse::<UserRole>().unwrap(), UserRole::Student);
        assert_eq!(UserRole::Faculty.to_string(), "faculty");
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("admin".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
    }
}
