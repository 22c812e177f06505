//! Role-based authorization decision. Authentication itself happens upstream;
//! this module only judges a caller that has already been identified.

use crate::error::AppError;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            _ => Err(AppError::Unauthorized),
        }
    }
}

/// Fine-grained level within a role. Ordered: `Viewer < Editor < Manager`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessLevel {
    Viewer,
    Editor,
    Manager,
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Ok(AccessLevel::Viewer),
            "editor" => Ok(AccessLevel::Editor),
            "manager" => Ok(AccessLevel::Manager),
            _ => Err(AppError::Unauthorized),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
    pub access_level: AccessLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn required_level(self) -> AccessLevel {
        match self {
            Operation::Read => AccessLevel::Viewer,
            Operation::Create | Operation::Update => AccessLevel::Editor,
            Operation::Delete => AccessLevel::Manager,
        }
    }
}

/// Roles allowed to read and to write one entity.
#[derive(Clone, Copy, Debug)]
pub struct AccessPolicy {
    pub read: &'static [Role],
    pub write: &'static [Role],
}

impl AccessPolicy {
    pub fn check(&self, caller: &Caller, op: Operation) -> Result<(), AppError> {
        let roles = match op {
            Operation::Read => self.read,
            Operation::Create | Operation::Update | Operation::Delete => self.write,
        };
        authorize(caller, roles, op.required_level())
    }
}

pub fn authorize(caller: &Caller, required_roles: &[Role], required_level: AccessLevel) -> Result<(), AppError> {
    if !required_roles.contains(&caller.role) {
        return Err(AppError::Forbidden(format!("role {:?} not allowed", caller.role)));
    }
    if caller.access_level < required_level {
        return Err(AppError::Forbidden(format!("access level {:?} required", required_level)));
    }
    Ok(())
}
