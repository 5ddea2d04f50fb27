use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::repo_types::{EmploymentStatus, User, VerificationStatus};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Request body for user registration. Fields are optional so a missing one
/// surfaces as a validation error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returned by register.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}

/// Returned by login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ProfileUser,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub employment_status: EmploymentStatus,
    pub unemployment_verification_status: VerificationStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub fol_balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ProfileUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub employment_status: EmploymentStatus,
    pub unemployment_verification_status: VerificationStatus,
    #[serde(with = "iso_date::option")]
    pub unemployment_start_date: Option<Date>,
    pub previous_employer: Option<String>,
    pub previous_job_title: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub fol_balance: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

impl From<User> for LoginUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            employment_status: u.employment_status,
            unemployment_verification_status: u.unemployment_verification_status,
            fol_balance: u.fol_balance,
        }
    }
}

impl From<User> for ProfileUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            employment_status: u.employment_status,
            unemployment_verification_status: u.unemployment_verification_status,
            unemployment_start_date: u.unemployment_start_date,
            previous_employer: u.previous_employer,
            previous_job_title: u.previous_job_title,
            fol_balance: u.fol_balance,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}
