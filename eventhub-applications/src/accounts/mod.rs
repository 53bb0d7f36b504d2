//! Accounts: registration, login and self-service profile management

pub mod service;
pub mod types;
pub mod validation;

pub use service::{AccountError, AccountResult, AccountService};
pub use types::{
    Account, AccountProfile, LoginRequest, LoginResponse, NewAccount, RegisterRequest,
    UpdateAccountRequest,
};
