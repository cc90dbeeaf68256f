pub mod audit_log;
pub mod health;
pub mod materials;
pub mod reports;
pub mod usages;
