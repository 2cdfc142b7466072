pub mod error;
pub mod export;
pub mod expr;
pub mod grade;
pub mod history;
pub mod ledger;
pub mod record;
pub mod report;
