pub mod billing;
pub mod customers;
pub mod invoices;
pub mod system;
