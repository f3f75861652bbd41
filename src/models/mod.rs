pub mod cash_flow;
pub mod etf;
pub mod user;
