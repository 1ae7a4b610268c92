pub mod account;
pub mod calculator;
pub mod consumption;
pub mod decision;
pub mod enrolment;
#[cfg(test)]
pub mod fake;
pub mod interval;
pub mod pipeline;
pub mod provider;
pub mod rates;
pub mod switch;
pub mod switcher;
pub mod tariff;
