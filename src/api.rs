pub mod client;
pub mod discord;
pub mod kraken;
pub mod octopus;
pub mod products;
pub mod sign_up;
pub mod telegram;
