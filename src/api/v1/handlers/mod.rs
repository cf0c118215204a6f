pub mod health;
pub mod whoami;
pub mod ws;
