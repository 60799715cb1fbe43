mod config;
mod gateway;
mod session;
