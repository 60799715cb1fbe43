mod auth;
mod event;
mod participant;
