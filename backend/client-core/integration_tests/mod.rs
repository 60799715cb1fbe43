mod gateway;
mod helpers;
mod services;
