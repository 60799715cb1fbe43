mod error;
mod refresh;
mod request;
