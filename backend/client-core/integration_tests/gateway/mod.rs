mod refresh_flow;
mod passthrough;
