mod common;
mod graph;
mod service;
