mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use nis2_scope::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
