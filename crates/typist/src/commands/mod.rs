use async_trait::async_trait;
use eyre::Result;

pub mod health;
pub mod preferences;
pub mod send;

#[async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
