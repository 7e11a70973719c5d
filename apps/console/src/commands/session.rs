use mes_client::MesClient;

use crate::cli::LoginArgs;
use crate::error::ConsoleResult;
use crate::output::{Output, format_identity};

pub async fn login(client: &MesClient, output: Output, args: &LoginArgs) -> ConsoleResult<()> {
    let identity = client.login(args.subject.trim(), &args.token).await?;
    if output.is_json() {
        return output.json_value(&identity);
    }
    output.line(&format!("Signed in as {}", identity.subject))?;
    output.line(&format_identity(&identity))
}

pub async fn logout(client: &MesClient, output: Output) -> ConsoleResult<()> {
    client.logout().await?;
    if output.is_json() {
        return Ok(());
    }
    output.line("Signed out")
}

pub async fn whoami(client: &MesClient, output: Output) -> ConsoleResult<()> {
    let identity = client.me().await?;
    if output.is_json() {
        return output.json_value(&identity);
    }
    output.line(&format_identity(&identity))
}

pub async fn health(client: &MesClient, output: Output) -> ConsoleResult<()> {
    client.health().await?;
    if output.is_json() {
        return output.json_value(&serde_json::json!({ "status": "ok" }));
    }
    output.line("ok")
}
